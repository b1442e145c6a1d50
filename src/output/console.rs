//! Console output and interactive prompt utilities.

use console::{style, Term};

use crate::download::{CourseStats, RunStats};
use crate::error::{Error, Result};

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════╗
║     Hotmart Downloader                        ║
║     Download your purchased courses           ║
╚═══════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print per-course statistics.
pub fn print_course_stats(stats: &CourseStats) {
    println!();
    println!("{} {}", style("Course:").bold(), stats.course_name);
    println!("  Videos: {}", stats.videos);
    println!("  Attachments: {}", stats.attachments);
    println!("  Skipped (already present): {}", stats.skipped);
    if stats.failed > 0 {
        println!("  {} {}", style("Failed items:").red(), stats.failed);
    }
    println!();
}

/// Print whole-run statistics.
pub fn print_run_stats(stats: &RunStats) {
    println!("{}", style("Totals:").bold());
    println!(
        "  {} videos, {} attachments, {} skipped, {} failed",
        stats.videos, stats.attachments, stats.skipped, stats.failed
    );
    if stats.courses_failed > 0 {
        println!(
            "  {} {}",
            style("Courses failed:").red(),
            stats.courses_failed
        );
    }
}

/// Prompt for a line of input; re-asks until non-empty.
pub fn prompt_line(prompt: &str) -> Result<String> {
    let term = Term::stdout();

    loop {
        term.write_str(&format!("{} ", style(prompt).bold()))
            .map_err(Error::Io)?;

        let answer = term.read_line().map_err(Error::Io)?;
        let answer = answer.trim();

        if !answer.is_empty() {
            return Ok(answer.to_string());
        }

        print_warning("A value is required");
    }
}

/// Prompt for a password without echoing it.
pub fn prompt_password(prompt: &str) -> Result<String> {
    let term = Term::stdout();

    loop {
        term.write_str(&format!("{} ", style(prompt).bold()))
            .map_err(Error::Io)?;

        let answer = term.read_secure_line().map_err(Error::Io)?;

        if !answer.trim().is_empty() {
            return Ok(answer);
        }

        print_warning("A value is required");
    }
}

/// Prompt for a numeric choice in `0..=max`.
pub fn prompt_choice(prompt: &str, max: usize) -> Result<usize> {
    loop {
        let answer = prompt_line(prompt)?;

        if let Ok(value) = answer.parse::<usize>() {
            if value <= max {
                return Ok(value);
            }
        }

        print_warning("Invalid choice");
    }
}
