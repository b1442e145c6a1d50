//! Command-line argument definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Hotmart course downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "hotmart-downloader",
    version,
    about = "Download purchased video courses from Hotmart",
    long_about = "A CLI tool to download the video lessons and attachments of courses\n\
                  purchased on Hotmart, remuxed into standalone MP4 files."
)]
pub struct Args {
    /// Account username (email).
    #[arg(short, long, env = "HOTMART_USERNAME")]
    pub user: Option<String>,

    /// Account password.
    #[arg(short, long, env = "HOTMART_PASSWORD")]
    pub password: Option<String>,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Download only the course with this club subdomain.
    #[arg(long)]
    pub course: Option<String>,

    /// Download every purchased course without prompting.
    #[arg(long)]
    pub all: bool,

    /// List purchased courses and exit.
    #[arg(long)]
    pub list: bool,

    /// Maximum concurrent segment transfers.
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Keep segment files and the local playlist after remuxing.
    #[arg(long)]
    pub keep_segments: bool,

    /// Don't download lesson attachments.
    #[arg(long)]
    pub skip_attachments: bool,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Hide download progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where
    /// specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(user) = &self.user {
            config.account.username = Some(user.clone());
        }

        if let Some(password) = &self.password {
            config.account.password = Some(password.clone());
        }

        if let Some(dir) = &self.download_directory {
            config.options.download_directory = Some(dir.clone());
        }

        if let Some(concurrency) = self.concurrency {
            config.options.concurrency = concurrency;
        }

        if self.keep_segments {
            config.options.keep_segments = true;
        }

        if self.skip_attachments {
            config.options.skip_attachments = true;
        }

        if self.quiet {
            config.options.show_downloads = false;
        }
    }
}
