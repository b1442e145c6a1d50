//! Hotmart Downloader - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use hotmart_downloader::{
    api::{authorize, Course, Credentials, HotmartApi},
    cli::Args,
    config::{validate_config, Config},
    download::{
        download_attachment, download_hls_media, CourseStats, HlsOptions, RunStats,
    },
    error::{exit_codes, Error, Result},
    fs::{item_dir, sanitize_path_component},
    output::{
        create_spinner, print_banner, print_course_stats, print_error, print_info,
        print_run_stats, print_success, print_warning, prompt_choice, prompt_line,
        prompt_password,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::Authentication(_) | Error::Api(_) => {
                    ExitCode::from(exit_codes::API_ERROR as u8)
                }
                Error::Download(_)
                | Error::DownloadFailed(_)
                | Error::TransferFailed { .. }
                | Error::MalformedPlaylist(_)
                | Error::NoVariantFound => ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt().with_env_filter(filter).with_target(false).init();

    if !args.quiet {
        print_banner();
    }

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        Config::default()
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;

    // Authenticate
    let credentials = obtain_credentials(&config).await?;
    print_info(&format!("Logged in as: {}", credentials.username));

    let api = HotmartApi::new(credentials.access_token.clone(), &config.account.user_agent)?;

    // Fetch catalog
    let spinner = create_spinner("Fetching course list...");
    let courses = api.list_courses().await?;
    spinner.finish_and_clear();

    if courses.is_empty() {
        print_warning("No purchased courses found for this account");
        return Ok(());
    }

    if args.list {
        for course in &courses {
            println!("{} ({})", course.name, course.homepage());
        }
        return Ok(());
    }

    let selection = select_courses(&args, courses)?;

    // Process each selected course
    let mut run_stats = RunStats::default();

    for course in &selection {
        print_info(&format!("Processing course: {}", course.name));

        match process_course(&api, &config, course).await {
            Ok(stats) => {
                print_course_stats(&stats);
                run_stats.add_course(&stats);
            }
            Err(e) => {
                print_error(&format!("Failed to process {}: {}", course.name, e));
                run_stats.mark_course_failed();
            }
        }
    }

    print_run_stats(&run_stats);

    if run_stats.courses_failed > 0 {
        return Err(Error::Download(format!(
            "{} course(s) failed",
            run_stats.courses_failed
        )));
    }

    Ok(())
}

/// Resolve credentials: cached tokens when fresh, otherwise a password
/// grant with values from config/CLI or interactive prompts.
async fn obtain_credentials(config: &Config) -> Result<Credentials> {
    let username = match &config.account.username {
        Some(username) => username.clone(),
        None => prompt_line("Username:")?,
    };

    if let Some(cached) = Credentials::load_cached(&username)? {
        print_info("Using cached credentials");
        return Ok(cached);
    }

    let password = match &config.account.password {
        Some(password) => password.clone(),
        None => prompt_password("Password:")?,
    };

    let credentials = authorize(&username, &password, &config.account.user_agent).await?;

    if let Err(e) = credentials.save() {
        print_warning(&format!("Could not cache credentials: {}", e));
    }

    Ok(credentials)
}

/// Pick the courses to download: `--course` filters by subdomain, `--all`
/// takes everything, otherwise the user chooses interactively.
fn select_courses(args: &Args, courses: Vec<Course>) -> Result<Vec<Course>> {
    if let Some(subdomain) = &args.course {
        let selected: Vec<Course> = courses
            .into_iter()
            .filter(|c| &c.subdomain == subdomain)
            .collect();

        if selected.is_empty() {
            return Err(Error::Api(format!(
                "No purchased course with subdomain '{}'",
                subdomain
            )));
        }

        return Ok(selected);
    }

    if args.all {
        return Ok(courses);
    }

    println!();
    println!("0. All courses");
    for (index, course) in courses.iter().enumerate() {
        println!("{}. {} ({})", index + 1, course.name, course.homepage());
    }
    println!();

    let choice = prompt_choice("Choose a course to download:", courses.len())?;

    let mut courses = courses;
    if choice == 0 {
        Ok(courses)
    } else {
        Ok(vec![courses.swap_remove(choice - 1)])
    }
}

/// Download every lesson of one course. Per-item failures are reported and
/// counted; only local filesystem errors abort the course.
async fn process_course(api: &HotmartApi, config: &Config, course: &Course) -> Result<CourseStats> {
    let mut stats = CourseStats::new(course.name.clone());

    let modules = api.get_modules(&course.subdomain).await?;
    let course_dir = item_dir(&config.download_directory(), &course.name)?;

    let hls_options = HlsOptions {
        concurrency: config.options.concurrency,
        keep_segments: config.options.keep_segments,
        show_progress: config.options.show_downloads,
    };

    for module in &modules {
        tracing::info!("Module: {}", module.name);
        let module_dir = item_dir(&course_dir, &module.name)?;

        for page in &module.pages {
            let detail = match api.get_page(&course.subdomain, &page.hash).await {
                Ok(detail) => detail,
                Err(e) => {
                    print_warning(&format!("Could not fetch page '{}': {}", page.name, e));
                    stats.failed += 1;
                    continue;
                }
            };

            let page_dir = item_dir(&module_dir, &page.name)?;

            for (index, media) in detail.medias_src.iter().enumerate() {
                let stem = if detail.medias_src.len() == 1 {
                    page.name.clone()
                } else {
                    format!("{}_{}", page.name, index + 1)
                };

                let output_path = match sanitize_path_component(&stem) {
                    Ok(name) => page_dir.join(name).with_extension("mp4"),
                    Err(e) => {
                        print_warning(&format!("Skipping media with unusable name: {}", e));
                        stats.failed += 1;
                        continue;
                    }
                };

                if output_path.exists() {
                    tracing::debug!("Skipping existing file: {}", output_path.display());
                    stats.skipped += 1;
                    continue;
                }

                let result = async {
                    let master_url = api
                        .get_master_playlist_url(&course.subdomain, &media.media_src_url)
                        .await?;
                    download_hls_media(api, &master_url, &output_path, hls_options).await
                }
                .await;

                match result {
                    Ok(path) => {
                        if config.options.show_downloads {
                            print_success(&format!("Downloaded: {}", path.display()));
                        }
                        stats.videos += 1;
                    }
                    Err(e) => {
                        print_error(&format!("Failed to download '{}': {}", page.name, e));
                        stats.failed += 1;
                    }
                }
            }

            if !config.options.skip_attachments {
                for attachment in &detail.attachments {
                    match download_attachment(
                        api,
                        &course.subdomain,
                        attachment,
                        &page_dir,
                        config.options.show_downloads,
                    )
                    .await
                    {
                        Ok(Some(path)) => {
                            if config.options.show_downloads {
                                print_success(&format!("Downloaded: {}", path.display()));
                            }
                            stats.attachments += 1;
                        }
                        Ok(None) => stats.skipped += 1,
                        Err(e) => {
                            print_warning(&format!("Attachment failed: {}", e));
                            stats.failed += 1;
                        }
                    }
                }
            }
        }
    }

    Ok(stats)
}
