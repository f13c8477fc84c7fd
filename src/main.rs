// src/main.rs
use anonedits::{
    AppError, CommandLineInput, ErrorKind, HarvestConfig, HarvestReport, Harvester,
    MediaWikiHttpClient, WikiRepository,
};
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

/// Exit status for configuration errors detected before any request is made.
const EXIT_CONFIGURATION: u8 = 2;

/// Sets up logging configuration.
///
/// The console gets warnings (everything from info up with `--verbose`);
/// the log file in the temp dir always gets debug output.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("anonedits.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    // stderr, so `--pipe` output on stdout stays clean
    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {T} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("console", Box::new(console_appender)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Resolves configuration, runs the harvest and reports on it.
async fn execute_harvest(cli: CommandLineInput) -> Result<(), AppError> {
    let config = HarvestConfig::resolve(cli)?;

    let client = MediaWikiHttpClient::new(
        config.api_endpoint.clone(),
        &config.user_agent,
        config.request_timeout,
    )?
    .with_member_page_ceiling(config.member_page_ceiling);
    log::info!("Using MediaWiki API at {}", client.endpoint());

    let repository: Arc<dyn WikiRepository> = Arc::new(client);
    let harvester = Harvester::new(repository, config.clone());
    let report = harvester.run().await?;

    report_completion(&config, &report);
    Ok(())
}

/// Reports completion to the user with stats and file locations.
fn report_completion(config: &HarvestConfig, report: &HarvestReport) {
    if config.pipe {
        return;
    }

    match &report.crawl {
        Some(crawl) => {
            println!(
                "Crawled {} categories under {}: {} unique articles.",
                crawl.categories_expanded, config.seed, report.articles
            );
            if crawl.failed_listings > 0 {
                eprintln!(
                    "Warning: {} category listings failed; their members are missing.",
                    crawl.failed_listings
                );
            }
            if crawl.truncated_listings > 0 {
                eprintln!(
                    "Warning: {} categories had more members than --max-member-pages allows.",
                    crawl.truncated_listings
                );
            }
        }
        None => println!("Reused article log: {} unique articles.", report.articles),
    }

    let history = &report.results.summary;
    println!(
        "Kept {} anonymous revisions from {} unique addresses.",
        history.revisions_kept,
        report.results.addresses.len()
    );
    if history.articles_failed > 0 {
        eprintln!(
            "Warning: revision history unavailable for {} articles.",
            history.articles_failed
        );
    }

    for path in &report.output.saved {
        println!("Saved {}", path.display());
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CommandLineInput::parse();

    if let Err(e) = setup_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match execute_harvest(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            match e.kind() {
                ErrorKind::Configuration => ExitCode::from(EXIT_CONFIGURATION),
                ErrorKind::Transient | ErrorKind::Internal => ExitCode::FAILURE,
            }
        }
    }
}
