use std::env;
use dotenvy::dotenv;
use fern::Dispatch;

const DEFAULT_LOG_FILE: &str = "motogp_analytics.log";

pub fn level_from_str(verbosity: &str) -> log::LevelFilter {
    match verbosity.to_uppercase().as_str() {
        "OFF" => log::LevelFilter::Off,
        "ERROR" => log::LevelFilter::Error,
        "WARN" => log::LevelFilter::Warn,
        "DEBUG" => log::LevelFilter::Debug,
        "TRACE" => log::LevelFilter::Trace,
        // default to info
        _ => log::LevelFilter::Info,
    }
}

pub fn setup_logging() -> Result<(), fern::InitError> {
    dotenv().ok();
    let verbosity = env::var("LOGGING_LEVEL").unwrap_or_default();
    let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

    let formatted = Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{} [{}][{}] {}",
            chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
            record.target(),
            record.level(),
            message
        ))
    });

    // stdout is kept free for the json output of the binaries
    Dispatch::new()
        .level(level_from_str(&verbosity))
        .chain(
            formatted
                .chain(std::io::stderr())
                .chain(fern::log_file(log_file)?),
        )
        .apply()?;

    Ok(())
}
