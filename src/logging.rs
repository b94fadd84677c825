use std::{env, fs::OpenOptions, io, path::Path, sync::Mutex};

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

fn filter() -> EnvFilter {
    env::var("GITDECK_LOG")
        .ok()
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Install the global subscriber. Without a log file output is discarded,
/// the terminal is owned by the UI.
pub fn init(log_file: Option<&Path>) -> Result<(), AppError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_target(false);

    let result = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::Logging(format!("{}: {e}", path.display())))?;
            builder.with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(io::sink).try_init(),
    };
    result.map_err(|e| AppError::Logging(e.to_string()))
}
