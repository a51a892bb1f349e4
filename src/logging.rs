//! Log setup. The terminal is owned by the TUI, so everything goes to a
//! file under the user's cache directory.

use std::path::PathBuf;

pub fn setup() -> Result<(), fern::InitError> {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|value| value.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);

    let path = log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(fern::log_file(path)?)
        .apply()?;

    Ok(())
}

fn log_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".cache/tlp-boost/tlp-boost.log"),
        None => PathBuf::from("tlp-boost.log"),
    }
}
