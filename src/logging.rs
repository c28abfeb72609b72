//! Logging through the `log` facade, backed by `log4rs`.

use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    Config,
};
use std::path::Path;

const CONSOLE_APPENDER: &str = "stderr";
const LOG_FILE_APPENDER: &str = "log_file";
const LOG_FILE_NAME: &str = "read-and-sign.log";
const LOG_LINE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f%:z)} [{l:<5}] {t} - {m}{n}";

/// Crates whose output is shown at the requested level by default.
const APP_CRATES: &[&str] = &["read_and_sign"];

/// Initialize the global logger.
///
/// `filters` is either a level (`"debug"`) applied to this crate, or a comma
/// separated list that may add `module=level` pairs and `root=level` for
/// everything else. Third party crates log at `warn` unless told otherwise.
/// Repeated calls are ignored.
pub fn init_logger(log_dir: Option<&Path>, filters: &str) {
    let (app_level, root_level, module_levels) = parse_filters(filters);

    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN)))
        .build();
    let mut config_builder =
        Config::builder().appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(console)));
    let mut appenders = vec![CONSOLE_APPENDER];

    if let Some(dir) = log_dir {
        match FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN)))
            .build(dir.join(LOG_FILE_NAME))
        {
            Ok(file) => {
                config_builder = config_builder
                    .appender(Appender::builder().build(LOG_FILE_APPENDER, Box::new(file)));
                appenders.push(LOG_FILE_APPENDER);
            }
            Err(err) => eprintln!("Could not open log file in {}: {}", dir.display(), err),
        }
    }

    for crate_name in APP_CRATES {
        if !module_levels.iter().any(|(module, _)| module == crate_name) {
            config_builder = config_builder.logger(Logger::builder().build(*crate_name, app_level));
        }
    }
    for (module, level) in module_levels {
        config_builder = config_builder.logger(Logger::builder().build(module, level));
    }

    match config_builder.build(Root::builder().appenders(appenders).build(root_level)) {
        Ok(config) => {
            let _ = log4rs::init_config(config);
        }
        Err(err) => eprintln!("Invalid logging configuration: {}", err),
    }
}

/// Split a filter expression into (app level, root level, per module levels).
fn parse_filters(filters: &str) -> (LevelFilter, LevelFilter, Vec<(String, LevelFilter)>) {
    let mut app_level = LevelFilter::Info;
    let mut root_level = LevelFilter::Warn;
    let mut module_levels = Vec::new();

    for part in filters.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('=') {
            Some((module, level)) => {
                let Ok(level) = level.trim().parse::<LevelFilter>() else {
                    continue;
                };
                match module.trim() {
                    "root" => root_level = level,
                    module => module_levels.push((module.to_owned(), level)),
                }
            }
            None => {
                if let Ok(level) = part.parse::<LevelFilter>() {
                    app_level = level;
                }
            }
        }
    }
    (app_level, root_level, module_levels)
}
