use colored::Colorize;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[serde(alias = "ERROR", alias = "Error")]
    Error,
    #[serde(alias = "WARN", alias = "Warn")]
    Warn,
    #[default]
    #[serde(alias = "INFO", alias = "Info")]
    Info,
    #[serde(alias = "DEBUG", alias = "Debug")]
    Debug,
    #[serde(alias = "TRACE", alias = "Trace")]
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Installs the global logger. Gateway chatter from serenity stays at `warn`.
pub fn init(level: LogLevel) -> Result<(), log::SetLoggerError> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Cyan)
        .trace(Color::BrightBlack);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} {} {} {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                format!("{:<5}", record.level()).color(colors.get_color(&record.level())),
                record.target().dimmed(),
                message
            ))
        })
        .level(level.into())
        .level_for("serenity", LevelFilter::Warn)
        .level_for("tracing", LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()
}
