use log::LevelFilter;
use log4rs::{
    Config,
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            RollingFileAppender,
            policy::compound::{
                CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
            },
        },
    },
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};
use thiserror::Error;

use crate::config::LogConfig;

const LOG_SIZE_LIMIT: u64 = 10 * 1024 * 1024; // 10 MB

const LOG_FILE_COUNT: u32 = 3;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log archive pattern: {0}")]
    Roller(String),
    #[error("failed to open log file: {0}")]
    File(#[from] std::io::Error),
    #[error("invalid logger configuration: {0}")]
    Config(String),
    #[error("logger already initialized: {0}")]
    Init(#[from] log::SetLoggerError),
}

fn build_config(log_file: Option<&LogConfig>) -> Result<Config, LoggingError> {
    let stderr_level = LevelFilter::Info;
    let file_level = LevelFilter::Debug;

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let mut config = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(stderr_level)))
            .build("stderr", Box::new(stderr)),
    );
    let mut root = Root::builder().appender("stderr");

    if let Some(log_file) = log_file {
        let trigger = SizeTrigger::new(LOG_SIZE_LIMIT);
        let roller = FixedWindowRoller::builder()
            .build(&log_file.archive_pattern, LOG_FILE_COUNT)
            .map_err(|e| LoggingError::Roller(e.to_string()))?;
        let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

        let logfile = RollingFileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(&log_file.file_path, Box::new(policy))?;

        config = config.appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(file_level)))
                .build("logfile", Box::new(logfile)),
        );
        root = root.appender("logfile");
    }

    config
        .build(root.build(LevelFilter::Debug))
        .map_err(|e| LoggingError::Config(e.to_string()))
}

pub fn init_logger(log_file: Option<&LogConfig>) -> Result<(), LoggingError> {
    let config = build_config(log_file)?;
    let _handle = log4rs::init_config(config)?;
    Ok(())
}
