// Copied and edited based on https://github.com/estk/log4rs/pull/295

use std::path::Path;

use anyhow::Context;
use log::LevelFilter;
use log4rs::Handle;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            policy::compound::{
                roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy,
            },
            RollingFileAppender,
        },
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

/// Logs go to stderr so stdout only carries the confirmation line
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> anyhow::Result<Handle> {
    let config = build_config(level, log_file)?;
    let handle = log4rs::init_config(config).context("Failed to init_config")?;
    Ok(handle)
}

fn build_config(level: LevelFilter, log_file: Option<&Path>) -> anyhow::Result<Config> {
    // Build a stderr logger.
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{l} - {m}\n")))
        .build();

    let mut config = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(level)))
            .build("stderr", Box::new(stderr)),
    );
    let mut root = Root::builder().appender("stderr");

    if let Some(file_path) = log_file {
        // Pattern: https://docs.rs/log4rs/*/log4rs/append/rolling_file/policy/compound/roll/fixed_window/struct.FixedWindowRollerBuilder.html#method.build
        let archive_pattern = format!("{}.{{}}", file_path.display());

        // Create a policy to use with the file logging
        let trigger = SizeTrigger::new(2_097_152); // 2mb (2 * 1024 * 1024)
        let roller = FixedWindowRoller::builder()
            .build(&archive_pattern, 10) // Roll based on pattern and max 10 archive files
            .context("Failed to create FixedWindowRoller")?;
        let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

        // Logging to log file. (with rolling)
        let log_file = RollingFileAppender::builder()
            // Pattern: https://docs.rs/log4rs/*/log4rs/encode/pattern/index.html
            .encoder(Box::new(PatternEncoder::new(
                "{d(%Y-%m-%d %H:%M:%S)} {l} - {m}\n",
            )))
            .build(file_path, Box::new(policy))
            .with_context(|| format!("Failed to open log file {file_path:?}"))?;

        config = config.appender(Appender::builder().build("log_file", Box::new(log_file)));
        root = root.appender("log_file");
    }

    config
        .build(root.build(level))
        .context("Failed to configure logging")
}
