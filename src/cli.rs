use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, ValueEnum};
use log::LevelFilter;

use crate::{config, error::Result};

/// Body used by `sendmail` when only a subject is given
pub const DEFAULT_BODY: &str = "Task completed.";

#[derive(Parser, Clone, Eq, PartialEq, Debug)]
#[command(
    name = "send_email",
    author,
    version,
    about = "Send an email notification",
    long_about = "Send an email notification using SMTP credentials from the environment or a credentials file."
)]
#[command(group(
    ArgGroup::new("body_source")
        .required(true)
        .args(["body", "body_file"])
))]
pub struct SendEmailCli {
    /// Recipient email address
    ///
    /// Uses the default recipient from the environment or credentials file if not specified
    #[arg(long, value_name = "ADDR")]
    pub to: Option<String>,

    /// Email subject
    #[arg(long)]
    pub subject: String,

    /// Email body text
    #[arg(long)]
    pub body: Option<String>,

    /// File containing email body
    #[arg(long, value_name = "PATH")]
    pub body_file: Option<PathBuf>,

    /// Send as HTML email
    #[arg(long)]
    pub html: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser, Clone, Eq, PartialEq, Debug)]
#[command(
    name = "sendmail",
    author,
    version,
    about = "Send a plain text task completion notification to the configured recipient"
)]
pub struct SendmailCli {
    /// Email subject
    pub subject: String,

    /// Email body text
    #[arg(default_value = DEFAULT_BODY)]
    pub body: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Clone, Eq, PartialEq, Debug)]
pub struct CommonArgs {
    /// Specify credentials file to use
    ///
    /// If not specified uses `.claude/.credentials.json` in users home folder
    #[arg(long = "credentials", value_name = "PATH")]
    pub credentials_filename: Option<PathBuf>,

    /// Set logging level to use
    #[arg(long, short, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Also write logs to this file (rolled over when it gets large)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl CommonArgs {
    pub fn get_credentials_path(&self) -> Result<PathBuf> {
        match self.credentials_filename.as_ref() {
            Some(val) => Ok(val.clone()),
            None => config::default_credentials_path(),
        }
    }
}

/// Exists to provide better help messages variants copied from LevelFilter as
/// that's the type that is actually needed
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum LogLevel {
    /// Nothing emitted in this mode
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
