use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
};

use log::debug;
use serde::Deserialize;

use crate::error::{NotifyError, Result};

pub const DEFAULT_PORT: u16 = 587;
pub const CONFIG_DIR_NAME: &str = ".claude";
pub const CREDENTIALS_FILENAME: &str = ".credentials.json";

pub const ENV_HOST: &str = "SMTP_HOST";
pub const ENV_PORT: &str = "SMTP_PORT";
pub const ENV_USER: &str = "SMTP_USER";
pub const ENV_PASSWORD: &str = "SMTP_PASSWORD";
pub const ENV_TO: &str = "SMTP_TO";
pub const ENV_FROM: &str = "SMTP_FROM";

/// Built-in values used when neither the environment nor the file supply them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    pub host: Option<&'static str>,
    pub port: u16,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
        }
    }
}

/// Where the credentials were taken from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Environment,
    File(PathBuf),
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Recipient used when none is given on the command line
    pub default_recipient: Option<String>,
    /// Sender address if it differs from the login user
    pub from: Option<String>,
    pub source: Source,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("default_recipient", &self.default_recipient)
            .field("from", &self.from)
            .field("source", &self.source)
            .finish()
    }
}

impl Credentials {
    /// Resolves credentials from the environment, falling back to the file at `file_path`
    ///
    /// The file is only consulted if the environment does not hold all four required values
    pub fn resolve<F>(lookup: F, file_path: &Path, defaults: &Defaults) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(creds) = Self::from_env(&lookup)? {
            debug!("Using SMTP credentials from environment");
            return Ok(creds);
        }
        if let Some(creds) = Self::load_from(file_path, defaults)? {
            debug!("Using SMTP credentials from {file_path:?}");
            return Ok(creds);
        }
        Err(NotifyError::CredentialsNotFound(file_path.to_path_buf()))
    }

    /// Returns `None` unless all of host, port, user and password are set
    pub fn from_env<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let (Some(host), Some(port), Some(user), Some(password)) = (
            get(ENV_HOST),
            get(ENV_PORT),
            get(ENV_USER),
            get(ENV_PASSWORD),
        ) else {
            debug!("SMTP environment variables incomplete");
            return Ok(None);
        };
        let port = parse_port(&port).ok_or_else(|| {
            NotifyError::Config(format!("{ENV_PORT} is not a valid port number: {port:?}"))
        })?;
        Ok(Some(Self {
            host,
            port,
            user,
            password,
            default_recipient: get(ENV_TO),
            from: get(ENV_FROM),
            source: Source::Environment,
        }))
    }

    /// Returns `None` if the file does not exist or has no `smtp` section
    pub fn load_from(path: &Path, defaults: &Defaults) -> Result<Option<Self>> {
        if !path.exists() {
            debug!("Credentials file {path:?} does not exist");
            return Ok(None);
        }
        debug!("Loading credentials from: {path:?}");
        let file_contents =
            fs::read_to_string(path).map_err(|source| NotifyError::CredentialsRead {
                path: path.to_path_buf(),
                source,
            })?;
        let file: CredentialsFile = serde_json::from_str(&file_contents).map_err(|source| {
            NotifyError::CredentialsParse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        match file.smtp {
            Some(section) if !section.is_empty() => {
                section.into_credentials(path, defaults).map(Some)
            }
            _ => {
                debug!("No smtp section in {path:?}");
                Ok(None)
            }
        }
    }

    /// Address placed in the From header
    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.user)
    }
}

/// Reads a process environment variable, treating unset and non-unicode alike
pub fn process_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// `~/.claude/.credentials.json`
pub fn default_credentials_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        NotifyError::Config("Unable to determine home directory for credentials file".into())
    })?;
    Ok(home.join(CONFIG_DIR_NAME).join(CREDENTIALS_FILENAME))
}

fn parse_port(value: &str) -> Option<u16> {
    value.trim().parse().ok()
}

/// Only the parts of the file this program cares about, other keys are ignored
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    smtp: Option<SmtpSection>,
}

#[derive(Debug, Deserialize)]
struct SmtpSection {
    host: Option<String>,
    port: Option<PortValue>,
    user: Option<String>,
    password: Option<String>,
    to: Option<String>,
    from: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u16),
    Text(String),
}

impl SmtpSection {
    fn is_empty(&self) -> bool {
        self.host.is_none()
            && self.port.is_none()
            && self.user.is_none()
            && self.password.is_none()
            && self.to.is_none()
            && self.from.is_none()
    }

    fn into_credentials(self, path: &Path, defaults: &Defaults) -> Result<Credentials> {
        let missing = |key: &str| {
            NotifyError::Config(format!("Missing smtp.{key} in credentials file {path:?}"))
        };
        let host = match non_empty(self.host) {
            Some(host) => host,
            None => defaults.host.map(str::to_string).ok_or_else(|| missing("host"))?,
        };
        let port = match self.port {
            None => defaults.port,
            Some(PortValue::Number(port)) => port,
            Some(PortValue::Text(text)) => parse_port(&text).ok_or_else(|| {
                NotifyError::Config(format!(
                    "smtp.port in {path:?} is not a valid port number: {text:?}"
                ))
            })?,
        };
        let user = non_empty(self.user).ok_or_else(|| missing("user"))?;
        let password = non_empty(self.password).ok_or_else(|| missing("password"))?;
        Ok(Credentials {
            host,
            port,
            user,
            password,
            default_recipient: non_empty(self.to),
            from: non_empty(self.from),
            source: Source::File(path.to_path_buf()),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
