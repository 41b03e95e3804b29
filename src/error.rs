use std::{fmt::Display, path::PathBuf};

use crate::message::AddressOrigin;

pub type OtherError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = core::result::Result<T, NotifyError>;

#[derive(thiserror::Error, Debug)]
pub enum NotifyError {
    #[error("{0}")]
    Usage(String),

    #[error("Failed to read body file {path:?}: {source}")]
    BodyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SMTP credentials not found. Set SMTP_HOST, SMTP_PORT, SMTP_USER and SMTP_PASSWORD or configure {0:?}")]
    CredentialsNotFound(PathBuf),

    #[error("{0}")]
    Config(String),

    #[error("Failed to read credentials file {path:?}: {source}")]
    CredentialsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse credentials file {path:?}: {source}")]
    CredentialsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {role} address {value:?}: {source}")]
    InvalidAddress {
        role: &'static str,
        origin: AddressOrigin,
        value: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("E-Mail error: {0}")]
    MailError(#[from] lettre::error::Error),

    #[error("SMTP Transport error: {0}")]
    TransportError(#[source] OtherError),
}

/// Broad classes of failure, used when reporting to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Configuration,
    Composition,
    Transport,
}

impl NotifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NotifyError::Usage(_)
            | NotifyError::BodyFile { .. }
            | NotifyError::InvalidAddress {
                origin: AddressOrigin::CommandLine,
                ..
            } => ErrorKind::Usage,
            NotifyError::InvalidAddress {
                origin: AddressOrigin::Configuration,
                ..
            }
            | NotifyError::CredentialsNotFound(_)
            | NotifyError::Config(_)
            | NotifyError::CredentialsRead { .. }
            | NotifyError::CredentialsParse { .. } => ErrorKind::Configuration,
            NotifyError::MailError(_) => ErrorKind::Composition,
            NotifyError::TransportError(_) => ErrorKind::Transport,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Usage => "usage error",
            ErrorKind::Configuration => "configuration error",
            ErrorKind::Composition => "failed to compose email",
            ErrorKind::Transport => "failed to send email",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(NotifyError::Usage("missing body".into()), ErrorKind::Usage)]
    #[case(NotifyError::Config("missing host".into()), ErrorKind::Configuration)]
    #[case(NotifyError::CredentialsNotFound("creds.json".into()), ErrorKind::Configuration)]
    #[case(NotifyError::TransportError("connection refused".into()), ErrorKind::Transport)]
    #[case(
        NotifyError::MailError(lettre::error::Error::MissingTo),
        ErrorKind::Composition
    )]
    fn classification(#[case] err: NotifyError, #[case] expected: ErrorKind) {
        assert_eq!(err.kind(), expected);
    }

    #[test]
    fn not_found_mentions_env_vars_and_path() {
        let err = NotifyError::CredentialsNotFound("/home/u/.claude/.credentials.json".into());
        let msg = err.to_string();
        assert!(msg.contains("SMTP_HOST"));
        assert!(msg.contains(".credentials.json"));
    }
}
