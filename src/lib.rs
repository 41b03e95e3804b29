mod cli;
pub mod config;
pub mod error;
mod logging;
pub mod mailer;
pub mod message;

use std::{
    fs,
    io::{self, Write},
    process::ExitCode,
};

use log::debug;

pub use cli::{CommonArgs, LogLevel, SendEmailCli, SendmailCli, DEFAULT_BODY};
pub use config::{Credentials, Defaults};
pub use error::{ErrorKind, NotifyError, Result};
pub use logging::init_logging;
use message::{AddressOrigin, BodyFormat, Notification};

/// Server used by `sendmail` when the credentials file does not name one
pub const SENDMAIL_DEFAULTS: Defaults = Defaults {
    host: Some("smtp.gmail.com"),
    port: config::DEFAULT_PORT,
};

pub fn run_send_email(cli: SendEmailCli) -> Result<String> {
    let (creds, notification) = prepare_send_email(&cli, config::process_env)?;
    send(&creds, &notification)
}

pub fn run_sendmail(cli: SendmailCli) -> Result<String> {
    let (creds, notification) = prepare_sendmail(&cli, config::process_env)?;
    send(&creds, &notification)
}

fn send(creds: &Credentials, notification: &Notification) -> Result<String> {
    let message = notification.to_message()?;
    let transport = mailer::smtp_transport(creds)?;
    mailer::deliver(&transport, &message, &notification.to)
}

/// Validates input and resolves everything needed before any network activity
pub fn prepare_send_email<F>(
    cli: &SendEmailCli,
    lookup: F,
) -> Result<(Credentials, Notification)>
where
    F: Fn(&str) -> Option<String>,
{
    let body = resolve_body(cli)?;
    let creds = Credentials::resolve(
        lookup,
        &cli.common.get_credentials_path()?,
        &Defaults::default(),
    )?;
    debug!("Resolved credentials: {creds:?}");

    // Command line takes precedence over the configured default
    let (recipient, recipient_origin) = cli
        .to
        .as_deref()
        .map(|to| (to, AddressOrigin::CommandLine))
        .or(creds
            .default_recipient
            .as_deref()
            .map(|to| (to, AddressOrigin::Configuration)))
        .ok_or_else(|| {
            NotifyError::Usage(
                "No recipient specified. Use --to or set SMTP_TO or 'to' in the credentials file smtp config"
                    .into(),
            )
        })?;

    let notification = Notification::new(
        creds.sender(),
        recipient,
        recipient_origin,
        &cli.subject,
        body,
        BodyFormat::from_html_flag(cli.html),
    )?;
    Ok((creds, notification))
}

pub fn prepare_sendmail<F>(
    cli: &SendmailCli,
    lookup: F,
) -> Result<(Credentials, Notification)>
where
    F: Fn(&str) -> Option<String>,
{
    let creds = Credentials::resolve(
        lookup,
        &cli.common.get_credentials_path()?,
        &SENDMAIL_DEFAULTS,
    )?;
    debug!("Resolved credentials: {creds:?}");

    let recipient = creds.default_recipient.as_deref().ok_or_else(|| {
        NotifyError::Config(
            "No recipient configured. Set SMTP_TO or 'to' in the credentials file smtp config"
                .into(),
        )
    })?;

    let notification = Notification::new(
        creds.sender(),
        recipient,
        AddressOrigin::Configuration,
        &cli.subject,
        cli.body.clone(),
        BodyFormat::Plain,
    )?;
    Ok((creds, notification))
}

fn resolve_body(cli: &SendEmailCli) -> Result<String> {
    match (&cli.body, &cli.body_file) {
        (Some(body), None) => Ok(body.clone()),
        (None, Some(path)) => {
            debug!("Reading body from {path:?}");
            fs::read_to_string(path).map_err(|source| NotifyError::BodyFile {
                path: path.clone(),
                source,
            })
        }
        _ => Err(NotifyError::Usage(
            "Exactly one of --body or --body-file is required".into(),
        )),
    }
}

/// Prints the outcome and maps it to the process exit status
pub fn finish(outcome: Result<String>) -> ExitCode {
    report(outcome, &mut io::stdout().lock(), &mut io::stderr().lock())
}

fn report<O, E>(outcome: Result<String>, out: &mut O, err_out: &mut E) -> ExitCode
where
    O: Write,
    E: Write,
{
    let (written, code) = match outcome {
        Ok(confirmation) => (writeln!(out, "{confirmation}"), ExitCode::SUCCESS),
        Err(err) => {
            debug!("{err:?}");
            (writeln!(err_out, "{}: {err}", err.kind()), ExitCode::FAILURE)
        }
    };
    if let Err(e) = written {
        debug!("Failed to write outcome: {e}");
    }
    code
}

/// Reports a command line parse failure, help and version requests are not failures
pub fn finish_usage(err: clap::Error) -> ExitCode {
    if let Err(e) = err.print() {
        debug!("Failed to print usage error: {e}");
    }
    if err.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
