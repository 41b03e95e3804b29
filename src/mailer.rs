use lettre::{
    message::Mailbox,
    transport::smtp::authentication::Credentials as SmtpCredentials,
    Message, SmtpTransport, Transport,
};
use log::{debug, info};

use crate::{
    config::Credentials,
    error::{NotifyError, Result},
};

/// Builds a transport that upgrades the connection with STARTTLS before authenticating
pub fn smtp_transport(creds: &Credentials) -> Result<SmtpTransport> {
    debug!("Building SMTP transport for {}:{}", creds.host, creds.port);
    let transport = SmtpTransport::starttls_relay(&creds.host)
        .map_err(|e| NotifyError::TransportError(Box::new(e)))?
        .port(creds.port)
        .credentials(SmtpCredentials::new(
            creds.user.clone(),
            creds.password.clone(),
        ))
        .build();
    Ok(transport)
}

/// Submits the message and returns the confirmation to show the user
pub fn deliver<T>(transport: &T, message: &Message, recipient: &Mailbox) -> Result<String>
where
    T: Transport,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    info!("Sending email to {recipient}");
    transport
        .send(message)
        .map_err(|e| NotifyError::TransportError(Box::new(e)))?;
    Ok(format!("Email sent successfully to {recipient}"))
}
