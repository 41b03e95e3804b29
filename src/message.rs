use lettre::{
    message::{header::ContentType, Mailbox},
    Message,
};

use crate::error::{NotifyError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Plain,
    Html,
}

impl BodyFormat {
    pub fn from_html_flag(html: bool) -> Self {
        if html {
            Self::Html
        } else {
            Self::Plain
        }
    }

    fn content_type(self) -> ContentType {
        match self {
            BodyFormat::Plain => ContentType::TEXT_PLAIN,
            BodyFormat::Html => ContentType::TEXT_HTML,
        }
    }
}

/// Where an address was supplied, decides how a bad value is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressOrigin {
    CommandLine,
    Configuration,
}

/// A single notification email, validated and ready to be built
#[derive(Debug, Clone)]
pub struct Notification {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub body: String,
    pub format: BodyFormat,
}

impl Notification {
    pub fn new(
        from: &str,
        to: &str,
        to_origin: AddressOrigin,
        subject: &str,
        body: String,
        format: BodyFormat,
    ) -> Result<Self> {
        Ok(Self {
            from: parse_mailbox("sender", from, AddressOrigin::Configuration)?,
            to: parse_mailbox("recipient", to, to_origin)?,
            subject: single_line_subject(subject)?.to_string(),
            body,
            format,
        })
    }

    pub fn to_message(&self) -> Result<Message> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(&self.subject)
            .header(self.format.content_type())
            .body(self.body.clone())?;
        Ok(message)
    }
}

fn parse_mailbox(role: &'static str, value: &str, origin: AddressOrigin) -> Result<Mailbox> {
    value
        .trim()
        .parse()
        .map_err(|source| NotifyError::InvalidAddress {
            role,
            origin,
            value: value.to_string(),
            source,
        })
}

/// Line breaks in a header value would start a new header
fn single_line_subject(subject: &str) -> Result<&str> {
    if subject.contains(['\r', '\n']) {
        return Err(NotifyError::Usage(format!(
            "Subject must be a single line: {subject:?}"
        )));
    }
    Ok(subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;

    fn formatted(notification: &Notification) -> String {
        String::from_utf8(notification.to_message().unwrap().formatted()).unwrap()
    }

    #[rstest]
    #[case(BodyFormat::Html, "Content-Type: text/html; charset=utf-8")]
    #[case(BodyFormat::Plain, "Content-Type: text/plain; charset=utf-8")]
    fn body_tagged_by_format(#[case] format: BodyFormat, #[case] expected: &str) {
        // Arrange
        let notification = Notification::new(
            "bot@example.com",
            "r@example.com",
            AddressOrigin::CommandLine,
            "Task Complete",
            "<b>done</b>".into(),
            format,
        )
        .unwrap();

        // Act
        let actual = formatted(&notification);

        // Assert
        assert!(actual.contains(expected), "{actual}");
    }

    #[test]
    fn headers_from_inputs() {
        let notification = Notification::new(
            "bot@example.com",
            "r@example.com",
            AddressOrigin::CommandLine,
            "Task Complete",
            "Your task has finished.".into(),
            BodyFormat::Plain,
        )
        .unwrap();
        let actual = formatted(&notification);
        assert!(actual.contains("From: bot@example.com"));
        assert!(actual.contains("To: r@example.com"));
        assert!(actual.contains("Subject: Task Complete"));
        assert!(actual.contains("Your task has finished."));
    }

    #[test]
    fn html_flag() {
        assert_eq!(BodyFormat::from_html_flag(true), BodyFormat::Html);
        assert_eq!(BodyFormat::from_html_flag(false), BodyFormat::Plain);
    }

    #[rstest]
    #[case("Done\r\nBcc: victim@example.com")]
    #[case("Done\nX-Injected: 1")]
    fn subject_with_line_break_rejected(#[case] subject: &str) {
        let err = Notification::new(
            "bot@example.com",
            "r@example.com",
            AddressOrigin::CommandLine,
            subject,
            String::new(),
            BodyFormat::Plain,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[rstest]
    #[case("not an address")]
    #[case("r@example.com\r\nBcc: victim@example.com")]
    fn bad_recipient_rejected(#[case] to: &str) {
        let err = Notification::new(
            "bot@example.com",
            to,
            AddressOrigin::CommandLine,
            "Done",
            String::new(),
            BodyFormat::Plain,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            NotifyError::InvalidAddress {
                role: "recipient",
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[rstest]
    #[case::sender("u", "r@example.com", AddressOrigin::CommandLine)]
    #[case::configured_recipient(
        "bot@example.com",
        "not an address",
        AddressOrigin::Configuration
    )]
    fn bad_configured_address_is_config_error(
        #[case] from: &str,
        #[case] to: &str,
        #[case] to_origin: AddressOrigin,
    ) {
        let err = Notification::new(
            from,
            to,
            to_origin,
            "Done",
            String::new(),
            BodyFormat::Plain,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
