use std::{fmt, str::FromStr, sync::Arc};

use lettre::{
    Message, SmtpTransport, Transport,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use log::debug;
use thiserror::Error;

pub type ArcMailRelay = Arc<Box<dyn MailRelay + Send + Sync + 'static>>;

/// Sends a single email through an SMTP server chosen by the caller.
///
/// One call is one attempt. Implementations must report every failure through
/// the returned error instead of panicking.
pub trait MailRelay {
    fn send(&self, email: &OutgoingEmail, target: &SmtpTarget) -> Result<(), RelayError>;
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build email: {0}")]
    Build(String),

    #[error("{0}")]
    Transport(String),
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// SMTP server plus the login used for one send. The login username is the sender address.
#[derive(Clone)]
pub struct SmtpTarget {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for SmtpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpTarget")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, RelayError> {
    Mailbox::from_str(address).map_err(|e| RelayError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

pub fn build_message(email: &OutgoingEmail) -> Result<Message, RelayError> {
    Message::builder()
        .from(parse_mailbox(&email.from)?)
        .to(parse_mailbox(&email.to)?)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .map_err(|e| RelayError::Build(e.to_string()))
}

/// lettre-backed relay. Every call builds its own transport, so the connection
/// lives exactly as long as the call.
pub struct LettreMailRelay;

impl MailRelay for LettreMailRelay {
    fn send(&self, email: &OutgoingEmail, target: &SmtpTarget) -> Result<(), RelayError> {
        let message = build_message(email)?;

        // STARTTLS is required: the login is never sent over a plain connection.
        let transport = SmtpTransport::starttls_relay(&target.host)
            .map_err(|e| RelayError::Transport(e.to_string()))?
            .port(target.port)
            .credentials(Credentials::new(
                target.username.clone(),
                target.password.clone(),
            ))
            .build();

        debug!(
            "Relaying email to {} via {}:{}",
            email.to, target.host, target.port
        );
        transport
            .send(&message)
            .map_err(|e| RelayError::Transport(e.to_string()))?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn sample_email() -> OutgoingEmail {
        OutgoingEmail {
            from: "sender@example.com".to_string(),
            to: "receiver@example.org".to_string(),
            subject: "Quarterly report".to_string(),
            body: "See attached numbers.".to_string(),
        }
    }

    fn closed_local_target() -> SmtpTarget {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        local_target(port)
    }

    fn local_target(port: u16) -> SmtpTarget {
        SmtpTarget {
            host: "127.0.0.1".to_string(),
            port,
            username: "sender@example.com".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[test]
    fn test_build_message_headers() {
        let message = build_message(&sample_email()).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("From: sender@example.com"));
        assert!(formatted.contains("To: receiver@example.org"));
        assert!(formatted.contains("Subject: Quarterly report"));
        assert!(formatted.contains("Content-Type: text/plain; charset=utf-8"));
        assert!(formatted.contains("See attached numbers."));
    }

    #[test]
    fn test_build_message_rejects_bad_sender() {
        let email = OutgoingEmail {
            from: "not an address".to_string(),
            ..sample_email()
        };
        assert!(matches!(
            build_message(&email),
            Err(RelayError::InvalidAddress { address, .. }) if address == "not an address"
        ));
    }

    #[test]
    fn test_send_reports_invalid_recipient_without_connecting() {
        let email = OutgoingEmail {
            to: "@@".to_string(),
            ..sample_email()
        };
        let result = LettreMailRelay.send(&email, &closed_local_target());
        assert!(matches!(result, Err(RelayError::InvalidAddress { .. })));
    }

    #[test]
    fn test_send_reports_connection_failure() {
        let result = LettreMailRelay.send(&sample_email(), &closed_local_target());
        let err = result.unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_send_requires_starttls() {
        let (port, commands) = mock::spawn_plaintext_smtp_server();

        let result = LettreMailRelay.send(&sample_email(), &local_target(port));
        assert!(matches!(result, Err(RelayError::Transport(_))));

        let commands = commands
            .recv_timeout(std::time::Duration::from_secs(10))
            .unwrap();
        let verbs: Vec<String> = commands
            .iter()
            .map(|c| c.split_whitespace().next().unwrap_or("").to_uppercase())
            .collect();
        assert_eq!(verbs.first().map(String::as_str), Some("EHLO"));
        assert!(!verbs.iter().any(|v| v == "AUTH" || v == "MAIL"));
    }

    #[test]
    fn test_target_debug_hides_password() {
        let target = closed_local_target();
        let debug = format!("{:?}", target);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("127.0.0.1"));
    }
}
