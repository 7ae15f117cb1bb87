//! Transactional email: askama HTML templates delivered over SMTP with lettre.

use askama::Template;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, SinglePart},
    transport::smtp::{authentication::Credentials, Error as SmtpError},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;

use crate::config::SmtpConfig;

#[derive(Template)]
#[template(path = "email/content.html")]
struct ContentEmail<'a> {
    name: &'a str,
    content: &'a str,
}

#[derive(Template)]
#[template(path = "email/request.html")]
struct RequestEmail<'a> {
    name: &'a str,
    text: &'a str,
    action: &'a str,
    link: &'a str,
    link_text: &'a str,
    expires_minutes: i64,
}

#[derive(Template)]
#[template(path = "email/request_result.html")]
struct RequestResultEmail<'a> {
    name: &'a str,
    action: &'a str,
    text: &'a str,
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Every email the service sends.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Welcome { name: String },
    PasswordResetRequested { name: String, link: String, expires_minutes: i64 },
    PasswordChanged { name: String },
    AccountDeletionRequested { name: String, link: String, expires_minutes: i64 },
    AccountDeleted { name: String },
}

impl Notification {
    pub fn subject(&self) -> &'static str {
        match self {
            Notification::Welcome { .. } => "Welcome to the Goals App!",
            Notification::PasswordResetRequested { .. } => "Password reset request",
            Notification::PasswordChanged { .. } => "Password has been reset!",
            Notification::AccountDeletionRequested { .. } => "Account delete request",
            Notification::AccountDeleted { .. } => "Sorry to see you go...",
        }
    }

    pub fn render_html(&self) -> Result<String, EmailError> {
        let html = match self {
            Notification::Welcome { name } => ContentEmail {
                name,
                content: "Welcome to the Goals App! Open the app, add your goals and start reaching them!",
            }
            .render()?,
            Notification::PasswordResetRequested { name, link, expires_minutes } => RequestEmail {
                name,
                text: "You requested a password reset.",
                action: "Please, click the link below to reset your password",
                link,
                link_text: "Reset password",
                expires_minutes: *expires_minutes,
            }
            .render()?,
            Notification::PasswordChanged { name } => RequestResultEmail {
                name,
                action: "Your password has been reset.",
                text: "Please, use the new password to log in to the Goals App",
            }
            .render()?,
            Notification::AccountDeletionRequested { name, link, expires_minutes } => RequestEmail {
                name,
                text: "You requested to delete your account.",
                action: "Please, click the link below to delete your account",
                link,
                link_text: "Delete account",
                expires_minutes: *expires_minutes,
            }
            .render()?,
            Notification::AccountDeleted { name } => ContentEmail {
                name,
                content: "Sorry to see you go... Come back soon!",
            }
            .render()?,
        };
        Ok(html)
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, notification: &Notification) -> Result<(), EmailError>;
}

/// Delivers through an authenticated STARTTLS relay.
#[derive(Clone)]
pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, notification: &Notification) -> Result<(), EmailError> {
        let html = notification.render_html()?;

        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(notification.subject())
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_HTML)
                    .body(html),
            )?;

        self.mailer.send(email).await?;

        log::info!("📧 Email sent to {}: {}", to, notification.subject());
        Ok(())
    }
}

/// Used when SMTP is not configured: renders and logs instead of sending.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, notification: &Notification) -> Result<(), EmailError> {
        notification.render_html()?;
        log::info!("📧 (smtp disabled) {} -> {}: {:?}", notification.subject(), to, notification);
        Ok(())
    }
}
