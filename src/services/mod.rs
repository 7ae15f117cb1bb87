pub mod account_service;
pub mod auth_service;
pub mod email_service;
pub mod goal_service;
pub mod reminder_service;

pub use email_service::{LogMailer, Mailer, SmtpMailer};
