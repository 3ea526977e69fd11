//! Services used by request handlers

pub mod mailer;

pub use mailer::{LogMailer, Mailer};
