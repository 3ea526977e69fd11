//! Mail templates

use super::MailError;
use serde_json::Value;
use std::fmt;

/// A rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub plain_body: String,
    pub html_body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Sent after registration; carries the activation token
    UserWelcome,
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Template::UserWelcome => write!(f, "user_welcome"),
        }
    }
}

impl Template {
    pub fn render(&self, from: &str, to: &str, data: &Value) -> Result<Message, MailError> {
        match self {
            Template::UserWelcome => {
                let user_id = data
                    .get("userID")
                    .and_then(Value::as_i64)
                    .ok_or(MailError::MissingField("userID"))?;
                let token = data
                    .get("activationToken")
                    .and_then(Value::as_str)
                    .ok_or(MailError::MissingField("activationToken"))?;

                let plain_body = format!(
                    "Hi,\n\n\
                     Thanks for signing up for an Eiga account. We're excited to have you on board!\n\n\
                     For future reference, your user ID number is {user_id}.\n\n\
                     Please send a request to the `PUT /v1/users/activated` endpoint with the \
                     following JSON body to activate your account:\n\n\
                     {{\"token\": \"{token}\"}}\n\n\
                     Please note that this is a one-time use token and it will expire in 3 days.\n\n\
                     Thanks,\n\nThe Eiga Team\n"
                );
                let html_body = format!(
                    "<!doctype html>\n<html>\n<body>\n\
                     <p>Hi,</p>\n\
                     <p>Thanks for signing up for an Eiga account. We're excited to have you on board!</p>\n\
                     <p>For future reference, your user ID number is {user_id}.</p>\n\
                     <p>Please send a request to the <code>PUT /v1/users/activated</code> endpoint \
                     with the following JSON body to activate your account:</p>\n\
                     <pre><code>{{\"token\": \"{token}\"}}</code></pre>\n\
                     <p>Please note that this is a one-time use token and it will expire in 3 days.</p>\n\
                     <p>Thanks,</p>\n<p>The Eiga Team</p>\n\
                     </body>\n</html>\n"
                );

                Ok(Message {
                    from: from.to_string(),
                    to: to.to_string(),
                    subject: "Welcome to Eiga!".to_string(),
                    plain_body,
                    html_body,
                })
            }
        }
    }
}
