//! Common test utilities for eiga-api

pub mod assertions;
pub mod fixtures;

pub use fixtures::{ConfigFactory, RecordingMailer, SentMail, TestApp};
