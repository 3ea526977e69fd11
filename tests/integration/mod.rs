//! Integration tests for eiga-api
//!
//! These tests drive the assembled application, or a real listener, and
//! observe behaviour only through HTTP and the shared state.

pub mod admission_tests;
pub mod authorization_tests;
pub mod background_tests;
pub mod shutdown_tests;
