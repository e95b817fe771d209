//! Provisioning and deployment orchestration for the task-tracking
//! serverless application.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod backends;
pub mod error;
pub mod prompt;
pub mod provision;
pub mod settings;
pub mod tools;

pub use error::ProvisionError;
pub use provision::{Collaborators, ProvisionOptions, ProvisionSummary, Provisioner};
