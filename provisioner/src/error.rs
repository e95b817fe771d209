use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Identity service returned an empty account id")]
    EmptyAccountId,

    #[error("Could not create bucket {bucket}: {reason}")]
    BucketCreationFailed { bucket: String, reason: String },

    #[error("Bucket name {base} is taken; gave up after {attempts} attempts")]
    BucketNamesExhausted { base: String, attempts: u32 },

    #[error("Table {table} exists with key schema [{found}], expected [{expected}]")]
    TableKeyMismatch {
        table: String,
        expected: String,
        found: String,
    },

    #[error("Invalid table schema {}: {reason}", .path.display())]
    InvalidSchema { path: PathBuf, reason: String },

    #[error("Required tool `{tool}` was not found on PATH. {hint}")]
    ToolNotFound { tool: String, hint: String },

    #[error("`{command}` exited with {status}")]
    CommandFailed { command: String, status: String },
}
