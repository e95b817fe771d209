#![cfg_attr(test, allow(clippy::unwrap_used))]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Region where S3 refuses an explicit `LocationConstraint`.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Stage used when none is given on the command line
pub const DEFAULT_STAGE: &str = "dev";

/// Identifier of the cloud account being provisioned
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AccountId(String);

impl AccountId {
    /// Trims surrounding whitespace; returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidate or final name of the storage bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BucketName(String);

impl BucketName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// `<prefix>-<account>`, the name used when no override is persisted
    pub fn for_account(prefix: &str, account: &AccountId) -> Self {
        Self(format!("{prefix}-{account}"))
    }

    /// Appends `-<suffix>` to this name.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}-{suffix}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Eight lowercase hex characters used to disambiguate a taken bucket name.
pub fn random_suffix() -> String {
    format!("{:08x}", rand::random::<u32>())
}

/// Deployment stage handed to the deployment tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stage(String);

impl Stage {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self(DEFAULT_STAGE.to_string())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a single provisioning attempt. Only drives control flow for the
/// current run; it is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The resource already existed and belongs to us
    AlreadySatisfied,
    /// The resource was created by this attempt
    NewlyCreated,
    /// The name is taken by someone else; retry under another name
    CollisionRetry,
    /// Unrecoverable failure, with the reason reported by the API
    Fatal(String),
}

impl ProvisionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::AlreadySatisfied | Self::NewlyCreated)
    }
}

/// Scalar attribute types DynamoDB accepts for key attributes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AttributeType {
    S,
    N,
    B,
}

impl AttributeType {
    /// Maps a JSON-schema `type` to a key attribute type. Unknown types, and
    /// `boolean` which DynamoDB does not accept for keys, fall back to `S`.
    pub fn from_json_type(json_type: &str) -> Self {
        match json_type.to_ascii_lowercase().as_str() {
            "integer" | "int" | "number" | "float" | "double" => Self::N,
            "binary" | "bytes" => Self::B,
            _ => Self::S,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::N => "N",
            Self::B => "B",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

impl KeyAttribute {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
        }
    }
}

/// Primary key layout of a table: a partition key and an optional sort key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TableKeySchema {
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
}

impl TableKeySchema {
    /// Same attribute names in the same HASH/RANGE roles. Attribute types are
    /// not compared.
    pub fn same_key_names(&self, other: &Self) -> bool {
        self.partition_key.name == other.partition_key.name
            && self.sort_key.as_ref().map(|k| &k.name) == other.sort_key.as_ref().map(|k| &k.name)
    }
}

impl fmt::Display for TableKeySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HASH {}({})",
            self.partition_key.name,
            self.partition_key.attribute_type.as_str()
        )?;
        if let Some(sort) = &self.sort_key {
            write!(f, ", RANGE {}({})", sort.name, sort.attribute_type.as_str())?;
        }
        Ok(())
    }
}
