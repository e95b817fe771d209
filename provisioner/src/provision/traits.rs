use anyhow::Result;
use async_trait::async_trait;
use aws_client::{BucketConfigReport, BucketSettings};
use shared_types::{BucketName, ProvisionOutcome, Stage, TableKeySchema};

#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Raw account id of the active credentials.
    async fn caller_account(&self) -> Result<String>;
}

#[async_trait]
pub trait BucketApi: Send + Sync {
    /// One creation attempt, classified. Implementations must not retry.
    async fn create_bucket(&self, name: &BucketName) -> ProvisionOutcome;
    async fn configure_bucket(
        &self,
        name: &BucketName,
        settings: &BucketSettings,
    ) -> BucketConfigReport;
}

#[async_trait]
pub trait TableApi: Send + Sync {
    /// `None` when the table does not exist.
    async fn key_schema(&self, table: &str) -> Result<Option<TableKeySchema>>;
    async fn create_table(&self, table: &str, schema: &TableKeySchema) -> Result<()>;
    async fn has_items(&self, table: &str) -> Result<bool>;
}

#[async_trait]
pub trait Seeder: Send + Sync {
    /// Populate the tables with demo data. With `auto_confirm` the tool must
    /// not wait on the operator.
    async fn seed(&self, auto_confirm: bool) -> Result<()>;
}

#[async_trait]
pub trait Deployer: Send + Sync {
    /// Dependency checks and cache cleanup before any deployment call.
    async fn preflight(&self) -> Result<()>;
    async fn deploy(&self, stage: &Stage) -> Result<()>;
    async fn remove(&self, stage: &Stage) -> Result<()>;
}
