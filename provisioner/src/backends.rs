//! Wires the AWS SDK clients into the provisioning traits.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use aws_client::{
    AwsClients, BucketClient, BucketConfigReport, BucketSettings, IdentityClient, TableClient,
};
use shared_types::{BucketName, ProvisionOutcome, TableKeySchema};

use crate::provision::{BucketApi, Collaborators, IdentityService, TableApi};
use crate::tools::{ScriptSeeder, ServerlessDeployer};

#[async_trait]
impl IdentityService for IdentityClient {
    async fn caller_account(&self) -> Result<String> {
        IdentityClient::caller_account(self).await
    }
}

#[async_trait]
impl BucketApi for BucketClient {
    async fn create_bucket(&self, name: &BucketName) -> ProvisionOutcome {
        BucketClient::create_bucket(self, name).await
    }

    async fn configure_bucket(
        &self,
        name: &BucketName,
        settings: &BucketSettings,
    ) -> BucketConfigReport {
        self.configure(name, settings).await
    }
}

#[async_trait]
impl TableApi for TableClient {
    async fn key_schema(&self, table: &str) -> Result<Option<TableKeySchema>> {
        self.describe_key_schema(table).await
    }

    async fn create_table(&self, table: &str, schema: &TableKeySchema) -> Result<()> {
        TableClient::create_table(self, table, schema).await
    }

    async fn has_items(&self, table: &str) -> Result<bool> {
        TableClient::has_items(self, table).await
    }
}

/// Production collaborators: AWS for the cloud calls, local processes for
/// seeding and deployment.
pub fn live_collaborators(clients: AwsClients, seed_dir: &Path, project_dir: &Path) -> Collaborators {
    Collaborators {
        identity: Arc::new(clients.identity),
        buckets: Arc::new(clients.bucket),
        tables: Arc::new(clients.table),
        seeder: Arc::new(ScriptSeeder::new(seed_dir)),
        deployer: Arc::new(ServerlessDeployer::new(project_dir)),
    }
}
