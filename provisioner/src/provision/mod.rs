//! The provisioning workflow: validate settings, resolve the account, then
//! bucket, tables and seed data, or hand off to the deployment tool.
//!
//! Every step runs to completion before the next one starts and every fatal
//! error ends the run. Nothing is rolled back; each step is safe to re-run.

mod account;
mod bucket;
mod deploy;
mod retry;
mod schema;
mod tables;
mod traits;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use shared_types::{AccountId, BucketName, ProvisionOutcome, Stage};
use tracing::{info, instrument};

use crate::prompt::{Confirm, MenuChoice};
use crate::settings::{SettingsStore, ensure_complete, keys};

pub use retry::{MAX_BUCKET_ATTEMPTS, attempt_with_renaming};
pub use schema::{load_key_schema, parse_key_schema};
pub use traits::{BucketApi, Deployer, IdentityService, Seeder, TableApi};

/// Bucket prefix used when none is configured
pub const DEFAULT_BUCKET_PREFIX: &str = "tareas-imagenes";

/// External collaborators, one per kind of outside call
#[derive(Clone)]
pub struct Collaborators {
    pub identity: Arc<dyn IdentityService>,
    pub buckets: Arc<dyn BucketApi>,
    pub tables: Arc<dyn TableApi>,
    pub seeder: Arc<dyn Seeder>,
    pub deployer: Arc<dyn Deployer>,
}

#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    pub bucket_prefix: String,
    /// Directory holding one JSON schema per table
    pub schemas_dir: PathBuf,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            bucket_prefix: DEFAULT_BUCKET_PREFIX.to_string(),
            schemas_dir: PathBuf::from("DataGenerator/schemas-validation"),
        }
    }
}

/// What a full provisioning run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSummary {
    pub account: AccountId,
    pub bucket: BucketName,
    pub bucket_outcome: ProvisionOutcome,
    pub tables: Vec<(String, ProvisionOutcome)>,
    pub seeded: bool,
}

pub struct Provisioner {
    collaborators: Collaborators,
    options: ProvisionOptions,
}

impl Provisioner {
    pub fn new(collaborators: Collaborators, options: ProvisionOptions) -> Self {
        Self {
            collaborators,
            options,
        }
    }

    /// Halts with every missing required setting before anything external is
    /// touched.
    pub fn validate(&self, settings: &SettingsStore) -> Result<()> {
        ensure_complete(settings, &keys::required())?;
        Ok(())
    }

    /// Menu option 1: bucket, tables, then the optional seed step.
    #[instrument(skip(self, settings, confirm))]
    pub async fn provision(
        &self,
        settings: &mut SettingsStore,
        auto_confirm: bool,
        confirm: &dyn Confirm,
    ) -> Result<ProvisionSummary> {
        self.validate(settings)?;
        let account = self.resolve_account(settings).await?;
        let region = settings.region().to_string();

        let (bucket, bucket_outcome) = self.ensure_bucket(settings, &account, &region).await?;
        let tables = self.ensure_tables(settings).await?;
        let seeded = self.seed_data(settings, auto_confirm, confirm).await?;

        info!(%account, %bucket, seeded, "provisioning complete");
        Ok(ProvisionSummary {
            account,
            bucket,
            bucket_outcome,
            tables,
            seeded,
        })
    }

    /// Run the action picked from the menu. `auto_confirm` only answers the
    /// seeding question; teardown always goes through `confirm`.
    pub async fn run_choice(
        &self,
        choice: MenuChoice,
        settings: &mut SettingsStore,
        stage: &Stage,
        auto_confirm: bool,
        confirm: &dyn Confirm,
    ) -> Result<()> {
        match choice {
            MenuChoice::Provision => {
                self.provision(settings, auto_confirm, confirm).await?;
            }
            MenuChoice::Deploy => self.deploy(settings, stage).await?,
            MenuChoice::Teardown => {
                self.teardown(settings, stage, confirm).await?;
            }
        }
        Ok(())
    }
}
