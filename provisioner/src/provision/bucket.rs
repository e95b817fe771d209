use anyhow::Result;
use aws_client::BucketSettings;
use shared_types::{AccountId, BucketName, ProvisionOutcome, random_suffix};
use tracing::{info, instrument, warn};

use super::Provisioner;
use super::retry::{MAX_BUCKET_ATTEMPTS, attempt_with_renaming};
use crate::settings::{SettingsStore, keys};

impl Provisioner {
    /// The persisted override if there is one, else `<prefix>-<account>`.
    pub fn desired_bucket_name(&self, settings: &SettingsStore, account: &AccountId) -> BucketName {
        settings.get(keys::BUCKET).map_or_else(
            || BucketName::for_account(&self.options.bucket_prefix, account),
            BucketName::new,
        )
    }

    /// Bucket the object tools act on: the persisted name, or the one
    /// provisioning would try first.
    pub async fn current_bucket(&self, settings: &mut SettingsStore) -> Result<BucketName> {
        let account = self.resolve_account(settings).await?;
        Ok(self.desired_bucket_name(settings, &account))
    }

    fn bucket_settings(settings: &SettingsStore) -> BucketSettings {
        BucketSettings {
            allowed_origin: settings.get_or(keys::ALLOWED_ORIGINS, "*").to_string(),
            public_read: settings.is_enabled(keys::PUBLIC_READ),
        }
    }

    /// Make sure a bucket we own exists, renaming on foreign collisions, then
    /// persist the final name and apply the bucket configuration.
    #[instrument(skip(self, settings, account))]
    pub async fn ensure_bucket(
        &self,
        settings: &mut SettingsStore,
        account: &AccountId,
        region: &str,
    ) -> Result<(BucketName, ProvisionOutcome)> {
        let desired = self.desired_bucket_name(settings, account);
        info!(bucket = %desired, region, "ensuring bucket");

        let buckets = &self.collaborators.buckets;
        let (bucket, outcome) =
            attempt_with_renaming(&desired, MAX_BUCKET_ATTEMPTS, random_suffix, |name| async move {
                buckets.create_bucket(&name).await
            })
            .await?;

        match outcome {
            ProvisionOutcome::AlreadySatisfied => info!(%bucket, "bucket already exists and is ours"),
            _ => info!(%bucket, "bucket ready"),
        }

        settings.upsert(keys::BUCKET, bucket.as_str())?;

        let report = buckets
            .configure_bucket(&bucket, &Self::bucket_settings(settings))
            .await;
        if !report.is_complete() {
            warn!(
                %bucket,
                failed = report.failed.len(),
                "some bucket settings were not applied; re-run to retry them"
            );
        }

        Ok((bucket, outcome))
    }
}
