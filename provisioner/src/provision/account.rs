use anyhow::{Context, Result};
use shared_types::AccountId;
use tracing::{info, instrument};

use super::Provisioner;
use crate::error::ProvisionError;
use crate::settings::{SettingsStore, keys};

impl Provisioner {
    /// Account id from the settings, or from a single identity query whose
    /// answer is then persisted so later runs skip the query.
    #[instrument(skip_all)]
    pub async fn resolve_account(&self, settings: &mut SettingsStore) -> Result<AccountId> {
        if let Some(account) = settings.get(keys::ACCOUNT_ID).and_then(AccountId::parse) {
            info!(%account, "using configured account id");
            return Ok(account);
        }

        let raw = self
            .collaborators
            .identity
            .caller_account()
            .await
            .context("Could not determine the AWS account id")?;
        let account = AccountId::parse(&raw).ok_or(ProvisionError::EmptyAccountId)?;

        info!(%account, "detected account id");
        settings.upsert(keys::ACCOUNT_ID, account.as_str())?;
        Ok(account)
    }
}
