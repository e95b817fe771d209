use anyhow::Result;
use shared_types::Stage;
use tracing::{info, instrument, warn};

use super::Provisioner;
use crate::prompt::Confirm;
use crate::settings::SettingsStore;

impl Provisioner {
    /// Menu option 2.
    #[instrument(skip(self, settings), fields(stage = %stage))]
    pub async fn deploy(&self, settings: &mut SettingsStore, stage: &Stage) -> Result<()> {
        self.validate(settings)?;
        self.resolve_account(settings).await?;

        let deployer = &self.collaborators.deployer;
        deployer.preflight().await?;
        deployer.deploy(stage).await?;
        info!("deployment finished");
        Ok(())
    }

    /// Menu option 3. Returns whether anything was removed; the destructive
    /// call is only issued after the operator agrees.
    #[instrument(skip(self, settings, confirm), fields(stage = %stage))]
    pub async fn teardown(
        &self,
        settings: &mut SettingsStore,
        stage: &Stage,
        confirm: &dyn Confirm,
    ) -> Result<bool> {
        self.validate(settings)?;
        self.resolve_account(settings).await?;

        let question = format!("Remove every deployed resource of stage `{stage}`?");
        if !confirm.confirm(&question)? {
            info!("teardown cancelled");
            return Ok(false);
        }

        warn!("removing deployed stack");
        let deployer = &self.collaborators.deployer;
        deployer.preflight().await?;
        deployer.remove(stage).await?;
        info!("teardown finished");
        Ok(true)
    }
}
