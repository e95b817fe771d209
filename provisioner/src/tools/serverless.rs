use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use shared_types::Stage;
use tracing::info;

use super::command::{require_tool, run};
use crate::provision::Deployer;

const SERVERLESS: &str = "serverless";
const NPM: &str = "npm";
const CACHE_DIR: &str = ".serverless";
const MODULES_DIR: &str = "node_modules";

/// Drives the Serverless Framework CLI from the project directory.
#[derive(Debug, Clone)]
pub struct ServerlessDeployer {
    project_dir: PathBuf,
}

impl ServerlessDeployer {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    /// Arguments for `serverless deploy`.
    pub fn deploy_args(stage: &Stage) -> Vec<String> {
        vec!["deploy".into(), "--stage".into(), stage.as_str().into()]
    }

    /// Arguments for `serverless remove`.
    pub fn remove_args(stage: &Stage) -> Vec<String> {
        vec!["remove".into(), "--stage".into(), stage.as_str().into()]
    }

    pub fn needs_install(&self) -> bool {
        !self.project_dir.join(MODULES_DIR).is_dir()
    }

    /// Drops the stale deployment cache. Returns whether there was one.
    pub fn clear_cache(&self) -> Result<bool> {
        let cache = self.project_dir.join(CACHE_DIR);
        if !cache.exists() {
            return Ok(false);
        }
        std::fs::remove_dir_all(&cache)
            .with_context(|| format!("Failed to remove {}", cache.display()))?;
        info!(path = %cache.display(), "removed deployment cache");
        Ok(true)
    }
}

#[async_trait]
impl Deployer for ServerlessDeployer {
    async fn preflight(&self) -> Result<()> {
        require_tool(
            SERVERLESS,
            "Install it with `npm install -g serverless`.",
        )?;
        require_tool(NPM, "Install Node.js, which ships with npm.")?;

        if self.needs_install() {
            info!("installing node dependencies");
            run(NPM, &["install".to_string()], &self.project_dir).await?;
        }
        self.clear_cache()?;
        Ok(())
    }

    async fn deploy(&self, stage: &Stage) -> Result<()> {
        run(SERVERLESS, &Self::deploy_args(stage), &self.project_dir).await
    }

    async fn remove(&self, stage: &Stage) -> Result<()> {
        run(SERVERLESS, &Self::remove_args(stage), &self.project_dir).await
    }
}
