use anyhow::{Context, Result};
use tracing::debug;

/// Resolves the account behind the active credentials
pub struct IdentityClient {
    client: aws_sdk_sts::Client,
}

impl IdentityClient {
    pub fn new(client: aws_sdk_sts::Client) -> Self {
        Self { client }
    }

    /// Account id reported by `GetCallerIdentity`, untrimmed. An empty string
    /// means the service answered without an account.
    pub async fn caller_account(&self) -> Result<String> {
        let output = self
            .client
            .get_caller_identity()
            .send()
            .await
            .context("GetCallerIdentity request failed")?;

        debug!(arn = ?output.arn(), "resolved caller identity");
        Ok(output.account().unwrap_or_default().to_string())
    }
}
