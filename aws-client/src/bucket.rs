use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CorsConfiguration, CorsRule, CreateBucketConfiguration,
    ObjectCannedAcl, ObjectOwnership, OwnershipControls, OwnershipControlsRule,
    PublicAccessBlockConfiguration,
};
use shared_types::{BucketName, DEFAULT_REGION, ProvisionOutcome};
use tracing::{debug, info, warn};

const CORS_MAX_AGE_SECONDS: i32 = 3000;

/// Lifetime of a pre-signed URL when the caller does not pick one
pub const DEFAULT_PRESIGN_EXPIRY: Duration = Duration::from_secs(600);

/// Post-creation settings for the bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSettings {
    /// Origin allowed by the CORS rule
    pub allowed_origin: String,
    /// Attach a public `s3:GetObject` policy and relax the public access block
    pub public_read: bool,
}

impl Default for BucketSettings {
    fn default() -> Self {
        Self {
            allowed_origin: "*".to_string(),
            public_read: false,
        }
    }
}

/// Which configuration steps went through and which did not
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BucketConfigReport {
    pub applied: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

impl BucketConfigReport {
    fn record(&mut self, step: &'static str, result: Result<()>) {
        match result {
            Ok(()) => {
                debug!(step, "bucket configuration applied");
                self.applied.push(step);
            }
            Err(e) => {
                let message = format!("{e:#}");
                warn!(step, error = %message, "bucket configuration step failed");
                self.failed.push((step, message));
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// `us-east-1` rejects an explicit location constraint, every other region
/// requires one.
pub fn location_constraint(region: &str) -> Option<BucketLocationConstraint> {
    if region == DEFAULT_REGION {
        None
    } else {
        Some(BucketLocationConstraint::from(region))
    }
}

/// Tells a bucket we already own apart from a name taken by another account.
pub fn classify_create_error(err: &CreateBucketError) -> ProvisionOutcome {
    match err {
        CreateBucketError::BucketAlreadyOwnedByYou(_) => ProvisionOutcome::AlreadySatisfied,
        CreateBucketError::BucketAlreadyExists(_) => ProvisionOutcome::CollisionRetry,
        other => ProvisionOutcome::Fatal(DisplayErrorContext(other).to_string()),
    }
}

pub fn public_read_policy(bucket: &BucketName) -> String {
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Sid": "PublicReadGetObject",
            "Effect": "Allow",
            "Principal": "*",
            "Action": ["s3:GetObject"],
            "Resource": [format!("arn:aws:s3:::{bucket}/*")],
        }],
    })
    .to_string()
}

/// Address of an object under the global S3 endpoint. Only readable when the
/// object was uploaded with a public ACL.
pub fn public_object_url(bucket: &BucketName, key: &str) -> String {
    format!("https://{bucket}.s3.amazonaws.com/{key}")
}

#[derive(Debug, Clone)]
pub struct BucketClient {
    client: Client,
    region: String,
}

impl BucketClient {
    pub fn new(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    /// Single `CreateBucket` attempt, classified. Never retries.
    pub async fn create_bucket(&self, name: &BucketName) -> ProvisionOutcome {
        let mut request = self.client.create_bucket().bucket(name.as_str());
        if let Some(constraint) = location_constraint(&self.region) {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(constraint)
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => {
                info!(bucket = %name, region = %self.region, "bucket created");
                ProvisionOutcome::NewlyCreated
            }
            Err(e) => classify_create_error(&e.into_service_error()),
        }
    }

    /// Apply every post-creation step. A failing step is recorded and the
    /// remaining steps still run; each one can be re-applied safely.
    pub async fn configure(
        &self,
        name: &BucketName,
        settings: &BucketSettings,
    ) -> BucketConfigReport {
        let mut report = BucketConfigReport::default();
        report.record(
            "public-access-block",
            self.put_public_access_block(name, settings.public_read).await,
        );
        report.record("ownership-controls", self.put_ownership_controls(name).await);
        report.record("cors", self.put_cors(name, &settings.allowed_origin).await);
        if settings.public_read {
            report.record("public-read-policy", self.put_public_read_policy(name).await);
        }
        report
    }

    /// URL that lets its holder upload `key` with a plain HTTP PUT until it
    /// expires.
    pub async fn presigned_put(
        &self,
        bucket: &BucketName,
        key: &str,
        expires_in: Duration,
    ) -> Result<String> {
        let request = self
            .client
            .put_object()
            .bucket(bucket.as_str())
            .key(key)
            .presigned(PresigningConfig::expires_in(expires_in)?)
            .await
            .with_context(|| format!("Failed to pre-sign upload of {key}"))?;
        Ok(request.uri().to_string())
    }

    /// URL that lets its holder download `key` until it expires.
    pub async fn presigned_get(
        &self,
        bucket: &BucketName,
        key: &str,
        expires_in: Duration,
    ) -> Result<String> {
        let request = self
            .client
            .get_object()
            .bucket(bucket.as_str())
            .key(key)
            .presigned(PresigningConfig::expires_in(expires_in)?)
            .await
            .with_context(|| format!("Failed to pre-sign download of {key}"))?;
        Ok(request.uri().to_string())
    }

    /// Upload a local file as `key`, optionally with the `public-read` ACL.
    pub async fn upload_file(
        &self,
        bucket: &BucketName,
        key: &str,
        path: &Path,
        public_read: bool,
    ) -> Result<()> {
        let body = ByteStream::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let mut request = self
            .client
            .put_object()
            .bucket(bucket.as_str())
            .key(key)
            .body(body);
        if public_read {
            request = request.acl(ObjectCannedAcl::PublicRead);
        }
        request
            .send()
            .await
            .with_context(|| format!("PutObject {key} failed"))?;

        info!(%bucket, key, public_read, "object uploaded");
        Ok(())
    }

    async fn put_public_access_block(&self, name: &BucketName, public_read: bool) -> Result<()> {
        let block = PublicAccessBlockConfiguration::builder()
            .block_public_acls(true)
            .ignore_public_acls(true)
            .block_public_policy(!public_read)
            .restrict_public_buckets(!public_read)
            .build();
        self.client
            .put_public_access_block()
            .bucket(name.as_str())
            .public_access_block_configuration(block)
            .send()
            .await
            .context("PutPublicAccessBlock failed")?;
        Ok(())
    }

    async fn put_ownership_controls(&self, name: &BucketName) -> Result<()> {
        let controls = OwnershipControls::builder()
            .rules(
                OwnershipControlsRule::builder()
                    .object_ownership(ObjectOwnership::BucketOwnerPreferred)
                    .build()?,
            )
            .build()?;
        self.client
            .put_bucket_ownership_controls()
            .bucket(name.as_str())
            .ownership_controls(controls)
            .send()
            .await
            .context("PutBucketOwnershipControls failed")?;
        Ok(())
    }

    async fn put_cors(&self, name: &BucketName, allowed_origin: &str) -> Result<()> {
        let rule = CorsRule::builder()
            .allowed_headers("*")
            .allowed_methods("GET")
            .allowed_methods("PUT")
            .allowed_methods("POST")
            .allowed_methods("OPTIONS")
            .allowed_origins(allowed_origin)
            .expose_headers("ETag")
            .max_age_seconds(CORS_MAX_AGE_SECONDS)
            .build()?;
        self.client
            .put_bucket_cors()
            .bucket(name.as_str())
            .cors_configuration(CorsConfiguration::builder().cors_rules(rule).build()?)
            .send()
            .await
            .context("PutBucketCors failed")?;
        Ok(())
    }

    async fn put_public_read_policy(&self, name: &BucketName) -> Result<()> {
        self.client
            .put_bucket_policy()
            .bucket(name.as_str())
            .policy(public_read_policy(name))
            .send()
            .await
            .context("PutBucketPolicy failed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_location_constraint_in_default_region() {
        assert!(location_constraint("us-east-1").is_none());
    }

    #[test]
    fn test_location_constraint_in_other_regions() {
        assert_eq!(
            location_constraint("eu-west-1"),
            Some(BucketLocationConstraint::EuWest1)
        );
        assert_eq!(
            location_constraint("sa-east-1").map(|c| c.as_str().to_string()),
            Some("sa-east-1".to_string())
        );
    }

    #[test]
    fn test_public_read_policy_targets_bucket_objects() {
        let policy = public_read_policy(&BucketName::new("app-data-123456789012"));
        let parsed: serde_json::Value = serde_json::from_str(&policy).unwrap();
        assert_eq!(parsed["Statement"][0]["Action"][0], "s3:GetObject");
        assert_eq!(
            parsed["Statement"][0]["Resource"][0],
            "arn:aws:s3:::app-data-123456789012/*"
        );
    }

    #[test]
    fn test_public_object_url() {
        assert_eq!(
            public_object_url(&BucketName::new("app-data-1"), "tareas/7.jpg"),
            "https://app-data-1.s3.amazonaws.com/tareas/7.jpg"
        );
    }

    #[test]
    fn test_report_records_failures_without_stopping() {
        let mut report = BucketConfigReport::default();
        report.record("cors", Ok(()));
        report.record("ownership-controls", Err(anyhow::anyhow!("denied")));
        assert_eq!(report.applied, vec!["cors"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "ownership-controls");
        assert!(!report.is_complete());
    }

    #[test]
    fn test_default_settings_are_private() {
        let settings = BucketSettings::default();
        assert_eq!(settings.allowed_origin, "*");
        assert!(!settings.public_read);
    }
}
