//! Thin clients over the AWS SDK for the three services the provisioner talks
//! to: STS for the caller identity, S3 for the bucket and DynamoDB for the
//! tables.

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod bucket;
mod identity;
mod table;

use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;

pub use bucket::{
    BucketClient, BucketConfigReport, BucketSettings, DEFAULT_PRESIGN_EXPIRY,
    classify_create_error, location_constraint, public_object_url, public_read_policy,
};
pub use identity::IdentityClient;
pub use table::{TableClient, key_schema_from_description};

/// Load the shared SDK configuration (credentials chain, retries) for `region`.
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

/// The three service clients, built from one SDK configuration
pub struct AwsClients {
    pub identity: IdentityClient,
    pub bucket: BucketClient,
    pub table: TableClient,
}

impl AwsClients {
    pub async fn for_region(region: &str) -> Self {
        let config = load_sdk_config(region).await;
        Self::from_sdk_config(&config, region)
    }

    pub fn from_sdk_config(config: &SdkConfig, region: &str) -> Self {
        Self {
            identity: IdentityClient::new(aws_sdk_sts::Client::new(config)),
            bucket: BucketClient::new(aws_sdk_s3::Client::new(config), region),
            table: TableClient::new(aws_sdk_dynamodb::Client::new(config)),
        }
    }
}
