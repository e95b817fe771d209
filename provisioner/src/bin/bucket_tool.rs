use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use aws_client::{AwsClients, DEFAULT_PRESIGN_EXPIRY, public_object_url};
use clap::{Parser, Subcommand};
use provisioner::backends::live_collaborators;
use provisioner::provision::DEFAULT_BUCKET_PREFIX;
use provisioner::settings::SettingsStore;
use provisioner::{ProvisionOptions, Provisioner};
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(
    name = "bucket-tool",
    about = "Pre-signed URLs and uploads for the task images bucket"
)]
struct Cli {
    /// Settings file shared with the provisioner
    #[arg(long, env = "PROVISIONER_ENV_FILE", default_value = ".env")]
    env_file: PathBuf,

    #[arg(long, default_value = DEFAULT_BUCKET_PREFIX)]
    bucket_prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a pre-signed upload (PUT) URL
    PresignPut {
        /// Object key, e.g. tareas/123.jpg
        #[arg(long)]
        key: String,
        /// Seconds until the URL expires
        #[arg(long, default_value_t = DEFAULT_PRESIGN_EXPIRY.as_secs())]
        expires: u64,
    },
    /// Print a pre-signed download (GET) URL
    PresignGet {
        #[arg(long)]
        key: String,
        #[arg(long, default_value_t = DEFAULT_PRESIGN_EXPIRY.as_secs())]
        expires: u64,
    },
    /// Upload a local file
    UploadFile {
        #[arg(long)]
        key: String,
        #[arg(long)]
        file: PathBuf,
        /// Make the object world-readable
        #[arg(long)]
        public_read: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = SettingsStore::load(&cli.env_file)?;
    let clients = AwsClients::for_region(settings.region()).await;
    let objects = clients.bucket.clone();

    let provisioner = Provisioner::new(
        live_collaborators(clients, Path::new("."), Path::new(".")),
        ProvisionOptions {
            bucket_prefix: cli.bucket_prefix,
            ..ProvisionOptions::default()
        },
    );
    let bucket = provisioner.current_bucket(&mut settings).await?;

    match cli.command {
        Commands::PresignPut { key, expires } => {
            let url = objects
                .presigned_put(&bucket, &key, Duration::from_secs(expires))
                .await?;
            println!("{url}");
        }
        Commands::PresignGet { key, expires } => {
            let url = objects
                .presigned_get(&bucket, &key, Duration::from_secs(expires))
                .await?;
            println!("{url}");
        }
        Commands::UploadFile {
            key,
            file,
            public_read,
        } => {
            objects.upload_file(&bucket, &key, &file, public_read).await?;
            if public_read {
                println!("{}", public_object_url(&bucket, &key));
            } else {
                info!("uploaded privately; use presign-get to share it");
            }
        }
    }
    Ok(())
}
