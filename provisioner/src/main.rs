use std::path::PathBuf;

use anyhow::{Context, Result};
use aws_client::AwsClients;
use clap::Parser;
use provisioner::backends::live_collaborators;
use provisioner::prompt::{InteractiveConfirm, select_action};
use provisioner::provision::DEFAULT_BUCKET_PREFIX;
use provisioner::settings::SettingsStore;
use provisioner::{ProvisionOptions, Provisioner};
use shared_types::{DEFAULT_STAGE, Stage};
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(
    name = "provisioner",
    about = "Provision, deploy and tear down the task-tracking serverless app"
)]
struct Cli {
    /// Settings file read and updated by every run
    #[arg(long, env = "PROVISIONER_ENV_FILE", default_value = ".env")]
    env_file: PathBuf,

    /// Stage handed to the deployment tool
    #[arg(long, default_value = DEFAULT_STAGE)]
    stage: String,

    /// Directory holding serverless.yml
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Directory holding the seeding scripts
    #[arg(long, default_value = "DataGenerator")]
    seed_dir: PathBuf,

    /// Directory holding one JSON schema per table
    #[arg(long, default_value = "DataGenerator/schemas-validation")]
    schemas_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_BUCKET_PREFIX)]
    bucket_prefix: String,

    /// Load demo data without asking. Teardown still asks.
    #[arg(long)]
    auto_confirm: bool,
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
    let stage = Stage::parse(&cli.stage).context("--stage must not be empty")?;
    let mut settings = SettingsStore::load(&cli.env_file)?;
    info!(path = %settings.path().display(), "loaded settings");

    let Some(choice) = select_action()? else {
        info!("nothing selected");
        return Ok(());
    };

    let clients = AwsClients::for_region(settings.region()).await;
    let provisioner = Provisioner::new(
        live_collaborators(clients, &cli.seed_dir, &cli.project_dir),
        ProvisionOptions {
            bucket_prefix: cli.bucket_prefix,
            schemas_dir: cli.schemas_dir,
        },
    );

    provisioner
        .run_choice(
            choice,
            &mut settings,
            &stage,
            cli.auto_confirm,
            &InteractiveConfirm,
        )
        .await
}
