use anyhow::Result;
use shared_types::ProvisionOutcome;
use tracing::{info, instrument};

use super::Provisioner;
use super::schema::load_key_schema;
use crate::error::ProvisionError;
use crate::prompt::Confirm;
use crate::settings::{SettingsError, SettingsStore, keys};

const RESEED_QUESTION: &str = "The tables already hold data. Wipe it and load the demo data again?";
const SEED_QUESTION: &str = "The tables are empty. Load the demo data?";

impl Provisioner {
    fn table_names(settings: &SettingsStore) -> Result<Vec<(keys::TableKey, String)>> {
        let mut names = Vec::with_capacity(keys::TABLES.len());
        let mut missing = Vec::new();
        for table in keys::TABLES {
            match settings.get(table.setting) {
                Some(name) => names.push((table, name.to_string())),
                None => missing.push(table.setting.to_string()),
            }
        }
        if missing.is_empty() {
            Ok(names)
        } else {
            Err(SettingsError::MissingKeys(missing).into())
        }
    }

    /// Create every table that does not exist yet. Existing tables must use
    /// the key names and roles their JSON schema declares; attribute types
    /// are not checked and tables are never recreated.
    #[instrument(skip_all)]
    pub async fn ensure_tables(
        &self,
        settings: &SettingsStore,
    ) -> Result<Vec<(String, ProvisionOutcome)>> {
        let tables = &self.collaborators.tables;
        let mut outcomes = Vec::new();

        for (table, name) in Self::table_names(settings)? {
            let expected = load_key_schema(&self.options.schemas_dir.join(table.schema_file))?;

            let outcome = match tables.key_schema(&name).await? {
                Some(found) if found.same_key_names(&expected) => {
                    info!(table = %name, "table already exists");
                    ProvisionOutcome::AlreadySatisfied
                }
                Some(found) => {
                    return Err(ProvisionError::TableKeyMismatch {
                        table: name,
                        expected: expected.to_string(),
                        found: found.to_string(),
                    }
                    .into());
                }
                None => {
                    info!(table = %name, schema = %expected, "creating table");
                    tables.create_table(&name, &expected).await?;
                    ProvisionOutcome::NewlyCreated
                }
            };
            outcomes.push((name, outcome));
        }

        Ok(outcomes)
    }

    /// Whether any of the configured tables holds at least one item.
    pub async fn tables_have_data(&self, settings: &SettingsStore) -> Result<bool> {
        for (_, name) in Self::table_names(settings)? {
            if self.collaborators.tables.has_items(&name).await? {
                info!(table = %name, "table already holds data");
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Optionally load demo data. Returns whether the seeder ran; declining
    /// is not an error. With `auto_confirm` the operator is never asked.
    #[instrument(skip(self, settings, confirm))]
    pub async fn seed_data(
        &self,
        settings: &SettingsStore,
        auto_confirm: bool,
        confirm: &dyn Confirm,
    ) -> Result<bool> {
        let question = if self.tables_have_data(settings).await? {
            RESEED_QUESTION
        } else {
            SEED_QUESTION
        };

        let approved = auto_confirm || confirm.confirm(question)?;
        if !approved {
            info!("skipping demo data");
            return Ok(false);
        }

        self.collaborators.seeder.seed(auto_confirm).await?;
        info!("demo data loaded");
        Ok(true)
    }
}
