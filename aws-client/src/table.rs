use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType, Select,
    TableDescription, TableStatus,
};
use shared_types::{AttributeType, KeyAttribute, TableKeySchema};
use tracing::{debug, info};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_MAX_POLLS: u32 = 60;

pub struct TableClient {
    client: Client,
    poll_interval: Duration,
    max_polls: u32,
}

fn to_sdk_type(attribute_type: AttributeType) -> ScalarAttributeType {
    match attribute_type {
        AttributeType::S => ScalarAttributeType::S,
        AttributeType::N => ScalarAttributeType::N,
        AttributeType::B => ScalarAttributeType::B,
    }
}

fn from_sdk_type(attribute_type: &ScalarAttributeType) -> Result<AttributeType> {
    match attribute_type {
        ScalarAttributeType::S => Ok(AttributeType::S),
        ScalarAttributeType::N => Ok(AttributeType::N),
        ScalarAttributeType::B => Ok(AttributeType::B),
        other => bail!("unsupported key attribute type {}", other.as_str()),
    }
}

/// Rebuild the key schema of an existing table from its description.
pub fn key_schema_from_description(description: &TableDescription) -> Result<TableKeySchema> {
    let mut types = HashMap::new();
    for definition in description.attribute_definitions() {
        types.insert(
            definition.attribute_name(),
            from_sdk_type(definition.attribute_type())?,
        );
    }

    let attribute = |element: &KeySchemaElement| -> Result<KeyAttribute> {
        let name = element.attribute_name();
        let attribute_type = types
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("key attribute {name} has no attribute definition"))?;
        Ok(KeyAttribute::new(name, attribute_type))
    };

    let mut partition_key = None;
    let mut sort_key = None;
    for element in description.key_schema() {
        match element.key_type() {
            KeyType::Hash => partition_key = Some(attribute(element)?),
            KeyType::Range => sort_key = Some(attribute(element)?),
            other => bail!("unsupported key type {}", other.as_str()),
        }
    }

    Ok(TableKeySchema {
        partition_key: partition_key.ok_or_else(|| anyhow!("table has no partition key"))?,
        sort_key,
    })
}

fn key_schema_elements(
    schema: &TableKeySchema,
) -> Result<(Vec<KeySchemaElement>, Vec<AttributeDefinition>)> {
    let mut keys = vec![(&schema.partition_key, KeyType::Hash)];
    if let Some(sort) = &schema.sort_key {
        keys.push((sort, KeyType::Range));
    }

    let mut elements = Vec::with_capacity(keys.len());
    let mut definitions = Vec::with_capacity(keys.len());
    for (key, key_type) in keys {
        elements.push(
            KeySchemaElement::builder()
                .attribute_name(&key.name)
                .key_type(key_type)
                .build()?,
        );
        definitions.push(
            AttributeDefinition::builder()
                .attribute_name(&key.name)
                .attribute_type(to_sdk_type(key.attribute_type))
                .build()?,
        );
    }
    Ok((elements, definitions))
}

impl TableClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Override how often, and how many times, a new table is polled for
    /// `ACTIVE`.
    #[must_use]
    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    async fn describe(&self, table: &str) -> Result<Option<TableDescription>> {
        match self.client.describe_table().table_name(table).send().await {
            Ok(output) => Ok(output.table),
            Err(e) => match e.into_service_error() {
                DescribeTableError::ResourceNotFoundException(_) => Ok(None),
                other => {
                    Err(anyhow::Error::new(other).context(format!("DescribeTable {table} failed")))
                }
            },
        }
    }

    /// Key schema of `table`, or `None` when the table does not exist.
    pub async fn describe_key_schema(&self, table: &str) -> Result<Option<TableKeySchema>> {
        match self.describe(table).await? {
            Some(description) => Ok(Some(key_schema_from_description(&description)?)),
            None => Ok(None),
        }
    }

    /// Create an on-demand table and wait until it is `ACTIVE`.
    pub async fn create_table(&self, table: &str, schema: &TableKeySchema) -> Result<()> {
        let (elements, definitions) = key_schema_elements(schema)?;
        let result = self
            .client
            .create_table()
            .table_name(table)
            .set_key_schema(Some(elements))
            .set_attribute_definitions(Some(definitions))
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await;

        match result {
            Ok(_) => info!(table, %schema, "table creation requested"),
            Err(e) => match e.into_service_error() {
                CreateTableError::ResourceInUseException(_) => {
                    debug!(table, "table is already being created");
                }
                other => {
                    return Err(
                        anyhow::Error::new(other).context(format!("CreateTable {table} failed"))
                    );
                }
            },
        }

        self.wait_until_active(table).await
    }

    async fn wait_until_active(&self, table: &str) -> Result<()> {
        for poll in 1..=self.max_polls {
            let status = self
                .describe(table)
                .await?
                .and_then(|d| d.table_status);
            if status == Some(TableStatus::Active) {
                info!(table, "table is active");
                return Ok(());
            }
            debug!(table, poll, ?status, "waiting for table");
            tokio::time::sleep(self.poll_interval).await;
        }
        bail!(
            "table {table} did not become ACTIVE after {} polls",
            self.max_polls
        )
    }

    /// Whether `table` holds at least one item.
    pub async fn has_items(&self, table: &str) -> Result<bool> {
        let output = self
            .client
            .scan()
            .table_name(table)
            .select(Select::Count)
            .limit(1)
            .send()
            .await
            .with_context(|| format!("Scan {table} failed"))?;
        Ok(output.count() > 0)
    }
}
