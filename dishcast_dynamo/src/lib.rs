#![forbid(unsafe_code)]
#![deny(
	dead_code,
	unused_imports,
	unused_must_use,
	unused_variables,
	unused_mut
)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(clippy::unwrap_used, clippy::panic, clippy::needless_update)]
#![allow(clippy::module_name_repetitions)]

pub mod error;

pub use crate::error::{Error, Result};
use rusoto_core::{
	credential::{DefaultCredentialsProvider, StaticProvider},
	HttpClient, Region,
};
use rusoto_dynamodb::{
	AttributeDefinition, AttributeValue, CreateTableInput, DynamoDb,
	DynamoDbClient, KeySchemaElement, ListTablesInput,
	ProvisionedThroughput,
};
use rusoto_secretsmanager::{
	GetSecretValueRequest, SecretsManager, SecretsManagerClient,
};

use std::collections::HashMap;

pub type DynamoHashMap = HashMap<String, AttributeValue>;

/// checks that `table` exists, creating it (`id` string hash key) on local setups
/// # Errors
/// fails with network errors or if the table is missing on a remote setup
pub async fn table_init<DB>(db: &DB, table: &str) -> Result<()>
where
	DB: DynamoDb + Clone + Send + Sync,
{
	if table_exists(db, table).await? {
		return Ok(());
	}

	if !is_local_setup() {
		return Err(Error::TableNotFound(table.to_string()));
	}

	tracing::info!("create table: {}", table);

	let _res = db
		.create_table(CreateTableInput {
			table_name: table.into(),
			key_schema: vec![KeySchemaElement {
				attribute_name: "id".into(),
				key_type: "HASH".into(),
			}],
			attribute_definitions: vec![AttributeDefinition {
				attribute_name: "id".into(),
				attribute_type: "S".into(),
			}],
			provisioned_throughput: Some(ProvisionedThroughput {
				read_capacity_units: 1,
				write_capacity_units: 1,
			}),
			..CreateTableInput::default()
		})
		.await?;

	tracing::info!("table created: {:?}", table);

	Ok(())
}

/// like `table_init` but for a compound primary key (`id`(HASH) + `sort`(RANGE))
/// # Errors
/// fails with network errors or if the table is missing on a remote setup
pub async fn table_init_with_sort_key<DB>(
	db: &DB,
	table: &str,
) -> Result<()>
where
	DB: DynamoDb + Clone + Send + Sync,
{
	if table_exists(db, table).await? {
		return Ok(());
	}

	if !is_local_setup() {
		return Err(Error::TableNotFound(table.to_string()));
	}

	tracing::info!("create table: {}", table);

	let _res = db
		.create_table(CreateTableInput {
			table_name: table.into(),
			key_schema: vec![
				KeySchemaElement {
					attribute_name: "id".into(),
					key_type: "HASH".into(),
				},
				KeySchemaElement {
					attribute_name: "sort".into(),
					key_type: "RANGE".into(),
				},
			],
			attribute_definitions: vec![
				AttributeDefinition {
					attribute_name: "id".into(),
					attribute_type: "S".into(),
				},
				AttributeDefinition {
					attribute_name: "sort".into(),
					attribute_type: "S".into(),
				},
			],
			provisioned_throughput: Some(ProvisionedThroughput {
				read_capacity_units: 1,
				write_capacity_units: 1,
			}),
			..CreateTableInput::default()
		})
		.await?;

	tracing::info!("table created: {:?}", table);

	Ok(())
}

async fn table_exists<DB>(db: &DB, table: &str) -> Result<bool>
where
	DB: DynamoDb + Clone + Send + Sync,
{
	let mut start: Option<String> = None;

	loop {
		let tables = db
			.list_tables(ListTablesInput {
				limit: None,
				exclusive_start_table_name: start.take(),
			})
			.await?;

		if tables
			.table_names
			.unwrap_or_default()
			.iter()
			.any(|n| n == table)
		{
			tracing::trace!("db table exists: {}", table);
			return Ok(true);
		}

		match tables.last_evaluated_table_name {
			Some(last) if !last.is_empty() => start = Some(last),
			_ => return Ok(false),
		}
	}
}

/// create new dynamodb connection
///
/// # Errors
///
/// http connections can fail
pub fn db_init() -> Result<DynamoDbClient> {
	let dispatcher = HttpClient::new()?;

	if is_local_setup() {
		let url = if let Ok(env) = std::env::var("DDB_URL") {
			env
		} else {
			"http://localhost:8000".into()
		};

		tracing::info!("ddb url: {}", url);

		Ok(DynamoDbClient::new_with(
			dispatcher,
			StaticProvider::new_minimal(
				"foo".to_string(),
				"bar".to_string(),
			),
			Region::Custom {
				name: "local".into(),
				endpoint: url,
			},
		))
	} else {
		Ok(DynamoDbClient::new_with(
			dispatcher,
			DefaultCredentialsProvider::new()?,
			Region::default(),
		))
	}
}

#[must_use]
pub fn db_key(
	key: &str,
	value: &str,
) -> HashMap<String, AttributeValue> {
	let mut attrs = HashMap::new();
	attrs.insert(key.to_string(), string_value(value));
	attrs
}

#[must_use]
pub fn string_value(value: &str) -> AttributeValue {
	AttributeValue {
		s: Some(value.to_string()),
		..AttributeValue::default()
	}
}

/// reads a string attribute, `None` if missing or of another type
#[must_use]
pub fn string_attr(map: &DynamoHashMap, key: &str) -> Option<String> {
	map.get(key).and_then(|attr| attr.s.clone())
}

/// reads a string set attribute, also accepting a list of strings
#[must_use]
pub fn string_set_attr(map: &DynamoHashMap, key: &str) -> Vec<String> {
	map.get(key)
		.and_then(|attr| {
			attr.ss.clone().or_else(|| {
				attr.l.as_ref().map(|list| {
					list.iter().filter_map(|v| v.s.clone()).collect()
				})
			})
		})
		.unwrap_or_default()
}

fn is_local_setup() -> bool {
	std::env::var("DDB_LOCAL").is_ok()
}

/// # Errors
/// fails if the secret cannot be fetched or holds no string
pub async fn read_secret(
	secret_id: &str,
	region: Region,
) -> Result<String> {
	let manager = SecretsManagerClient::new(region);
	let val = manager
		.get_secret_value(GetSecretValueRequest {
			secret_id: secret_id.to_string(),
			..GetSecretValueRequest::default()
		})
		.await?;

	val.secret_string.ok_or_else(|| {
		Error::Secret(format!("no secret string in {}", secret_id))
	})
}
