use std::collections::HashMap;

use super::FollowerDB;
use crate::error::Result;
use async_trait::async_trait;
use dishcast_dynamo::{string_attr, string_value, table_init_with_sort_key};
use rusoto_dynamodb::{DynamoDb, DynamoDbClient, QueryInput};
use tracing::instrument;

/// follower ids stored as `id` (restaurant) + `sort` (user) items
#[derive(Clone)]
pub struct DynamoFollowerDB {
	db: DynamoDbClient,
	table: String,
}

impl DynamoFollowerDB {
	/// # Errors
	/// Returns an error if the table is not initiated
	pub async fn new(
		table_name: &str,
		db: DynamoDbClient,
	) -> Result<Self> {
		table_init_with_sort_key(&db, table_name).await?;
		Ok(Self {
			db,
			table: table_name.to_string(),
		})
	}

	#[instrument(skip(self), err)]
	async fn query(&self, restaurant_id: &str) -> Result<Vec<String>> {
		let mut names = HashMap::with_capacity(1);
		names.insert("#id".to_string(), "id".to_string());

		let mut values = HashMap::with_capacity(1);
		values.insert(":restaurant".to_string(), string_value(restaurant_id));

		let mut ids = Vec::new();
		let mut start_key = None;

		loop {
			let output = self
				.db
				.query(QueryInput {
					table_name: self.table.clone(),
					key_condition_expression: Some(
						"#id = :restaurant".into(),
					),
					expression_attribute_names: Some(names.clone()),
					expression_attribute_values: Some(values.clone()),
					exclusive_start_key: start_key.take(),
					..QueryInput::default()
				})
				.await?;

			ids.extend(
				output
					.items
					.unwrap_or_default()
					.iter()
					.filter_map(|item| string_attr(item, "sort")),
			);

			match output.last_evaluated_key {
				Some(key) if !key.is_empty() => start_key = Some(key),
				_ => break,
			}
		}

		tracing::debug!("found {} followers", ids.len());

		Ok(ids)
	}
}

#[async_trait]
impl FollowerDB for DynamoFollowerDB {
	async fn list_followers(
		&self,
		restaurant_id: &str,
	) -> Result<Vec<String>> {
		self.query(restaurant_id).await
	}
}
