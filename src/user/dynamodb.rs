use std::{collections::HashMap, convert::TryFrom};

use super::{User, UserDB};
use crate::error::{Error, Result};
use async_trait::async_trait;
use dishcast_dynamo::{
	db_key, string_attr, string_set_attr, string_value, table_init,
	DynamoHashMap,
};
use rusoto_dynamodb::{DynamoDb, DynamoDbClient, GetItemInput, ScanInput};
use tracing::instrument;

#[derive(Clone)]
pub struct DynamoUserDB {
	db: DynamoDbClient,
	table: String,
}

impl DynamoUserDB {
	/// create new `DynamoUserDB` instance reusing an existing db client connection
	///
	/// # Errors
	///
	/// local table init could fail creating the table, the check
	/// for the existance of the right table remote could fail
	pub async fn new(
		table_name: &str,
		db: DynamoDbClient,
	) -> Result<Self> {
		table_init(&db, table_name).await?;
		Ok(Self {
			db,
			table: table_name.to_string(),
		})
	}

	#[instrument(skip(self), err)]
	async fn load(&self, key: &str) -> Result<Option<User>> {
		let item = self
			.db
			.get_item(GetItemInput {
				table_name: self.table.clone(),
				key: db_key("id", key),
				..GetItemInput::default()
			})
			.await?
			.item;

		item.map(User::try_from).transpose()
	}

	#[instrument(skip(self), err)]
	async fn scan_following(
		&self,
		restaurant_id: &str,
	) -> Result<Vec<User>> {
		let mut values = HashMap::with_capacity(1);
		values.insert(":restaurant".to_string(), string_value(restaurant_id));

		let mut users = Vec::new();
		let mut start_key = None;

		loop {
			let output = self
				.db
				.scan(ScanInput {
					table_name: self.table.clone(),
					filter_expression: Some(
						"contains(following, :restaurant)".into(),
					),
					expression_attribute_values: Some(values.clone()),
					exclusive_start_key: start_key.take(),
					..ScanInput::default()
				})
				.await?;

			for item in output.items.unwrap_or_default() {
				match User::try_from(item) {
					Ok(user) => users.push(user),
					Err(e) => tracing::warn!("skipping user item: {}", e),
				}
			}

			match output.last_evaluated_key {
				Some(key) if !key.is_empty() => start_key = Some(key),
				_ => break,
			}
		}

		tracing::debug!("found {} users", users.len());

		Ok(users)
	}
}

impl TryFrom<DynamoHashMap> for User {
	type Error = Error;

	fn try_from(attributes: DynamoHashMap) -> Result<Self> {
		Ok(Self {
			id: string_attr(&attributes, "id").ok_or(
				dishcast_dynamo::Error::DynamoDeserialize("id"),
			)?,
			fcm_token: string_attr(&attributes, "fcmToken"),
			following: string_set_attr(&attributes, "following"),
		})
	}
}

#[async_trait]
impl UserDB for DynamoUserDB {
	async fn get_user(&self, id: &str) -> Result<Option<User>> {
		self.load(id).await
	}

	async fn users_following(
		&self,
		restaurant_id: &str,
	) -> Result<Vec<User>> {
		self.scan_following(restaurant_id).await
	}
}
