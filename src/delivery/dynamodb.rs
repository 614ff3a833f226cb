use super::DeliveryLog;
use crate::{
	config::DELIVERY_TTL_DAYS_RANGE,
	error::{Error, Result},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dishcast_dynamo::{string_value, table_init, DynamoHashMap};
use rusoto_core::RusotoError;
use rusoto_dynamodb::{
	AttributeValue, DynamoDb, DynamoDbClient, PutItemError, PutItemInput,
};
use tracing::instrument;

#[derive(Clone)]
pub struct DynamoDeliveryLog {
	db: DynamoDbClient,
	table: String,
	ttl_days: i64,
}

impl DynamoDeliveryLog {
	/// entries expire through dynamodb ttl on the `ttl` attribute
	///
	/// # Errors
	/// Returns an error if the table is not initiated or `ttl_days` is out of
	/// range
	pub async fn new(
		table_name: &str,
		db: DynamoDbClient,
		ttl_days: i64,
	) -> Result<Self> {
		if !DELIVERY_TTL_DAYS_RANGE.contains(&ttl_days) {
			return Err(Error::Config(format!(
				"delivery ttl out of range: {} days",
				ttl_days
			)));
		}
		table_init(&db, table_name).await?;
		Ok(Self {
			db,
			table: table_name.to_string(),
			ttl_days,
		})
	}

	#[must_use]
	pub fn ttl(&self, now: DateTime<Utc>) -> i64 {
		(now + Duration::days(self.ttl_days)).timestamp()
	}

	fn item(&self, video_id: &str) -> DynamoHashMap {
		let mut map = DynamoHashMap::with_capacity(2);
		map.insert("id".to_string(), string_value(video_id));
		map.insert(
			"ttl".to_string(),
			AttributeValue {
				n: Some(self.ttl(Utc::now()).to_string()),
				..AttributeValue::default()
			},
		);
		map
	}
}

#[async_trait]
impl DeliveryLog for DynamoDeliveryLog {
	#[instrument(skip(self), err)]
	async fn claim(&self, video_id: &str) -> Result<bool> {
		let input = PutItemInput {
			table_name: self.table.clone(),
			item: self.item(video_id),
			condition_expression: Some("attribute_not_exists(id)".into()),
			..PutItemInput::default()
		};

		match self.db.put_item(input).await {
			Ok(_) => Ok(true),
			Err(RusotoError::Service(
				PutItemError::ConditionalCheckFailed(_),
			)) => {
				tracing::debug!("already claimed");
				Ok(false)
			}
			Err(e) => Err(e.into()),
		}
	}
}
