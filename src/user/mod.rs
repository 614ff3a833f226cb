pub mod dynamodb;
pub mod in_memory;

pub use dynamodb::DynamoUserDB;
pub use in_memory::InMemoryUserDB;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(
	Default, Clone, Debug, PartialEq, Serialize, Deserialize,
)]
pub struct User {
	pub id: String,
	pub fcm_token: Option<String>,
	/// restaurant ids, only maintained where follows live on the user
	pub following: Vec<String>,
}

impl User {
	#[must_use]
	pub fn new(id: &str, fcm_token: Option<&str>) -> Self {
		Self {
			id: id.to_string(),
			fcm_token: fcm_token.map(ToString::to_string),
			following: Vec::new(),
		}
	}

	#[must_use]
	pub fn following(mut self, restaurant_id: &str) -> Self {
		self.following.push(restaurant_id.to_string());
		self
	}

	/// token usable for push delivery, empty tokens count as missing
	#[must_use]
	pub fn push_token(&self) -> Option<&str> {
		self.fcm_token.as_deref().filter(|t| !t.is_empty())
	}

	#[must_use]
	pub fn follows(&self, restaurant_id: &str) -> bool {
		self.following.iter().any(|id| id == restaurant_id)
	}
}

#[async_trait]
pub trait UserDB: Send + Sync {
	/// point lookup, `Ok(None)` for unknown ids
	async fn get_user(&self, id: &str) -> Result<Option<User>>;
	/// all users whose `following` contains `restaurant_id`
	async fn users_following(
		&self,
		restaurant_id: &str,
	) -> Result<Vec<User>>;
}
