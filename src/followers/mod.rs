//! Who gets notified when a restaurant posts.
//!
//! A deployment keeps the follows relation in exactly one place:
//! either as follower id records under each restaurant
//! ([`SubCollectionResolver`]) or as a `following` set on every user
//! ([`ContainmentResolver`]). [`FollowerStrategy`] picks the one in use.

pub mod containment;
pub mod dynamodb;
pub mod in_memory;
pub mod sub_collection;

pub use containment::ContainmentResolver;
pub use dynamodb::DynamoFollowerDB;
pub use in_memory::InMemoryFollowerDB;
pub use sub_collection::SubCollectionResolver;

use crate::{error::Result, user::User};
use async_trait::async_trait;
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FollowerStrategy {
	/// follower ids stored per restaurant, one user lookup per follower
	SubCollection,
	/// single query on the users `following` attribute
	Containment,
}

impl Default for FollowerStrategy {
	fn default() -> Self {
		Self::SubCollection
	}
}

/// follower ids keyed under a restaurant
#[async_trait]
pub trait FollowerDB: Send + Sync {
	async fn list_followers(
		&self,
		restaurant_id: &str,
	) -> Result<Vec<String>>;
}

#[async_trait]
pub trait FollowerResolver: Send + Sync {
	/// user records of everyone following `restaurant_id`
	async fn resolve(&self, restaurant_id: &str) -> Result<Vec<User>>;

	fn strategy(&self) -> FollowerStrategy;
}
