use super::{FollowerDB, FollowerResolver, FollowerStrategy};
use crate::{
	error::Result,
	user::{User, UserDB},
};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::instrument;

pub struct SubCollectionResolver {
	followers: Arc<dyn FollowerDB>,
	users: Arc<dyn UserDB>,
}

impl SubCollectionResolver {
	#[must_use]
	pub fn new(
		followers: Arc<dyn FollowerDB>,
		users: Arc<dyn UserDB>,
	) -> Self {
		Self { followers, users }
	}
}

#[async_trait]
impl FollowerResolver for SubCollectionResolver {
	#[instrument(skip(self))]
	async fn resolve(&self, restaurant_id: &str) -> Result<Vec<User>> {
		let ids = self.followers.list_followers(restaurant_id).await?;

		// lookups are independent, fire all and await together
		let users = try_join_all(
			ids.iter().map(|id| self.users.get_user(id.as_str())),
		)
		.await?;

		let users: Vec<User> = users.into_iter().flatten().collect();

		if users.len() < ids.len() {
			tracing::debug!(
				"{} follower ids without user record",
				ids.len() - users.len()
			);
		}

		Ok(users)
	}

	fn strategy(&self) -> FollowerStrategy {
		FollowerStrategy::SubCollection
	}
}
