use super::{FollowerResolver, FollowerStrategy};
use crate::{
	error::Result,
	user::{User, UserDB},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

pub struct ContainmentResolver {
	users: Arc<dyn UserDB>,
}

impl ContainmentResolver {
	#[must_use]
	pub fn new(users: Arc<dyn UserDB>) -> Self {
		Self { users }
	}
}

#[async_trait]
impl FollowerResolver for ContainmentResolver {
	#[instrument(skip(self))]
	async fn resolve(&self, restaurant_id: &str) -> Result<Vec<User>> {
		self.users.users_following(restaurant_id).await
	}

	fn strategy(&self) -> FollowerStrategy {
		FollowerStrategy::Containment
	}
}
