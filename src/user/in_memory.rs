use super::{User, UserDB};
use crate::error::Result;
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct InMemoryUserDB {
	pub db: Arc<Mutex<HashMap<String, User>>>,
}

impl InMemoryUserDB {
	pub async fn insert(&self, user: User) {
		let mut db = self.db.lock().await;
		db.insert(user.id.clone(), user);
	}
}

#[async_trait]
impl UserDB for InMemoryUserDB {
	async fn get_user(&self, id: &str) -> Result<Option<User>> {
		let db = self.db.lock().await;
		Ok(db.get(id).cloned())
	}

	async fn users_following(
		&self,
		restaurant_id: &str,
	) -> Result<Vec<User>> {
		let db = self.db.lock().await;
		Ok(db
			.values()
			.filter(|user| user.follows(restaurant_id))
			.cloned()
			.collect())
	}
}
