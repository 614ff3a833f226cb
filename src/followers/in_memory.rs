use super::FollowerDB;
use crate::error::Result;
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct InMemoryFollowerDB {
	pub db: Arc<Mutex<HashMap<String, Vec<String>>>>,
}

impl InMemoryFollowerDB {
	pub async fn follow(&self, restaurant_id: &str, user_id: &str) {
		let mut db = self.db.lock().await;
		db.entry(restaurant_id.to_string())
			.or_default()
			.push(user_id.to_string());
	}
}

#[async_trait]
impl FollowerDB for InMemoryFollowerDB {
	async fn list_followers(
		&self,
		restaurant_id: &str,
	) -> Result<Vec<String>> {
		let db = self.db.lock().await;
		Ok(db.get(restaurant_id).cloned().unwrap_or_default())
	}
}
