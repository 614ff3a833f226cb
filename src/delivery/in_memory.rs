use super::DeliveryLog;
use crate::error::Result;
use async_trait::async_trait;
use std::{collections::HashSet, sync::Arc};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct InMemoryDeliveryLog {
	pub db: Arc<Mutex<HashSet<String>>>,
}

#[async_trait]
impl DeliveryLog for InMemoryDeliveryLog {
	async fn claim(&self, video_id: &str) -> Result<bool> {
		let mut db = self.db.lock().await;
		Ok(db.insert(video_id.to_string()))
	}
}
