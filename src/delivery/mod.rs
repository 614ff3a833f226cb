//! Guards against notifying twice when the trigger redelivers an event.

mod dynamodb;
mod in_memory;

pub use dynamodb::DynamoDeliveryLog;
pub use in_memory::InMemoryDeliveryLog;

use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait DeliveryLog: Send + Sync {
	/// marks `video_id` as notified.
	/// Returns `false` if it was claimed before.
	async fn claim(&self, video_id: &str) -> Result<bool>;
}
