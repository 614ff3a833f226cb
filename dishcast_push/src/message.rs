use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

/// one notification addressed to many device tokens
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MulticastMessage {
	pub tokens: Vec<String>,
	pub title: String,
	pub body: String,
	pub data: HashMap<String, String>,
}

/// aggregate per-token outcome of a multicast send
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
	pub success_count: u64,
	pub failure_count: u64,
}

impl BatchResponse {
	#[must_use]
	pub const fn merge(self, other: Self) -> Self {
		Self {
			success_count: self.success_count + other.success_count,
			failure_count: self.failure_count + other.failure_count,
		}
	}
}

#[async_trait]
pub trait PushSender: Send + Sync {
	/// sends `msg` to all of its tokens.
	/// Splitting into provider sized requests is up to the implementation.
	async fn send_multicast(
		&self,
		msg: &MulticastMessage,
	) -> Result<BatchResponse>;
}
