use std::{collections::HashSet, sync::Arc};

use crate::{
	error::{Error, Result},
	message::{BatchResponse, MulticastMessage, PushSender},
};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// records every message instead of delivering it.
/// Tokens in `invalid_tokens` are counted as failed deliveries.
#[derive(Default)]
pub struct InMemoryPushSender {
	pub sent: Arc<Mutex<Vec<MulticastMessage>>>,
	pub invalid_tokens: HashSet<String>,
	pub unavailable: bool,
}

impl InMemoryPushSender {
	#[must_use]
	pub fn with_invalid_tokens<I, S>(tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			invalid_tokens: tokens.into_iter().map(Into::into).collect(),
			..Self::default()
		}
	}

	/// every send fails as if the service was unreachable
	#[must_use]
	pub fn unavailable() -> Self {
		Self {
			unavailable: true,
			..Self::default()
		}
	}

	pub async fn sent_messages(&self) -> Vec<MulticastMessage> {
		self.sent.lock().await.clone()
	}
}

#[async_trait]
impl PushSender for InMemoryPushSender {
	async fn send_multicast(
		&self,
		msg: &MulticastMessage,
	) -> Result<BatchResponse> {
		if self.unavailable {
			return Err(Error::Custom("push service unavailable".into()));
		}

		let mut response = BatchResponse::default();
		for token in &msg.tokens {
			if self.invalid_tokens.contains(token) {
				response.failure_count += 1;
			} else {
				response.success_count += 1;
			}
		}

		self.sent.lock().await.push(msg.clone());

		Ok(response)
	}
}
