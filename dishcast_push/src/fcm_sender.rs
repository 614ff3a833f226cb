use crate::{
	error::Result,
	message::{BatchResponse, MulticastMessage, PushSender},
};
use async_trait::async_trait;
use fcm::{Client, MessageBuilder, NotificationBuilder};
use tracing::instrument;

/// upper bound of `registration_ids` per legacy fcm request
pub const MAX_TOKENS_PER_REQUEST: usize = 1000;

/// splits `tokens` into the batches sent as one fcm request each
#[must_use]
pub fn request_batches(tokens: &[String]) -> Vec<&[String]> {
	tokens.chunks(MAX_TOKENS_PER_REQUEST).collect()
}

pub struct FcmPushSender {
	client: Client,
	api_key: String,
}

impl FcmPushSender {
	#[must_use]
	pub fn new(api_key: String) -> Self {
		Self {
			client: Client::new(),
			api_key,
		}
	}

	#[instrument(skip(self, msg, tokens), fields(tokens = tokens.len()))]
	async fn send_chunk(
		&self,
		msg: &MulticastMessage,
		tokens: &[String],
	) -> Result<BatchResponse> {
		let mut notification = NotificationBuilder::new();

		//note: on ios this is used and shown
		notification.title(msg.title.as_str());
		notification.body(msg.body.as_str());
		notification.sound("default");

		let mut builder = MessageBuilder::new_multi(&self.api_key, tokens);
		builder.data(&msg.data)?;
		builder.notification(notification.finalize());
		let response = self.client.send(builder.finalize()).await?;

		tracing::debug!("fcm: {:?}", response);

		Ok(BatchResponse {
			success_count: response.success.unwrap_or_default(),
			failure_count: response.failure.unwrap_or_default(),
		})
	}
}

#[async_trait]
impl PushSender for FcmPushSender {
	async fn send_multicast(
		&self,
		msg: &MulticastMessage,
	) -> Result<BatchResponse> {
		let mut total = BatchResponse::default();

		for chunk in request_batches(&msg.tokens) {
			total = total.merge(self.send_chunk(msg, chunk).await?);
		}

		tracing::info!(
			success = total.success_count,
			failure = total.failure_count,
			"fcm multicast sent"
		);

		Ok(total)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn tokens(n: usize) -> Vec<String> {
		(0..n).map(|i| format!("tok{}", i)).collect()
	}

	fn batch_sizes(n: usize) -> Vec<usize> {
		request_batches(&tokens(n)).iter().map(|b| b.len()).collect()
	}

	#[test]
	fn test_request_batches() {
		assert!(batch_sizes(0).is_empty());
		assert_eq!(batch_sizes(1), vec![1]);
		assert_eq!(batch_sizes(1000), vec![1000]);
		assert_eq!(batch_sizes(1001), vec![1000, 1]);
		assert_eq!(batch_sizes(2500), vec![1000, 1000, 500]);
	}

	#[test]
	fn test_request_batches_keep_order() {
		let all = tokens(1001);
		let batches = request_batches(&all);

		assert_eq!(batches[0].first().map(String::as_str), Some("tok0"));
		assert_eq!(batches[1], &["tok1000".to_string()][..]);
		assert_eq!(batches.concat(), all);
	}
}
