#![forbid(unsafe_code)]
#![deny(
	dead_code,
	unused_imports,
	unused_must_use,
	unused_variables,
	unused_mut
)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(
	clippy::as_conversions,
	clippy::dbg_macro,
	clippy::float_cmp_const,
	clippy::lossy_float_literal,
	clippy::string_to_string,
	clippy::unneeded_field_pattern,
	clippy::verbose_file_reads,
	clippy::unwrap_used,
	clippy::panic,
	clippy::needless_update,
	clippy::match_like_matches_macro,
	clippy::from_over_into,
	clippy::useless_conversion
)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod fcm_sender;
pub mod in_memory;
mod message;

pub use crate::{
	fcm_sender::FcmPushSender,
	in_memory::InMemoryPushSender,
	message::{BatchResponse, MulticastMessage, PushSender},
};

#[cfg(test)]
mod tests {
	#![allow(clippy::unwrap_used)]
	use crate::{
		BatchResponse, InMemoryPushSender, MulticastMessage, PushSender,
	};
	use pretty_assertions::assert_eq;

	fn message(tokens: &[&str]) -> MulticastMessage {
		MulticastMessage {
			tokens: tokens.iter().map(|t| (*t).to_string()).collect(),
			title: "title".to_string(),
			body: "body".to_string(),
			..MulticastMessage::default()
		}
	}

	#[tokio::test]
	async fn test_in_memory_records_messages() {
		let sender = InMemoryPushSender::default();

		let response =
			sender.send_multicast(&message(&["a", "b"])).await.unwrap();

		assert_eq!(
			response,
			BatchResponse {
				success_count: 2,
				failure_count: 0
			}
		);
		assert_eq!(sender.sent_messages().await, vec![message(&["a", "b"])]);
	}

	#[tokio::test]
	async fn test_in_memory_invalid_tokens_fail() {
		let sender = InMemoryPushSender::with_invalid_tokens(vec!["bad"]);

		let response = sender
			.send_multicast(&message(&["a", "bad", "c"]))
			.await
			.unwrap();

		assert_eq!(response.success_count, 2);
		assert_eq!(response.failure_count, 1);
	}

	#[tokio::test]
	async fn test_in_memory_unavailable() {
		let sender = InMemoryPushSender::unavailable();

		assert!(sender.send_multicast(&message(&["a"])).await.is_err());
		assert!(sender.sent_messages().await.is_empty());
	}

	#[test]
	fn test_batch_response_merge() {
		let total = BatchResponse {
			success_count: 998,
			failure_count: 2,
		}
		.merge(BatchResponse {
			success_count: 4,
			failure_count: 1,
		});

		assert_eq!(total.success_count, 1002);
		assert_eq!(total.failure_count, 3);
	}
}
