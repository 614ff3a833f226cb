//! Fans a new video out to the devices of the restaurant's followers.
//!
//! Every invocation ends in a [`DispatchOutcome`]. Missing data, zero
//! followers and zero tokens end the run early. Errors of the stores or of the
//! push service are logged and swallowed, so the trigger does not redeliver
//! and notify already reached followers twice.

use crate::{
	delivery::DeliveryLog,
	error::Result,
	followers::FollowerResolver,
	user::User,
	video::{NewVideo, VideoCreated},
};
use dishcast_push::{MulticastMessage, PushSender};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use tracing::instrument;

pub const NOTIFICATION_BODY: &str = "Tap to see what's cooking.";
pub const CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
	/// record absent or without restaurant id/name
	MissingRestaurant,
	NoFollowers,
	NoTokens,
	/// the video was fanned out by an earlier delivery of the event
	AlreadyDelivered,
	#[serde(rename_all = "camelCase")]
	Sent {
		success_count: u64,
		failure_count: u64,
	},
	/// a store or the push service failed, see logs
	Failed,
}

pub struct NotificationDispatcher {
	followers: Arc<dyn FollowerResolver>,
	push: Arc<dyn PushSender>,
	deliveries: Option<Arc<dyn DeliveryLog>>,
}

impl NotificationDispatcher {
	#[must_use]
	pub fn new(
		followers: Arc<dyn FollowerResolver>,
		push: Arc<dyn PushSender>,
	) -> Self {
		Self {
			followers,
			push,
			deliveries: None,
		}
	}

	/// enables suppression of repeated fan-outs for the same video id
	pub fn set_delivery_log(&mut self, deliveries: Arc<dyn DeliveryLog>) {
		self.deliveries = Some(deliveries);
	}

	/// handles one record creation event, never fails
	#[instrument(skip(self, event), fields(video_id = %event.video_id))]
	pub async fn on_video_created(
		&self,
		event: &VideoCreated,
	) -> DispatchOutcome {
		let video = if let Some(video) = event.validate() {
			video
		} else {
			tracing::info!("missing restaurant details in video");
			return DispatchOutcome::MissingRestaurant;
		};

		match self.dispatch(video).await {
			Ok(outcome) => outcome,
			Err(e) => {
				tracing::error!("error sending notification: {}", e);
				DispatchOutcome::Failed
			}
		}
	}

	async fn dispatch(&self, video: NewVideo<'_>) -> Result<DispatchOutcome> {
		let followers = self.followers.resolve(video.restaurant_id).await?;

		if followers.is_empty() {
			let strategy = self.followers.strategy();
			tracing::info!(
				restaurant = video.restaurant_id,
				strategy = strategy.as_ref(),
				"no followers found"
			);
			return Ok(DispatchOutcome::NoFollowers);
		}

		let tokens = push_tokens(&followers);

		if tokens.is_empty() {
			tracing::info!(
				followers = followers.len(),
				"no valid fcm tokens found"
			);
			return Ok(DispatchOutcome::NoTokens);
		}

		if let Some(deliveries) = &self.deliveries {
			if !deliveries.claim(video.video_id).await? {
				tracing::info!("video already delivered");
				return Ok(DispatchOutcome::AlreadyDelivered);
			}
		}

		let msg = compose_message(video, tokens);
		let response = self.push.send_multicast(&msg).await?;

		tracing::info!(
			"notifications sent: {}",
			response.success_count
		);
		if response.failure_count > 0 {
			tracing::warn!(
				"failed notifications: {}",
				response.failure_count
			);
		}

		Ok(DispatchOutcome::Sent {
			success_count: response.success_count,
			failure_count: response.failure_count,
		})
	}
}

/// non-empty tokens of `users`, duplicates are kept
#[must_use]
pub fn push_tokens(users: &[User]) -> Vec<String> {
	users
		.iter()
		.filter_map(User::push_token)
		.map(ToString::to_string)
		.collect()
}

#[must_use]
pub fn compose_message(
	video: NewVideo<'_>,
	tokens: Vec<String>,
) -> MulticastMessage {
	let mut data = HashMap::with_capacity(2);
	data.insert("videoId".to_string(), video.video_id.to_string());
	data.insert("click_action".to_string(), CLICK_ACTION.to_string());

	MulticastMessage {
		tokens,
		title: format!("{} just posted a new dish!", video.restaurant_name),
		body: NOTIFICATION_BODY.to_string(),
		data,
	}
}

#[cfg(test)]
mod tests {
	#![allow(clippy::unwrap_used)]
	use super::*;
	use crate::{
		delivery::InMemoryDeliveryLog,
		error::Error,
		followers::{
			ContainmentResolver, FollowerStrategy, InMemoryFollowerDB,
			SubCollectionResolver,
		},
		user::InMemoryUserDB,
		video::VideoRecord,
	};
	use async_trait::async_trait;
	use dishcast_push::InMemoryPushSender;
	use pretty_assertions::assert_eq;

	struct FailingResolver;

	#[async_trait]
	impl FollowerResolver for FailingResolver {
		async fn resolve(&self, _restaurant_id: &str) -> Result<Vec<User>> {
			Err(Error::Unavailable("store unreachable".into()))
		}

		fn strategy(&self) -> FollowerStrategy {
			FollowerStrategy::Containment
		}
	}

	async fn setup(
		users: Vec<User>,
	) -> (Arc<InMemoryFollowerDB>, Arc<InMemoryUserDB>) {
		let followers = Arc::new(InMemoryFollowerDB::default());
		let user_db = Arc::new(InMemoryUserDB::default());
		for user in users {
			followers.follow("r1", &user.id).await;
			user_db.insert(user).await;
		}
		(followers, user_db)
	}

	async fn dispatcher_for(
		users: Vec<User>,
		push: Arc<InMemoryPushSender>,
	) -> NotificationDispatcher {
		let (followers, user_db) = setup(users).await;
		NotificationDispatcher::new(
			Arc::new(SubCollectionResolver::new(followers, user_db)),
			push,
		)
	}

	fn event(video_id: &str, name: &str) -> VideoCreated {
		VideoCreated::new(video_id, Some(VideoRecord::new("r1", name)))
	}

	#[tokio::test]
	async fn test_missing_fields_send_nothing() {
		let push = Arc::new(InMemoryPushSender::default());
		let dispatcher = dispatcher_for(
			vec![User::new("a", Some("tokA"))],
			push.clone(),
		)
		.await;

		let events = vec![
			VideoCreated::new("v1", None),
			VideoCreated::new("v1", Some(VideoRecord::default())),
			VideoCreated::new("v1", Some(VideoRecord::new("r1", ""))),
			VideoCreated::new("v1", Some(VideoRecord::new("", "Joe's"))),
		];

		for e in &events {
			assert_eq!(
				dispatcher.on_video_created(e).await,
				DispatchOutcome::MissingRestaurant
			);
		}
		assert!(push.sent_messages().await.is_empty());
	}

	#[tokio::test]
	async fn test_no_followers_send_nothing() {
		let push = Arc::new(InMemoryPushSender::default());
		let dispatcher = dispatcher_for(vec![], push.clone()).await;

		assert_eq!(
			dispatcher.on_video_created(&event("v1", "Joe's")).await,
			DispatchOutcome::NoFollowers
		);
		assert!(push.sent_messages().await.is_empty());
	}

	#[tokio::test]
	async fn test_no_tokens_send_nothing() {
		let push = Arc::new(InMemoryPushSender::default());
		let dispatcher = dispatcher_for(
			vec![User::new("a", None), User::new("b", Some(""))],
			push.clone(),
		)
		.await;

		assert_eq!(
			dispatcher.on_video_created(&event("v1", "Joe's")).await,
			DispatchOutcome::NoTokens
		);
		assert!(push.sent_messages().await.is_empty());
	}

	#[tokio::test]
	async fn test_only_present_tokens_are_sent() {
		let push = Arc::new(InMemoryPushSender::default());
		let dispatcher = dispatcher_for(
			vec![
				User::new("A", Some("tokA")),
				User::new("B", None),
				User::new("C", Some("tokC")),
			],
			push.clone(),
		)
		.await;

		dispatcher.on_video_created(&event("v1", "Joe's")).await;

		let sent = push.sent_messages().await;
		assert_eq!(sent.len(), 1);

		let mut tokens = sent[0].tokens.clone();
		tokens.sort();
		assert_eq!(tokens, vec!["tokA", "tokC"]);
	}

	#[tokio::test]
	async fn test_payload() {
		let push = Arc::new(InMemoryPushSender::default());
		let dispatcher = dispatcher_for(
			vec![User::new("a", Some("tokA"))],
			push.clone(),
		)
		.await;

		dispatcher
			.on_video_created(&event("v123", "Joe's Diner"))
			.await;

		let msg = push.sent_messages().await.remove(0);
		assert_eq!(msg.title, "Joe's Diner just posted a new dish!");
		assert_eq!(msg.body, NOTIFICATION_BODY);
		assert_eq!(msg.data.get("videoId").unwrap(), "v123");
		assert_eq!(msg.data.get("click_action").unwrap(), CLICK_ACTION);
	}

	#[tokio::test]
	async fn test_partial_failure_completes() {
		let push =
			Arc::new(InMemoryPushSender::with_invalid_tokens(vec!["tokB"]));
		let dispatcher = dispatcher_for(
			vec![
				User::new("a", Some("tokA")),
				User::new("b", Some("tokB")),
				User::new("c", Some("tokC")),
			],
			push.clone(),
		)
		.await;

		assert_eq!(
			dispatcher.on_video_created(&event("v1", "Joe's")).await,
			DispatchOutcome::Sent {
				success_count: 2,
				failure_count: 1
			}
		);
	}

	#[tokio::test]
	async fn test_read_error_is_contained() {
		let push = Arc::new(InMemoryPushSender::default());
		let dispatcher =
			NotificationDispatcher::new(Arc::new(FailingResolver), push.clone());

		assert_eq!(
			dispatcher.on_video_created(&event("v1", "Joe's")).await,
			DispatchOutcome::Failed
		);
		assert!(push.sent_messages().await.is_empty());
	}

	#[tokio::test]
	async fn test_send_error_is_contained() {
		let dispatcher = dispatcher_for(
			vec![User::new("a", Some("tokA"))],
			Arc::new(InMemoryPushSender::unavailable()),
		)
		.await;

		assert_eq!(
			dispatcher.on_video_created(&event("v1", "Joe's")).await,
			DispatchOutcome::Failed
		);
	}

	#[tokio::test]
	async fn test_containment_strategy() {
		let users = Arc::new(InMemoryUserDB::default());
		users.insert(User::new("a", Some("tokA")).following("r1")).await;
		users.insert(User::new("b", Some("tokB")).following("r2")).await;

		let push = Arc::new(InMemoryPushSender::default());
		let dispatcher = NotificationDispatcher::new(
			Arc::new(ContainmentResolver::new(users)),
			push.clone(),
		);

		dispatcher.on_video_created(&event("v1", "Joe's")).await;

		let sent = push.sent_messages().await;
		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].tokens, vec!["tokA"]);
	}

	#[tokio::test]
	async fn test_redelivery_is_suppressed() {
		let push = Arc::new(InMemoryPushSender::default());
		let mut dispatcher = dispatcher_for(
			vec![User::new("a", Some("tokA"))],
			push.clone(),
		)
		.await;
		dispatcher.set_delivery_log(Arc::new(InMemoryDeliveryLog::default()));

		let e = event("v1", "Joe's");
		assert!(matches!(
			dispatcher.on_video_created(&e).await,
			DispatchOutcome::Sent { .. }
		));
		assert_eq!(
			dispatcher.on_video_created(&e).await,
			DispatchOutcome::AlreadyDelivered
		);
		assert_eq!(push.sent_messages().await.len(), 1);
	}

	#[test]
	fn test_duplicate_tokens_are_kept() {
		let users = vec![
			User::new("a", Some("tok")),
			User::new("b", Some("tok")),
		];

		assert_eq!(push_tokens(&users), vec!["tok", "tok"]);
	}

	#[test]
	fn test_outcome_json() {
		let json = serde_json::to_value(DispatchOutcome::Sent {
			success_count: 2,
			failure_count: 1,
		})
		.unwrap();

		assert_eq!(
			json,
			serde_json::json!({
				"outcome": "sent",
				"successCount": 2,
				"failureCount": 1
			})
		);
	}
}
