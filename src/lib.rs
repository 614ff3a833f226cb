#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::perf)]
#![deny(clippy::nursery)]
#![deny(clippy::match_like_matches_macro)]
#![deny(clippy::needless_update)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::upper_case_acronyms)]

pub mod config;
/// suppression of repeated fan-outs for redelivered events
pub mod delivery;
pub mod dispatcher;
pub mod error;
pub mod followers;
/// Rejection handling for the trigger endpoint
pub mod rejection;
/// warp server hosting the trigger endpoint
pub mod server;
pub mod user;
pub mod video;

use crate::{
	config::{Config, FcmCredentials},
	delivery::DynamoDeliveryLog,
	dispatcher::NotificationDispatcher,
	error::Result,
	followers::{
		ContainmentResolver, DynamoFollowerDB, FollowerResolver,
		FollowerStrategy, SubCollectionResolver,
	},
	user::{DynamoUserDB, UserDB},
};
use dishcast_dynamo::{db_init, read_secret};
use dishcast_push::FcmPushSender;
use rusoto_core::Region;
use std::sync::Arc;

/// Creates the process wide store and push clients and wires them into a
/// dispatcher. Only the store backing `config.follower_strategy` is touched.
///
/// # Errors
///
/// fails if a configured table is missing or the fcm secret can not be read
pub async fn build_dispatcher(
	config: &Config,
) -> Result<NotificationDispatcher> {
	let db = db_init()?;

	let users: Arc<dyn UserDB> =
		Arc::new(DynamoUserDB::new(&config.users_table, db.clone()).await?);

	let followers: Arc<dyn FollowerResolver> = match config.follower_strategy
	{
		FollowerStrategy::SubCollection => {
			let follower_db =
				DynamoFollowerDB::new(&config.followers_table, db.clone())
					.await?;
			Arc::new(SubCollectionResolver::new(
				Arc::new(follower_db),
				users,
			))
		}
		FollowerStrategy::Containment => {
			Arc::new(ContainmentResolver::new(users))
		}
	};

	let api_key = match &config.fcm {
		FcmCredentials::ApiKey(key) => key.clone(),
		FcmCredentials::SecretId(id) => {
			read_secret(id, Region::default()).await?
		}
	};

	let mut dispatcher = NotificationDispatcher::new(
		followers,
		Arc::new(FcmPushSender::new(api_key)),
	);

	if let Some(table) = &config.deliveries_table {
		let deliveries =
			DynamoDeliveryLog::new(table, db, config.delivery_ttl_days)
				.await?;
		dispatcher.set_delivery_log(Arc::new(deliveries));
	}

	tracing::info!(
		strategy = config.follower_strategy.as_ref(),
		redelivery_guard = config.deliveries_table.is_some(),
		"dispatcher ready"
	);

	Ok(dispatcher)
}
