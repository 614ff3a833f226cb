use crate::{
	error::{Error, Result},
	followers::FollowerStrategy,
};
use std::{net::SocketAddr, ops::RangeInclusive, str::FromStr};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_USERS_TABLE: &str = "users";
pub const DEFAULT_FOLLOWERS_TABLE: &str = "restaurant_followers";
pub const DEFAULT_DELIVERY_TTL_DAYS: i64 = 7;
/// accepted range of `DELIVERY_TTL_DAYS`
pub const DELIVERY_TTL_DAYS_RANGE: RangeInclusive<i64> = 1..=3650;

/// where the fcm server key comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FcmCredentials {
	ApiKey(String),
	/// id of a secrets manager entry holding the key
	SecretId(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub listen_addr: SocketAddr,
	pub users_table: String,
	pub followers_table: String,
	pub follower_strategy: FollowerStrategy,
	/// redelivery guard is enabled when set
	pub deliveries_table: Option<String>,
	pub delivery_ttl_days: i64,
	pub fcm: FcmCredentials,
}

impl Config {
	/// # Errors
	/// fails on missing fcm credentials or unparsable values
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// # Errors
	/// fails on missing fcm credentials or unparsable values
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

		let fcm = match (var("FCM_API_KEY"), var("FCM_SECRET_ID")) {
			(Some(key), _) => FcmCredentials::ApiKey(key),
			(None, Some(id)) => FcmCredentials::SecretId(id),
			(None, None) => {
				return Err(Error::Config(
					"either FCM_API_KEY or FCM_SECRET_ID is required"
						.into(),
				))
			}
		};

		Ok(Self {
			listen_addr: parse(
				"LISTEN_ADDR",
				var("LISTEN_ADDR").as_deref(),
				DEFAULT_LISTEN_ADDR,
			)?,
			users_table: var("USERS_TABLE")
				.unwrap_or_else(|| DEFAULT_USERS_TABLE.into()),
			followers_table: var("FOLLOWERS_TABLE")
				.unwrap_or_else(|| DEFAULT_FOLLOWERS_TABLE.into()),
			follower_strategy: var("FOLLOWER_STRATEGY")
				.map(|v| {
					FollowerStrategy::from_str(&v).map_err(|_| {
						Error::Config(format!(
							"unknown FOLLOWER_STRATEGY: {}",
							v
						))
					})
				})
				.transpose()?
				.unwrap_or_default(),
			deliveries_table: var("DELIVERIES_TABLE"),
			delivery_ttl_days: var("DELIVERY_TTL_DAYS")
				.map(|v| {
					v.parse::<i64>()
						.ok()
						.filter(|days| DELIVERY_TTL_DAYS_RANGE.contains(days))
						.ok_or_else(|| {
							Error::Config(format!(
								"invalid DELIVERY_TTL_DAYS: {}",
								v
							))
						})
				})
				.transpose()?
				.unwrap_or(DEFAULT_DELIVERY_TTL_DAYS),
			fcm,
		})
	}
}

fn parse<T: FromStr>(
	key: &str,
	value: Option<&str>,
	default: &str,
) -> Result<T> {
	let value = value.unwrap_or(default);
	value
		.parse()
		.map_err(|_| Error::Config(format!("invalid {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
	#![allow(clippy::unwrap_used)]
	use super::*;
	use pretty_assertions::assert_eq;
	use std::collections::HashMap;

	fn config(vars: &[(&str, &str)]) -> Result<Config> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| ((*k).to_string(), (*v).to_string()))
			.collect();
		Config::from_lookup(|key| vars.get(key).cloned())
	}

	fn config_days_accepted(days: &str) -> bool {
		config(&[("FCM_API_KEY", "key"), ("DELIVERY_TTL_DAYS", days)]).is_ok()
	}

	#[test]
	fn test_defaults() {
		let config = config(&[("FCM_API_KEY", "key")]).unwrap();

		assert_eq!(
			config,
			Config {
				listen_addr: DEFAULT_LISTEN_ADDR.parse().unwrap(),
				users_table: "users".into(),
				followers_table: "restaurant_followers".into(),
				follower_strategy: FollowerStrategy::SubCollection,
				deliveries_table: None,
				delivery_ttl_days: 7,
				fcm: FcmCredentials::ApiKey("key".into()),
			}
		);
	}

	#[test]
	fn test_overrides() {
		let config = config(&[
			("FCM_SECRET_ID", "prod/fcm"),
			("FOLLOWER_STRATEGY", "containment"),
			("DELIVERIES_TABLE", "deliveries"),
			("DELIVERY_TTL_DAYS", "2"),
			("LISTEN_ADDR", "127.0.0.1:9000"),
		])
		.unwrap();

		assert_eq!(config.fcm, FcmCredentials::SecretId("prod/fcm".into()));
		assert_eq!(config.follower_strategy, FollowerStrategy::Containment);
		assert_eq!(config.deliveries_table.as_deref(), Some("deliveries"));
		assert_eq!(config.delivery_ttl_days, 2);
		assert!(config_days_accepted("3650"));
		assert_eq!(config.listen_addr.port(), 9000);
	}

	#[test]
	fn test_invalid() {
		assert!(config(&[]).is_err());
		assert!(config(&[("FCM_API_KEY", "")]).is_err());
		assert!(config(&[
			("FCM_API_KEY", "key"),
			("FOLLOWER_STRATEGY", "both")
		])
		.is_err());
		assert!(config(&[
			("FCM_API_KEY", "key"),
			("DELIVERY_TTL_DAYS", "soon")
		])
		.is_err());
		for days in &["0", "-1", "3651", "100000000"] {
			assert!(config(&[
				("FCM_API_KEY", "key"),
				("DELIVERY_TTL_DAYS", *days)
			])
			.is_err());
		}
		assert!(config(&[("FCM_API_KEY", "key"), ("LISTEN_ADDR", "x")])
			.is_err());
	}
}
