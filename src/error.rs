use rusoto_core::RusotoError;
use rusoto_dynamodb::{GetItemError, PutItemError, QueryError, ScanError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
	#[error("config error: {0}")]
	Config(String),

	#[error("dynamo error: {0}")]
	Dynamo(#[from] dishcast_dynamo::Error),

	#[error("push error: {0}")]
	Push(#[from] dishcast_push::error::Error),

	#[error("aws error: {0}")]
	RusotoGetItem(#[from] RusotoError<GetItemError>),

	#[error("aws error: {0}")]
	RusotoPutItem(#[from] RusotoError<PutItemError>),

	#[error("aws error: {0}")]
	RusotoQuery(#[from] RusotoError<QueryError>),

	#[error("aws error: {0}")]
	RusotoScan(#[from] RusotoError<ScanError>),

	#[error("server error: {0}")]
	Server(#[from] warp::Error),

	/// stand-in failure of test doubles
	#[cfg(test)]
	#[error("unavailable: {0}")]
	Unavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
