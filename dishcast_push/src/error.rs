use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
	#[error("serde json error {0}")]
	SerdeJson(#[from] serde_json::Error),
	#[error("fcm error: {0}")]
	Fcm(#[from] fcm::FcmError),
	#[error("push error: {0}")]
	Custom(String),
}

pub type Result<T> = std::result::Result<T, Error>;
