use rusoto_core::{
	credential::CredentialsError, request::TlsError, RusotoError,
};
use rusoto_dynamodb::{CreateTableError, ListTablesError};
use rusoto_secretsmanager::GetSecretValueError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
	#[error("table {0} not found")]
	TableNotFound(String),

	#[error("dynamo deserialize error for field: {0}")]
	DynamoDeserialize(&'static str),

	#[error("secret error: {0}")]
	Secret(String),

	#[error("aws error: {0}")]
	RusotoListTables(#[from] RusotoError<ListTablesError>),

	#[error("aws error: {0}")]
	RusotoCreateTable(#[from] RusotoError<CreateTableError>),

	#[error("aws error: {0}")]
	RusotoGetSecretValue(#[from] RusotoError<GetSecretValueError>),

	#[error("aws error: {0}")]
	RusotoCredentials(#[from] CredentialsError),

	#[error("aws error: {0}")]
	RusotoTls(#[from] TlsError),
}

pub type Result<T> = std::result::Result<T, Error>;
