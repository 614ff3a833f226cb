use serde::Serialize;
use std::convert::Infallible;
use warp::{
	body::BodyDeserializeError,
	hyper::StatusCode,
	reject::{
		LengthRequired, MethodNotAllowed, PayloadTooLarge, UnsupportedMediaType,
	},
	Rejection, Reply,
};

#[derive(Serialize)]
struct RejectionResponse {
	error: &'static str,
}

fn reply(error: &'static str, status: StatusCode) -> impl Reply {
	warp::reply::with_status(
		warp::reply::json(&RejectionResponse { error }),
		status,
	)
}

/// Unreadable trigger events are dropped with `202` so the
/// trigger does not keep redelivering them.
#[allow(clippy::missing_errors_doc)]
pub async fn handle_rejection(
	err: Rejection,
) -> Result<impl Reply, Infallible> {
	if err.is_not_found() {
		return Ok(reply("not found", StatusCode::NOT_FOUND));
	}

	if let Some(e) = err.find::<BodyDeserializeError>() {
		tracing::warn!("dropping unreadable event: {}", e);
		return Ok(reply("unreadable event", StatusCode::ACCEPTED));
	}

	if err.find::<UnsupportedMediaType>().is_some() {
		tracing::warn!("dropping event with unsupported content type");
		return Ok(reply("unreadable event", StatusCode::ACCEPTED));
	}

	if err.find::<PayloadTooLarge>().is_some()
		|| err.find::<LengthRequired>().is_some()
	{
		tracing::warn!("dropping event without bounded body");
		return Ok(reply("unreadable event", StatusCode::ACCEPTED));
	}

	if err.find::<MethodNotAllowed>().is_some() {
		return Ok(reply(
			"method not allowed",
			StatusCode::METHOD_NOT_ALLOWED,
		));
	}

	tracing::error!("unhandled rejection {:?}", err);

	Ok(reply("internal error", StatusCode::INTERNAL_SERVER_ERROR))
}
