use crate::{
	dispatcher::NotificationDispatcher,
	error::Result,
	rejection,
	video::{VideoCreated, VideoRecord},
};
use std::{net::SocketAddr, sync::Arc};
use tracing::Span;
use warp::{
	filters::BoxedFilter,
	reply::Reply,
	trace::{Info, Trace},
	Filter, Rejection,
};

/// video documents are small, anything beyond is not a trigger event
const MAX_EVENT_BYTES: u64 = 64 * 1024;

/// `POST /videos/{videoId}` with the created record as json body
/// (`null` for a record without data), plus `GET /status`
pub fn routes(
	dispatcher: Arc<NotificationDispatcher>,
) -> BoxedFilter<(Box<dyn Reply>,)> {
	let video_created = warp::path!("videos" / String)
		.and(warp::post())
		.and(warp::body::content_length_limit(MAX_EVENT_BYTES))
		.and(warp::body::json::<Option<VideoRecord>>())
		.and(warp::any().map(move || dispatcher.clone()))
		.and_then(video_created_fn);

	let status = warp::path!("status")
		.and(warp::get())
		.map(warp::reply::reply);

	video_created
		.or(status)
		.map(|reply| -> Box<dyn Reply> { Box::new(reply) })
		.boxed()
}

async fn video_created_fn(
	video_id: String,
	record: Option<VideoRecord>,
	dispatcher: Arc<NotificationDispatcher>,
) -> std::result::Result<impl Reply, Rejection> {
	let event = VideoCreated::new(&video_id, record);

	let outcome = dispatcher.on_video_created(&event).await;

	Ok(warp::reply::json(&outcome))
}

#[must_use]
pub fn trace_request() -> Trace<impl Fn(Info) -> Span + Clone> {
	warp::trace::trace(|info: Info| {
		tracing::info_span!(
			"http",
			path = %info.path(),
		)
	})
}

/// serves the trigger endpoint until `shutdown_receiver` fires
///
/// # Errors
/// fails if `addr` cannot be bound
pub async fn init_with_graceful_shutdown(
	dispatcher: Arc<NotificationDispatcher>,
	addr: impl Into<SocketAddr> + Send,
	shutdown_receiver: tokio::sync::oneshot::Receiver<()>,
) -> Result<()> {
	let log = warp::log::custom(move |info| {
		tracing::info!(
			target: "http",
			path = %info.path(),
			method = %info.method(),
			elapsed = %info.elapsed().as_micros(),
			status = %info.status(),
		);
	});

	let routes = routes(dispatcher)
		.with(log) // log filter
		.with(trace_request()) //tracing filter
		.recover(rejection::handle_rejection);

	let (addr, server) = warp::serve(routes)
		.try_bind_with_graceful_shutdown(addr.into(), async {
			shutdown_receiver.await.ok();
		})?;

	tracing::info!("serverstart: {}", addr);

	server.await;

	tracing::info!("server stopped");

	Ok(())
}
