//! Tower middleware applied to the router.
//!
//! Includes request-id assignment and propagation, request tracing, timeout
//! enforcement, and response compression.

use std::time::Duration;

use axum::Router;
use tower_http::{
    compression::CompressionLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Wrap `router` in the shared middleware stack.
///
/// Outermost first: set `x-request-id`, trace, propagate `x-request-id` to the
/// response, timeout, compression.
pub fn apply<S>(router: Router<S>, request_timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
