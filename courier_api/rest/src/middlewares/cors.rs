use std::time::Duration;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
        HeaderName, HeaderValue, Method,
    },
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

pub fn add<S: Clone + Send + Sync + 'static>(
    router: Router<S>,
    allowed_origins: &[String],
) -> Router<S> {
    router.layer(layer(allowed_origins))
}

fn layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(allowed_origins.iter().filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|err| warn!(origin, "Ignoring invalid allowed origin: {err}"))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, ACCEPT, ORIGIN, X_REQUESTED_WITH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(24 * 60 * 60))
}
