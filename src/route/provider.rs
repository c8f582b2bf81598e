use std::future::Future;

use super::error::ProviderError;
use super::types::{RouteRequest, RouteResponse};

/// Source of driving routes. Zero routes in the response is a normal
/// outcome, not an error.
pub trait RouteProvider: Send + Sync {
    fn fetch_route(
        &self,
        request: &RouteRequest,
    ) -> impl Future<Output = Result<RouteResponse, ProviderError>> + Send;
}
