use super::error::RouteError;
use super::provider::RouteProvider;
use super::types::RouteRequest;
use crate::geo::GeoPoint;
use crate::polyline;

/// Turns a route request into the decoded path of the provider's first
/// candidate route.
pub struct RouteResolver<P> {
    provider: P,
}

impl<P: RouteProvider> RouteResolver<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns an empty path when the provider finds no route.
    pub async fn resolve(&self, request: &RouteRequest) -> Result<Vec<GeoPoint>, RouteError> {
        request.validate()?;

        let response = self.provider.fetch_route(request).await?;
        let Some(route) = response.routes.first() else {
            log::info!(
                "No route found between {:?} and {:?}",
                request.start.lon_lat(),
                request.finish.lon_lat()
            );
            return Ok(Vec::new());
        };

        let path = polyline::decode(&route.geometry, request.include_elevation)?;
        log::debug!("Decoded route with {} points", path.len());
        Ok(path)
    }
}
