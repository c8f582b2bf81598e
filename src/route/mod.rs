mod error;
mod openroute;
mod provider;
mod resolver;
mod types;

pub use error::{ProviderError, RouteError};
pub use openroute::{OpenRouteService, DEFAULT_OPENROUTE_URL};
pub use provider::RouteProvider;
pub use resolver::RouteResolver;
pub use types::{RouteCandidate, RouteRequest, RouteResponse, RouteSummary};
