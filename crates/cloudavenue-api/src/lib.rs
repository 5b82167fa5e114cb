// cloudavenue-api: Async Rust client for the Cloud Avenue platform (InfraAPI + vCloud Director OpenAPI)
//
// One `ApiClient` speaks to both upstream surfaces of a Cloud Avenue console:
// the proprietary InfraAPI under `/api/customers/` (job-driven mutations) and
// the vCloud Director OpenAPI under `/cloudapi/1.0.0/` (task-driven entities).
// Endpoint families are implemented as inherent methods in `infra` and `openapi`.

pub mod auth;
pub mod client;
pub mod error;
pub mod infra;
pub mod openapi;
pub mod transport;

pub use auth::{AccessToken, Credentials, Session, SessionTokenProvider, StaticTokenProvider, TokenProvider};
pub use client::{ApiClient, interpolate};
pub use error::{Error, format_vendor_error};
pub use transport::{TlsMode, TransportConfig};
