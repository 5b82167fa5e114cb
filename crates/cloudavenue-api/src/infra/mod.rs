// InfraAPI client modules
//
// Hand-written bindings for the Cloud Avenue proprietary API under
// `/api/customers/`. Mutations answer with a `{jobId, message}` handle that
// is polled through `GET /api/customers/v1.0/jobs/{jobId}`.

pub mod edges;
pub mod jobs;
pub mod models;
pub mod network;
pub mod public_ip;
pub mod tier0;
pub mod vcda;
