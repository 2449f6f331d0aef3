//! API module
//!
//! HTTP transport: routes and request/response types.

mod routes;

pub use routes::{create_router, AppState};
