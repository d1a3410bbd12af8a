//! HTTP API: routing, bearer-token middleware, handlers and error mapping.

pub mod endpoints;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;
