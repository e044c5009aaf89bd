//! HTTP surface: router and health endpoint

mod routes;

pub use routes::build_router;
