//! HTTP surface for the Litera auth core.
//!
//! The router mounts the auth endpoints under `/api`, the authentication
//! gate runs once per request and attaches a [`litera_auth::Principal`] to
//! request extensions when a valid bearer token is presented, and every
//! protected handler consults the central access policy.

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
