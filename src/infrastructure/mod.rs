//! Infrastructure layer with concrete adapter implementations.
//!
//! `HttpOrderApi` talks to the storefront backend over REST; the in-memory
//! cart backs tests and local runs without an external cart service.

pub mod http_api;
pub mod in_memory;
