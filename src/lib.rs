//! # Installation Registry
//!
//! A hypermedia REST backend for two related resources: contacts and the
//! production installations they are linked to. Resources are served as
//! `application/hal+json` below a configurable base path (default `/api`).
//!
//! ## Architecture
//!
//! - **Axum** for routing, extractors and middleware
//! - **SQLx** over SQLite for persistence
//! - **Tokio** as the async runtime
//! - **Serde** for the JSON and HAL bodies
//!
//! ## Core Components
//!
//! - [`config`]: layered configuration (defaults, file, environment)
//! - [`db`]: schema creation
//! - [`error`]: error type and JSON error bodies, including validation problems
//! - [`hal`]: links, resource and collection representations
//! - [`model`]: resource types and validation rules
//! - [`repository`]: SQL access, paging and sorting
//! - [`routes`]: handlers and the router
//! - [`middleware`]: request screening, authentication, security headers
//! - [`metrics`] and [`state`]: shared runtime state

pub mod config;
pub mod db;
pub mod error;
pub mod hal;
pub mod metrics;
pub mod middleware;
pub mod model;
pub mod repository;
pub mod routes;
pub mod state;

#[cfg(test)]
mod tests;
