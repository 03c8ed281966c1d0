//! Middleware applied around the router: request screening, optional bearer
//! authentication and response security headers.

pub mod auth;
pub mod security_headers;
pub mod validation;
