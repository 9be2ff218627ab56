//! # TextDesk API
//!
//! HTTP surface of the verification core: issuance and check endpoints,
//! the access gate middleware that protects every dashboard operation,
//! configuration bootstrap, and JSON error mapping.

pub mod app;
pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod routes;
