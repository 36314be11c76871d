//! Flight plan server.
//!
//! Validates flight plan submissions against a declarative schema, resolves
//! route identifiers against navigation data, and renders the result for
//! network pre-filing clients.

pub mod config;
pub mod export;
pub mod geo;
pub mod navdata;
pub mod parser;
pub mod plan;
pub mod route;
pub mod schema;
pub mod settings;
pub mod web;
