//! Web layer for the flight plan server.
//!
//! Provides HTTP endpoints for submitting, reading and updating the active
//! flight plan.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
