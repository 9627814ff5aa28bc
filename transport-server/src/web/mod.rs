//! HTTP transport for the Tool Surface.
//!
//! - `GET /health`
//! - `GET /tools` lists the available tools with their argument schemas
//! - `GET /providers` lists providers and whether they are enabled
//! - `POST /tools/:name` runs a tool with a JSON argument object

mod routes;
mod state;

pub use routes::{AppError, create_router};
pub use state::AppState;
