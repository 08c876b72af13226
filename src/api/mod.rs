//! API Module
//!
//! Local HTTP control surface for the text operations.
//!
//! # Endpoints
//! - `POST /grammar` - Fix grammar
//! - `POST /summarize` - Summarize
//! - `POST /tone` - Change tone
//! - `GET /stats` - Get cache statistics
//! - `DELETE /cache` - Clear the result cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
