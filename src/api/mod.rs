//! API Module
//!
//! HTTP handlers and routing for the tutor REST API.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `POST /speech` - Cached speech synthesis
//! - `GET /cache/stats` - Audio cache diagnostics
//! - `DELETE /cache` - Clear the audio cache
//! - `POST /sessions`, `GET /sessions` - Create and list chat sessions
//! - `GET /sessions/:id`, `DELETE /sessions/:id` - Read or delete a session
//! - `POST /sessions/:id/messages` - Send a message in translate or ask mode
//! - `POST /keywords/extract` - Extract and save keywords
//! - `GET /keywords`, `DELETE /keywords` - Search or clear saved keywords
//! - `POST /grammar/explain` - Short grammar explanation

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
