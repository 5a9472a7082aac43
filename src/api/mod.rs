//! API Module
//!
//! HTTP handlers and routing for the todo REST API.
//!
//! # Endpoints
//! - `GET /health` - Store and cache connectivity
//! - `GET /api/todos?completed=` - List todos, optionally filtered
//! - `POST /api/todos` - Create a todo
//! - `GET /api/todos/:id` - Fetch a todo
//! - `PUT /api/todos/:id` - Partially update a todo
//! - `DELETE /api/todos/:id` - Delete a todo
//! - `POST /api/todos/:id/toggle` - Flip `completed`

pub mod handlers;
pub mod routes;


pub use handlers::*;
pub use routes::create_router;
