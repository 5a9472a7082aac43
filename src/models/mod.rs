//! Domain and transfer models for the todo API
//!
//! The `Todo` entity plus the DTOs used for serializing/deserializing HTTP
//! request and response bodies.

pub mod requests;
pub mod responses;
pub mod todo;

// Re-export commonly used types
pub use requests::{CreateTodoRequest, ListTodosQuery, UpdateTodoRequest};
pub use responses::{DeleteResponse, HealthResponse};
pub use todo::{NewTodo, Todo, TodoPatch, MAX_TITLE_LENGTH};
