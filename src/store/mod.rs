//! Store Module
//!
//! The durable source of truth for todos, behind the `TodoStore` trait so the
//! service can run against PostgreSQL or an in-process fake.

mod memory;
mod postgres;

pub use memory::MemoryTodoStore;
pub use postgres::PostgresTodoStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewTodo, Todo, TodoPatch};

/// Persistent todo storage.
///
/// Every mutation is a single-row operation made atomic by the backing store.
/// Lookups by id return `Ok(None)` when the todo does not exist.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Probes connectivity.
    async fn ping(&self) -> Result<()>;

    /// Lists todos, optionally filtered by `completed`, newest first.
    async fn list(&self, completed: Option<bool>) -> Result<Vec<Todo>>;

    async fn get(&self, id: i64) -> Result<Option<Todo>>;

    /// Persists a new todo; the store assigns `id` and both timestamps.
    async fn create(&self, new: NewTodo) -> Result<Todo>;

    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Option<Todo>>;

    async fn toggle(&self, id: i64) -> Result<Option<Todo>>;

    /// Hard delete. Returns `false` when nothing was removed.
    async fn delete(&self, id: i64) -> Result<bool>;
}
