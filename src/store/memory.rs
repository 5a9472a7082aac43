//! In-process todo store.
//!
//! Keeps todos in a `BTreeMap` behind a `tokio::sync::RwLock`. Used by tests
//! and anywhere a database is not available.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::TodoStore;
use crate::error::Result;
use crate::models::{NewTodo, Todo, TodoPatch};

#[derive(Debug, Default)]
struct Inner {
    todos: BTreeMap<i64, Todo>,
    last_id: i64,
}

/// Todo store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTodoStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored todos.
    pub async fn len(&self) -> usize {
        self.inner.read().await.todos.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn list(&self, completed: Option<bool>) -> Result<Vec<Todo>> {
        let inner = self.inner.read().await;
        let mut todos: Vec<Todo> = inner
            .todos
            .values()
            .filter(|todo| completed.map_or(true, |c| todo.completed == c))
            .cloned()
            .collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(todos)
    }

    async fn get(&self, id: i64) -> Result<Option<Todo>> {
        Ok(self.inner.read().await.todos.get(&id).cloned())
    }

    async fn create(&self, new: NewTodo) -> Result<Todo> {
        let mut inner = self.inner.write().await;
        // Ids keep counting past deletions
        inner.last_id += 1;
        let now = Utc::now();
        let todo = Todo {
            id: inner.last_id,
            title: new.title,
            description: new.description,
            completed: new.completed,
            created_at: now,
            updated_at: now,
        };
        inner.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Option<Todo>> {
        let mut inner = self.inner.write().await;
        Ok(inner.todos.get_mut(&id).map(|todo| {
            todo.apply(&patch, Utc::now());
            todo.clone()
        }))
    }

    async fn toggle(&self, id: i64) -> Result<Option<Todo>> {
        let mut inner = self.inner.write().await;
        Ok(inner.todos.get_mut(&id).map(|todo| {
            todo.toggle(Utc::now());
            todo.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.inner.write().await.todos.remove(&id).is_some())
    }
}
