//! In-memory record store for the todo resource.
//!
//! The map lives behind a single `RwLock`; every operation holds it for its
//! whole read-modify-write, so an `update` can never interleave with a
//! `delete` of the same id. Nothing is persisted.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::todos::Todo;

/// Cloneable handle; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct TodoStore {
    todos: Arc<RwLock<IndexMap<String, Todo>>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in insertion order.
    pub async fn find_all(&self) -> Vec<Todo> {
        self.todos.read().await.values().cloned().collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Todo> {
        self.todos.read().await.get(id).cloned()
    }

    /// Insert under `todo.id`. An existing record with the same id is
    /// replaced in place.
    pub async fn create(&self, todo: Todo) -> Todo {
        self.todos.write().await.insert(todo.id.clone(), todo.clone());
        todo
    }

    /// Replace the record stored under `id`; `None` if there is none.
    ///
    /// The stored record keeps `id` even if `todo.id` says otherwise.
    pub async fn update(&self, id: &str, mut todo: Todo) -> Option<Todo> {
        let mut todos = self.todos.write().await;
        let slot = todos.get_mut(id)?;
        todo.id = id.to_string();
        *slot = todo.clone();
        Some(todo)
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.todos.write().await.shift_remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
