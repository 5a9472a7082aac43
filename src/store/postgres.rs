//! PostgreSQL-backed todo store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    query, query_as, Postgres, QueryBuilder,
};

use super::TodoStore;
use crate::error::Result;
use crate::models::{NewTodo, Todo, TodoPatch};

const TODO_COLUMNS: &str = "id, title, description, completed, created_at, updated_at";

// Strictly increasing at microsecond precision, see `models::todo::next_updated_at`.
const NEXT_UPDATED_AT: &str = "GREATEST($2, updated_at + INTERVAL '1 microsecond')";

/// Todo store over a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PostgresTodoStore {
    pool: PgPool,
}

impl PostgresTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(
        url: &str,
        max_connections: u32,
    ) -> std::result::Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    /// Creates the `todos` table if it does not exist yet.
    pub async fn run_migrations(pool: &PgPool) -> std::result::Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl TodoStore for PostgresTodoStore {
    async fn ping(&self) -> Result<()> {
        query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self, completed: Option<bool>) -> Result<Vec<Todo>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(TODO_COLUMNS);
        qb.push(" FROM todos");

        if let Some(completed) = completed {
            qb.push(" WHERE completed = ");
            qb.push_bind(completed);
        }

        qb.push(" ORDER BY created_at DESC, id DESC");

        let todos = qb.build_query_as::<Todo>().fetch_all(&self.pool).await?;
        Ok(todos)
    }

    async fn get(&self, id: i64) -> Result<Option<Todo>> {
        let sql = format!("SELECT {} FROM todos WHERE id = $1", TODO_COLUMNS);
        let todo = query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn create(&self, new: NewTodo) -> Result<Todo> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO todos (title, description, completed, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4) RETURNING {}",
            TODO_COLUMNS
        );
        let todo = query_as::<_, Todo>(&sql)
            .bind(new.title)
            .bind(new.description)
            .bind(new.completed)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Option<Todo>> {
        let sql = format!(
            "UPDATE todos SET \
             title = COALESCE($3, title), \
             description = CASE WHEN $4 THEN $5 ELSE description END, \
             completed = COALESCE($6, completed), \
             updated_at = {} \
             WHERE id = $1 RETURNING {}",
            NEXT_UPDATED_AT, TODO_COLUMNS
        );
        let (set_description, description) = match patch.description {
            Some(description) => (true, description),
            None => (false, None),
        };
        let todo = query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(Utc::now())
            .bind(patch.title)
            .bind(set_description)
            .bind(description)
            .bind(patch.completed)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn toggle(&self, id: i64) -> Result<Option<Todo>> {
        let sql = format!(
            "UPDATE todos SET completed = NOT completed, updated_at = {} \
             WHERE id = $1 RETURNING {}",
            NEXT_UPDATED_AT, TODO_COLUMNS
        );
        let todo = query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// Run with `DATABASE_URL=postgres://... cargo test -- --ignored`
#[cfg(test)]
mod tests {
    use super::*;

    fn new_todo(title: &str, completed: bool) -> NewTodo {
        NewTodo {
            title: title.to_string(),
            description: Some(format!("{} notes", title)),
            completed,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_create_sets_equal_timestamps(pool: PgPool) {
        let store = PostgresTodoStore::new(pool);

        let created = store.create(new_todo("Buy milk", false)).await.unwrap();
        assert_eq!(created.created_at, created.updated_at);
        assert!(!created.completed);

        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        store.ping().await.unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_partial_update_binds_fields(pool: PgPool) {
        let store = PostgresTodoStore::new(pool);
        let created = store.create(new_todo("draft", false)).await.unwrap();

        let patch = TodoPatch {
            completed: Some(true),
            ..Default::default()
        };
        let updated = store.update(created.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.title, "draft");
        assert_eq!(updated.description.as_deref(), Some("draft notes"));
        assert!(updated.completed);
        assert!(updated.updated_at > created.updated_at);

        let patch = TodoPatch {
            title: Some("final".to_string()),
            ..Default::default()
        };
        let renamed = store.update(created.id, patch).await.unwrap().unwrap();
        assert_eq!(renamed.title, "final");
        assert_eq!(renamed.description.as_deref(), Some("draft notes"));
        assert!(renamed.completed);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_update_clears_description(pool: PgPool) {
        let store = PostgresTodoStore::new(pool);
        let created = store.create(new_todo("a", false)).await.unwrap();

        let patch = TodoPatch {
            description: Some(None),
            ..Default::default()
        };
        let cleared = store.update(created.id, patch).await.unwrap().unwrap();
        assert!(cleared.description.is_none());
        assert_eq!(cleared.title, "a");

        assert!(store
            .update(created.id + 1000, TodoPatch::default())
            .await
            .unwrap()
            .is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_toggle_twice_keeps_updated_at_rising(pool: PgPool) {
        let store = PostgresTodoStore::new(pool);
        let created = store.create(new_todo("flip", false)).await.unwrap();

        let once = store.toggle(created.id).await.unwrap().unwrap();
        let twice = store.toggle(created.id).await.unwrap().unwrap();

        assert!(once.completed);
        assert!(!twice.completed);
        assert!(once.updated_at > created.updated_at);
        assert!(twice.updated_at > once.updated_at);
        assert_eq!(twice.created_at, created.created_at);
        assert!(store.toggle(created.id + 1000).await.unwrap().is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_list_filter_and_order(pool: PgPool) {
        let store = PostgresTodoStore::new(pool);
        store.create(new_todo("one", true)).await.unwrap();
        store.create(new_todo("two", false)).await.unwrap();
        store.create(new_todo("three", true)).await.unwrap();

        let all = store.list(None).await.unwrap();
        let titles: Vec<&str> = all.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["three", "two", "one"]);

        let done = store.list(Some(true)).await.unwrap();
        let titles: Vec<&str> = done.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["three", "one"]);

        let pending = store.list(Some(false)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "two");
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_ids_not_reused_after_delete(pool: PgPool) {
        let store = PostgresTodoStore::new(pool);

        let first = store.create(new_todo("a", false)).await.unwrap();
        assert!(store.delete(first.id).await.unwrap());
        assert!(!store.delete(first.id).await.unwrap());
        assert!(store.get(first.id).await.unwrap().is_none());

        let second = store.create(new_todo("b", false)).await.unwrap();
        assert!(second.id > first.id);
    }
}
