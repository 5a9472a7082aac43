//! Request DTOs for the todo API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::{Deserialize, Deserializer};

use super::todo::{NewTodo, TodoPatch, MAX_TITLE_LENGTH};

/// Request body for POST /api/todos
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl CreateTodoRequest {
    /// Validates the request and converts it into a `NewTodo`.
    ///
    /// Returns the validation message on failure.
    pub fn into_new_todo(self) -> Result<NewTodo, String> {
        let title = match self.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => return Err("Title is required".to_string()),
        };
        validate_title_length(&title)?;

        Ok(NewTodo {
            title,
            description: self.description,
            completed: self.completed.unwrap_or(false),
        })
    }
}

/// Request body for PUT /api/todos/:id
///
/// Every field is optional; an explicit `"description": null` clears the
/// description while an absent key leaves it untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub completed: Option<Option<bool>>,
}

impl UpdateTodoRequest {
    /// Validates the request and converts it into a `TodoPatch`.
    pub fn into_patch(self) -> Result<TodoPatch, String> {
        let title = match self.title {
            None => None,
            Some(Some(title)) if !title.trim().is_empty() => {
                validate_title_length(&title)?;
                Some(title)
            }
            Some(_) => return Err("Title cannot be empty".to_string()),
        };
        let completed = match self.completed {
            None => None,
            Some(Some(completed)) => Some(completed),
            Some(None) => return Err("Completed must be a boolean".to_string()),
        };

        Ok(TodoPatch {
            title,
            description: self.description,
            completed,
        })
    }
}

/// Query string for GET /api/todos
#[derive(Debug, Clone, Default)]
pub struct ListTodosQuery {
    pub completed: Option<String>,
}

impl ListTodosQuery {
    /// Builds the query from raw key/value pairs. The first `completed`
    /// wins; repeated and unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            completed: pairs
                .into_iter()
                .find(|(key, _)| key == "completed")
                .map(|(_, value)| value),
        }
    }

    /// Tri-state filter: `true` (any case) selects completed todos, any other
    /// non-empty value selects pending ones, absent or empty means all.
    pub fn filter(&self) -> Option<bool> {
        match self.completed.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(value.eq_ignore_ascii_case("true")),
        }
    }
}

fn validate_title_length(title: &str) -> Result<(), String> {
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Title exceeds maximum length of {} characters",
            MAX_TITLE_LENGTH
        ));
    }
    Ok(())
}

/// Marks a key as present so `null` and absent can be told apart.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"title": "Buy milk"}"#).unwrap();
        let new = req.into_new_todo().unwrap();
        assert_eq!(new.title, "Buy milk");
        assert!(new.description.is_none());
        assert!(!new.completed);
    }

    #[test]
    fn test_create_request_missing_title() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(req.into_new_todo().unwrap_err(), "Title is required");
    }

    #[test]
    fn test_create_request_blank_title() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"title": "   "}"#).unwrap();
        assert!(req.into_new_todo().is_err());
    }

    #[test]
    fn test_create_request_title_too_long() {
        let req = CreateTodoRequest {
            title: Some("x".repeat(MAX_TITLE_LENGTH + 1)),
            ..Default::default()
        };
        assert!(req.into_new_todo().is_err());
    }

    #[test]
    fn test_update_request_distinguishes_null_and_absent() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"description": null}"#).unwrap();
        let patch = req.into_patch().unwrap();
        assert_eq!(patch.description, Some(None));
        assert!(patch.title.is_none());
        assert!(patch.completed.is_none());

        let req: UpdateTodoRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(req.into_patch().unwrap(), TodoPatch::default());
    }

    #[test]
    fn test_update_request_rejects_empty_title() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(req.into_patch().is_err());

        let req: UpdateTodoRequest = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert!(req.into_patch().is_err());
    }

    #[test]
    fn test_update_request_rejects_null_completed() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"completed": null}"#).unwrap();
        assert!(req.into_patch().is_err());
    }

    #[test]
    fn test_list_query_from_pairs_takes_first_completed() {
        let pairs = vec![
            ("page".to_string(), "2".to_string()),
            ("completed".to_string(), "true".to_string()),
            ("completed".to_string(), "false".to_string()),
        ];
        assert_eq!(ListTodosQuery::from_pairs(pairs).filter(), Some(true));
        assert_eq!(ListTodosQuery::from_pairs(Vec::new()).filter(), None);
    }

    #[test]
    fn test_list_query_filter() {
        let query = |v: Option<&str>| ListTodosQuery {
            completed: v.map(String::from),
        };
        assert_eq!(query(None).filter(), None);
        assert_eq!(query(Some("")).filter(), None);
        assert_eq!(query(Some("true")).filter(), Some(true));
        assert_eq!(query(Some("True")).filter(), Some(true));
        assert_eq!(query(Some("false")).filter(), Some(false));
        assert_eq!(query(Some("nope")).filter(), Some(false));
    }
}
