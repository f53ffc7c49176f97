use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{Error, Result};

/// Column list shared by every task SELECT, in `TaskRecord` field order.
pub const TASK_COLUMNS: &str =
    "tasks.id, tasks.opened, tasks.closed, tasks.author_id, tasks.assigned_id, tasks.title, tasks.content";

/// A task as handed to callers. `closed == 0` means the task is still open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub opened: i64,
    pub closed: i64,
    pub author_id: i64,
    pub assigned_id: i64,
    pub title: String,
    pub content: String,
}

impl Task {
    pub fn is_open(&self) -> bool {
        self.closed == 0
    }
}

/// Raw `tasks` row as the store returns it.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRecord {
    pub id: i64,
    pub opened: i64,
    pub closed: Option<i64>,
    pub author_id: i64,
    pub assigned_id: i64,
    pub title: String,
    pub content: String,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            opened: record.opened,
            closed: record.closed.unwrap_or(0),
            author_id: record.author_id,
            assigned_id: record.assigned_id,
            title: record.title,
            content: record.content,
        }
    }
}

/// Input for creating a task. `id`, `opened` and `closed` belong to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub author_id: i64,
    pub assigned_id: i64,
    pub title: String,
    pub content: String,
}

impl NewTask {
    pub fn new(
        author_id: i64,
        assigned_id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            author_id,
            assigned_id,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Rejects input the store would accept but the task model does not:
    /// non-positive identities and empty title or content. Whitespace is
    /// content. Whether the identities exist is left to the store's foreign
    /// keys.
    pub fn validate(&self) -> Result<()> {
        if self.author_id <= 0 {
            return Err(Error::Constraint(format!(
                "author_id must be positive, got {}",
                self.author_id
            )));
        }
        if self.assigned_id <= 0 {
            return Err(Error::Constraint(format!(
                "assigned_id must be positive, got {}",
                self.assigned_id
            )));
        }
        if self.title.is_empty() {
            return Err(Error::Constraint("title must not be empty".to_string()));
        }
        if self.content.is_empty() {
            return Err(Error::Constraint("content must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn record() -> TaskRecord {
        TaskRecord {
            id: 7,
            opened: 1_690_000_000,
            closed: None,
            author_id: 1,
            assigned_id: 2,
            title: "fix bug".to_string(),
            content: "null pointer in parser".to_string(),
        }
    }

    #[test]
    fn test_record_maps_every_column() {
        let task = Task::from(record());

        assert_eq!(task.id, 7);
        assert_eq!(task.opened, 1_690_000_000);
        assert_eq!(task.author_id, 1);
        assert_eq!(task.assigned_id, 2);
        assert_eq!(task.title, "fix bug");
        assert_eq!(task.content, "null pointer in parser");
    }

    #[test]
    fn test_null_closed_maps_to_open() {
        let task = Task::from(record());
        assert_eq!(task.closed, 0);
        assert!(task.is_open());
    }

    #[test]
    fn test_closed_date_is_kept() {
        let task = Task::from(TaskRecord {
            closed: Some(1_700_000_000),
            ..record()
        });
        assert_eq!(task.closed, 1_700_000_000);
        assert!(!task.is_open());
    }

    #[test]
    fn test_new_task_validation() {
        assert!(NewTask::new(1, 2, "fix bug", "null pointer").validate().is_ok());

        let cases = [
            NewTask::new(0, 2, "t", "c"),
            NewTask::new(1, -3, "t", "c"),
            NewTask::new(1, 2, "", "c"),
            NewTask::new(1, 2, "t", ""),
        ];
        for case in cases {
            let err = case.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Constraint, "{:?}", case);
        }
    }

    #[test]
    fn test_whitespace_only_text_is_accepted() {
        assert!(NewTask::new(1, 2, "   ", "\t").validate().is_ok());
    }

    #[test]
    fn test_task_serializes_with_field_names() {
        let json = serde_json::to_value(Task::from(record())).unwrap();
        assert_eq!(json["author_id"], 1);
        assert_eq!(json["closed"], 0);
        assert_eq!(json["title"], "fix bug");
    }
}
