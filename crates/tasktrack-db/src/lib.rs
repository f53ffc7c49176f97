pub mod cancel;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;

// Re-exports
pub use cancel::{cancellable, with_deadline};
pub use config::DbConfig;
pub use error::{Error, ErrorKind, Result};
pub use models::{NewTask, Task, TaskRecord};
pub use repository::{TaskRepository, TaskStore};
