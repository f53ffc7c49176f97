use std::future::Future;
use std::io::Write;

use anyhow::Result;
use serde_json::json;
use tasktrack_db::{cancellable, NewTask, Task, TaskStore};

use crate::cli::Commands;

/// Run one command against `store`. If `signal` completes before the store
/// call does, the call is abandoned and reported as cancelled.
pub async fn execute<S, F>(
    command: Commands,
    store: &S,
    signal: F,
    json: bool,
    out: &mut dyn Write,
) -> Result<()>
where
    S: TaskStore + ?Sized,
    F: Future<Output = ()>,
{
    match command {
        Commands::List => {
            let tasks = cancellable(store.list_all(), signal).await?;
            print_tasks(out, &tasks, json)?;
        }

        Commands::Create {
            author,
            assigned,
            title,
            content,
        } => {
            let task = NewTask::new(author, assigned, title, content);
            let id = cancellable(store.create_task(&task), signal).await?;

            tracing::info!(task_id = id, "Task created");
            if json {
                writeln!(out, "{}", json!({ "id": id }))?;
            } else {
                writeln!(out, "✓ Task created: {}", id)?;
            }
        }

        Commands::ByAuthor { author } => {
            let tasks = cancellable(store.tasks_by_author(author), signal).await?;
            print_tasks(out, &tasks, json)?;
        }

        Commands::ByLabel { label } => {
            let tasks = cancellable(store.tasks_by_label(&label), signal).await?;
            print_tasks(out, &tasks, json)?;
        }

        Commands::Close { id, at } => {
            let close_date = at.unwrap_or_else(|| chrono::Utc::now().timestamp());
            let affected = cancellable(store.update_task(id, close_date), signal).await?;
            print_affected(out, "closed", id, affected, json)?;
        }

        Commands::Delete { id } => {
            let affected = cancellable(store.delete_task(id), signal).await?;
            print_affected(out, "deleted", id, affected, json)?;
        }
    }

    Ok(())
}

fn print_tasks(out: &mut dyn Write, tasks: &[Task], json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(tasks)?)?;
        return Ok(());
    }

    if tasks.is_empty() {
        writeln!(out, "No tasks")?;
        return Ok(());
    }

    for task in tasks {
        let state = if task.is_open() {
            "open".to_string()
        } else {
            format!("closed {}", task.closed)
        };
        writeln!(
            out,
            "#{} [{}] {} (author {}, assigned {}, opened {})",
            task.id, state, task.title, task.author_id, task.assigned_id, task.opened
        )?;
        writeln!(out, "    {}", task.content)?;
    }
    Ok(())
}

fn print_affected(
    out: &mut dyn Write,
    action: &str,
    id: i64,
    affected: u64,
    json: bool,
) -> Result<()> {
    if affected == 0 {
        tracing::warn!(task_id = id, "No task matched; nothing {}", action);
    }

    if json {
        writeln!(out, "{}", json!({ "id": id, "rows_affected": affected }))?;
    } else if affected == 0 {
        writeln!(out, "No task with id {}", id)?;
    } else {
        writeln!(out, "✓ Task {} {}", id, action)?;
    }
    Ok(())
}
