use crate::error::AppError;
use crate::list_api::{self, TaskFilter};
use crate::model::TaskStatus;
use std::io::Write;
use std::path::Path;

const HEADER: &str = "Task Name,List,Assigned To,Deadline,Completion Time,Status";

/// One archive row, mirroring a Done task plus its list name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTaskRecord {
    pub task_name: String,
    pub list: String,
    pub assigned_to: String,
    pub deadline: String,
    pub completed_at: String,
}

/// Appends one row to the CSV sink, creating the file with a header first if
/// needed. No dedup: re-archiving the same task produces a duplicate row.
pub fn append_record(path: &Path, record: &CompletedTaskRecord) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let new_file = !path.exists();
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| AppError::io(err.to_string()))?;

    if new_file {
        writeln!(file, "{HEADER}").map_err(|err| AppError::io(err.to_string()))?;
    }

    let row = [
        csv_field(&record.task_name),
        csv_field(&record.list),
        csv_field(&record.assigned_to),
        csv_field(&record.deadline),
        csv_field(&record.completed_at),
        "Done".to_string(),
    ]
    .join(",");
    writeln!(file, "{row}").map_err(|err| AppError::io(err.to_string()))?;

    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Scans all tasks for the first name match that is currently Done and
/// appends it to the archive. Returns whether a row was written.
pub fn archive_done_task(
    store_path: &Path,
    archive_path: &Path,
    task_name: &str,
) -> Result<bool, AppError> {
    let views = list_api::tasks(store_path, &TaskFilter::default())?;

    for view in views {
        if view.task.name == task_name && view.task.status == TaskStatus::Done {
            let record = CompletedTaskRecord {
                task_name: view.task.name,
                list: view.list,
                assigned_to: view.task.assigned_to,
                deadline: view.task.deadline,
                completed_at: view.task.completed_at.unwrap_or_default(),
            };
            append_record(archive_path, &record)?;
            return Ok(true);
        }
    }

    Ok(false)
}
