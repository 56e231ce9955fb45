use crate::deadline;
use crate::error::AppError;
use crate::model::{Task, TaskList, TaskStatus};
use crate::storage::doc_store;
use std::path::Path;
use time::OffsetDateTime;

/// A task annotated with the name of its owning list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub list: String,
    pub task: Task,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    pub list_name: Option<String>,
    /// Exact full-string match against the joined assignee field, not a
    /// membership test.
    pub assignee: Option<String>,
}

pub fn create_list(path: &Path, name: &str) -> Result<TaskList, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::usage("list name is required"));
    }

    let mut lists = doc_store::load_lists(path)?;
    if lists.iter().any(|list| list.name == trimmed) {
        return Err(AppError::conflict(format!(
            "list '{trimmed}' already exists"
        )));
    }

    let list = TaskList {
        name: trimmed.to_string(),
        tasks: Vec::new(),
    };
    lists.push(list.clone());
    doc_store::save_lists(path, &lists)?;

    Ok(list)
}

/// Removes the list and every task it owns.
pub fn delete_list(path: &Path, name: &str) -> Result<TaskList, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::usage("list name is required"));
    }

    let mut lists = doc_store::load_lists(path)?;
    let index = lists
        .iter()
        .position(|list| list.name == trimmed)
        .ok_or_else(|| AppError::not_found(format!("list '{trimmed}' not found")))?;

    let removed = lists.remove(index);
    doc_store::save_lists(path, &lists)?;

    Ok(removed)
}

pub fn add_task(
    path: &Path,
    list_name: &str,
    task_name: &str,
    assigned_to: &str,
    due: OffsetDateTime,
) -> Result<Task, AppError> {
    let trimmed_list = list_name.trim();
    if trimmed_list.is_empty() {
        return Err(AppError::usage("list name is required"));
    }
    let trimmed_task = task_name.trim();
    if trimmed_task.is_empty() {
        return Err(AppError::usage("task name is required"));
    }

    let stored_deadline = deadline::to_stored(due)?;

    let mut lists = doc_store::load_lists(path)?;
    let list = lists
        .iter_mut()
        .find(|list| list.name == trimmed_list)
        .ok_or_else(|| AppError::not_found(format!("list '{trimmed_list}' not found")))?;

    let task = Task {
        name: trimmed_task.to_string(),
        assigned_to: assigned_to.to_string(),
        deadline: stored_deadline,
        status: TaskStatus::InProgress,
        completed_at: None,
    };
    list.tasks.push(task.clone());
    doc_store::save_lists(path, &lists)?;

    Ok(task)
}

/// Removes the first task matching both list and exact name.
pub fn delete_task(path: &Path, list_name: &str, task_name: &str) -> Result<Task, AppError> {
    let trimmed_list = list_name.trim();
    let trimmed_task = task_name.trim();
    if trimmed_list.is_empty() || trimmed_task.is_empty() {
        return Err(AppError::usage("list and task names are required"));
    }

    let not_found =
        || AppError::not_found(format!("task '{trimmed_task}' not found in list '{trimmed_list}'"));

    let mut lists = doc_store::load_lists(path)?;
    let list = lists
        .iter_mut()
        .find(|list| list.name == trimmed_list)
        .ok_or_else(not_found)?;
    let index = list
        .tasks
        .iter()
        .position(|task| task.name == trimmed_task)
        .ok_or_else(not_found)?;

    let removed = list.tasks.remove(index);
    doc_store::save_lists(path, &lists)?;

    Ok(removed)
}

/// Sets the status of the first task across all lists whose name matches, in
/// store order. Lookup is by task name only, not list-qualified; with
/// duplicate names across lists only the first is touched. Entering Done
/// stamps the completion time, any other status clears it.
pub fn update_task_status(
    path: &Path,
    task_name: &str,
    new_status: TaskStatus,
) -> Result<TaskView, AppError> {
    let trimmed = task_name.trim();
    if trimmed.is_empty() {
        return Err(AppError::usage("task name is required"));
    }

    let mut lists = doc_store::load_lists(path)?;
    let mut updated = None;

    'lists: for list in &mut lists {
        for task in &mut list.tasks {
            if task.name == trimmed {
                task.status = new_status;
                task.completed_at = if new_status == TaskStatus::Done {
                    Some(deadline::to_stored(OffsetDateTime::now_utc())?)
                } else {
                    None
                };
                updated = Some(TaskView {
                    list: list.name.clone(),
                    task: task.clone(),
                });
                break 'lists;
            }
        }
    }

    let view =
        updated.ok_or_else(|| AppError::not_found(format!("task '{trimmed}' not found")))?;
    doc_store::save_lists(path, &lists)?;

    Ok(view)
}

/// All tasks matching the filter, each annotated with its owning list.
pub fn tasks(path: &Path, filter: &TaskFilter) -> Result<Vec<TaskView>, AppError> {
    let lists = doc_store::load_lists(path)?;
    let mut views = Vec::new();

    for list in &lists {
        if let Some(list_name) = filter.list_name.as_deref()
            && list.name != list_name
        {
            continue;
        }

        for task in &list.tasks {
            if let Some(assignee) = filter.assignee.as_deref()
                && task.assigned_to != assignee
            {
                continue;
            }
            views.push(TaskView {
                list: list.name.clone(),
                task: task.clone(),
            });
        }
    }

    Ok(views)
}

pub fn list_names(path: &Path) -> Result<Vec<String>, AppError> {
    let lists = doc_store::load_lists(path)?;
    Ok(lists.into_iter().map(|list| list.name).collect())
}

#[cfg(test)]
mod tests {
    use super::{
        TaskFilter, add_task, create_list, delete_list, delete_task, list_names, tasks,
        update_task_status,
    };
    use crate::model::{Task, TaskList, TaskStatus};
    use crate::storage::doc_store;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use time::macros::datetime;

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("tasksphere-{nanos}-{file_name}"))
    }

    fn task(name: &str, assigned_to: &str) -> Task {
        Task {
            name: name.to_string(),
            assigned_to: assigned_to.to_string(),
            deadline: "2099-01-01T09:00:00Z".to_string(),
            status: TaskStatus::InProgress,
            completed_at: None,
        }
    }

    fn list(name: &str, tasks: Vec<Task>) -> TaskList {
        TaskList {
            name: name.to_string(),
            tasks,
        }
    }

    #[test]
    fn create_list_rejects_duplicate_name() {
        let path = temp_path("create-dup.json");

        create_list(&path, "Launch").unwrap();
        let err = create_list(&path, "Launch").unwrap_err();
        let names = list_names(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "conflict");
        assert_eq!(names, vec!["Launch".to_string()]);
    }

    #[test]
    fn create_list_rejects_blank_name() {
        let path = temp_path("create-blank.json");
        let err = create_list(&path, "  ").unwrap_err();

        assert_eq!(err.code(), "usage");
    }

    #[test]
    fn add_task_to_missing_list_leaves_store_untouched() {
        let path = temp_path("add-missing-list.json");
        doc_store::save_lists(&path, &[list("Other", Vec::new())]).unwrap();

        let err = add_task(
            &path,
            "Launch",
            "Draft",
            "@alice",
            datetime!(2099-01-01 09:00 UTC),
        )
        .unwrap_err();
        let loaded = doc_store::load_lists(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "not_found");
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].tasks.is_empty());
    }

    #[test]
    fn add_task_appends_in_progress_task() {
        let path = temp_path("add-task.json");
        doc_store::save_lists(&path, &[list("Launch", Vec::new())]).unwrap();

        add_task(
            &path,
            "Launch",
            "Draft",
            "@alice @bob",
            datetime!(2099-01-01 09:00 UTC),
        )
        .unwrap();
        add_task(
            &path,
            "Launch",
            "Review",
            "@carol",
            datetime!(2099-02-01 09:00 UTC),
        )
        .unwrap();
        let loaded = doc_store::load_lists(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let tasks = &loaded[0].tasks;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].name, "Draft");
        assert_eq!(tasks[0].assigned_to, "@alice @bob");
        assert_eq!(tasks[0].status, TaskStatus::InProgress);
        assert_eq!(tasks[0].completed_at, None);
        assert_eq!(tasks[0].deadline, "2099-01-01T09:00:00Z");
        assert_eq!(tasks[1].name, "Review");
    }

    #[test]
    fn delete_task_removes_first_match_only() {
        let path = temp_path("delete-first.json");
        doc_store::save_lists(
            &path,
            &[list(
                "Launch",
                vec![task("Draft", "@alice"), task("Draft", "@bob")],
            )],
        )
        .unwrap();

        let removed = delete_task(&path, "Launch", "Draft").unwrap();
        let loaded = doc_store::load_lists(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(removed.assigned_to, "@alice");
        assert_eq!(loaded[0].tasks.len(), 1);
        assert_eq!(loaded[0].tasks[0].assigned_to, "@bob");
    }

    #[test]
    fn delete_task_rejects_missing_task() {
        let path = temp_path("delete-missing.json");
        doc_store::save_lists(&path, &[list("Launch", Vec::new())]).unwrap();

        let err = delete_task(&path, "Launch", "Draft").unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn delete_task_rejects_missing_list() {
        let path = temp_path("delete-missing-list.json");
        doc_store::save_lists(&path, &[]).unwrap();

        let err = delete_task(&path, "Launch", "Draft").unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn update_status_to_done_stamps_completion_time() {
        let path = temp_path("update-done.json");
        doc_store::save_lists(&path, &[list("Launch", vec![task("Draft", "@alice")])]).unwrap();

        let updated = update_task_status(&path, "Draft", TaskStatus::Done).unwrap();
        assert_eq!(updated.task.status, TaskStatus::Done);
        assert!(updated.task.completed_at.is_some());

        let reverted = update_task_status(&path, "Draft", TaskStatus::InProgress).unwrap();
        let loaded = doc_store::load_lists(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(reverted.task.status, TaskStatus::InProgress);
        assert_eq!(reverted.task.completed_at, None);
        assert_eq!(loaded[0].tasks[0].completed_at, None);
    }

    #[test]
    fn update_status_matches_first_task_across_lists() {
        let path = temp_path("update-first.json");
        doc_store::save_lists(
            &path,
            &[
                list("Alpha", vec![task("Draft", "@alice")]),
                list("Beta", vec![task("Draft", "@bob")]),
            ],
        )
        .unwrap();

        let updated = update_task_status(&path, "Draft", TaskStatus::Done).unwrap();
        let loaded = doc_store::load_lists(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(updated.list, "Alpha");
        assert_eq!(loaded[0].tasks[0].status, TaskStatus::Done);
        assert_eq!(loaded[1].tasks[0].status, TaskStatus::InProgress);
    }

    #[test]
    fn update_status_rejects_unknown_task() {
        let path = temp_path("update-missing.json");
        doc_store::save_lists(&path, &[list("Launch", Vec::new())]).unwrap();

        let err = update_task_status(&path, "Draft", TaskStatus::Done).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn delete_list_cascades_to_tasks() {
        let path = temp_path("delete-list.json");
        doc_store::save_lists(
            &path,
            &[
                list("Launch", vec![task("Draft", "@alice"), task("Review", "@bob")]),
                list("Other", vec![task("Keep", "@carol")]),
            ],
        )
        .unwrap();

        delete_list(&path, "Launch").unwrap();
        let remaining = tasks(
            &path,
            &TaskFilter {
                list_name: Some("Launch".to_string()),
                ..TaskFilter::default()
            },
        )
        .unwrap();
        let names = list_names(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(remaining.is_empty());
        assert_eq!(names, vec!["Other".to_string()]);
    }

    #[test]
    fn delete_list_rejects_missing_name() {
        let path = temp_path("delete-list-missing.json");
        doc_store::save_lists(&path, &[]).unwrap();

        let err = delete_list(&path, "Launch").unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn tasks_without_filter_annotates_owning_list() {
        let path = temp_path("tasks-all.json");
        doc_store::save_lists(
            &path,
            &[
                list("Alpha", vec![task("One", "@alice")]),
                list("Beta", vec![task("Two", "@bob")]),
            ],
        )
        .unwrap();

        let views = tasks(&path, &TaskFilter::default()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].list, "Alpha");
        assert_eq!(views[0].task.name, "One");
        assert_eq!(views[1].list, "Beta");
    }

    #[test]
    fn assignee_filter_matches_full_string_only() {
        let path = temp_path("tasks-assignee.json");
        doc_store::save_lists(
            &path,
            &[list("Launch", vec![task("Draft", "@alice @bob")])],
        )
        .unwrap();

        let member = tasks(
            &path,
            &TaskFilter {
                assignee: Some("@alice".to_string()),
                ..TaskFilter::default()
            },
        )
        .unwrap();
        let exact = tasks(
            &path,
            &TaskFilter {
                assignee: Some("@alice @bob".to_string()),
                ..TaskFilter::default()
            },
        )
        .unwrap();
        std::fs::remove_file(&path).ok();

        assert!(member.is_empty());
        assert_eq!(exact.len(), 1);
    }
}
