use std::path::PathBuf;
use tasksphere_core::archive;
use tasksphere_core::deadline;
use tasksphere_core::error::AppError;
use tasksphere_core::list_api::{self, TaskFilter};
use tasksphere_core::model::{STATUS_OPTIONS, TaskStatus};
use tasksphere_core::session::{INVALID_STATUS_REPLY, PendingUpdates};

pub const WELCOME: &str = "Welcome to the Task Sphere! Use /help for a list of commands.";

const HELP: &str = "Commands:\n\
Create a new task list:\n\
/create_list <list_name>\n\
Show all lists:\n\
/show_lists\n\
Delete a list:\n\
/delete_list <list_name>\n\
Add a task (deadline format: MM/DD/YYYY HH:MM AM/PM):\n\
/add_task <list_name> <task_name> <@username(s)> <deadline>\n\
Delete a task:\n\
/delete_task <list_name> <task_name>\n\
Update task status:\n\
/update_task <task_name>\n\
Show all tasks in a list:\n\
/show_tasks <list_name>\n\
Show tasks assigned to a specific staffer:\n\
/show_tasks @username";

/// One outbound message. `menu` carries the one-shot status keyboard that
/// accompanies /update_task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub menu: Option<Vec<&'static str>>,
}

impl Reply {
    fn text<M: Into<String>>(text: M) -> Self {
        Self {
            text: text.into(),
            menu: None,
        }
    }
}

/// Maps inbound chat commands onto the core operations and renders the reply
/// text. Owns the per-user pending-update state; everything else is
/// path-injected. Every error is recovered here into a reply; nothing
/// propagates past a single message.
pub struct Dispatcher {
    store_path: PathBuf,
    archive_path: PathBuf,
    pending: PendingUpdates,
}

impl Dispatcher {
    pub fn new(store_path: PathBuf, archive_path: PathBuf) -> Self {
        Self {
            store_path,
            archive_path,
            pending: PendingUpdates::new(),
        }
    }

    /// Handles one inbound message and returns exactly one reply. Text
    /// starting with '/' is parsed as a command; anything else is treated as
    /// a status choice for the sender's pending update.
    pub fn handle_message(&self, user_id: i64, text: &str) -> Reply {
        let trimmed = text.trim();
        match trimmed.strip_prefix('/') {
            Some(rest) => {
                let mut parts = rest.split_whitespace();
                let Some(command) = parts.next() else {
                    return unknown_command();
                };
                let args: Vec<&str> = parts.collect();
                self.dispatch_command(user_id, command, &args)
            }
            None => self.handle_status_reply(user_id, trimmed),
        }
    }

    fn dispatch_command(&self, user_id: i64, command: &str, args: &[&str]) -> Reply {
        match command {
            "start" => Reply::text(WELCOME),
            "help" => Reply::text(HELP),
            "create_list" => self.create_list(args),
            "show_lists" => self.show_lists(),
            "delete_list" => self.delete_list(args),
            "add_task" => self.add_task(args),
            "delete_task" => self.delete_task(args),
            "update_task" => self.update_task(user_id, args),
            "show_tasks" => self.show_tasks(args),
            _ => unknown_command(),
        }
    }

    fn create_list(&self, args: &[&str]) -> Reply {
        let name = args.join(" ");
        if name.is_empty() {
            return Reply::text("Usage: /create_list <list_name>");
        }

        match list_api::create_list(&self.store_path, &name) {
            Ok(_) => Reply::text(format!("List '{name}' created successfully.")),
            Err(AppError::Conflict(_)) => Reply::text(format!("List '{name}' already exists.")),
            Err(err) => Reply::text(err.to_string()),
        }
    }

    fn show_lists(&self) -> Reply {
        match list_api::list_names(&self.store_path) {
            Ok(names) if names.is_empty() => Reply::text("No task lists found."),
            Ok(names) => {
                let mut response = String::from("Lists:");
                for name in names {
                    response.push_str(&format!("\n- {name}"));
                }
                Reply::text(response)
            }
            Err(err) => Reply::text(err.to_string()),
        }
    }

    fn delete_list(&self, args: &[&str]) -> Reply {
        let name = args.join(" ");
        if name.is_empty() {
            return Reply::text("Usage: /delete_list <list_name>");
        }

        match list_api::delete_list(&self.store_path, &name) {
            Ok(_) => Reply::text(format!("List '{name}' deleted successfully.")),
            Err(AppError::NotFound(_)) => Reply::text(format!("List '{name}' not found.")),
            Err(err) => Reply::text(err.to_string()),
        }
    }

    fn add_task(&self, args: &[&str]) -> Reply {
        if args.len() < 3 {
            return Reply::text("Usage: /add_task <list_name> <task_name> <@username(s)> <deadline>");
        }

        let list_name = args[0];
        let task_name = args[1];
        let assigned_to = args[2..]
            .iter()
            .filter(|arg| arg.starts_with('@'))
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        // Deadline words are collected from position 3 onward; a non-"@"
        // argument at position 2 contributes to neither field.
        let deadline_input = args
            .get(3..)
            .unwrap_or(&[])
            .iter()
            .filter(|arg| !arg.starts_with('@'))
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        let deadline = match deadline::parse_deadline(&deadline_input) {
            Ok(deadline) => deadline,
            Err(AppError::Validation(message)) => return Reply::text(message),
            Err(err) => return Reply::text(err.to_string()),
        };

        match list_api::add_task(&self.store_path, list_name, task_name, &assigned_to, deadline) {
            Ok(task) => Reply::text(format!(
                "Task '{}' added successfully, assigned to: {}.",
                task.name, task.assigned_to
            )),
            Err(AppError::NotFound(_)) => Reply::text(format!(
                "List '{list_name}' not found. Please create it first."
            )),
            Err(err) => Reply::text(err.to_string()),
        }
    }

    fn delete_task(&self, args: &[&str]) -> Reply {
        if args.len() < 2 {
            return Reply::text("Usage: /delete_task <list_name> <task_name>");
        }

        let list_name = args[0];
        let task_name = args[1..].join(" ");

        match list_api::delete_task(&self.store_path, list_name, &task_name) {
            Ok(_) => Reply::text(format!(
                "Task '{task_name}' deleted successfully from list '{list_name}'."
            )),
            Err(AppError::NotFound(_)) => Reply::text(format!(
                "Task '{task_name}' not found in list '{list_name}'."
            )),
            Err(err) => Reply::text(err.to_string()),
        }
    }

    fn update_task(&self, user_id: i64, args: &[&str]) -> Reply {
        let task_name = args.join(" ");
        if task_name.is_empty() {
            return Reply::text("Usage: /update_task <task_name>");
        }

        self.pending.begin_update(user_id, &task_name);
        Reply {
            text: "Choose the new status for the task:".to_string(),
            menu: Some(STATUS_OPTIONS.iter().map(|status| status.label()).collect()),
        }
    }

    fn show_tasks(&self, args: &[&str]) -> Reply {
        // The joined argument is always looked up as a literal list name,
        // even when it starts with '@'; the assignee filter in list_api is
        // not routed from here.
        let list_name = args.join(" ");
        let filter = TaskFilter {
            list_name: if list_name.is_empty() {
                None
            } else {
                Some(list_name.clone())
            },
            assignee: None,
        };

        let views = match list_api::tasks(&self.store_path, &filter) {
            Ok(views) => views,
            Err(err) => return Reply::text(err.to_string()),
        };
        if views.is_empty() {
            return Reply::text(format!("No tasks found in list '{list_name}'."));
        }

        let mut response = String::from("Active Tasks:\n");
        for (idx, view) in views.iter().enumerate() {
            let deadline = match deadline::display(&view.task.deadline) {
                Ok(deadline) => deadline,
                Err(err) => return Reply::text(err.to_string()),
            };
            response.push_str(&format!(
                "[{}]\nList: {}\nTask: {}\nAssigned To: {}\nDeadline: {}\nStatus: {}\n\n",
                idx + 1,
                view.list,
                view.task.name,
                view.task.assigned_to,
                deadline,
                view.task.status.label()
            ));
        }

        Reply::text(response)
    }

    fn handle_status_reply(&self, user_id: i64, text: &str) -> Reply {
        let (task_name, status) = match self.pending.resolve_update(user_id, text) {
            Ok(resolved) => resolved,
            Err(_) => return Reply::text(INVALID_STATUS_REPLY),
        };

        match list_api::update_task_status(&self.store_path, &task_name, status) {
            Ok(view) => {
                if status == TaskStatus::Done
                    && let Err(err) =
                        archive::archive_done_task(&self.store_path, &self.archive_path, &view.task.name)
                {
                    eprintln!("ERROR: {err}");
                }
                Reply::text(format!(
                    "Task '{}' updated to '{}'.",
                    task_name,
                    status.label()
                ))
            }
            Err(AppError::NotFound(_)) => {
                Reply::text(format!("Failed to update task '{task_name}'."))
            }
            Err(err) => Reply::text(err.to_string()),
        }
    }
}

fn unknown_command() -> Reply {
    Reply::text("Unknown command. Use /help for a list of commands.")
}
