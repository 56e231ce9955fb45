mod task;

pub use task::{STATUS_OPTIONS, Task, TaskList, TaskStatus};
