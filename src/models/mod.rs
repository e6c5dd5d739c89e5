pub mod status;
pub mod task;

pub use status::{StatusFilter, TaskStatus};
pub use task::{Task, TaskCollection};
