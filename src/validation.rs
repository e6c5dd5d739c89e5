use crate::error::{TaskError, TaskResult};
use crate::models::{StatusFilter, TaskStatus};

pub const MAX_TASK_NAME_LENGTH: usize = 200;

/// Sentinel accepted by `list` in place of a status
pub const ALL_FILTER: &str = "all";

const RESERVED_CHARS: [char; 2] = ['/', '\\'];

/// Validate a task name and return it trimmed
pub fn validate_name(name: &str) -> TaskResult<String> {
    let trimmed = name.trim();

    // 1. Non-empty
    if trimmed.is_empty() {
        return Err(TaskError::InvalidName("name cannot be empty".to_string()));
    }

    // 2. Length, in characters rather than bytes
    let length = trimmed.chars().count();
    if length > MAX_TASK_NAME_LENGTH {
        return Err(TaskError::InvalidName(format!(
            "name cannot exceed {} characters (got {})",
            MAX_TASK_NAME_LENGTH, length
        )));
    }

    // 3. Reserved characters
    if let Some(c) = trimmed.chars().find(|c| RESERVED_CHARS.contains(c)) {
        return Err(TaskError::InvalidName(format!(
            "name cannot contain '{}'",
            c
        )));
    }

    // Control characters would break the one-line-per-task listing
    if trimmed.chars().any(char::is_control) {
        return Err(TaskError::InvalidName(
            "name cannot contain control characters".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

/// Parse one of the canonical status names, case-sensitive
pub fn validate_status(status: &str) -> TaskResult<TaskStatus> {
    status
        .parse::<TaskStatus>()
        .map_err(|_| TaskError::InvalidStatus(status.to_string()))
}

/// `None` means no filter was given and is the same as `all`.
pub fn validate_list_filter(status: Option<&str>) -> TaskResult<StatusFilter> {
    match status {
        None | Some(ALL_FILTER) => Ok(StatusFilter::All),
        Some(other) => validate_status(other).map(StatusFilter::Only),
    }
}
