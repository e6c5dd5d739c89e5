use std::path::{Path, PathBuf};

use crate::error::{TaskError, TaskResult};
use crate::fs::{load_collection, save_collection};
use crate::models::{Task, TaskCollection};
use crate::validation::{validate_list_filter, validate_name, validate_status};

/// Task store bound to one store file.
///
/// Every operation reads the file fresh, applies its change in memory and,
/// when it mutates, writes the whole collection back before returning.
/// Input is validated before the file is touched.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Store backed by `path`; the file need not exist yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store file this store reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a `todo` task with the next unused id
    pub fn add(&self, name: &str) -> TaskResult<Task> {
        let name = validate_name(name)?;

        self.modify(|collection| {
            let id = collection.allocate_id().ok_or(TaskError::IdsExhausted)?;
            let task = Task::new(id, name);
            collection.tasks.push(task.clone());
            log::info!("task #{} added: '{}'", task.id, task.name);
            Ok(task)
        })
    }

    /// Rename a task
    pub fn update(&self, id: u32, new_name: &str) -> TaskResult<Task> {
        let name = validate_name(new_name)?;

        self.modify(|collection| {
            let task = collection.get_mut(id).ok_or(TaskError::TaskNotFound(id))?;
            let old_name = std::mem::take(&mut task.name);
            task.rename(name);
            log::info!("task #{} renamed: '{}' -> '{}'", id, old_name, task.name);
            Ok(task.clone())
        })
    }

    /// Set a task's status. Marking with the current status still
    /// refreshes `updated_at`.
    pub fn mark(&self, id: u32, new_status: &str) -> TaskResult<Task> {
        let status = validate_status(new_status)?;

        self.modify(|collection| {
            let task = collection.get_mut(id).ok_or(TaskError::TaskNotFound(id))?;
            let old_status = task.status;
            task.set_status(status);
            log::info!("task #{} marked: {} -> {}", id, old_status, status);
            Ok(task.clone())
        })
    }

    /// Remove a task for good. Returns the removed record.
    pub fn delete(&self, id: u32) -> TaskResult<Task> {
        self.modify(|collection| {
            let task = collection.remove(id).ok_or(TaskError::TaskNotFound(id))?;
            log::info!("task #{} deleted: '{}'", id, task.name);
            Ok(task)
        })
    }

    /// Tasks matching `filter` (`None` or `all` for every task), in file
    /// order. Ids only ever grow and new tasks are appended, so this is
    /// also ascending id order.
    pub fn list(&self, filter: Option<&str>) -> TaskResult<Vec<Task>> {
        let filter = validate_list_filter(filter)?;
        let collection = load_collection(&self.path)?;

        Ok(collection
            .tasks
            .into_iter()
            .filter(|t| filter.matches(t.status))
            .collect())
    }

    /// Read one task without changing anything
    pub fn get(&self, id: u32) -> TaskResult<Task> {
        let collection = load_collection(&self.path)?;
        collection
            .get(id)
            .cloned()
            .ok_or(TaskError::TaskNotFound(id))
    }

    /// Load, apply `change`, and persist only if it succeeded.
    fn modify<T>(&self, change: impl FnOnce(&mut TaskCollection) -> TaskResult<T>) -> TaskResult<T> {
        let mut collection = load_collection(&self.path)?;
        let result = change(&mut collection)?;
        save_collection(&self.path, &collection)?;
        Ok(result)
    }
}
