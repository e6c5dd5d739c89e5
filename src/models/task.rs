use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::status::TaskStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Task {
    pub id: u32,
    pub name: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// New `todo` task with both timestamps set to now
    pub fn new(id: u32, name: String) -> Self {
        let now = Utc::now();

        Self {
            id,
            name,
            status: TaskStatus::Todo,
            created_at: now,
            updated_at: now,
        }
    }

    /// Change the name and refresh `updated_at`
    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.touch();
    }

    /// Change the status and refresh `updated_at`, even if it is unchanged
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.touch();
    }

    /// Refresh `updated_at`. The new value is always strictly later than the
    /// old one, even if the clock has not moved since the last write.
    fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::nanoseconds(1)
        };
    }
}

/// All tasks of one store file, in file order.
///
/// `next_id` is a high-water mark: it only ever grows, so deleting the
/// newest task never frees its id for reuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskCollection {
    pub next_id: u32,
    pub tasks: Vec<Task>,
}

impl Default for TaskCollection {
    fn default() -> Self {
        Self {
            next_id: 1,
            tasks: Vec::new(),
        }
    }
}

impl TaskCollection {
    /// Highest id in use, 0 when empty
    pub fn max_id(&self) -> u32 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0)
    }

    /// Hand out the next id and advance the high-water mark.
    ///
    /// Returns `None` once the id space is used up; `u32::MAX` itself is
    /// never handed out since no next id could follow it.
    pub fn allocate_id(&mut self) -> Option<u32> {
        let id = self.next_id.max(self.max_id().checked_add(1)?);
        self.next_id = id.checked_add(1)?;
        Some(id)
    }

    /// Look up a task by id
    pub fn get(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Look up a task by id for mutation
    pub fn get_mut(&mut self, id: u32) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Remove a task, keeping the order of the rest
    pub fn remove(&mut self, id: u32) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }
}
