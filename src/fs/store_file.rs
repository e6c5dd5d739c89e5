use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{TaskError, TaskResult};
use crate::models::{Task, TaskCollection, TaskStatus};

/// Record layout written by the first tracker version: a bare JSON array
/// of `{id, name, status}` without timestamps.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LegacyTask {
    id: u32,
    name: String,
    #[serde(default)]
    status: TaskStatus,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// Load the task collection from the store file.
///
/// A missing or blank file is a first run and yields an empty collection.
/// A file that exists but cannot be read or parsed is reported as corrupt,
/// never dropped.
pub fn load_collection(path: &Path) -> TaskResult<TaskCollection> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("store file {} not found, starting empty", path.display());
            return Ok(TaskCollection::default());
        }
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            return Err(TaskError::corrupt(path, "file is not valid UTF-8"));
        }
        Err(e) => {
            return Err(TaskError::corrupt(path, format!("cannot read file: {}", e)));
        }
    };

    // Legacy records carry no timestamps; the file's mtime keeps them
    // stable from one load to the next until the upgrade is saved
    let legacy_time = fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    let collection = parse_collection(path, &content, legacy_time)?;
    log::debug!(
        "loaded {} task(s) from {}",
        collection.tasks.len(),
        path.display()
    );
    Ok(collection)
}

fn parse_collection(
    path: &Path,
    content: &str,
    legacy_time: DateTime<Utc>,
) -> TaskResult<TaskCollection> {
    if content.trim().is_empty() {
        return Ok(TaskCollection::default());
    }

    let document: Value =
        serde_json::from_str(content).map_err(|e| TaskError::corrupt(path, e))?;

    let mut collection = if document.is_object() {
        serde_json::from_value::<TaskCollection>(document)
            .map_err(|e| TaskError::corrupt(path, e))?
    } else if document.is_array() {
        let records: Vec<LegacyTask> =
            serde_json::from_value(document).map_err(|e| TaskError::corrupt(path, e))?;
        log::warn!(
            "store file {} uses the legacy list format, it will be upgraded on next save",
            path.display()
        );
        upgrade_legacy(records, legacy_time)
    } else {
        return Err(TaskError::corrupt(
            path,
            "expected a JSON object with `next_id` and `tasks`",
        ));
    };

    check_integrity(path, &collection)?;

    // A hand-edited file may lag behind its own tasks
    let floor = collection
        .max_id()
        .checked_add(1)
        .ok_or_else(|| TaskError::corrupt(path, "task id space exhausted"))?;
    if collection.next_id < floor {
        collection.next_id = floor;
    }

    Ok(collection)
}

fn upgrade_legacy(records: Vec<LegacyTask>, legacy_time: DateTime<Utc>) -> TaskCollection {
    let tasks = records
        .into_iter()
        .map(|record| {
            let created_at = record.created_at.unwrap_or(legacy_time);
            Task {
                id: record.id,
                name: record.name,
                status: record.status,
                created_at,
                updated_at: record.updated_at.unwrap_or(created_at),
            }
        })
        .collect();

    TaskCollection { next_id: 1, tasks }
}

fn check_integrity(path: &Path, collection: &TaskCollection) -> TaskResult<()> {
    let mut seen = HashSet::new();

    for task in &collection.tasks {
        if task.id == 0 {
            return Err(TaskError::corrupt(path, "task id 0 is not allowed"));
        }
        if !seen.insert(task.id) {
            return Err(TaskError::corrupt(
                path,
                format!("duplicate task id {}", task.id),
            ));
        }
    }

    Ok(())
}

/// Write the whole collection, replacing the store file atomically.
///
/// The data goes to a sibling temp file first and is renamed over the
/// target, so a failed save leaves the previous file untouched.
pub fn save_collection(path: &Path, collection: &TaskCollection) -> TaskResult<()> {
    let data = serde_json::to_string_pretty(collection)
        .map_err(|e| TaskError::persistence(path, io::Error::new(io::ErrorKind::InvalidData, e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TaskError::persistence(path, e))?;
    }

    let tmp_path = temp_path_for(path);
    if let Err(e) = write_synced(&tmp_path, data.as_bytes()) {
        let _ = fs::remove_file(&tmp_path);
        return Err(TaskError::persistence(path, e));
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(TaskError::persistence(path, e));
    }

    log::debug!(
        "saved {} task(s) to {}",
        collection.tasks.len(),
        path.display()
    );
    Ok(())
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(data)?;
    file.write_all(b"\n")?;
    file.sync_all()
}

/// `tasks.json` -> `tasks.json.tmp`, in the same directory so the final
/// rename never crosses filesystems.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "tasks".into());
    name.push(".tmp");
    path.with_file_name(name)
}
