use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::config::{self, Config};
use crate::models::Task;
use crate::store::TaskStore;

#[derive(Debug, Parser)]
#[command(name = "task-tracker", version, about = "Track tasks in a local JSON file")]
pub struct Cli {
    /// Store file to use instead of the configured one
    #[arg(long, short = 'f', global = true, env = "TASK_TRACKER_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Log level for this run (trace|debug|info|warn|error|off)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new task
    Add {
        /// Task name; multiple words are joined with spaces
        #[arg(required = true, num_args = 1.., value_name = "NAME")]
        name: Vec<String>,
    },
    /// Rename a task
    Update {
        id: u32,
        #[arg(required = true, num_args = 1.., value_name = "NAME")]
        name: Vec<String>,
    },
    /// Change a task's status (todo, in-progress, done)
    Mark { id: u32, status: String },
    /// Delete a task
    Delete { id: u32 },
    /// List tasks, optionally only those with one status
    List {
        /// todo, in-progress, done or all
        status: Option<String>,
    },
    /// Show one task in full
    Show { id: u32 },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommand>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Set the default store file
    Store { path: PathBuf },
}

/// Run one command against the store selected by flags and config
pub fn run(cli: Cli, config: &Config, out: &mut dyn Write) -> Result<()> {
    let store_file = cli.file.unwrap_or_else(|| config.store_file.clone());
    let store = TaskStore::new(store_file);

    match cli.command {
        Command::Add { name } => {
            let task = store.add(&name.join(" "))?;
            writeln!(out, "Added task #{}: {}", task.id, task.name)?;
        }
        Command::Update { id, name } => {
            let task = store.update(id, &name.join(" "))?;
            writeln!(out, "Updated task #{}: {}", task.id, task.name)?;
        }
        Command::Mark { id, status } => {
            let task = store.mark(id, &status)?;
            writeln!(out, "Marked task #{} as {}", task.id, task.status)?;
        }
        Command::Delete { id } => {
            let task = store.delete(id)?;
            writeln!(out, "Deleted task #{}: {}", task.id, task.name)?;
        }
        Command::List { status } => {
            let tasks = store.list(status.as_deref())?;
            print_task_table(out, &tasks)?;
        }
        Command::Show { id } => {
            let task = store.get(id)?;
            print_task_details(out, &task)?;
        }
        Command::Config { action } => match action {
            None | Some(ConfigCommand::Show) => config::show_config(config, store.path()),
            Some(ConfigCommand::Store { path }) => config::set_store_file(path)?,
        },
    }

    Ok(())
}

fn print_task_table(out: &mut dyn Write, tasks: &[Task]) -> Result<()> {
    if tasks.is_empty() {
        writeln!(out, "No tasks found.")?;
        return Ok(());
    }

    writeln!(out, "ID    STATUS       UPDATED           NAME")?;
    writeln!(out, "----  -----------  ----------------  ------------------------------")?;

    for task in tasks {
        writeln!(
            out,
            "{:<4}  {:<11}  {:<16}  {}",
            task.id,
            task.status.as_str(),
            local_time(&task.updated_at),
            task.name
        )?;
    }

    Ok(())
}

fn print_task_details(out: &mut dyn Write, task: &Task) -> Result<()> {
    writeln!(out, "Task #{}", task.id)?;
    writeln!(out, "Name: {}", task.name)?;
    writeln!(out, "Status: {}", task.status)?;
    writeln!(out, "Created: {}", task.created_at.to_rfc3339())?;
    writeln!(out, "Updated: {}", task.updated_at.to_rfc3339())?;
    Ok(())
}

fn local_time(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use clap::CommandFactory;
    use tempfile::tempdir;

    fn run_args(args: &[&str], config: &Config) -> (Result<()>, String) {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        let mut out = Vec::new();
        let result = run(cli, config, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn test_config(dir: &std::path::Path) -> Config {
        Config {
            store_file: dir.join("tasks.json"),
            ..Config::default()
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_joins_words() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());

        let (result, out) = run_args(&["task-tracker", "add", "Buy", "milk"], &config);
        result.unwrap();
        assert_eq!(out, "Added task #1: Buy milk\n");
    }

    #[test]
    fn test_update_mark_delete_output() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        run_args(&["task-tracker", "add", "Draft"], &config).0.unwrap();

        let (_, out) = run_args(&["task-tracker", "update", "1", "Final", "copy"], &config);
        assert_eq!(out, "Updated task #1: Final copy\n");

        let (_, out) = run_args(&["task-tracker", "mark", "1", "in-progress"], &config);
        assert_eq!(out, "Marked task #1 as in-progress\n");

        let (_, out) = run_args(&["task-tracker", "delete", "1"], &config);
        assert_eq!(out, "Deleted task #1: Final copy\n");
    }

    #[test]
    fn test_list_output() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());

        let (_, out) = run_args(&["task-tracker", "list"], &config);
        assert_eq!(out, "No tasks found.\n");

        run_args(&["task-tracker", "add", "A"], &config).0.unwrap();
        run_args(&["task-tracker", "add", "B"], &config).0.unwrap();
        run_args(&["task-tracker", "mark", "2", "done"], &config).0.unwrap();

        let (_, out) = run_args(&["task-tracker", "list", "done"], &config);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[2].starts_with("2     done"));
        assert!(lines[2].ends_with("  B"));
    }

    #[test]
    fn test_show_output() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        run_args(&["task-tracker", "add", "Inspect", "me"], &config).0.unwrap();

        let (result, out) = run_args(&["task-tracker", "show", "1"], &config);
        result.unwrap();
        assert!(out.starts_with("Task #1\nName: Inspect me\nStatus: todo\n"));
        assert!(out.contains("Created: "));
    }

    #[test]
    fn test_file_flag_overrides_config() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        let other = dir.path().join("other.json");
        let other_arg = other.to_string_lossy().to_string();

        run_args(&["task-tracker", "--file", other_arg.as_str(), "add", "Elsewhere"], &config)
            .0
            .unwrap();
        assert!(other.exists());
        assert!(!config.store_file.exists());
    }

    #[test]
    fn test_errors_are_typed() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());

        let (result, out) = run_args(&["task-tracker", "mark", "5", "done"], &config);
        let err = result.unwrap_err();
        assert!(matches!(err.downcast_ref::<TaskError>(), Some(TaskError::TaskNotFound(5))));
        assert!(out.is_empty());

        let (result, _) = run_args(&["task-tracker", "add", "a/b"], &config);
        assert!(matches!(
            result.unwrap_err().downcast_ref::<TaskError>(),
            Some(TaskError::InvalidName(_))
        ));

        let (result, _) = run_args(&["task-tracker", "list", "Done"], &config);
        assert!(matches!(
            result.unwrap_err().downcast_ref::<TaskError>(),
            Some(TaskError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_argument_shape_errors() {
        assert!(Cli::try_parse_from(["task-tracker", "add"]).is_err());
        assert!(Cli::try_parse_from(["task-tracker", "update", "1"]).is_err());
        assert!(Cli::try_parse_from(["task-tracker", "delete", "abc"]).is_err());
        assert!(Cli::try_parse_from(["task-tracker", "mark", "1"]).is_err());
    }
}
