use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, TaskError};
use crate::model::task::Task;
use crate::repository::traits::TaskStorage;

/// Stores tasks as a pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    file_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("tasks.json"));
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }

    fn write_temp(&self, temp_path: &Path, tasks: &[Task]) -> Result<()> {
        let file = File::create(temp_path).map_err(|e| TaskError::io(temp_path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, tasks)
            .map_err(|e| TaskError::io(temp_path, io::Error::other(e)))?;
        writer
            .write_all(b"\n")
            .map_err(|e| TaskError::io(temp_path, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| TaskError::io(temp_path, e.into_error()))?;
        file.sync_all().map_err(|e| TaskError::io(temp_path, e))?;
        Ok(())
    }
}

impl TaskStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<Task>> {
        let contents = match fs::read_to_string(&self.file_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} does not exist yet, starting empty", self.file_path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(TaskError::io(&self.file_path, e)),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let tasks: Vec<Task> =
            serde_json::from_str(&contents).map_err(|e| TaskError::parse(&self.file_path, e))?;
        check_records(&self.file_path, &tasks)?;

        log::debug!("loaded {} task(s) from {}", tasks.len(), self.file_path.display());
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TaskError::io(parent, e))?;
        }

        // Write beside the target and rename over it so a failed write leaves the old file intact.
        let temp_path = self.temp_path();
        if let Err(err) = self.write_temp(&temp_path, tasks) {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }
        if let Err(e) = fs::rename(&temp_path, &self.file_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(TaskError::io(&self.file_path, e));
        }

        log::debug!("saved {} task(s) to {}", tasks.len(), self.file_path.display());
        Ok(())
    }
}

fn check_records(path: &Path, tasks: &[Task]) -> Result<()> {
    let mut seen = HashSet::new();
    for task in tasks {
        task.validate().map_err(|e| TaskError::parse(path, e))?;
        if !seen.insert(task.id) {
            return Err(TaskError::parse(path, format!("duplicate task id {}", task.id)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Priority, TaskDraft};
    use chrono::{NaiveDate, Utc};
    use tempfile::TempDir;

    fn sample_tasks() -> Vec<Task> {
        let now = Utc::now();
        vec![
            Task::new(1, TaskDraft::new("First"), now).unwrap(),
            Task::new(
                2,
                TaskDraft::new("Second")
                    .description("with notes")
                    .due_date(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
                    .priority(Priority::High),
                now,
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nope.json"));
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_blank_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "\n").unwrap();
        assert!(JsonFileStorage::new(path).load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested/dir/tasks.json"));
        let tasks = sample_tasks();
        storage.save(&tasks).unwrap();

        assert_eq!(storage.load().unwrap(), tasks);
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn test_saved_file_is_json_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        JsonFileStorage::new(&path).save(&sample_tasks()).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let items = raw.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["title"], "Second");
        assert_eq!(items[1]["due_date"], "2030-01-01");
        assert_eq!(items[1]["priority"], "high");
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{not valid json").unwrap();
        let err = JsonFileStorage::new(&path).load().unwrap_err();
        assert!(matches!(err, TaskError::Parse { .. }));
    }

    #[test]
    fn test_invalid_records_are_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");

        fs::write(&path, r#"[{"id": 1, "title": "  "}]"#).unwrap();
        assert!(matches!(
            JsonFileStorage::new(&path).load(),
            Err(TaskError::Parse { .. })
        ));

        fs::write(&path, r#"[{"id": 1, "title": "a"}, {"id": 1, "title": "b"}]"#).unwrap();
        assert!(matches!(
            JsonFileStorage::new(&path).load(),
            Err(TaskError::Parse { .. })
        ));
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        let storage = JsonFileStorage::new(&path);
        storage.save(&sample_tasks()).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        // A directory squatting on the temp path makes the write fail before the rename.
        fs::create_dir(storage.temp_path()).unwrap();
        let err = storage.save(&[]).unwrap_err();
        assert!(matches!(err, TaskError::Io { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }
}
