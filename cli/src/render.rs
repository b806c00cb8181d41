use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tasker_core::Task;

const NO_TASKS: &str = "No tasks found.";

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Priority")]
    priority: String,
}

pub fn table(tasks: &[Task], today: NaiveDate) -> String {
    if tasks.is_empty() {
        return NO_TASKS.to_string();
    }

    let rows = tasks.iter().map(|task| TaskRow {
        id: task.id,
        done: if task.completed { "✓" } else { "✗" },
        title: task.title.clone(),
        due: due_label(task, today),
        priority: task
            .priority
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string()),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

pub fn detailed(tasks: &[Task], today: NaiveDate) -> String {
    if tasks.is_empty() {
        return NO_TASKS.to_string();
    }

    tasks
        .iter()
        .map(|task| {
            let mut lines = vec![
                format!("[{}] {}", task.id, task.title),
                format!(
                    "  Status:   {}",
                    if task.completed { "completed" } else { "pending" }
                ),
                format!(
                    "  Priority: {}",
                    task.priority.map_or("not set", |p| p.as_str())
                ),
                format!("  Due:      {}", due_label(task, today)),
            ];
            if let Some(description) = &task.description {
                lines.push(format!("  Notes:    {}", description));
            }
            lines.push(format!("  Created:  {}", task.created_at.format("%Y-%m-%d %H:%M:%S")));
            if let Some(updated_at) = task.updated_at {
                lines.push(format!("  Updated:  {}", updated_at.format("%Y-%m-%d %H:%M:%S")));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn due_label(task: &Task, today: NaiveDate) -> String {
    match task.due_date {
        Some(due) if task.is_overdue(today) => format!("{} (overdue)", due),
        Some(due) => due.to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tasker_core::{Priority, TaskDraft};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Task> {
        let mut done = Task::new(2, TaskDraft::new("Done thing"), Utc::now()).unwrap();
        done.set_completed(true, Utc::now());
        vec![
            Task::new(
                1,
                TaskDraft::new("Write report")
                    .description("quarterly numbers")
                    .due_date(date(2025, 6, 30))
                    .priority(Priority::High),
                Utc::now(),
            )
            .unwrap(),
            done,
        ]
    }

    #[test]
    fn test_empty_output() {
        assert_eq!(table(&[], date(2025, 6, 1)), NO_TASKS);
        assert_eq!(detailed(&[], date(2025, 6, 1)), NO_TASKS);
    }

    #[test]
    fn test_table_contains_rows() {
        let out = table(&sample(), date(2025, 6, 1));
        assert!(out.contains("Write report"));
        assert!(out.contains("2025-06-30"));
        assert!(out.contains("high"));
        assert!(out.contains('✓'));
        assert!(out.contains('✗'));
    }

    #[test]
    fn test_overdue_marker() {
        let out = table(&sample(), date(2025, 7, 1));
        assert!(out.contains("2025-06-30 (overdue)"));
    }

    #[test]
    fn test_detailed_blocks() {
        let out = detailed(&sample(), date(2025, 6, 1));
        assert!(out.contains("[1] Write report"));
        assert!(out.contains("Notes:    quarterly numbers"));
        assert!(out.contains("Status:   completed"));
        assert!(out.contains("Updated:"));
        assert_eq!(out.matches("Created:").count(), 2);
    }
}
