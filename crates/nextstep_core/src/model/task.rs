//! Task record and its display ordering.
//!
//! # Responsibility
//! - Define the persisted `Task` shape and its enums.
//! - Provide the list ordering used by task views.
//!
//! # Invariants
//! - `end_date` defaults to `start_date + 24h`.
//! - Store mutations keep `is_completed` and `in_progress` mutually exclusive;
//!   the record itself does not.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

/// One day in epoch milliseconds.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskCategory {
    Personal,
    Work,
    Health,
    Learning,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 4] = [Self::Personal, Self::Work, Self::Health, Self::Learning];

    /// Material icon name shown next to the task.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Personal => "person",
            Self::Work => "work",
            Self::Health => "favorite",
            Self::Learning => "school",
        }
    }

    /// Accent color as `0xAARRGGBB`.
    pub fn color_argb(self) -> u32 {
        match self {
            Self::Personal => 0xFF9C_27B0,
            Self::Work => 0xFF21_96F3,
            Self::Health => 0xFF4C_AF50,
            Self::Learning => 0xFFFF_A000,
        }
    }
}

/// Lifecycle view derived from the two task flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub in_progress: bool,
    /// Epoch milliseconds.
    pub start_date: i64,
    /// Epoch milliseconds.
    pub end_date: i64,
    pub category: TaskCategory,
    pub priority: TaskPriority,
}

impl Task {
    /// Open task starting now, ending in 24h, `PERSONAL` / `MEDIUM`.
    pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        let start = now_epoch_ms();
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            is_completed: false,
            in_progress: false,
            start_date: start,
            end_date: start + DAY_MS,
            category: TaskCategory::Personal,
            priority: TaskPriority::Medium,
        }
    }

    pub fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_window(mut self, start_date: i64, end_date: i64) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    pub fn state(&self) -> TaskState {
        if self.is_completed {
            TaskState::Completed
        } else if self.in_progress {
            TaskState::InProgress
        } else {
            TaskState::Pending
        }
    }
}

/// Open tasks first, then higher priority, then earlier start.
pub fn display_order(a: &Task, b: &Task) -> Ordering {
    (a.is_completed, a.priority, a.start_date).cmp(&(b.is_completed, b.priority, b.start_date))
}

/// Stable sort by [`display_order`].
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by(display_order);
}

pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{sort_for_display, Task, TaskPriority, TaskState, DAY_MS};

    #[test]
    fn new_task_defaults_to_one_day_window() {
        let task = Task::new("t", "title", "desc");
        assert_eq!(task.end_date - task.start_date, DAY_MS);
        assert_eq!(task.state(), TaskState::Pending);
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        let mut tasks = vec![
            Task::new("x", "", "").with_window(5, 6),
            Task::new("y", "", "").with_window(5, 6),
            Task::new("z", "", "").with_priority(TaskPriority::High).with_window(9, 10),
        ];
        sort_for_display(&mut tasks);
        let ids: Vec<_> = tasks.iter().map(|task| task.id.as_str()).collect();
        assert_eq!(ids, ["z", "x", "y"]);
    }
}
