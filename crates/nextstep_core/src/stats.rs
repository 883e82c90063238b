//! Progress screen statistics derived from tasks and learning modules.

use crate::model::learning::LearningModule;
use crate::model::task::Task;
use serde::Serialize;

const RECENT_TASK_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub completed_modules: usize,
    pub total_modules: usize,
    /// Mean module progress, `0.0` without modules.
    pub learning_progress: f32,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    /// `completed_tasks / total_tasks`, `0.0` without tasks.
    pub task_progress: f32,
    /// Started modules, most progressed first.
    pub recent_modules: Vec<LearningModule>,
    /// Last completed tasks in list order.
    pub recent_tasks: Vec<Task>,
}

impl ProgressSummary {
    pub fn compute(modules: &[LearningModule], tasks: &[Task]) -> Self {
        let completed_modules = modules.iter().filter(|module| module.is_finished()).count();
        let learning_progress = if modules.is_empty() {
            0.0
        } else {
            let total: f64 = modules.iter().map(|module| f64::from(module.progress)).sum();
            (total / modules.len() as f64) as f32
        };

        let completed: Vec<&Task> = tasks.iter().filter(|task| task.is_completed).collect();
        let task_progress = if tasks.is_empty() {
            0.0
        } else {
            completed.len() as f32 / tasks.len() as f32
        };

        let mut recent_modules: Vec<LearningModule> = modules
            .iter()
            .filter(|module| module.is_started())
            .cloned()
            .collect();
        recent_modules.sort_by(|a, b| b.progress.total_cmp(&a.progress));

        let skip = completed.len().saturating_sub(RECENT_TASK_LIMIT);
        let recent_tasks = completed.iter().skip(skip).map(|task| (*task).clone()).collect();

        Self {
            completed_modules,
            total_modules: modules.len(),
            learning_progress,
            completed_tasks: completed.len(),
            total_tasks: tasks.len(),
            task_progress,
            recent_modules,
            recent_tasks,
        }
    }
}

/// Home card subtitle: `"1 task pending"` or `"N tasks pending"`.
pub fn pending_label(count: usize) -> String {
    if count == 1 {
        "1 task pending".to_string()
    } else {
        format!("{count} tasks pending")
    }
}
