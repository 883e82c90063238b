//! Task list store.
//!
//! # Responsibility
//! - Load the persisted task list, healing unreadable data with defaults.
//! - Apply add/update/status/delete operations as whole-list writes.
//!
//! # Invariants
//! - The whole list is persisted as one JSON blob under `tasks`.
//! - A blob that fails to decode is replaced by the default list, silently.
//! - Status operations keep `is_completed` and `in_progress` exclusive.

use crate::model::task::{sort_for_display, Task, TaskCategory, TaskState};
use crate::observable::{Observable, SubscriptionId};
use crate::repo::prefs_repo::{KeyValueStore, PrefsError};
use crate::store::{StoreError, StoreResult};
use log::{debug, info, warn};

pub const TASKS_NAMESPACE: &str = "tasks_prefs";
pub const TASKS_KEY: &str = "tasks";

/// Observable, persisted task list.
pub struct TaskStore<S: KeyValueStore> {
    prefs: S,
    tasks: Observable<Vec<Task>>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Loads tasks from `prefs`, falling back to [`default_tasks`].
    ///
    /// # Errors
    /// - Storage or crypto failure while reading or writing the blob.
    ///   Decode failures are not errors.
    pub fn open(prefs: S) -> StoreResult<Self> {
        let tasks = match load_persisted(&prefs)? {
            Some(tasks) => tasks,
            None => {
                let defaults = default_tasks();
                write_blob(&prefs, &defaults)?;
                defaults
            }
        };

        Ok(Self {
            prefs,
            tasks: Observable::new(tasks),
        })
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        self.tasks.get()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get().iter().find(|task| task.id == id)
    }

    /// Tasks ordered for display: open first, then priority, then start.
    pub fn sorted_for_display(&self) -> Vec<Task> {
        let mut tasks = self.tasks.snapshot();
        sort_for_display(&mut tasks);
        tasks
    }

    pub fn pending_count(&self) -> usize {
        self.tasks
            .get()
            .iter()
            .filter(|task| !task.is_completed)
            .count()
    }

    pub fn subscribe(&mut self, callback: impl Fn(&Vec<Task>) + Send + 'static) -> SubscriptionId {
        self.tasks.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.tasks.unsubscribe(id)
    }

    pub fn add(&mut self, task: Task) -> StoreResult<()> {
        let mut next = self.tasks.snapshot();
        next.push(task);
        self.persist(next, "task_add")
    }

    /// Replaces the task with the same id. Returns `false` if none matched.
    pub fn update(&mut self, task: Task) -> StoreResult<bool> {
        let id = task.id.clone();
        self.modify(&id, "task_update", move |slot| *slot = task)
    }

    pub fn complete(&mut self, id: &str) -> StoreResult<bool> {
        self.modify(id, "task_complete", |task| {
            task.is_completed = true;
            task.in_progress = false;
        })
    }

    pub fn start(&mut self, id: &str) -> StoreResult<bool> {
        self.modify(id, "task_start", |task| {
            task.in_progress = true;
            task.is_completed = false;
        })
    }

    pub fn reset(&mut self, id: &str) -> StoreResult<bool> {
        self.modify(id, "task_reset", |task| {
            task.in_progress = false;
            task.is_completed = false;
        })
    }

    /// Tap cycle: pending -> in progress -> completed -> pending.
    pub fn advance(&mut self, id: &str) -> StoreResult<bool> {
        match self.get(id).map(Task::state) {
            Some(TaskState::Completed) => self.reset(id),
            Some(TaskState::InProgress) => self.complete(id),
            Some(TaskState::Pending) => self.start(id),
            None => Ok(false),
        }
    }

    /// Removes every task with `id`. The list is rewritten even if none matched.
    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        let mut next = self.tasks.snapshot();
        next.retain(|task| task.id != id);
        self.persist(next, "task_delete")
    }

    fn modify(
        &mut self,
        id: &str,
        event: &'static str,
        apply: impl FnOnce(&mut Task),
    ) -> StoreResult<bool> {
        let Some(index) = self.tasks.get().iter().position(|task| task.id == id) else {
            debug!("event={event} module=task_store status=skipped reason=not_found");
            return Ok(false);
        };
        let mut next = self.tasks.snapshot();
        apply(&mut next[index]);
        self.persist(next, event)?;
        Ok(true)
    }

    fn persist(&mut self, next: Vec<Task>, event: &'static str) -> StoreResult<()> {
        write_blob(&self.prefs, &next)?;
        debug!(
            "event={event} module=task_store status=ok task_count={}",
            next.len()
        );
        self.tasks.set(next);
        Ok(())
    }
}

/// Seed list written when nothing readable is stored.
pub fn default_tasks() -> Vec<Task> {
    vec![
        Task::new(
            "1",
            "Complete Daily Exercise",
            "30 minutes of physical activity",
        )
        .with_category(TaskCategory::Health),
        Task::new(
            "2",
            "Study Programming",
            "Work on coding projects for 1 hour",
        )
        .with_category(TaskCategory::Learning),
        Task::new(
            "3",
            "Plan Tomorrow",
            "Review and plan tasks for tomorrow",
        )
        .with_category(TaskCategory::Personal),
    ]
}

/// `Ok(None)` means "use defaults": absent, wrongly typed, or undecodable.
fn load_persisted<S: KeyValueStore>(prefs: &S) -> StoreResult<Option<Vec<Task>>> {
    let raw = match prefs.get_string(TASKS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("event=task_load module=task_store status=seeded reason=absent");
            return Ok(None);
        }
        Err(PrefsError::TypeMismatch { .. }) | Err(PrefsError::Encoding(_)) => {
            warn!("event=task_load module=task_store status=seeded reason=unreadable_slot");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    match serde_json::from_str::<Vec<Task>>(&raw) {
        Ok(tasks) => {
            info!(
                "event=task_load module=task_store status=ok task_count={}",
                tasks.len()
            );
            Ok(Some(tasks))
        }
        Err(err) => {
            warn!(
                "event=task_load module=task_store status=seeded reason=decode_failed line={} column={}",
                err.line(),
                err.column()
            );
            Ok(None)
        }
    }
}

fn write_blob<S: KeyValueStore>(prefs: &S, tasks: &[Task]) -> StoreResult<()> {
    let json = serde_json::to_string(tasks).map_err(|err| StoreError::Serialize(err.to_string()))?;
    prefs.put_string(TASKS_KEY, &json)?;
    Ok(())
}
