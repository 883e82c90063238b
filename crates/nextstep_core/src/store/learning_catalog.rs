//! In-memory learning module catalog.
//!
//! # Responsibility
//! - Seed the built-in module set at construction.
//! - Track the selected category filter and per-module progress.
//!
//! # Invariants
//! - Nothing here is persisted; a new catalog starts from the sample set.
//! - The category filter is evaluated on every read, never cached.
//! - Progress values are stored as given, without range checks.

use crate::model::learning::{LearningCategory, LearningModule};
use crate::observable::{Observable, SubscriptionId};
use log::debug;
use uuid::Uuid;

pub struct LearningCatalog {
    categories: Vec<LearningCategory>,
    modules: Observable<Vec<LearningModule>>,
    selected_category: Observable<Option<LearningCategory>>,
    is_loading: Observable<bool>,
    error: Observable<Option<String>>,
}

impl LearningCatalog {
    /// Catalog seeded with [`sample_modules`].
    pub fn new() -> Self {
        let mut catalog = Self::with_modules(Vec::new());
        catalog.load_sample_data();
        catalog
    }

    /// Catalog over caller-provided modules.
    pub fn with_modules(modules: Vec<LearningModule>) -> Self {
        Self {
            categories: LearningCategory::fixed(),
            modules: Observable::new(modules),
            selected_category: Observable::new(None),
            is_loading: Observable::new(false),
            error: Observable::new(None),
        }
    }

    fn load_sample_data(&mut self) {
        self.is_loading.set(true);
        self.error.set(None);
        let modules = sample_modules();
        debug!(
            "event=learning_load module=learning_catalog status=ok module_count={}",
            modules.len()
        );
        self.modules.set(modules);
        self.is_loading.set(false);
    }

    pub fn categories(&self) -> &[LearningCategory] {
        &self.categories
    }

    pub fn category_by_id(&self, id: &str) -> Option<&LearningCategory> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Category a module points at, or `None` for an out-of-range index.
    pub fn category_for(&self, module: &LearningModule) -> Option<&LearningCategory> {
        usize::try_from(module.category_index)
            .ok()
            .and_then(|index| self.categories.get(index))
    }

    pub fn modules(&self) -> &[LearningModule] {
        self.modules.get()
    }

    pub fn selected_category(&self) -> Option<&LearningCategory> {
        self.selected_category.get().as_ref()
    }

    pub fn is_loading(&self) -> bool {
        *self.is_loading.get()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.get().as_deref()
    }

    /// `None` shows every module.
    pub fn set_selected_category(&mut self, category: Option<LearningCategory>) {
        self.selected_category.set(category);
    }

    /// Modules whose `category_index` equals the selected category's position
    /// in the fixed list. A selection missing from the list matches nothing.
    pub fn filtered_modules(&self) -> Vec<LearningModule> {
        let Some(selected) = self.selected_category.get() else {
            return self.modules.snapshot();
        };
        let position = self
            .categories
            .iter()
            .position(|category| category == selected)
            .and_then(|index| i32::try_from(index).ok());

        self.modules
            .get()
            .iter()
            .filter(|module| Some(module.category_index) == position)
            .cloned()
            .collect()
    }

    /// Sets progress on the module with `id`. Returns `false` if none matched.
    pub fn update_progress(&mut self, id: &str, progress: f32) -> bool {
        if !self.modules.get().iter().any(|module| module.id == id) {
            return false;
        }
        let next = self
            .modules
            .get()
            .iter()
            .map(|module| {
                if module.id == id {
                    LearningModule {
                        progress,
                        ..module.clone()
                    }
                } else {
                    module.clone()
                }
            })
            .collect();
        self.modules.set(next);
        true
    }

    pub fn subscribe_modules(
        &mut self,
        callback: impl Fn(&Vec<LearningModule>) + Send + 'static,
    ) -> SubscriptionId {
        self.modules.subscribe(callback)
    }

    pub fn subscribe_selected_category(
        &mut self,
        callback: impl Fn(&Option<LearningCategory>) + Send + 'static,
    ) -> SubscriptionId {
        self.selected_category.subscribe(callback)
    }

    pub fn unsubscribe_modules(&mut self, id: SubscriptionId) -> bool {
        self.modules.unsubscribe(id)
    }
}

impl Default for LearningCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn sample(title: &str, description: &str, duration: &str, progress: f32) -> LearningModule {
    LearningModule {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        description: description.to_string(),
        duration: duration.to_string(),
        category_index: 0,
        progress,
        is_featured: false,
        external_url: None,
        image_url: Some(String::new()),
        price: Some(0),
    }
}

/// Built-in "Jobs & Career" modules. Ids are fresh on every call.
pub fn sample_modules() -> Vec<LearningModule> {
    vec![
        sample(
            "For Jacob: Working at UVM Hospital",
            "Practice tasks like ordering IV fluids, bandages, and other hospital supplies.",
            "30 min",
            0.55,
        ),
        sample(
            "Finding Out What I Like",
            "Learn about different jobs like working with animals, fixing things, helping in hospitals, and more.",
            "10 min",
            1.0,
        ),
        sample(
            "Looking for a Job",
            "Find out how to search for jobs using websites, newspapers, job fairs, and by asking people you know.",
            "10 min",
            0.15,
        ),
        sample(
            "Getting Ready to Apply",
            "Practice writing a resume, filling out job forms, and learning what to say when people ask for references.",
            "15 min",
            0.2,
        ),
        sample(
            "Doing a Job Interview",
            "Get tips for how to act before, during, and after an interview. Practice answering questions using the S.T.A.R. method.",
            "15 min",
            0.4,
        ),
        sample(
            "Doing Well at Work",
            "Learn how to talk to coworkers, be part of a team, help customers, and stay calm when things get hard.",
            "20 min",
            0.45,
        ),
        sample(
            "Other Job Stuff You Should Know",
            "Learn about your rights at work, how to quit a job the right way, how to get to work, and what to do if someone treats you unfairly.",
            "20 min",
            0.65,
        ),
    ]
}
