use std::collections::HashMap;
use std::sync::Mutex;

use crate::{ResumeSummary, Stage, TaskId};

/// Store key holding the JSON-encoded resume summary.
pub const RESUME_SUMMARY_KEY: &str = "resumeSummary";
/// Store key holding the raw task identifier string.
pub const TASK_ID_KEY: &str = "taskId";

/// Tab-scoped text key/value store. Injectable so the workflow never
/// touches ambient global state; tests substitute [`MemorySessionStore`].
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn clear(&self);
}

/// In-memory store for the process lifetime. Matches the durability the
/// workflow assumes: survives stage transitions, gone when the tab ends.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_owned(), value.to_owned());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }

    fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

/// Writes a freshly parsed summary. Also drops any stored task id: a new
/// upload invalidates the previous search, enforced here at write time
/// rather than by stage-navigation order.
pub fn store_resume_summary(store: &dyn SessionStore, summary: &ResumeSummary) {
    if let Ok(text) = serde_json::to_string(summary) {
        store.set(RESUME_SUMMARY_KEY, &text);
    }
    store.remove(TASK_ID_KEY);
}

/// Reads the stored summary. Malformed content reads as absent.
pub fn load_resume_summary(store: &dyn SessionStore) -> Option<ResumeSummary> {
    let text = store.get(RESUME_SUMMARY_KEY)?;
    serde_json::from_str(&text).ok()
}

pub fn store_task_id(store: &dyn SessionStore, task_id: &TaskId) {
    store.set(TASK_ID_KEY, task_id.as_str());
}

pub fn load_task_id(store: &dyn SessionStore) -> Option<TaskId> {
    let text = store.get(TASK_ID_KEY)?;
    if text.is_empty() {
        return None;
    }
    Some(TaskId(text))
}

/// Missing prerequisite state. Not an error the user sees: the caller
/// silently navigates to `target` instead of entering the guarded stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardRedirect {
    pub target: Stage,
}

/// The preferences stage needs a parsed resume.
pub fn require_resume(store: &dyn SessionStore) -> Result<ResumeSummary, GuardRedirect> {
    load_resume_summary(store).ok_or(GuardRedirect {
        target: Stage::Upload,
    })
}

/// The results stage needs a submitted task. With a resume but no task the
/// user restarts from preferences; with neither, from the upload stage.
pub fn require_task(store: &dyn SessionStore) -> Result<TaskId, GuardRedirect> {
    load_task_id(store).ok_or_else(|| {
        let target = if load_resume_summary(store).is_some() {
            Stage::Preferences
        } else {
            Stage::Upload
        };
        GuardRedirect { target }
    })
}
