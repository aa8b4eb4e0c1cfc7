//! Task and flag storage shared with the warehouse management side.

use std::collections::HashMap;

use serde_json::Value;

/// Minimal get/set interface of the task store.
pub trait TaskStore {
    fn set_flag(&mut self, key: &str, value: bool);
    fn get_flag(&self, key: &str) -> Option<bool>;
    fn put_object(&mut self, kind: &str, id: &str, value: Value);
    fn get_object(&self, kind: &str, id: &str) -> Option<Value>;
}

/// In-process [`TaskStore`], used when no database is attached.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    flags: HashMap<String, bool>,
    objects: HashMap<(String, String), Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryStore {
    fn set_flag(&mut self, key: &str, value: bool) {
        self.flags.insert(key.to_string(), value);
    }

    fn get_flag(&self, key: &str) -> Option<bool> {
        self.flags.get(key).copied()
    }

    fn put_object(&mut self, kind: &str, id: &str, value: Value) {
        self.objects.insert((kind.to_string(), id.to_string()), value);
    }

    fn get_object(&self, kind: &str, id: &str) -> Option<Value> {
        self.objects
            .get(&(kind.to_string(), id.to_string()))
            .cloned()
    }
}
