//! In-memory object store
//!
//! Backs tests and dry-run inspection. Keys are held in a `BTreeMap` so
//! listings come back in the same lexicographic order S3 uses.

use crate::adapters::storage::traits::ObjectStore;
use crate::domain::errors::StorageError;
use crate::domain::result::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

/// Object store held entirely in process memory
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    fail_keys: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write to `key` fail, for exercising failure paths
    pub fn fail_writes_to(&self, key: &str) {
        self.fail_keys.lock().unwrap().insert(key.to_string());
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.objects.lock().unwrap().get(key).cloned())
    }

    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        if self.fail_keys.lock().unwrap().contains(key) {
            return Err(StorageError::WriteFailed {
                key: key.to_string(),
                message: "injected write failure".to_string(),
            }
            .into());
        }
        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
