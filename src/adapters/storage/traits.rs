//! Object store adapter trait

use crate::domain::result::Result;
use async_trait::async_trait;

/// Abstraction over the blob store holding markers and partition files
///
/// Keys are `/`-separated paths relative to the configured bucket. The
/// trait is deliberately narrow: the pipeline only ever gets, puts, and
/// lists whole objects.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's full contents
    ///
    /// Returns `Ok(None)` when the key does not exist. Absence is a normal
    /// state the watermark layer gives meaning to, not an error.
    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write an object, replacing any existing one at the same key
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()>;

    /// List all keys under a prefix, in lexicographic order
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;
}
