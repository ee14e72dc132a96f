use crate::errors::{MonguitoError, MonguitoResult};
use crate::monguito::Monguito;
use crate::monguito_config::MonguitoConfig;
use crate::store::KeyValueStore;

/// Fluent builder for a [Monguito] store.
///
/// Each step validates its input immediately; the first failure is kept and
/// returned from [MonguitoBuilder::open], and later steps are skipped.
///
/// # Examples
///
/// ```rust,ignore
/// let db = Monguito::builder()
///     .storage(my_storage)
///     .collections(&["orders", "users"])
///     .open()?;
/// ```
#[derive(Default)]
pub struct MonguitoBuilder {
    error: Option<MonguitoError>,
    config: MonguitoConfig,
}

impl MonguitoBuilder {
    pub fn new() -> Self {
        MonguitoBuilder {
            error: None,
            config: MonguitoConfig::new(),
        }
    }

    /// Persists into `storage` instead of in-memory storage.
    pub fn storage(mut self, storage: KeyValueStore) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_storage(storage) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn collection(mut self, name: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.add_collection(name) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn collections<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        for name in names {
            if self.error.is_some() {
                break;
            }
            self = self.collection(name.as_ref());
        }
        self
    }

    /// Validates the configuration and opens the store.
    pub fn open(self) -> MonguitoResult<Monguito> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Monguito::open(self.config)
    }
}
