//! Content store: the persisted Site Document.
//!
//! Reads the document from a key-value store with a shallow merge over the
//! built-in defaults, writes it back wholesale, and notifies subscribers
//! after each save.

use serde_json::{Map, Value};

use crate::domain::{AppError, Result, SiteDocument};
use crate::infrastructure::KeyValueStore;

/// Storage key holding the serialized document.
pub const CONTENT_KEY: &str = "tco-content";

/// Sections merged field-by-field with their defaults.
const MERGED_SECTIONS: [&str; 2] = ["hero", "about"];

/// Lists that replace the default only when non-empty.
const REPLACED_LISTS: [&str; 2] = ["services", "testimonials"];

/// Handle returned by [`ContentStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&SiteDocument)>;

/// Injectable store for the Site Document.
pub struct ContentStore<S: KeyValueStore> {
    kv: S,
    current: SiteDocument,
    revision: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl<S: KeyValueStore> ContentStore<S> {
    /// Loads the document and immediately persists the effective value,
    /// so a first run or a corrupted entry is replaced by the defaults.
    ///
    /// # Errors
    /// Returns error if the effective document cannot be written back.
    pub fn open(kv: S) -> Result<Self> {
        let current = load_document(&kv);
        write_document(&kv, &current)?;

        Ok(Self {
            kv,
            current,
            revision: 0,
            listeners: Vec::new(),
            next_id: 0,
        })
    }

    /// Reads the stored document, falling back to defaults.
    #[must_use]
    pub fn load(&self) -> SiteDocument {
        load_document(&self.kv)
    }

    /// Replaces the stored document and notifies subscribers.
    ///
    /// # Errors
    /// Returns error if serialization or the storage write fails; the
    /// in-memory document is left unchanged in that case.
    pub fn save(&mut self, doc: SiteDocument) -> Result<()> {
        write_document(&self.kv, &doc)?;

        self.current = doc;
        self.revision += 1;

        tracing::info!(revision = self.revision, "Content saved");

        for (_, listener) in &mut self.listeners {
            listener(&self.current);
        }

        Ok(())
    }

    /// The document as of the last load or save.
    #[must_use]
    pub const fn current(&self) -> &SiteDocument {
        &self.current
    }

    /// Counter bumped by every successful save.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers a callback run after every successful save.
    pub fn subscribe(&mut self, listener: impl FnMut(&SiteDocument) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }
}

/// Reads and merges the stored document; any failure yields the defaults.
fn load_document(kv: &impl KeyValueStore) -> SiteDocument {
    let raw = match kv.get_item(CONTENT_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!("No stored content, using defaults");
            return SiteDocument::default();
        }
        Err(e) => {
            tracing::warn!("Failed to read stored content: {}", e);
            return SiteDocument::default();
        }
    };

    let parsed: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Stored content is not valid JSON: {}", e);
            return SiteDocument::default();
        }
    };

    merge_with_defaults(&parsed).unwrap_or_else(|| {
        tracing::warn!("Stored content does not match the document shape, using defaults");
        SiteDocument::default()
    })
}

fn write_document(kv: &impl KeyValueStore, doc: &SiteDocument) -> Result<()> {
    let raw = serde_json::to_string(doc).map_err(AppError::json_parse)?;
    kv.set_item(CONTENT_KEY, &raw)
}

/// Shallow merge of a stored (possibly partial) document over the defaults.
///
/// Top-level keys overwrite, `hero` and `about` merge key-by-key, and the
/// two lists replace the default only when they are non-empty arrays.
/// Returns `None` if the input is not an object or the result does not fit
/// the document types.
#[must_use]
pub fn merge_with_defaults(stored: &Value) -> Option<SiteDocument> {
    let Value::Object(stored) = stored else {
        return None;
    };

    let Ok(Value::Object(defaults)) = serde_json::to_value(SiteDocument::default()) else {
        return None;
    };

    let mut merged = defaults.clone();
    for (key, value) in stored {
        merged.insert(key.clone(), value.clone());
    }

    for section in MERGED_SECTIONS {
        let mut fields = match defaults.get(section) {
            Some(Value::Object(fields)) => fields.clone(),
            _ => Map::new(),
        };
        if let Some(Value::Object(overrides)) = stored.get(section) {
            for (key, value) in overrides {
                fields.insert(key.clone(), value.clone());
            }
        }
        merged.insert(section.to_string(), Value::Object(fields));
    }

    for list in REPLACED_LISTS {
        let value = match stored.get(list) {
            Some(Value::Array(items)) if !items.is_empty() => Value::Array(items.clone()),
            _ => defaults.get(list).cloned().unwrap_or(Value::Array(Vec::new())),
        };
        merged.insert(list.to_string(), value);
    }

    serde_json::from_value(Value::Object(merged)).ok()
}
