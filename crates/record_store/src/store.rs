//! RecordStore - bounded random-access record source

use std::fs;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use contracts::{BoundedStore, FieldLayout, StoreConfig, StoreError};

/// Resolved backing source, held only while the store is open
struct OpenSource {
    location: String,
    field: String,
    layout: FieldLayout,
    slots: Vec<Value>,
}

/// Bounded, randomly-addressable record store
///
/// `R` is the caller-supplied payload type of the bound field. The store
/// owns a single read buffer: the reference returned by a read is valid
/// until the next read, which overwrites the buffer in place. The borrow
/// checker enforces that rule, since every read takes `&mut self`.
pub struct RecordStore<R> {
    source: Option<OpenSource>,
    buf: Option<R>,
    position: i64,
}

impl<R> RecordStore<R> {
    /// Create an unopened store (capacity 0)
    pub fn new() -> Self {
        Self {
            source: None,
            buf: None,
            position: 0,
        }
    }

    /// Resolve the backing source and bind the named collection and field
    ///
    /// On success the capacity becomes the collection's slot count. On
    /// failure the store stays unopened at capacity 0 and the caller may
    /// retry with a different config. Reopening replaces any previous
    /// binding.
    ///
    /// # Errors
    /// - `SourceUnreachable` - the document cannot be read or parsed
    /// - `CollectionNotFound` - the collection key is missing or not an array
    pub fn open(&mut self, config: &StoreConfig) -> Result<(), StoreError> {
        let location = config.location.display().to_string();

        let content = fs::read_to_string(&config.location)
            .map_err(|e| StoreError::source_unreachable(&location, e.to_string()))?;

        let doc: Value = serde_json::from_str(&content)
            .map_err(|e| StoreError::source_unreachable(&location, format!("invalid JSON: {e}")))?;

        let slots = doc
            .get(&config.collection)
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| StoreError::collection_not_found(&location, &config.collection))?;

        info!(
            location = %location,
            collection = %config.collection,
            field = %config.field,
            layout = ?config.layout,
            records = slots.len(),
            "Record store opened"
        );

        self.source = Some(OpenSource {
            location,
            field: config.field.clone(),
            layout: config.layout,
            slots,
        });
        self.buf = None;
        self.position = 0;
        Ok(())
    }

    /// Total addressable record count; 0 if unopened
    pub fn count(&self) -> i64 {
        self.source.as_ref().map_or(0, |s| s.slots.len() as i64)
    }

    /// Whether a backing source is currently bound
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Position used by the next `read_current`
    pub fn position(&self) -> i64 {
        self.position
    }

    /// Set the position used by `read_current`
    ///
    /// Performs no read and no validation; an out-of-range position is
    /// reported by the read that uses it.
    pub fn set_position(&mut self, position: i64) {
        self.position = position;
    }

    /// Release the backing source
    ///
    /// Idempotent; a no-op if never opened. Capacity returns to 0.
    pub fn close(&mut self) {
        if let Some(source) = self.source.take() {
            debug!(location = %source.location, "Record store closed");
        }
        self.buf = None;
        self.position = 0;
    }
}

impl<R: DeserializeOwned> RecordStore<R> {
    /// Read the record at `position` into the store-owned buffer
    ///
    /// Side effect: `position` becomes the last-read position used by
    /// `read_current`. The returned reference is invalidated by the next
    /// read.
    ///
    /// # Errors
    /// - `OutOfRange` - `position` not in `[0, capacity)`
    /// - `FieldDecode` - the bound field is missing or fails to deserialize
    pub fn read_at(&mut self, position: i64) -> Result<&R, StoreError> {
        let Some(source) = self.source.as_ref() else {
            return Err(StoreError::out_of_range(position, 0));
        };

        let capacity = source.slots.len() as i64;
        if position < 0 || position >= capacity {
            return Err(StoreError::out_of_range(position, capacity));
        }

        let slot = &source.slots[position as usize];
        let field_value = slot.get(&source.field).cloned().ok_or_else(|| {
            StoreError::field_decode(&source.field, position, "field missing from slot")
        })?;

        let record: R = serde_json::from_value(field_value)
            .map_err(|e| StoreError::field_decode(&source.field, position, e.to_string()))?;

        self.position = position;
        Ok(self.buf.insert(record))
    }

    /// Read the record at the last set position
    pub fn read_current(&mut self) -> Result<&R, StoreError> {
        self.read_at(self.position)
    }
}

impl<R> RecordStore<R> {
    /// Materialize every slot as an ordered group of `T`
    ///
    /// One group per stored position, in stored order. A collection-typed
    /// field contributes every element that converts to `T` (failures are
    /// skipped); a scalar field contributes at most one element. Scans the
    /// whole store once, independent of the read cursor.
    pub fn extract_all<T: DeserializeOwned>(&self) -> Vec<Vec<T>> {
        let Some(source) = self.source.as_ref() else {
            return Vec::new();
        };

        source
            .slots
            .iter()
            .map(|slot| extract_slot(source, slot))
            .collect()
    }
}

fn extract_slot<T: DeserializeOwned>(source: &OpenSource, slot: &Value) -> Vec<T> {
    let Some(field_value) = slot.get(&source.field) else {
        return Vec::new();
    };

    match source.layout {
        FieldLayout::Collection => field_value
            .as_array()
            .map(|elements| {
                elements
                    .iter()
                    .filter_map(|element| serde_json::from_value(element.clone()).ok())
                    .collect()
            })
            .unwrap_or_default(),
        FieldLayout::Scalar => serde_json::from_value(field_value.clone())
            .ok()
            .into_iter()
            .collect(),
    }
}

impl<R> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> BoundedStore for RecordStore<R> {
    fn record_count(&self) -> i64 {
        self.count()
    }
}
