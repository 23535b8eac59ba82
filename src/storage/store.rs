use crate::core::Record;
use crate::core::Result;
use crate::query::TableQuery;
use crate::schema::SchemaRegistry;
use crate::storage::{MemoryBackend, StorageBackend};
use std::collections::BTreeMap;

/// Tables present in a freshly opened (or corrupt) store.
pub const DEFAULT_TABLES: [&str; 7] = [
    "workout_templates",
    "template_blocks",
    "template_exercises",
    "programs",
    "classes",
    "class_enrollments",
    "coaches",
];

/// The mock relational store.
///
/// Named tables of ordered records behind a query-builder contract shaped
/// like a hosted database client, so callers can be written against a
/// stable interface and later pointed at a real backend. Every write
/// serializes the whole store back to the injected [`StorageBackend`].
///
/// # Examples
///
/// ```
/// use athledb::MockStore;
/// use serde_json::json;
///
/// # fn main() -> athledb::Result<()> {
/// let mut store = MockStore::in_memory();
///
/// let coach = store
///     .from("coaches")
///     .insert(athledb::core::record_from(vec![("name", json!("Sarah"))]))?
///     .single()
///     .unwrap();
///
/// let found = store
///     .from("coaches")
///     .eq("id", coach["id"].clone())
///     .select()
///     .single()
///     .unwrap();
/// assert_eq!(found["name"], json!("Sarah"));
/// # Ok(())
/// # }
/// ```
pub struct MockStore {
    tables: BTreeMap<String, Vec<Record>>,
    registry: SchemaRegistry,
    backend: Box<dyn StorageBackend>,
}

impl MockStore {
    /// Opens a store over the given backend.
    ///
    /// A missing blob starts the default empty schema; a corrupt blob is
    /// logged and discarded in favor of the same default. Opening never
    /// fails.
    pub fn open(backend: impl StorageBackend + 'static) -> Self {
        let tables = match backend.load() {
            Ok(Some(blob)) => match serde_json::from_str::<BTreeMap<String, Vec<Record>>>(&blob) {
                Ok(tables) => tables,
                Err(err) => {
                    tracing::warn!(%err, "persisted store is corrupt, starting from the default schema");
                    Self::default_tables()
                }
            },
            Ok(None) => Self::default_tables(),
            Err(err) => {
                tracing::warn!(%err, "could not read persisted store, starting from the default schema");
                Self::default_tables()
            }
        };

        Self {
            tables,
            registry: SchemaRegistry::builtin(),
            backend: Box::new(backend),
        }
    }

    /// Store over a volatile in-memory backend.
    pub fn in_memory() -> Self {
        Self::open(MemoryBackend::new())
    }

    fn default_tables() -> BTreeMap<String, Vec<Record>> {
        DEFAULT_TABLES
            .iter()
            .map(|name| (name.to_string(), Vec::new()))
            .collect()
    }

    /// Starts a query against one table.
    ///
    /// Never errors: reads on an unknown table behave as if it were empty,
    /// writes create it implicitly.
    pub fn from(&mut self, table: &str) -> TableQuery<'_> {
        TableQuery::new(self, table)
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }

    pub fn table_exists(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.tables.get(table).map_or(0, Vec::len)
    }

    /// Wipes everything back to the default empty schema and persists.
    pub fn reset(&mut self) -> Result<()> {
        self.tables = Self::default_tables();
        self.persist()
    }

    pub(crate) fn rows(&self, table: &str) -> &[Record] {
        self.tables.get(table).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn rows_mut(&mut self, table: &str) -> &mut Vec<Record> {
        self.tables.entry(table.to_string()).or_default()
    }

    pub(crate) fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Serializes the whole store back to the backend. Called by every
    /// write operation, unconditionally.
    pub(crate) fn persist(&self) -> Result<()> {
        let blob = serde_json::to_string(&self.tables)?;
        self.backend.save(&blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    #[test]
    fn test_fresh_store_has_default_tables() {
        let store = MockStore::in_memory();
        for table in DEFAULT_TABLES {
            assert!(store.table_exists(table), "missing table {}", table);
            assert_eq!(store.row_count(table), 0);
        }
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_defaults() {
        let backend = MemoryBackend::with_blob("not json at all {{{");
        let store = MockStore::open(backend);
        assert_eq!(store.table_names().len(), DEFAULT_TABLES.len());
    }

    #[test]
    fn test_unknown_table_reads_empty() {
        let mut store = MockStore::in_memory();
        assert_eq!(store.row_count("no_such_table"), 0);
        assert!(store.from("no_such_table").select().data.is_empty());
    }
}
