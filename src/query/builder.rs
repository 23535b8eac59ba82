use super::filter::EqFilter;
use super::results::{DeleteResult, InsertResult, SelectResult, UpdateResult};
use super::sort::{OrderKey, sort_records};
use crate::core::{Record, Result, fresh_id, now_rfc3339, record_id};
use crate::storage::MockStore;
use serde_json::Value;

/// Rows going into an `insert`: one record or a batch.
pub enum InsertPayload {
    One(Record),
    Many(Vec<Record>),
}

impl From<Record> for InsertPayload {
    fn from(record: Record) -> Self {
        Self::One(record)
    }
}

impl From<Vec<Record>> for InsertPayload {
    fn from(records: Vec<Record>) -> Self {
        Self::Many(records)
    }
}

impl InsertPayload {
    fn into_records(self) -> Vec<Record> {
        match self {
            Self::One(record) => vec![record],
            Self::Many(records) => records,
        }
    }
}

/// A query against one table, accumulated filter by filter until a
/// terminal operation runs it.
///
/// Each terminal call is a one-shot read-modify-write against the whole
/// store; there is no cursor or session state to carry between calls.
pub struct TableQuery<'a> {
    store: &'a mut MockStore,
    table: String,
    filters: Vec<EqFilter>,
    order: Option<OrderKey>,
}

impl<'a> TableQuery<'a> {
    pub(crate) fn new(store: &'a mut MockStore, table: &str) -> Self {
        Self {
            store,
            table: table.to_string(),
            filters: Vec::new(),
            order: None,
        }
    }

    /// Adds an exact-match filter. Filters stack; a row must satisfy all
    /// of them.
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(EqFilter {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    /// Sets the sort key. Calling again replaces the previous key.
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(OrderKey {
            column: column.to_string(),
            ascending,
        });
        self
    }

    fn matches(&self, record: &Record) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }

    /// Resolves the matching rows from a snapshot of the table.
    ///
    /// Reads never fail: an unknown table is an empty table, and with no
    /// `order` chained the rows come back in insertion order.
    pub fn select(self) -> SelectResult {
        let mut data: Vec<Record> = self
            .store
            .rows(&self.table)
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();

        if let Some(key) = &self.order {
            sort_records(&mut data, key);
        }

        SelectResult { data }
    }

    /// Appends the payload rows, assigning a fresh `id` and a `created_at`
    /// timestamp to any row missing them, then persists the whole store.
    ///
    /// A caller-supplied id is taken as-is, duplicates included.
    pub fn insert(self, payload: impl Into<InsertPayload>) -> Result<InsertResult> {
        let mut inserted = Vec::new();

        for mut record in payload.into().into_records() {
            self.store.registry().validate_insert(&self.table, &record)?;

            if record_id(&record).is_none() {
                record.insert("id".to_string(), Value::String(fresh_id()));
            }
            if !record.contains_key("created_at") {
                record.insert("created_at".to_string(), Value::String(now_rfc3339()));
            }

            self.store.rows_mut(&self.table).push(record.clone());
            inserted.push(record);
        }

        self.store.persist()?;
        Ok(InsertResult { data: inserted })
    }

    /// Shallow-merges the partial record into every filter match, in
    /// place: supplied fields overwrite, everything else persists.
    pub fn update(self, partial: Record) -> Result<UpdateResult> {
        self.store.registry().validate_update(&self.table, &partial)?;

        let mut updated = Vec::new();
        let filters = self.filters.clone();
        for row in self.store.rows_mut(&self.table).iter_mut() {
            if filters.iter().all(|f| f.matches(row)) {
                for (key, value) in &partial {
                    row.insert(key.clone(), value.clone());
                }
                updated.push(row.clone());
            }
        }

        self.store.persist()?;
        Ok(UpdateResult { data: updated })
    }

    /// Removes every filter match. A no-op (empty data) when nothing
    /// matches.
    pub fn delete(self) -> Result<DeleteResult> {
        let mut removed = Vec::new();
        let filters = self.filters.clone();
        self.store.rows_mut(&self.table).retain(|row| {
            if filters.iter().all(|f| f.matches(row)) {
                removed.push(row.clone());
                false
            } else {
                true
            }
        });

        if !removed.is_empty() {
            self.store.persist()?;
        }
        Ok(DeleteResult { data: removed })
    }
}
