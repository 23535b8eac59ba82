use super::{delete_by_id, to_record, update_by_id};
use crate::core::{Record, Result, StoreError};
use crate::storage::MockStore;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProgram {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_weeks: i64,
    #[serde(default = "default_skill_level")]
    pub skill_level: String,
    #[serde(default = "default_sessions")]
    pub sessions_per_week: i64,
}

fn default_skill_level() -> String {
    "Intermediate".to_string()
}

fn default_sessions() -> i64 {
    3
}

pub fn list_programs(store: &mut MockStore) -> Vec<Record> {
    store
        .from("programs")
        .order("created_at", false)
        .select()
        .data
}

/// New programs start active.
pub fn create_program(store: &mut MockStore, new: NewProgram) -> Result<Record> {
    if new.name.trim().is_empty() {
        return Err(StoreError::Validation("program name is required".into()));
    }
    if new.duration_weeks < 1 {
        return Err(StoreError::Validation(
            "program must run for at least one week".into(),
        ));
    }
    if new.sessions_per_week < 1 {
        return Err(StoreError::Validation(
            "program needs at least one session per week".into(),
        ));
    }

    let mut record = to_record(&new)?;
    record.insert("is_active".to_string(), json!(true));

    store
        .from("programs")
        .insert(record)?
        .single()
        .ok_or_else(|| StoreError::Validation("insert returned no row".into()))
}

pub fn update_program(store: &mut MockStore, id: &str, patch: Record) -> Result<Record> {
    update_by_id(store, "programs", id, patch)
}

pub fn delete_program(store: &mut MockStore, id: &str) -> Result<()> {
    delete_by_id(store, "programs", id)?;
    Ok(())
}
