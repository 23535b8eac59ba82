use super::{delete_by_id, to_record, update_by_id};
use crate::core::{Record, Result, StoreError};
use crate::storage::MockStore;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Membership tier offered on the pricing page. Like events, the
/// `packages` table comes into being on the first write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPackage {
    pub name: String,
    pub price: f64,
    #[serde(default = "default_period")]
    pub duration_period: String,
    /// Individual selling points; persisted newline-joined.
    pub features: Vec<String>,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_period() -> String {
    "month".to_string()
}

fn default_available() -> bool {
    true
}

/// Cheapest first, the order the pricing page renders.
pub fn list_packages(store: &mut MockStore) -> Vec<Record> {
    store.from("packages").order("price", true).select().data
}

pub fn create_package(store: &mut MockStore, new: NewPackage) -> Result<Record> {
    if new.name.trim().is_empty() {
        return Err(StoreError::Validation("package name is required".into()));
    }

    let features: Vec<&str> = new
        .features
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect();
    if features.is_empty() {
        return Err(StoreError::Validation(
            "package needs at least one feature".into(),
        ));
    }

    let mut record = to_record(&new)?;
    record.insert("features".to_string(), json!(features.join("\n")));

    store
        .from("packages")
        .insert(record)?
        .single()
        .ok_or_else(|| StoreError::Validation("insert returned no row".into()))
}

pub fn update_package(store: &mut MockStore, id: &str, patch: Record) -> Result<Record> {
    update_by_id(store, "packages", id, patch)
}

pub fn delete_package(store: &mut MockStore, id: &str) -> Result<()> {
    delete_by_id(store, "packages", id)?;
    Ok(())
}
