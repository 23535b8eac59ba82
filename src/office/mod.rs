//! Back-office services: the flows the studio's admin area performs,
//! expressed over the mock store's query contract.
//!
//! Every service here is a plain function taking `&mut MockStore`; the
//! web layer serializes access behind one lock, matching the store's
//! single-writer model.

mod classes;
mod coaches;
mod dashboard;
mod events;
mod packages;
mod programs;
mod templates;

pub use classes::{Intensity, NewClass, create_class, delete_class, enroll, list_classes, update_class};
pub use coaches::{NewCoach, create_coach, delete_coach, list_coaches, update_coach};
pub use dashboard::{DashboardStats, dashboard_stats};
pub use events::{EventStatus, NewEvent, create_event, delete_event, list_events, update_event};
pub use packages::{NewPackage, create_package, delete_package, list_packages, update_package};
pub use programs::{NewProgram, create_program, delete_program, list_programs, update_program};
pub use templates::{
    BlockDraft, ExerciseDraft, TemplateBlockDetail, TemplateDetail, TemplateDraft, TemplateType,
    delete_template, list_templates, load_template, save_template,
};

use crate::core::{Record, Result, StoreError};
use crate::storage::MockStore;
use serde::Serialize;
use serde_json::Value;

/// Serializes a typed payload into a store record.
pub(crate) fn to_record<T: Serialize>(value: &T) -> Result<Record> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::Serialization(
            "payload did not serialize to an object".into(),
        )),
    }
}

pub(crate) fn find_by_id(store: &mut MockStore, table: &str, id: &str) -> Option<Record> {
    store.from(table).eq("id", id).select().single()
}

pub(crate) fn update_by_id(
    store: &mut MockStore,
    table: &str,
    id: &str,
    patch: Record,
) -> Result<Record> {
    store
        .from(table)
        .eq("id", id)
        .update(patch)?
        .data
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::NotFound(format!("no '{}' row with id {}", table, id)))
}

pub(crate) fn delete_by_id(store: &mut MockStore, table: &str, id: &str) -> Result<Record> {
    store
        .from(table)
        .eq("id", id)
        .delete()?
        .data
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::NotFound(format!("no '{}' row with id {}", table, id)))
}
