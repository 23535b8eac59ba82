use super::{delete_by_id, to_record, update_by_id};
use crate::core::{Record, Result, StoreError};
use crate::storage::MockStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Draft,
    Published,
    Completed,
    Cancelled,
}

/// One-off happenings (competitions, open days, workshops), separate from
/// the weekly class schedule. The `events` table is not part of the
/// default schema; the store creates it on the first write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    pub event_date: String,
    pub event_time: String,
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_capacity")]
    pub max_participants: i64,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub registration_deadline: Option<String>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub full_description: Option<String>,
    #[serde(default)]
    pub is_sponsored: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub what_to_bring: Option<String>,
}

fn default_duration() -> i64 {
    60
}

fn default_capacity() -> i64 {
    20
}

impl Default for NewEvent {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: None,
            difficulty: None,
            event_date: String::new(),
            event_time: String::new(),
            duration_minutes: default_duration(),
            price: 0.0,
            max_participants: default_capacity(),
            instructor_name: None,
            location: None,
            registration_deadline: None,
            status: EventStatus::default(),
            short_description: None,
            full_description: None,
            is_sponsored: false,
            is_featured: false,
            tags: None,
            requirements: None,
            what_to_bring: None,
        }
    }
}

/// Calendar order, soonest first.
pub fn list_events(store: &mut MockStore) -> Vec<Record> {
    store.from("events").order("event_date", true).select().data
}

pub fn create_event(store: &mut MockStore, new: NewEvent) -> Result<Record> {
    if new.title.trim().is_empty() {
        return Err(StoreError::Validation("event title is required".into()));
    }
    if new.price < 0.0 {
        return Err(StoreError::Validation("price cannot be negative".into()));
    }

    store
        .from("events")
        .insert(to_record(&new)?)?
        .single()
        .ok_or_else(|| StoreError::Validation("insert returned no row".into()))
}

pub fn update_event(store: &mut MockStore, id: &str, patch: Record) -> Result<Record> {
    update_by_id(store, "events", id, patch)
}

pub fn delete_event(store: &mut MockStore, id: &str) -> Result<()> {
    delete_by_id(store, "events", id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_event(title: &str, date: &str) -> NewEvent {
        NewEvent {
            title: title.into(),
            event_date: date.into(),
            event_time: "10:00".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_defaults() {
        let mut store = MockStore::in_memory();
        let event = create_event(&mut store, new_event("Open Day", "2025-07-01")).unwrap();
        assert_eq!(event["status"], json!("draft"));
        assert_eq!(event["duration_minutes"], json!(60));
        assert_eq!(event["is_featured"], json!(false));
    }

    #[test]
    fn test_list_orders_by_date() {
        let mut store = MockStore::in_memory();
        create_event(&mut store, new_event("Later", "2025-08-01")).unwrap();
        create_event(&mut store, new_event("Sooner", "2025-07-01")).unwrap();

        let events = list_events(&mut store);
        assert_eq!(events[0]["title"], json!("Sooner"));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut store = MockStore::in_memory();
        let mut event = new_event("Open Day", "2025-07-01");
        event.price = -5.0;
        assert!(matches!(
            create_event(&mut store, event),
            Err(StoreError::Validation(_))
        ));
    }
}
