use super::{delete_by_id, find_by_id, to_record, update_by_id};
use crate::core::{Record, Result, StoreError, now_rfc3339, record_from};
use crate::storage::MockStore;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClass {
    pub name: String,
    pub class_date: String,
    pub class_time: String,
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
    #[serde(default)]
    pub intensity: Intensity,
    #[serde(default = "default_capacity")]
    pub max_participants: i64,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub coach_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_duration() -> i64 {
    60
}

fn default_capacity() -> i64 {
    20
}

/// Upcoming schedule: classes ordered by date, then start time, with the
/// assigned coach's name embedded under `coach_name`.
pub fn list_classes(store: &mut MockStore) -> Vec<Record> {
    // The store sorts on a single key; order by the minor key there and
    // let a stable sort on the major key finish the job.
    let mut classes = store
        .from("classes")
        .order("class_time", true)
        .select()
        .data;
    classes.sort_by(|a, b| {
        let a_date = a.get("class_date").and_then(Value::as_str).unwrap_or("");
        let b_date = b.get("class_date").and_then(Value::as_str).unwrap_or("");
        a_date.cmp(b_date)
    });

    for class in &mut classes {
        let coach_name = class
            .get("coach_id")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .and_then(|coach_id| find_by_id(store, "coaches", &coach_id))
            .and_then(|coach| coach.get("name").cloned());
        class.insert("coach_name".to_string(), coach_name.unwrap_or(Value::Null));
    }

    classes
}

pub fn create_class(store: &mut MockStore, new: NewClass) -> Result<Record> {
    if new.name.trim().is_empty() {
        return Err(StoreError::Validation("class name is required".into()));
    }
    if !(5..=180).contains(&new.duration_minutes) {
        return Err(StoreError::Validation(
            "duration must be between 5 and 180 minutes".into(),
        ));
    }
    if !(1..=100).contains(&new.max_participants) {
        return Err(StoreError::Validation(
            "max participants must be between 1 and 100".into(),
        ));
    }

    let mut record = to_record(&new)?;
    record.insert("current_enrolled".to_string(), json!(0));

    store
        .from("classes")
        .insert(record)?
        .single()
        .ok_or_else(|| StoreError::Validation("insert returned no row".into()))
}

pub fn update_class(store: &mut MockStore, id: &str, patch: Record) -> Result<Record> {
    update_by_id(store, "classes", id, patch)
}

pub fn delete_class(store: &mut MockStore, id: &str) -> Result<()> {
    delete_by_id(store, "classes", id)?;
    Ok(())
}

/// Books a member into a class: one enrollment row plus a bump of the
/// class's enrolled counter. Two store writes, not atomic.
pub fn enroll(store: &mut MockStore, class_id: &str, user_id: &str) -> Result<Record> {
    let class = find_by_id(store, "classes", class_id)
        .ok_or_else(|| StoreError::NotFound(format!("no 'classes' row with id {}", class_id)))?;

    let enrolled = class
        .get("current_enrolled")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    let capacity = class
        .get("max_participants")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    if enrolled >= capacity {
        return Err(StoreError::Conflict("class is full".into()));
    }

    let enrollment = store
        .from("class_enrollments")
        .insert(record_from(vec![
            ("class_id", json!(class_id)),
            ("user_id", json!(user_id)),
            ("enrolled_at", json!(now_rfc3339())),
        ]))?
        .single()
        .ok_or_else(|| StoreError::Validation("insert returned no row".into()))?;

    update_by_id(
        store,
        "classes",
        class_id,
        record_from(vec![("current_enrolled", json!(enrolled + 1))]),
    )?;

    Ok(enrollment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_class(name: &str, date: &str, time: &str) -> NewClass {
        NewClass {
            name: name.into(),
            class_date: date.into(),
            class_time: time.into(),
            duration_minutes: 60,
            intensity: Intensity::Medium,
            max_participants: 2,
            template_id: None,
            coach_id: None,
            description: None,
        }
    }

    #[test]
    fn test_create_initializes_enrollment_counter() {
        let mut store = MockStore::in_memory();
        let class = create_class(&mut store, new_class("HIIT", "2025-06-01", "09:00")).unwrap();
        assert_eq!(class["current_enrolled"], json!(0));
        assert_eq!(class["intensity"], json!("Medium"));
    }

    #[test]
    fn test_list_orders_by_date_then_time() {
        let mut store = MockStore::in_memory();
        create_class(&mut store, new_class("C", "2025-06-02", "08:00")).unwrap();
        create_class(&mut store, new_class("A", "2025-06-01", "18:00")).unwrap();
        create_class(&mut store, new_class("B", "2025-06-01", "07:00")).unwrap();

        let names: Vec<_> = list_classes(&mut store)
            .iter()
            .map(|c| c["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("B"), json!("A"), json!("C")]);
    }

    #[test]
    fn test_list_embeds_coach_name() {
        let mut store = MockStore::in_memory();
        let coach = super::super::create_coach(
            &mut store,
            super::super::NewCoach {
                name: "Sarah".into(),
                ..Default::default()
            },
        )
        .unwrap();

        let mut class = new_class("HIIT", "2025-06-01", "09:00");
        class.coach_id = Some(coach["id"].as_str().unwrap().to_string());
        create_class(&mut store, class).unwrap();

        let listed = list_classes(&mut store);
        assert_eq!(listed[0]["coach_name"], json!("Sarah"));
    }

    #[test]
    fn test_enroll_until_full() {
        let mut store = MockStore::in_memory();
        let class = create_class(&mut store, new_class("HIIT", "2025-06-01", "09:00")).unwrap();
        let class_id = class["id"].as_str().unwrap().to_string();

        enroll(&mut store, &class_id, "user-1").unwrap();
        enroll(&mut store, &class_id, "user-2").unwrap();
        let err = enroll(&mut store, &class_id, "user-3").unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        assert_eq!(store.row_count("class_enrollments"), 2);
        let updated = find_by_id(&mut store, "classes", &class_id).unwrap();
        assert_eq!(updated["current_enrolled"], json!(2));
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let mut store = MockStore::in_memory();
        let mut class = new_class("HIIT", "2025-06-01", "09:00");
        class.duration_minutes = 500;
        assert!(matches!(
            create_class(&mut store, class),
            Err(StoreError::Validation(_))
        ));
    }
}
