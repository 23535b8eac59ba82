use super::{delete_by_id, to_record, update_by_id};
use crate::core::{Record, Result, StoreError};
use crate::storage::MockStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCoach {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub specialties: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub certifications: Option<String>,
}

/// Roster, newest hire first.
pub fn list_coaches(store: &mut MockStore) -> Vec<Record> {
    store
        .from("coaches")
        .order("created_at", false)
        .select()
        .data
}

pub fn create_coach(store: &mut MockStore, new: NewCoach) -> Result<Record> {
    if new.name.trim().is_empty() {
        return Err(StoreError::Validation("coach name is required".into()));
    }
    if let Some(email) = &new.email
        && !email.contains('@')
    {
        return Err(StoreError::Validation(format!(
            "'{}' is not a valid email address",
            email
        )));
    }

    store
        .from("coaches")
        .insert(to_record(&new)?)?
        .single()
        .ok_or_else(|| StoreError::Validation("insert returned no row".into()))
}

pub fn update_coach(store: &mut MockStore, id: &str, patch: Record) -> Result<Record> {
    update_by_id(store, "coaches", id, patch)
}

pub fn delete_coach(store: &mut MockStore, id: &str) -> Result<()> {
    delete_by_id(store, "coaches", id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record_from;
    use serde_json::json;

    #[test]
    fn test_create_and_list() {
        let mut store = MockStore::in_memory();
        create_coach(
            &mut store,
            NewCoach {
                name: "Sarah Mitchell".into(),
                title: Some("Head Performance Coach".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let coaches = list_coaches(&mut store);
        assert_eq!(coaches.len(), 1);
        assert_eq!(coaches[0]["title"], json!("Head Performance Coach"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut store = MockStore::in_memory();
        let err = create_coach(
            &mut store,
            NewCoach {
                name: "  ".into(),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut store = MockStore::in_memory();
        let err = create_coach(
            &mut store,
            NewCoach {
                name: "Sam".into(),
                email: Some("not-an-email".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_update_and_delete() {
        let mut store = MockStore::in_memory();
        let coach = create_coach(
            &mut store,
            NewCoach {
                name: "Sam".into(),
                ..Default::default()
            },
        )
        .unwrap();
        let id = coach["id"].as_str().unwrap().to_string();

        let updated =
            update_coach(&mut store, &id, record_from(vec![("bio", json!("new bio"))])).unwrap();
        assert_eq!(updated["bio"], json!("new bio"));
        assert_eq!(updated["name"], json!("Sam"));

        delete_coach(&mut store, &id).unwrap();
        assert_eq!(store.row_count("coaches"), 0);
        assert!(matches!(
            delete_coach(&mut store, &id),
            Err(StoreError::NotFound(_))
        ));
    }
}
