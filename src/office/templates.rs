//! Workout template editing.
//!
//! Templates are three tables deep: workout_templates -> template_blocks
//! -> template_exercises. The store has no cascade deletes, so the edit
//! flow deletes the child rows itself before re-inserting the draft's
//! blocks, one write at a time. An interruption mid-save leaves partial
//! state behind; there is no transaction to roll back to.

use super::{delete_by_id, find_by_id, update_by_id};
use crate::core::{Record, Result, StoreError, now_rfc3339, record_from, record_id};
use crate::storage::MockStore;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TemplateType {
    Hiit,
    Strength,
    Cardio,
    Hyrox,
}

const CATEGORIES: [&str; 4] = [
    "Hyrox Preparation",
    "Sprint Conditioning",
    "Strength Endurance",
    "General Endurance",
];

/// Units whose value maps onto the `reps` column; anything else is kept
/// verbatim in a notes payload.
const REP_UNITS: [&str; 3] = ["reps", "rounds", "laps"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseDraft {
    pub exercise_name: String,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    "reps".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDraft {
    #[serde(default)]
    pub block_name: Option<String>,
    #[serde(default = "default_rounds")]
    pub rounds: i64,
    #[serde(default)]
    pub ai_description: Option<String>,
    #[serde(default)]
    pub exercises: Vec<ExerciseDraft>,
}

fn default_rounds() -> i64 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    pub description: String,
    pub template_type: TemplateType,
    pub category: String,
    #[serde(default)]
    pub blocks: Vec<BlockDraft>,
}

impl TemplateDraft {
    fn validate(&self) -> Result<()> {
        if self.name.len() < 3 || self.name.len() > 100 {
            return Err(StoreError::Validation(
                "template name must be 3 to 100 characters".into(),
            ));
        }
        if self.description.len() < 10 || self.description.len() > 500 {
            return Err(StoreError::Validation(
                "description must be 10 to 500 characters".into(),
            ));
        }
        if !CATEGORIES.contains(&self.category.as_str()) {
            return Err(StoreError::Validation(format!(
                "'{}' is not a workout category",
                self.category
            )));
        }
        Ok(())
    }
}

/// A fully hydrated template: the row plus its blocks and their
/// exercises, in editing order.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateDetail {
    pub template: Record,
    pub blocks: Vec<TemplateBlockDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateBlockDetail {
    pub block: Record,
    pub exercises: Vec<Record>,
}

pub fn list_templates(store: &mut MockStore) -> Vec<Record> {
    store
        .from("workout_templates")
        .order("created_at", false)
        .select()
        .data
}

pub fn load_template(store: &mut MockStore, id: &str) -> Result<TemplateDetail> {
    let template = find_by_id(store, "workout_templates", id).ok_or_else(|| {
        StoreError::NotFound(format!("no 'workout_templates' row with id {}", id))
    })?;

    let block_rows = store
        .from("template_blocks")
        .eq("template_id", id)
        .order("block_order", true)
        .select()
        .data;

    let mut blocks = Vec::with_capacity(block_rows.len());
    for block in block_rows {
        let block_id = record_id(&block).unwrap_or_default().to_string();
        let exercises = store
            .from("template_exercises")
            .eq("block_id", block_id.as_str())
            .order("exercise_order", true)
            .select()
            .data;
        blocks.push(TemplateBlockDetail { block, exercises });
    }

    Ok(TemplateDetail { template, blocks })
}

/// Creates a template, or replaces the body of an existing one when
/// `editing` names it. Returns the template id.
///
/// The edit path updates the template row, clears its old blocks and
/// exercises, then re-inserts the draft's blocks sequentially.
pub fn save_template(
    store: &mut MockStore,
    draft: TemplateDraft,
    editing: Option<&str>,
) -> Result<String> {
    draft.validate()?;

    let header = record_from(vec![
        ("name", json!(draft.name)),
        ("description", json!(draft.description)),
        ("template_type", serde_json::to_value(draft.template_type)?),
        ("category", json!(draft.category)),
    ]);

    let template_id = match editing {
        Some(id) => {
            let mut patch = header;
            patch.insert("updated_at".to_string(), json!(now_rfc3339()));
            update_by_id(store, "workout_templates", id, patch)?;
            clear_blocks(store, id)?;
            id.to_string()
        }
        None => {
            let inserted = store
                .from("workout_templates")
                .insert(header)?
                .single()
                .ok_or_else(|| StoreError::Validation("insert returned no row".into()))?;
            record_id(&inserted).unwrap_or_default().to_string()
        }
    };

    for (order, block) in draft.blocks.iter().enumerate() {
        let inserted_block = store
            .from("template_blocks")
            .insert(record_from(vec![
                ("template_id", json!(template_id)),
                ("block_order", json!(order as i64)),
                ("block_name", json!(block.block_name)),
                ("rounds", json!(block.rounds)),
                ("ai_description", json!(block.ai_description)),
            ]))?
            .single()
            .ok_or_else(|| StoreError::Validation("insert returned no row".into()))?;
        let block_id = record_id(&inserted_block).unwrap_or_default().to_string();

        for (order, exercise) in block.exercises.iter().enumerate() {
            let (reps, notes) = if REP_UNITS.contains(&exercise.unit.as_str()) {
                (exercise.value.map(|v| json!(v.floor() as i64)), None)
            } else {
                let note = serde_json::to_string(&json!({
                    "unit": exercise.unit,
                    "value": exercise.value,
                }))?;
                (None, Some(note))
            };
            let is_bodyweight = exercise.weight.is_none_or(|w| w == 0.0);

            store
                .from("template_exercises")
                .insert(record_from(vec![
                    ("block_id", json!(block_id)),
                    ("exercise_order", json!(order as i64)),
                    ("exercise_name", json!(exercise.exercise_name)),
                    ("reps", reps.unwrap_or(Value::Null)),
                    ("weight", json!(exercise.weight)),
                    ("is_bodyweight", json!(is_bodyweight)),
                    ("notes", json!(notes)),
                ]))?;
        }
    }

    Ok(template_id)
}

/// Removes a template together with its blocks and exercises.
pub fn delete_template(store: &mut MockStore, id: &str) -> Result<()> {
    clear_blocks(store, id)?;
    delete_by_id(store, "workout_templates", id)?;
    Ok(())
}

/// Deletes a template's blocks and, first, each block's exercises —
/// the manual stand-in for a cascade.
fn clear_blocks(store: &mut MockStore, template_id: &str) -> Result<()> {
    let blocks = store
        .from("template_blocks")
        .eq("template_id", template_id)
        .select()
        .data;
    for block in &blocks {
        if let Some(block_id) = record_id(block) {
            let block_id = block_id.to_string();
            store
                .from("template_exercises")
                .eq("block_id", block_id.as_str())
                .delete()?;
        }
    }
    store
        .from("template_blocks")
        .eq("template_id", template_id)
        .delete()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> TemplateDraft {
        TemplateDraft {
            name: name.into(),
            description: "A conditioning session built around sled work.".into(),
            template_type: TemplateType::Hyrox,
            category: "Hyrox Preparation".into(),
            blocks: vec![BlockDraft {
                block_name: Some("Warmup".into()),
                rounds: 2,
                ai_description: None,
                exercises: vec![
                    ExerciseDraft {
                        exercise_name: "Burpees".into(),
                        weight: None,
                        value: Some(15.0),
                        unit: "reps".into(),
                    },
                    ExerciseDraft {
                        exercise_name: "Sled Push".into(),
                        weight: Some(80.0),
                        value: Some(50.0),
                        unit: "meters".into(),
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_save_creates_nested_rows() {
        let mut store = MockStore::in_memory();
        let id = save_template(&mut store, draft("Engine Builder"), None).unwrap();

        let detail = load_template(&mut store, &id).unwrap();
        assert_eq!(detail.template["template_type"], json!("HYROX"));
        assert_eq!(detail.blocks.len(), 1);
        assert_eq!(detail.blocks[0].exercises.len(), 2);

        // reps-unit exercise lands in the reps column, bodyweight derived
        let burpees = &detail.blocks[0].exercises[0];
        assert_eq!(burpees["reps"], json!(15));
        assert_eq!(burpees["is_bodyweight"], json!(true));
        assert_eq!(burpees["notes"], json!(null));

        // other units are preserved as a notes payload
        let sled = &detail.blocks[0].exercises[1];
        assert_eq!(sled["reps"], json!(null));
        assert_eq!(sled["is_bodyweight"], json!(false));
        let notes: Value =
            serde_json::from_str(sled["notes"].as_str().unwrap()).unwrap();
        assert_eq!(notes["unit"], json!("meters"));
    }

    #[test]
    fn test_edit_replaces_blocks_without_orphans() {
        let mut store = MockStore::in_memory();
        let id = save_template(&mut store, draft("Engine Builder"), None).unwrap();
        assert_eq!(store.row_count("template_blocks"), 1);
        assert_eq!(store.row_count("template_exercises"), 2);

        let mut edited = draft("Engine Builder v2");
        edited.blocks[0].exercises.truncate(1);
        let edited_id = save_template(&mut store, edited, Some(id.as_str())).unwrap();
        assert_eq!(edited_id, id);

        assert_eq!(store.row_count("workout_templates"), 1);
        assert_eq!(store.row_count("template_blocks"), 1);
        assert_eq!(store.row_count("template_exercises"), 1);

        let detail = load_template(&mut store, &id).unwrap();
        assert_eq!(detail.template["name"], json!("Engine Builder v2"));
        assert!(detail.template.contains_key("updated_at"));
    }

    #[test]
    fn test_edit_unknown_template_is_not_found() {
        let mut store = MockStore::in_memory();
        let err = save_template(&mut store, draft("X Y Z"), Some("missing")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_short_description_rejected() {
        let mut store = MockStore::in_memory();
        let mut bad = draft("Engine Builder");
        bad.description = "too short".into();
        assert!(matches!(
            save_template(&mut store, bad, None),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_delete_template_cascades_manually() {
        let mut store = MockStore::in_memory();
        let id = save_template(&mut store, draft("Engine Builder"), None).unwrap();

        delete_template(&mut store, &id).unwrap();
        assert_eq!(store.row_count("workout_templates"), 0);
        assert_eq!(store.row_count("template_blocks"), 0);
        assert_eq!(store.row_count("template_exercises"), 0);
    }

    #[test]
    fn test_load_orders_blocks_and_exercises() {
        let mut store = MockStore::in_memory();
        let mut multi = draft("Engine Builder");
        multi.blocks.push(BlockDraft {
            block_name: Some("Finisher".into()),
            rounds: 1,
            ai_description: None,
            exercises: vec![],
        });
        let id = save_template(&mut store, multi, None).unwrap();

        let detail = load_template(&mut store, &id).unwrap();
        assert_eq!(detail.blocks[0].block["block_order"], json!(0));
        assert_eq!(detail.blocks[1].block["block_order"], json!(1));
        assert_eq!(
            detail.blocks[0].exercises[0]["exercise_order"],
            json!(0)
        );
    }
}
