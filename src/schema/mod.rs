//! Per-table column descriptions and boundary validation.
//!
//! Records stay open JSON objects, but for the tables the studio actually
//! relies on, the columns the application reads are declared here and
//! type-checked on the way in. Undeclared extra fields pass through
//! untouched, and tables created implicitly on first write carry no
//! schema at all.

use crate::core::{Record, Result, StoreError};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Float,
    Boolean,
}

impl ColumnType {
    /// Null is compatible with every column; integers widen into floats.
    pub fn is_compatible(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Self::Text, Value::String(_)) => true,
            (Self::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (Self::Float, Value::Number(_)) => true,
            (Self::Boolean, Value::Bool(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "TEXT"),
            Self::Integer => write!(f, "INTEGER"),
            Self::Float => write!(f, "FLOAT"),
            Self::Boolean => write!(f, "BOOLEAN"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    pub required: bool,
}

impl ColumnDef {
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnDef>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Declared columns must carry compatible values; required columns
    /// must be present and non-null. Extra fields are the caller's
    /// business.
    pub fn validate_insert(&self, record: &Record) -> Result<()> {
        for column in &self.columns {
            if column.required {
                match record.get(&column.name) {
                    Some(value) if !value.is_null() => {}
                    _ => {
                        return Err(StoreError::SchemaViolation(
                            self.name.clone(),
                            format!("missing required column '{}'", column.name),
                        ));
                    }
                }
            }
        }
        self.validate_types(record)
    }

    /// Partial payloads only get the type check; a patch is free to leave
    /// required columns alone.
    pub fn validate_update(&self, partial: &Record) -> Result<()> {
        self.validate_types(partial)
    }

    fn validate_types(&self, record: &Record) -> Result<()> {
        for (key, value) in record {
            if let Some(column) = self.column(key)
                && !column.column_type.is_compatible(value)
            {
                return Err(StoreError::SchemaViolation(
                    self.name.clone(),
                    format!(
                        "column '{}' expects {}, got {}",
                        column.name,
                        column.column_type,
                        type_name(value)
                    ),
                ));
            }
        }
        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The schemas of the tables the studio ships with.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    tables: HashMap<String, TableSchema>,
}

impl SchemaRegistry {
    pub fn builtin() -> Self {
        use ColumnType::*;

        let mut tables = HashMap::new();
        for schema in [
            TableSchema::new(
                "workout_templates",
                vec![
                    ColumnDef::new("id", Text),
                    ColumnDef::new("created_at", Text),
                    ColumnDef::new("name", Text).required(),
                    ColumnDef::new("template_type", Text).required(),
                    ColumnDef::new("category", Text),
                    ColumnDef::new("description", Text),
                    ColumnDef::new("created_by", Text),
                    ColumnDef::new("updated_at", Text),
                ],
            ),
            TableSchema::new(
                "template_blocks",
                vec![
                    ColumnDef::new("id", Text),
                    ColumnDef::new("created_at", Text),
                    ColumnDef::new("template_id", Text).required(),
                    ColumnDef::new("block_order", Integer).required(),
                    ColumnDef::new("block_name", Text),
                    ColumnDef::new("rounds", Integer),
                    ColumnDef::new("ai_description", Text),
                ],
            ),
            TableSchema::new(
                "template_exercises",
                vec![
                    ColumnDef::new("id", Text),
                    ColumnDef::new("created_at", Text),
                    ColumnDef::new("block_id", Text).required(),
                    ColumnDef::new("exercise_name", Text).required(),
                    ColumnDef::new("exercise_order", Integer).required(),
                    ColumnDef::new("reps", Integer),
                    ColumnDef::new("weight", Float),
                    ColumnDef::new("is_bodyweight", Boolean),
                    ColumnDef::new("notes", Text),
                ],
            ),
            TableSchema::new(
                "programs",
                vec![
                    ColumnDef::new("id", Text),
                    ColumnDef::new("created_at", Text),
                    ColumnDef::new("name", Text).required(),
                    ColumnDef::new("description", Text),
                    ColumnDef::new("duration_weeks", Integer).required(),
                    ColumnDef::new("sessions_per_week", Integer).required(),
                    ColumnDef::new("skill_level", Text).required(),
                    ColumnDef::new("is_active", Boolean),
                    ColumnDef::new("created_by", Text),
                    ColumnDef::new("updated_at", Text),
                ],
            ),
            TableSchema::new(
                "classes",
                vec![
                    ColumnDef::new("id", Text),
                    ColumnDef::new("created_at", Text),
                    ColumnDef::new("name", Text).required(),
                    ColumnDef::new("class_date", Text).required(),
                    ColumnDef::new("class_time", Text).required(),
                    ColumnDef::new("duration_minutes", Integer).required(),
                    ColumnDef::new("intensity", Text).required(),
                    ColumnDef::new("max_participants", Integer).required(),
                    ColumnDef::new("current_enrolled", Integer),
                    ColumnDef::new("description", Text),
                    ColumnDef::new("ai_generated_description", Text),
                    ColumnDef::new("focus_area", Text),
                    ColumnDef::new("coach_id", Text),
                    ColumnDef::new("program_id", Text),
                    ColumnDef::new("template_id", Text),
                    ColumnDef::new("created_by", Text),
                    ColumnDef::new("updated_at", Text),
                ],
            ),
            TableSchema::new(
                "class_enrollments",
                vec![
                    ColumnDef::new("id", Text),
                    ColumnDef::new("created_at", Text),
                    ColumnDef::new("class_id", Text).required(),
                    ColumnDef::new("user_id", Text).required(),
                    ColumnDef::new("enrolled_at", Text),
                ],
            ),
            TableSchema::new(
                "coaches",
                vec![
                    ColumnDef::new("id", Text),
                    ColumnDef::new("created_at", Text),
                    ColumnDef::new("name", Text).required(),
                    ColumnDef::new("title", Text),
                    ColumnDef::new("specialty", Text),
                    ColumnDef::new("specialties", Text),
                    ColumnDef::new("bio", Text),
                    ColumnDef::new("experience", Text),
                    ColumnDef::new("email", Text),
                    ColumnDef::new("phone", Text),
                    ColumnDef::new("certifications", Text),
                    ColumnDef::new("avatar_url", Text),
                    ColumnDef::new("user_id", Text),
                    ColumnDef::new("updated_at", Text),
                ],
            ),
        ] {
            tables.insert(schema.name().to_string(), schema);
        }

        Self { tables }
    }

    pub fn get(&self, table: &str) -> Option<&TableSchema> {
        self.tables.get(table)
    }

    /// Unschema'd tables (anything created implicitly) validate to Ok.
    pub fn validate_insert(&self, table: &str, record: &Record) -> Result<()> {
        match self.get(table) {
            Some(schema) => schema.validate_insert(record),
            None => Ok(()),
        }
    }

    pub fn validate_update(&self, table: &str, partial: &Record) -> Result<()> {
        match self.get(table) {
            Some(schema) => schema.validate_update(partial),
            None => Ok(()),
        }
    }
}
