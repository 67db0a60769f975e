//! Database models for save slots.

use super::schema;
use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

/// A stored save slot.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::save_slots)]
pub struct SaveSlot {
    key: String,
    payload: String,
    updated_at: NaiveDateTime,
}

/// Insertable save slot.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::save_slots)]
pub struct NewSaveSlot {
    key: String,
    payload: String,
    updated_at: NaiveDateTime,
}
