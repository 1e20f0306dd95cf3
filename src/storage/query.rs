//! Filter and update builders.
//!
//! Deliberately small: a filter is one field compared for equality, an update
//! is a `$set` of one or more fields.

use std::fmt;

use mongodb::bson::{doc, Bson, Document};

/// Single-field equality filter (`{ field: value }`).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    field: String,
    value: Bson,
}

impl FieldFilter {
    /// Matches documents whose `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        FieldFilter {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        filter.insert(self.field.clone(), self.value.clone());
        filter
    }
}

impl fmt::Display for FieldFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.value)
    }
}

/// `$set` update over one or more fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    fields: Document,
}

impl FieldUpdate {
    /// Sets `field` to `value` on every matched document.
    pub fn set(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        let mut fields = Document::new();
        fields.insert(field, value);
        FieldUpdate { fields }
    }

    /// Adds another field to the same `$set`.
    pub fn and_set(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.fields.insert(field, value);
        self
    }

    pub fn to_document(&self) -> Document {
        doc! { "$set": self.fields.clone() }
    }
}

impl fmt::Display for FieldUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .fields
            .iter()
            .map(|(field, value)| format!("{field}={value}"))
            .collect();
        write!(f, "{}", pairs.join("&"))
    }
}

/// Outcome of an update: documents matched by the filter and documents actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub matched: u64,
    pub modified: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_document() {
        let filter = FieldFilter::eq("velocity", 200_i64);
        assert_eq!(filter.to_document(), doc! { "velocity": 200_i64 });
    }

    #[test]
    fn test_single_field_update_document() {
        let update = FieldUpdate::set("capacity", 12_i64);
        assert_eq!(
            update.to_document(),
            doc! { "$set": { "capacity": 12_i64 } }
        );
    }

    #[test]
    fn test_two_field_update_document() {
        let update = FieldUpdate::set("last_lat", 41.9).and_set("last_long", -87.6);
        assert_eq!(
            update.to_document(),
            doc! { "$set": { "last_lat": 41.9, "last_long": -87.6 } }
        );
        assert_eq!(update.to_string(), "last_lat=41.9&last_long=-87.6");
    }
}
