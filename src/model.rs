use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// Column names live here and in the queries only; the JSON shape is owned by serde.
impl<'r> FromRow<'r, PgRow> for Contact {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Contact {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }
}

/// Body of `POST /contacts`. Absent fields become empty strings; `id` and
/// timestamps sent by the client are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

/// Body of `PUT /contacts/:id`.
///
/// `None` (field absent or `null`) leaves the column untouched, while
/// `Some("")` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

// Mirrors the `COALESCE` update in `PgContactStore::update_fields`.
#[cfg(test)]
impl ContactPatch {
    pub fn apply_to(&self, contact: &mut Contact) {
        if let Some(name) = &self.name {
            contact.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            contact.phone = phone.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Contact {
        let now = Utc::now();
        Contact {
            id: 1,
            name: "Alice".to_string(),
            phone: "123".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn new_contact_ignores_server_assigned_fields() {
        let body = r#"{"id":42,"name":"Bob","phone":"555","created_at":"2020-01-01T00:00:00Z"}"#;
        let new_contact: NewContact = serde_json::from_str(body).unwrap();
        assert_eq!(new_contact.name, "Bob");
        assert_eq!(new_contact.phone, "555");
    }

    #[test]
    fn new_contact_rejects_wrong_types() {
        assert!(serde_json::from_str::<NewContact>(r#"{"name":1,"phone":"555"}"#).is_err());
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut contact = alice();
        let patch: ContactPatch = serde_json::from_str(r#"{"phone":"456"}"#).unwrap();
        patch.apply_to(&mut contact);
        assert_eq!(contact.name, "Alice");
        assert_eq!(contact.phone, "456");
    }

    #[test]
    fn patch_distinguishes_cleared_from_absent() {
        let mut contact = alice();
        let patch: ContactPatch = serde_json::from_str(r#"{"name":"","phone":null}"#).unwrap();
        patch.apply_to(&mut contact);
        assert_eq!(contact.name, "");
        assert_eq!(contact.phone, "123");
    }

    #[test]
    fn contact_serializes_with_snake_case_fields() {
        let value = serde_json::to_value(alice()).unwrap();
        for key in ["id", "name", "phone", "created_at", "updated_at", "deleted_at"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert!(value["deleted_at"].is_null());
    }
}
