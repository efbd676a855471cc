use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `items` table.
///
/// `photo` is the stored file name inside the cache directory, not the image
/// itself; it is returned to clients as-is.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub photo: Option<String>,
}

/// Values for a new row. The id is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub photo: Option<String>,
}

/// Partial update: `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ItemUpdate {
    /// Apply the update to an item in memory, with the same semantics as the
    /// `COALESCE` statement used against Postgres.
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(ref name) = self.name {
            item.name = name.clone();
        }
        if let Some(ref description) = self.description {
            item.description = Some(description.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drill() -> Item {
        Item {
            id: 1,
            name: "Drill".to_string(),
            description: Some("18V".to_string()),
            photo: None,
        }
    }

    #[test]
    fn update_with_description_only_keeps_name() {
        let mut item = drill();
        ItemUpdate {
            name: None,
            description: Some("24V".to_string()),
        }
        .apply_to(&mut item);
        assert_eq!(item.name, "Drill");
        assert_eq!(item.description.as_deref(), Some("24V"));
    }

    #[test]
    fn empty_update_leaves_item_unchanged() {
        let mut item = drill();
        ItemUpdate::default().apply_to(&mut item);
        assert_eq!(item, drill());
    }

    #[test]
    fn explicit_null_is_treated_as_absent() {
        let update: ItemUpdate =
            serde_json::from_str(r#"{"name": null, "description": "cordless"}"#).unwrap();
        assert_eq!(update.name, None);
        assert_eq!(update.description.as_deref(), Some("cordless"));
    }

    #[test]
    fn item_serializes_with_null_photo() {
        let json = serde_json::to_value(drill()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "name": "Drill", "description": "18V", "photo": null})
        );
    }
}
