//! Contact record and submission models.

use serde::{Deserialize, Serialize};

use crate::store::Collection;

/// A stored contact-form submission.
///
/// `id` and `created_at` are assigned by the store on append and are
/// immutable afterwards. Optional fields serialize as explicit `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub created_at: String,
}

impl Collection for Contact {
    const NAME: &'static str = "contacts";

    fn stamp(&mut self, id: u64, created_at: String) {
        self.id = id;
        self.created_at = created_at;
    }
}

/// Raw contact-form request body, before validation.
///
/// Every field is loosely typed as a JSON value so a type-mismatched
/// field reaches validation instead of failing at deserialization, and
/// all violations can be reported in one pass. `phone` accepts a JSON
/// number as well as a string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: Option<serde_json::Value>,
    #[serde(default)]
    pub email: Option<serde_json::Value>,
    #[serde(default)]
    pub subject: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<serde_json::Value>,
    #[serde(default)]
    pub phone: Option<serde_json::Value>,
    #[serde(default)]
    pub company: Option<serde_json::Value>,
}
