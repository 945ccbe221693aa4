//! The astronaut record as it travels over the wire.

use serde::{Deserialize, Serialize};

/// Superpowers a client offers as suggestions. Any other text is accepted.
pub const SUPERPOWERS: [&str; 5] = ["Healing", "Super Speed", "Super Jump", "Invisibility", "Immortality"];

/// A stored astronaut. `id` is assigned by the [`Roster`](crate::Roster).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Astronaut {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    /// Conventionally `YYYY-MM-DD`, as produced by an HTML date input.
    pub birthdate: String,
    pub superpower: String,
}

/// Everything a client supplies for an astronaut: the record minus its ID.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AstronautFields {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: String,
    pub superpower: String,
}

impl AstronautFields {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birthdate: impl Into<String>,
        superpower: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            birthdate: birthdate.into(),
            superpower: superpower.into(),
        }
    }

    pub fn with_id(self, id: u64) -> Astronaut {
        Astronaut {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            birthdate: self.birthdate,
            superpower: self.superpower,
        }
    }
}
