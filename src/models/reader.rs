//! Reader (library member) model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reader {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub membership_date: String,
}

/// Reader payload for create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewReader {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub membership_date: String,
}

impl Reader {
    /// Case-insensitive match on name or email
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.email.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_matches_name_or_email() {
        let reader = Reader {
            id: "r1".into(),
            name: "Ada Lovelace".into(),
            email: "ada@club.org".into(),
            phone: "555-0100".into(),
            membership_date: "2023-05-01".into(),
        };
        assert!(reader.matches("ada"));
        assert!(reader.matches("CLUB.ORG"));
        assert!(!reader.matches("555"));
    }
}
