//! Book (catalog entry) model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Book as stored by the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: String,
    /// Kept as text; the console never validates it
    #[serde(deserialize_with = "super::string_or_number")]
    pub copies_available: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

/// Book payload for create and update (no identifier)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub copies_available: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl Book {
    /// Case-insensitive match on title or author, verbatim match on ISBN
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.author.to_lowercase().contains(&needle)
            || self.isbn.contains(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Book {
        Book {
            id: "b1".into(),
            title: "The Left Hand of Darkness".into(),
            author: "Ursula K. Le Guin".into(),
            isbn: "978-0441478125".into(),
            category: "Fiction".into(),
            copies_available: "3".into(),
            cover_color: None,
            cover_image: None,
        }
    }

    #[test]
    fn test_search_matches_title_author_isbn() {
        let book = book();
        assert!(book.matches("left hand"));
        assert!(book.matches("LE GUIN"));
        assert!(book.matches("0441"));
        assert!(book.matches(""));
        assert!(!book.matches("tolkien"));
    }

    #[test]
    fn test_copies_available_accepts_number() {
        let book: Book = serde_json::from_str(
            r#"{"_id":"b2","title":"T","author":"A","isbn":"1","category":"C","copiesAvailable":4}"#,
        )
        .unwrap();
        assert_eq!(book.copies_available, "4");
        assert_eq!(book.cover_image, None);
    }

    #[test]
    fn test_new_book_forwards_empty_copies() {
        let payload: NewBook =
            serde_json::from_str(r#"{"title":"T","author":"A","isbn":"1","category":"C","copiesAvailable":""}"#)
                .unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["copiesAvailable"], "");
        assert!(json.get("coverImage").is_none());
    }
}
