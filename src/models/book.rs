//! Book model, create/update requests and partial-update merging

use chrono::{DateTime, Datelike, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Earliest accepted publication year
pub const MIN_PUBLICATION_YEAR: i32 = 1;

/// Book record as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub publishing_house: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated field set for a new book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub publishing_house: String,
}

/// Mutable fields supplied by a partial update. `None` means "keep the stored value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publication_year: Option<i32>,
    pub publishing_house: Option<String>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.publication_year.is_none()
            && self.publishing_house.is_none()
    }
}

impl Book {
    /// Build a fresh record with a new id; both timestamps are `now`
    pub fn new(data: NewBook, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: data.title,
            author: data.author,
            publication_year: data.publication_year,
            publishing_house: data.publishing_house,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the supplied fields and stamp the modification time.
    ///
    /// `updated_at` never moves backwards, even if the wall clock does.
    pub fn apply(&mut self, patch: &BookPatch, now: DateTime<Utc>) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(ref author) = patch.author {
            self.author = author.clone();
        }
        if let Some(year) = patch.publication_year {
            self.publication_year = year;
        }
        if let Some(ref house) = patch.publishing_house {
            self.publishing_house = house.clone();
        }
        self.updated_at = now.max(self.updated_at);
    }
}

/// Current time at the precision Postgres stores (microseconds)
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Publication year as sent by clients: a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum YearInput {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl YearInput {
    /// Parse and range-check the year
    pub fn parse(&self) -> AppResult<i32> {
        let year = match self {
            YearInput::Number(n) => i32::try_from(*n).ok(),
            YearInput::Text(s) => s.trim().parse::<i32>().ok(),
            YearInput::Other(_) => None,
        }
        .ok_or_else(|| {
            AppError::Validation("Publication year must be an integer".to_string())
        })?;

        let max_year = Utc::now().year() + 1;
        if !(MIN_PUBLICATION_YEAR..=max_year).contains(&year) {
            return Err(AppError::Validation(format!(
                "Publication year must be between {} and {}",
                MIN_PUBLICATION_YEAR, max_year
            )));
        }
        Ok(year)
    }
}

impl From<i32> for YearInput {
    fn from(year: i32) -> Self {
        YearInput::Number(i64::from(year))
    }
}

/// Create book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(
        required(message = "Title is required"),
        length(min = 1, message = "Title cannot be empty")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "Author is required"),
        length(min = 1, message = "Author cannot be empty")
    )]
    pub author: Option<String>,
    /// Integer, or a string holding an integer
    #[schema(value_type = Option<i32>)]
    pub publication_year: Option<YearInput>,
    #[validate(
        required(message = "Publishing house is required"),
        length(min = 1, message = "Publishing house cannot be empty")
    )]
    pub publishing_house: Option<String>,
}

impl CreateBook {
    /// Trim, validate and convert into a `NewBook`
    pub fn into_new_book(self) -> AppResult<NewBook> {
        let request = Self {
            title: trimmed(self.title),
            author: trimmed(self.author),
            publication_year: self.publication_year,
            publishing_house: trimmed(self.publishing_house),
        };
        request.validate()?;

        let publication_year = request
            .publication_year
            .as_ref()
            .ok_or_else(|| AppError::Validation("Publication year is required".to_string()))?
            .parse()?;

        Ok(NewBook {
            title: request.title.unwrap_or_default(),
            author: request.author.unwrap_or_default(),
            publication_year,
            publishing_house: request.publishing_house.unwrap_or_default(),
        })
    }
}

/// Update book request; every field is optional
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: Option<String>,
    #[schema(value_type = Option<i32>)]
    pub publication_year: Option<YearInput>,
    #[validate(length(min = 1, message = "Publishing house cannot be empty"))]
    pub publishing_house: Option<String>,
}

impl UpdateBook {
    /// Trim, validate and convert into a `BookPatch`
    pub fn into_patch(self) -> AppResult<BookPatch> {
        let request = Self {
            title: trimmed(self.title),
            author: trimmed(self.author),
            publication_year: self.publication_year,
            publishing_house: trimmed(self.publishing_house),
        };
        request.validate()?;

        let publication_year = request
            .publication_year
            .as_ref()
            .map(YearInput::parse)
            .transpose()?;

        Ok(BookPatch {
            title: request.title,
            author: request.author,
            publication_year,
            publishing_house: request.publishing_house,
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string())
}

/// Sample records inserted when `catalog.seed_demo_books` is enabled
pub fn demo_books() -> Vec<NewBook> {
    [
        ("The Great Gatsby", "F. Scott Fitzgerald", 1925, "Charles Scribner's Sons"),
        ("1984", "George Orwell", 1949, "Secker & Warburg"),
        ("To Kill a Mockingbird", "Harper Lee", 1960, "J. B. Lippincott & Co."),
    ]
    .into_iter()
    .map(|(title, author, publication_year, publishing_house)| NewBook {
        title: title.to_string(),
        author: author.to_string(),
        publication_year,
        publishing_house: publishing_house.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn orwell() -> Book {
        Book::new(
            NewBook {
                title: "1984".into(),
                author: "George Orwell".into(),
                publication_year: 1949,
                publishing_house: "Secker & Warburg".into(),
            },
            now(),
        )
    }

    #[test]
    fn test_new_book_stamps_both_timestamps() {
        let book = orwell();
        assert_eq!(book.created_at, book.updated_at);
    }

    #[test]
    fn test_apply_merges_only_supplied_fields() {
        let mut book = orwell();
        let later = book.created_at + Duration::seconds(5);
        book.apply(
            &BookPatch {
                title: Some("Nineteen Eighty-Four".into()),
                ..Default::default()
            },
            later,
        );

        assert_eq!(book.title, "Nineteen Eighty-Four");
        assert_eq!(book.author, "George Orwell");
        assert_eq!(book.publication_year, 1949);
        assert_eq!(book.publishing_house, "Secker & Warburg");
        assert_eq!(book.updated_at, later);
    }

    #[test]
    fn test_apply_never_moves_updated_at_backwards() {
        let mut book = orwell();
        let before = book.updated_at;
        book.apply(&BookPatch::default(), before - Duration::hours(1));
        assert_eq!(book.updated_at, before);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(BookPatch::default().is_empty());
        let patch = BookPatch {
            publication_year: Some(1950),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_create_accepts_numeric_string_year() {
        let request: CreateBook = serde_json::from_value(json!({
            "title": " 1984 ",
            "author": "George Orwell",
            "publicationYear": "1949",
            "publishingHouse": "Secker & Warburg"
        }))
        .unwrap();

        let book = request.into_new_book().unwrap();
        assert_eq!(book.title, "1984");
        assert_eq!(book.publication_year, 1949);
    }

    #[test]
    fn test_create_rejects_unparseable_year() {
        let request: CreateBook = serde_json::from_value(json!({
            "title": "1984",
            "author": "George Orwell",
            "publicationYear": "nineteen forty-nine",
            "publishingHouse": "Secker & Warburg"
        }))
        .unwrap();

        assert!(matches!(request.into_new_book(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_create_rejects_non_integer_year_values() {
        for year in [json!(1949.5), json!(true), json!([1949]), json!(99999999999i64)] {
            let request: CreateBook = serde_json::from_value(json!({
                "title": "1984",
                "author": "George Orwell",
                "publicationYear": year,
                "publishingHouse": "Secker & Warburg"
            }))
            .unwrap();
            assert!(
                matches!(request.into_new_book(), Err(AppError::Validation(_))),
                "year {} should be rejected",
                year
            );
        }
    }

    #[test]
    fn test_create_rejects_out_of_range_year() {
        let far_future = Utc::now().year() + 10;
        for year in [0, -300, far_future] {
            let request = CreateBook {
                title: Some("t".into()),
                author: Some("a".into()),
                publication_year: Some(year.into()),
                publishing_house: Some("h".into()),
            };
            assert!(matches!(request.into_new_book(), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn test_create_requires_every_field() {
        let err = CreateBook {
            title: Some("1984".into()),
            author: Some("   ".into()),
            publication_year: Some(1949.into()),
            publishing_house: None,
        }
        .into_new_book()
        .unwrap_err();

        match err {
            AppError::Validation(msg) => {
                assert!(msg.contains("Author cannot be empty"), "{}", msg);
                assert!(msg.contains("Publishing house is required"), "{}", msg);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let missing_year = CreateBook {
            title: Some("1984".into()),
            author: Some("George Orwell".into()),
            publication_year: None,
            publishing_house: Some("Secker & Warburg".into()),
        };
        assert!(matches!(missing_year.into_new_book(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_request_to_patch() {
        let request: UpdateBook = serde_json::from_value(json!({
            "title": "Nineteen Eighty-Four",
            "author": null,
            "publicationYear": "1950"
        }))
        .unwrap();

        let patch = request.into_patch().unwrap();
        assert_eq!(
            patch,
            BookPatch {
                title: Some("Nineteen Eighty-Four".into()),
                author: None,
                publication_year: Some(1950),
                publishing_house: None,
            }
        );
    }

    #[test]
    fn test_update_rejects_blank_supplied_field() {
        let request = UpdateBook {
            publishing_house: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(request.into_patch(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_empty_update_request_is_empty_patch() {
        let request: UpdateBook = serde_json::from_value(json!({})).unwrap();
        assert!(request.into_patch().unwrap().is_empty());
    }

    #[test]
    fn test_book_serializes_camel_case() {
        let value = serde_json::to_value(orwell()).unwrap();
        assert_eq!(value["publicationYear"], 1949);
        assert_eq!(value["publishingHouse"], "Secker & Warburg");
        assert!(value["id"].is_string());
        assert!(value["createdAt"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_demo_books_are_valid() {
        let books = demo_books();
        assert_eq!(books.len(), 3);
        for book in books {
            let request = CreateBook {
                title: Some(book.title.clone()),
                author: Some(book.author.clone()),
                publication_year: Some(book.publication_year.into()),
                publishing_house: Some(book.publishing_house.clone()),
            };
            assert_eq!(request.into_new_book().unwrap(), book);
        }
    }
}
