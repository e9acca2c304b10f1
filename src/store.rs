//! BookStore trait - the operations every book store backend provides.
//!
//! Also home to update validation: an update arrives as the query-string
//! model (field name to one or more text values) and is turned into a typed
//! [`BookPatch`] before any store state is touched.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::book::{self, Book, Status, MAX_RATING, MIN_RATING};
use crate::error::{BookError, Result};
use crate::watch::{WatchFilter, WatchStream};

/// Update input: field name to every value supplied for it. A name may repeat
/// in a query string, hence the `Vec`.
pub type UpdateFields = HashMap<String, Vec<String>>;

/// The fields an update may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookField {
    Title,
    Author,
    Publisher,
    PublishDate,
    Rating,
    Status,
}

impl BookField {
    pub fn as_str(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Publisher => "Publisher",
            BookField::PublishDate => "PublishDate",
            BookField::Rating => "Rating",
            BookField::Status => "Status",
        }
    }
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookField {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Title" => Ok(BookField::Title),
            "Author" => Ok(BookField::Author),
            "Publisher" => Ok(BookField::Publisher),
            "PublishDate" => Ok(BookField::PublishDate),
            "Rating" => Ok(BookField::Rating),
            "Status" => Ok(BookField::Status),
            other => Err(BookError::BadRequest(format!(
                "unrecognized field {other:?}"
            ))),
        }
    }
}

/// A fully validated update. Only fields that were supplied are `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub publish_date: Option<NaiveDate>,
    pub rating: Option<u8>,
    pub status: Option<Status>,
}

impl BookPatch {
    /// Validate the whole input set.
    ///
    /// Every problem found is reported in one `BadRequest`, one per line,
    /// ordered by field name. `Title` alone may carry zero values, in which
    /// case the title is left as it is; every other field needs exactly one.
    pub fn from_fields(fields: &UpdateFields) -> Result<Self> {
        if fields.is_empty() {
            return Err(BookError::BadRequest("nothing to do".to_string()));
        }

        let mut entries: Vec<(&String, &Vec<String>)> = fields.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut patch = BookPatch::default();
        let mut problems = Vec::new();

        for (name, values) in entries {
            let field = match name.parse::<BookField>() {
                Ok(field) => field,
                Err(BookError::BadRequest(msg)) => {
                    problems.push(msg);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let value = match (field, values.as_slice()) {
                (BookField::Title, []) => continue,
                (_, [value]) => value.as_str(),
                (_, []) => {
                    problems.push(format!("{field} requires a value"));
                    continue;
                }
                (_, many) => {
                    problems.push(format!(
                        "{field} given {} values, expected exactly one",
                        many.len()
                    ));
                    continue;
                }
            };

            if let Err(msg) = patch.set(field, value) {
                problems.push(msg);
            }
        }

        if problems.is_empty() {
            Ok(patch)
        } else {
            Err(BookError::BadRequest(problems.join("\n")))
        }
    }

    fn set(&mut self, field: BookField, value: &str) -> std::result::Result<(), String> {
        match field {
            BookField::Title => self.title = Some(value.to_string()),
            BookField::Author => self.author = Some(value.to_string()),
            BookField::Publisher => self.publisher = Some(value.to_string()),
            BookField::PublishDate => {
                let date = book::parse_date(value).map_err(|_| {
                    format!("PublishDate {value:?} is not a date like 2011-Jan-11")
                })?;
                self.publish_date = Some(date);
            }
            BookField::Rating => {
                let rating: i64 = value
                    .parse()
                    .map_err(|_| format!("Rating {value:?} is not an integer"))?;
                if !book::rating_in_range(rating) {
                    return Err(format!(
                        "Rating {rating} out of range, must be {MIN_RATING} to {MAX_RATING}"
                    ));
                }
                self.rating = u8::try_from(rating).ok();
            }
            BookField::Status => {
                self.status = Some(value.parse::<Status>().map_err(|e| e.to_string())?);
            }
        }
        Ok(())
    }

    /// Write every supplied field into `book`.
    pub fn apply(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title.clone_from(title);
        }
        if let Some(author) = &self.author {
            book.author.clone_from(author);
        }
        if let Some(publisher) = &self.publisher {
            book.publisher.clone_from(publisher);
        }
        if let Some(date) = self.publish_date {
            book.publish_date = date;
        }
        if let Some(rating) = self.rating {
            book.rating = rating;
        }
        if let Some(status) = self.status {
            book.status = status;
        }
    }
}

/// Build the update input for a single-valued field set.
pub fn fields<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> UpdateFields {
    let mut fields = UpdateFields::new();
    for (name, value) in pairs {
        fields
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }
    fields
}

/// The core book store trait.
///
/// Operations on the same identifier are linearizable; operations on
/// different identifiers carry no ordering guarantee.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a default book at `id`.
    ///
    /// Returns `Conflict` carrying the existing book, untouched, if `id` is
    /// already occupied.
    async fn create(&self, id: u64) -> Result<Book>;

    /// Get a snapshot of the book at `id`.
    async fn get(&self, id: u64) -> Result<Book>;

    /// Remove the book at `id`, returning it as it was just before removal.
    async fn delete(&self, id: u64) -> Result<Book>;

    /// Validate `fields` in full, then apply them to the book at `id`.
    ///
    /// Nothing is applied unless every field validates. Requesting the status
    /// the book already has is a `Conflict`.
    async fn update(&self, id: u64, fields: &UpdateFields) -> Result<Book>;

    /// Watch for committed changes.
    fn watch(&self, filter: WatchFilter) -> Result<WatchStream>;

    /// Check if a book exists at `id`.
    async fn exists(&self, id: u64) -> Result<bool> {
        match self.get(id).await {
            Ok(_) => Ok(true),
            Err(BookError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn check_out(&self, id: u64) -> Result<Book> {
        self.update(id, &fields([("Status", Status::CheckedOut.as_str())]))
            .await
    }

    async fn check_in(&self, id: u64) -> Result<Book> {
        self.update(id, &fields([("Status", Status::CheckedIn.as_str())]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bad_request_message(result: Result<BookPatch>) -> String {
        match result {
            Err(BookError::BadRequest(msg)) => msg,
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_field_names() {
        for name in ["Title", "Author", "Publisher", "PublishDate", "Rating", "Status"] {
            let field: BookField = name.parse().unwrap();
            assert_eq!(field.as_str(), name);
        }
        assert!("title".parse::<BookField>().is_err());
        assert!("Herbal".parse::<BookField>().is_err());
    }

    #[test]
    fn test_full_patch() {
        let patch = BookPatch::from_fields(&fields([
            ("Title", "Napkin Manifesto"),
            ("Author", "Pickles Rondeau"),
            ("Rating", "1"),
            ("Status", "CheckedOut"),
            ("PublishDate", "2011-Jan-11"),
        ]))
        .unwrap();

        assert_eq!(patch.title.as_deref(), Some("Napkin Manifesto"));
        assert_eq!(patch.author.as_deref(), Some("Pickles Rondeau"));
        assert!(patch.publisher.is_none());
        assert_eq!(patch.publish_date, NaiveDate::from_ymd_opt(2011, 1, 11));
        assert_eq!(patch.rating, Some(1));
        assert_eq!(patch.status, Some(Status::CheckedOut));
    }

    #[test]
    fn test_empty_fields() {
        let msg = bad_request_message(BookPatch::from_fields(&UpdateFields::new()));
        assert_eq!(msg, "nothing to do");
    }

    #[test]
    fn test_unrecognized_field_names_the_key() {
        let msg = bad_request_message(BookPatch::from_fields(&fields([
            ("Author", "Pie Rondeau"),
            ("Herbal", "No Thanks"),
        ])));
        assert!(msg.contains("Herbal"));
    }

    #[test]
    fn test_rating_bounds() {
        for ok in ["1", "2", "3"] {
            assert!(BookPatch::from_fields(&fields([("Rating", ok)])).is_ok());
        }
        for bad in ["0", "4", "5", "-1"] {
            let msg = bad_request_message(BookPatch::from_fields(&fields([("Rating", bad)])));
            assert!(msg.contains("1 to 3"), "{msg}");
        }
        let msg = bad_request_message(BookPatch::from_fields(&fields([("Rating", "two")])));
        assert!(msg.contains("not an integer"));
    }

    #[test]
    fn test_bad_status_literal() {
        let msg = bad_request_message(BookPatch::from_fields(&fields([("Status", "Lost")])));
        assert!(msg.contains("Lost"));
    }

    #[test]
    fn test_bad_date() {
        let msg = bad_request_message(BookPatch::from_fields(&fields([(
            "PublishDate",
            "Sometime yesterday afternoon",
        )])));
        assert!(msg.contains("PublishDate"));
    }

    #[test]
    fn test_value_counts() {
        let mut input = UpdateFields::new();
        input.insert("Title".to_string(), vec![]);
        let patch = BookPatch::from_fields(&input).unwrap();
        assert!(patch.title.is_none());

        let mut input = UpdateFields::new();
        input.insert("Author".to_string(), vec![]);
        let msg = bad_request_message(BookPatch::from_fields(&input));
        assert!(msg.contains("Author requires a value"));

        let input = fields([("Rating", "1"), ("Rating", "2")]);
        let msg = bad_request_message(BookPatch::from_fields(&input));
        assert!(msg.contains("Rating given 2 values"));
    }

    #[test]
    fn test_every_problem_reported() {
        let msg = bad_request_message(BookPatch::from_fields(&fields([
            ("Rating", "9"),
            ("Status", "Gone"),
            ("Herbal", "No Thanks"),
            ("Title", "Fine"),
        ])));
        let lines: Vec<&str> = msg.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Herbal"));
        assert!(lines[1].contains("Rating"));
        assert!(lines[2].contains("Gone"));
    }

    #[test]
    fn test_apply_touches_only_supplied_fields() {
        let mut book = Book::new();
        let before = book.clone();

        let patch = BookPatch::from_fields(&fields([("Author", "Pickles Rondeau")])).unwrap();
        patch.apply(&mut book);

        assert_eq!(book.author, "Pickles Rondeau");
        assert_eq!(book.title, before.title);
        assert_eq!(book.publish_date, before.publish_date);
        assert_eq!(book.status, before.status);
    }
}
