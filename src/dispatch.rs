//! Transport-neutral request dispatch.
//!
//! Maps a method, a path of the form `<prefix><id>` and the parsed query
//! fields onto exactly one [`BookStore`] operation, then maps the outcome
//! onto a status code and body. The transport itself (listening, query
//! decoding, writing the response) lives outside this crate.

use std::fmt;
use tracing::debug;

use crate::book::Book;
use crate::config::StoreConfig;
use crate::error::{BookError, Result};
use crate::store::{BookStore, UpdateFields};

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_METHOD_NOT_ALLOWED: u16 = 405;
pub const STATUS_CONFLICT: u16 = 409;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

/// Request method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Other(String),
}

/// Method tokens are case-sensitive: `get` is not `GET`.
impl From<&str> for Method {
    fn from(method: &str) -> Self {
        match method {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            _ => Method::Other(method.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
            Method::Put => f.write_str("PUT"),
            Method::Delete => f.write_str("DELETE"),
            Method::Other(other) => f.write_str(other),
        }
    }
}

/// Outcome of a dispatched request, ready for the transport to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// `None` when the body is empty.
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl Response {
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: String::new(),
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Some(CONTENT_TYPE_TEXT),
            body: body.into(),
        }
    }

    /// A JSON response carrying `book`. Encoding failure becomes a 500.
    pub fn json(status: u16, book: &Book) -> Self {
        match book.to_json() {
            Ok(body) => Self {
                status,
                content_type: Some(CONTENT_TYPE_JSON),
                body,
            },
            Err(e) => Self::text(STATUS_INTERNAL_ERROR, e.to_string()),
        }
    }

    /// Map a store outcome; `success` is the status used for `Ok`.
    pub fn from_result(result: Result<Book>, success: u16) -> Self {
        match result {
            Ok(book) => Self::json(success, &book),
            Err(BookError::NotFound(_)) => Self::empty(STATUS_NOT_FOUND),
            Err(BookError::Conflict { current, .. }) => Self::json(STATUS_CONFLICT, &current),
            Err(BookError::BadRequest(msg)) => Self::text(STATUS_BAD_REQUEST, msg),
            Err(e @ BookError::Serialization(_)) => {
                Self::text(STATUS_INTERNAL_ERROR, e.to_string())
            }
        }
    }
}

/// Front door for a shared store.
#[derive(Debug, Clone)]
pub struct Dispatcher<S> {
    store: S,
    prefix: String,
}

impl<S: BookStore> Dispatcher<S> {
    pub fn new(store: S, config: &StoreConfig) -> Self {
        Self {
            store,
            prefix: config.book_path_prefix.clone(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Extract the identifier from `path`, if it names a book.
    pub fn parse_id(&self, path: &str) -> Option<u64> {
        path.strip_prefix(self.prefix.as_str())?.parse().ok()
    }

    /// Handle one request. `fields` is only consulted for `PUT`.
    pub async fn handle(&self, method: &Method, path: &str, fields: &UpdateFields) -> Response {
        let response = match self.parse_id(path) {
            None => Response::empty(STATUS_NOT_FOUND),
            Some(id) => match method {
                Method::Post => Response::from_result(self.store.create(id).await, STATUS_CREATED),
                Method::Get => Response::from_result(self.store.get(id).await, STATUS_OK),
                Method::Put => {
                    Response::from_result(self.store.update(id, fields).await, STATUS_OK)
                }
                Method::Delete => Response::from_result(self.store.delete(id).await, STATUS_OK),
                Method::Other(_) => Response::empty(STATUS_METHOD_NOT_ALLOWED),
            },
        };
        debug!(%method, path, status = response.status, "request dispatched");
        response
    }
}
