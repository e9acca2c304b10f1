//! # booklist
//!
//! Concurrency-safe in-memory inventory of library books, keyed by a
//! caller-supplied numeric identifier.
//!
//! - **Records**: title, author, publisher, day-precision publish date,
//!   rating (1 to 3) and borrowing status
//! - **Atomic operations**: create, get, delete, and update-with-validation,
//!   linearizable per identifier
//! - **All-or-nothing updates**: one invalid field voids the whole update
//! - **Status transitions**: `CheckedIn` and `CheckedOut` toggle; asking for
//!   the current status is a conflict
//! - **Watch/notifications**: a stream of committed changes
//!
//! The inventory lives only in memory and is lost on process exit.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use booklist::{fields, BookStore, MemoryStore, Status};
//!
//! #[tokio::main]
//! async fn main() -> booklist::Result<()> {
//!     let store = MemoryStore::new();
//!
//!     store.create(1).await?;
//!     let book = store
//!         .update(1, &fields([("Title", "Napkin Manifesto"), ("Rating", "3")]))
//!         .await?;
//!     println!("{}", book.to_json()?);
//!
//!     let book = store.check_out(1).await?;
//!     assert_eq!(book.status, Status::CheckedOut);
//!
//!     // Checking out again is rejected and carries the current record.
//!     assert!(store.check_out(1).await.unwrap_err().is_conflict());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Dispatch
//!
//! ```rust,no_run
//! use booklist::{Dispatcher, MemoryStore, Method, StoreConfig, UpdateFields};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = StoreConfig::default();
//!     let dispatcher = Dispatcher::new(MemoryStore::with_config(&config), &config);
//!
//!     let response = dispatcher
//!         .handle(&Method::Post, "/book/1", &UpdateFields::new())
//!         .await;
//!     assert_eq!(response.status, 201);
//! }
//! ```

pub mod book;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod memory;
pub mod store;
pub mod watch;

// Re-export main types
pub use book::{Book, ParseDateError, ParseStatusError, Status, DATE_FORMAT};
pub use config::StoreConfig;
pub use dispatch::{Dispatcher, Method, Response};
pub use error::{BookError, Result};
pub use memory::MemoryStore;
pub use store::{fields, BookField, BookPatch, BookStore, UpdateFields};
pub use watch::{BookChange, EventType, WatchFilter, WatchStream};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::book::{Book, Status};
    pub use crate::config::StoreConfig;
    pub use crate::dispatch::{Dispatcher, Method, Response};
    pub use crate::error::{BookError, Result};
    pub use crate::memory::MemoryStore;
    pub use crate::store::{fields, BookStore, UpdateFields};
    pub use crate::watch::{BookChange, EventType, WatchFilter, WatchStream};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStore::new();

        store.create(1).await.unwrap();
        let book = store.get(1).await.unwrap();
        assert_eq!(book.title, "Untitled");
    }

    #[tokio::test]
    async fn test_stores_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<MemoryStore>();
        assert_send_sync::<Dispatcher<MemoryStore>>();
    }
}
