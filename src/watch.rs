//! Change notifications for books held in a store.
//!
//! Events are published only after a mutation has been committed, so a
//! subscriber never sees a change that was later rejected.

use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;

use crate::book::Book;

/// Type of change that occurred to a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    /// Book was created (the id was free before).
    Created,
    /// Book was updated in place.
    Updated,
    /// Book was deleted.
    Deleted,
}

/// A committed change to one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookChange {
    /// The identifier that changed.
    pub id: u64,
    /// Type of change.
    pub event_type: EventType,
    /// Record before the change (updates and deletes).
    pub old: Option<Book>,
    /// Record after the change (creates and updates).
    pub new: Option<Book>,
}

impl BookChange {
    pub fn created(id: u64, book: Book) -> Self {
        Self {
            id,
            event_type: EventType::Created,
            old: None,
            new: Some(book),
        }
    }

    pub fn updated(id: u64, old: Book, new: Book) -> Self {
        Self {
            id,
            event_type: EventType::Updated,
            old: Some(old),
            new: Some(new),
        }
    }

    pub fn deleted(id: u64, old: Book) -> Self {
        Self {
            id,
            event_type: EventType::Deleted,
            old: Some(old),
            new: None,
        }
    }
}

/// Which identifiers a [`WatchStream`] reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchFilter {
    /// Every identifier.
    All,
    /// A single identifier.
    Id(u64),
}

impl WatchFilter {
    fn matches(self, id: u64) -> bool {
        match self {
            WatchFilter::All => true,
            WatchFilter::Id(watched) => watched == id,
        }
    }
}

/// A stream of book changes passing a filter.
///
/// Waits on the channel with the polling task's waker; an idle stream costs
/// nothing until a change arrives.
pub struct WatchStream {
    inner: BroadcastStream<BookChange>,
    filter: WatchFilter,
}

impl WatchStream {
    pub fn new(receiver: broadcast::Receiver<BookChange>, filter: WatchFilter) -> Self {
        Self {
            inner: BroadcastStream::new(receiver),
            filter,
        }
    }

    pub fn filter(&self) -> WatchFilter {
        self.filter
    }
}

impl Stream for WatchStream {
    type Item = BookChange;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match ready!(Pin::new(&mut self.inner).poll_next(cx)) {
                Some(Ok(change)) => {
                    if self.filter.matches(change.id) {
                        return Poll::Ready(Some(change));
                    }
                }
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    tracing::debug!(skipped, "watch subscriber lagged");
                }
                None => return Poll::Ready(None),
            }
        }
    }
}

/// Handle for publishing book changes to subscribers.
#[derive(Clone)]
pub struct WatchSender {
    sender: broadcast::Sender<BookChange>,
}

impl WatchSender {
    /// Create a new watch sender with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish a change. Having no subscribers is not an error.
    pub fn send(&self, change: BookChange) {
        let _ = self.sender.send(change);
    }

    pub fn subscribe(&self, filter: WatchFilter) -> WatchStream {
        WatchStream::new(self.sender.subscribe(), filter)
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for WatchSender {
    fn default() -> Self {
        Self::new(1024)
    }
}
