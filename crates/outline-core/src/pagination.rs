//! Lazy offset pagination over list endpoints
//!
//! A [`Paginator`] is a pull-based cursor: it fetches a page only when its
//! buffer is empty and the caller asks for the next item, so dropping it
//! early never leaves work in flight. Iteration stops after the first page
//! holding fewer than `limit` items. A page that is exactly full therefore
//! costs one extra, empty fetch.
//!
//! A failed fetch is yielded as the final item; the cursor is exhausted
//! afterwards. Create a new paginator to start over from offset 0.

use std::collections::VecDeque;

use async_trait::async_trait;
use futures::stream::{self, Stream};

use crate::error::Result;
use crate::types::ApiResponse;

/// Items requested per page
pub const PAGE_LIMIT: u32 = 25;

/// A list endpoint that can be fetched one page at a time
#[async_trait]
pub trait ListOperation: Send + Sync {
    type Item: Send;

    async fn list_page(&self, offset: u32, limit: u32) -> Result<ApiResponse<Vec<Self::Item>>>;
}

/// Cursor over every item of a list endpoint
pub struct Paginator<L: ListOperation> {
    lister: L,
    offset: u32,
    limit: u32,
    buffer: VecDeque<L::Item>,
    done: bool,
}

impl<L: ListOperation> Paginator<L> {
    pub fn new(lister: L) -> Self {
        Self::with_limit(lister, PAGE_LIMIT)
    }

    /// Use a custom page size; zero is treated as one
    pub fn with_limit(lister: L, limit: u32) -> Self {
        Self {
            lister,
            offset: 0,
            limit: limit.max(1),
            buffer: VecDeque::new(),
            done: false,
        }
    }

    /// Offset of the next page to fetch
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn is_done(&self) -> bool {
        self.done && self.buffer.is_empty()
    }

    /// Next item, fetching a new page if the buffer ran dry
    pub async fn next(&mut self) -> Option<Result<L::Item>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            if self.done {
                return None;
            }

            match self.lister.list_page(self.offset, self.limit).await {
                Ok(page) => {
                    let items = page.data.unwrap_or_default();
                    tracing::debug!(offset = self.offset, count = items.len(), "Fetched page");
                    self.done = items.len() != self.limit as usize;
                    self.offset = self.offset.saturating_add(self.limit);
                    self.buffer.extend(items);
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }

    /// Drain the cursor, stopping at the first error
    pub async fn collect_all(mut self) -> Result<Vec<L::Item>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await {
            items.push(item?);
        }
        Ok(items)
    }

    /// Adapt the cursor into a `futures::Stream`
    pub fn into_stream(self) -> impl Stream<Item = Result<L::Item>> {
        stream::unfold(self, |mut paginator| async move {
            let item = paginator.next().await?;
            Some((item, paginator))
        })
    }
}
