//! The in-memory astronaut roster.
//!
//! An ordered `Vec` plus a monotonically increasing ID counter, both behind
//! one lock. Nothing is persisted: the roster lives exactly as long as the
//! process.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::astronaut::{Astronaut, AstronautFields};

/// Records per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// One page of the roster as served by `GET /astronauts/{page}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub total_pages: usize,
    /// The 1-indexed page number, or `-1` when the roster is empty.
    pub current: i64,
    pub data: Vec<Astronaut>,
}

impl Page {
    fn empty() -> Self {
        Self { total_pages: 1, current: -1, data: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("page {requested} does not exist ({total} pages)")]
    PageOutOfRange { requested: i64, total: usize },
    #[error("astronaut with ID {0} not found")]
    NotFound(u64),
}

struct Inner {
    astronauts: Vec<Astronaut>,
    next_id: u64,
}

pub struct Roster {
    inner: RwLock<Inner>,
    page_size: usize,
}

impl Roster {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// A roster paging `page_size` records at a time (at least 1).
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            inner: RwLock::new(Inner { astronauts: Vec::new(), next_id: 1 }),
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn len(&self) -> usize {
        self.inner.read().astronauts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: u64) -> bool {
        self.inner.read().astronauts.iter().any(|a| a.id == id)
    }

    /// A copy of every record in roster order.
    pub fn snapshot(&self) -> Vec<Astronaut> {
        self.inner.read().astronauts.clone()
    }

    /// Returns page `requested` (page 1 when `None`).
    ///
    /// An empty roster always answers the placeholder page
    /// `{ totalPages: 1, current: -1, data: [] }`, whatever was asked for.
    pub fn page(&self, requested: Option<i64>) -> Result<Page, StoreError> {
        let inner = self.inner.read();
        let total = inner.astronauts.len();
        if total == 0 {
            return Ok(Page::empty());
        }

        let total_pages = total.div_ceil(self.page_size);
        let page = requested.unwrap_or(1);
        if page < 1 || page as u64 > total_pages as u64 {
            return Err(StoreError::PageOutOfRange { requested: page, total: total_pages });
        }

        let from = (page as usize - 1) * self.page_size;
        let to = (from + self.page_size).min(total);
        Ok(Page {
            total_pages,
            current: page,
            data: inner.astronauts[from..to].to_vec(),
        })
    }

    /// Appends a new record under the next free ID.
    pub fn create(&self, fields: AstronautFields) -> Astronaut {
        let mut inner = self.inner.write();
        Self::push(&mut inner, fields)
    }

    /// Replaces the fields of record `id` in place. ID and position are kept.
    pub fn update(&self, id: u64, fields: AstronautFields) -> Result<Astronaut, StoreError> {
        let mut inner = self.inner.write();
        let slot = inner.astronauts.iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound(id))?;
        *slot = fields.with_id(id);
        Ok(slot.clone())
    }

    /// Removes record `id`, preserving the order of the rest.
    pub fn delete(&self, id: u64) -> Result<Astronaut, StoreError> {
        let mut inner = self.inner.write();
        let index = inner.astronauts.iter()
            .position(|a| a.id == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(inner.astronauts.remove(index))
    }

    /// Appends every example under fresh IDs, in order.
    pub fn seed(&self, examples: impl IntoIterator<Item = AstronautFields>) -> Vec<Astronaut> {
        let mut inner = self.inner.write();
        examples.into_iter().map(|fields| Self::push(&mut inner, fields)).collect()
    }

    fn push(inner: &mut Inner, fields: AstronautFields) -> Astronaut {
        let astronaut = fields.with_id(inner.next_id);
        inner.next_id += 1;
        inner.astronauts.push(astronaut.clone());
        astronaut
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}
