//! Local display state for one page of the roster.
//!
//! The view never asks the server on its own. It applies pages it is handed
//! and patches itself after each mutation the caller made. When patching is
//! not enough it answers [`Followup::Refetch`] so the caller reloads the
//! (possibly changed) current page.

use std::fmt;

use crate::astronaut::Astronaut;
use crate::store::Page;

/// What the caller should do after a local patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Followup {
    Nothing,
    /// Fetch [`RosterView::page`] again and [`apply`](RosterView::apply_page) it.
    Refetch,
}

#[derive(Clone, Debug)]
pub struct RosterView {
    page: u32,
    max_pages: u32,
    rows: Vec<Astronaut>,
    page_size: usize,
}

impl RosterView {
    pub fn new(page_size: usize) -> Self {
        Self { page: 1, max_pages: 1, rows: Vec::new(), page_size: page_size.max(1) }
    }

    pub fn page(&self) -> u32 { self.page }
    pub fn max_pages(&self) -> u32 { self.max_pages }
    pub fn rows(&self) -> &[Astronaut] { &self.rows }

    /// Replaces the rows with a page fetched from the server.
    pub fn apply_page(&mut self, page: Page) {
        self.max_pages = u32::try_from(page.total_pages).unwrap_or(u32::MAX).max(1);
        if let Ok(current) = u32::try_from(page.current) {
            self.page = current.max(1);
        }
        self.rows = page.data;
    }

    pub fn can_go_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.page < self.max_pages
    }

    /// Moves one page forward. Returns whether the page changed.
    pub fn next_page(&mut self) -> bool {
        let moved = self.can_go_next();
        if moved {
            self.page += 1;
        }
        moved
    }

    /// Moves one page back. Returns whether the page changed.
    pub fn prev_page(&mut self) -> bool {
        let moved = self.can_go_prev();
        if moved {
            self.page -= 1;
        }
        moved
    }

    /// A new record always lands at the end of the roster, so only the last
    /// page can show it. A full last page means a new page now exists.
    pub fn record_created(&mut self, astronaut: Astronaut) {
        if self.page != self.max_pages {
            return;
        }
        if self.rows.len() < self.page_size {
            self.rows.push(astronaut);
        } else {
            self.max_pages += 1;
        }
    }

    /// Swaps in the server's copy of an edited record.
    pub fn record_updated(&mut self, astronaut: Astronaut) {
        if let Some(row) = self.rows.iter_mut().find(|a| a.id == astronaut.id) {
            *row = astronaut;
        }
    }

    /// Drops a deleted record. Emptying the page sends the view back to
    /// page 1, which then has to be reloaded.
    pub fn record_removed(&mut self, id: u64) -> Followup {
        let before = self.rows.len();
        self.rows.retain(|a| a.id != id);
        if before > 0 && self.rows.is_empty() {
            self.page = 1;
            Followup::Refetch
        } else {
            Followup::Nothing
        }
    }
}

/// `YYYY-MM-DD` as `D. M. YYYY`; anything else is shown as-is.
fn display_date(date: &str) -> String {
    let mut parts = date.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(y), Some(m), Some(d)) => match (y.parse::<u32>(), m.parse::<u32>(), d.parse::<u32>()) {
            (Ok(y), Ok(m), Ok(d)) => format!("{d}. {m}. {y}"),
            _ => date.to_owned(),
        },
        _ => date.to_owned(),
    }
}

impl fmt::Display for RosterView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return writeln!(f, "There are no astronauts present!");
        }

        let header = ["ID", "First Name", "Last Name", "Birth Date", "Super Power"];
        let cells: Vec<[String; 5]> = self.rows.iter()
            .map(|a| [
                a.id.to_string(),
                a.first_name.clone(),
                a.last_name.clone(),
                display_date(&a.birthdate),
                a.superpower.clone(),
            ])
            .collect();

        let mut widths = header.map(|h| h.chars().count());
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |f: &mut fmt::Formatter<'_>, row: &[&str]| -> fmt::Result {
            let padded: Vec<String> = row.iter().zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect();
            writeln!(f, "{}", padded.join("  ").trim_end())
        };

        line(f, &header)?;
        for row in &cells {
            line(f, &row.each_ref().map(String::as_str))?;
        }
        writeln!(f, "Page {} of {}", self.page, self.max_pages)
    }
}
