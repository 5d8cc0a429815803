//! Toolkit-independent multi-select state.
//!
//! [`SelectionState`] owns the marks and cursor for one round; a front end
//! translates its input into [`SelectionEvent`]s and renders from
//! [`SelectionState::rows`].

use std::future::Future;

use wordwalk_types::{CandidatePool, MAX_SELECTION, Selection, Word};

/// Rows moved by `PageUp`/`PageDown` until the front end reports a viewport.
const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Up,
    Down,
    PageUp,
    PageDown,
    First,
    Last,
    /// Toggle the item under the cursor.
    ToggleCursor,
    /// Toggle the item at a pool index (mouse click). Moves the cursor there.
    Toggle(usize),
    /// Finish with the current marks.
    Confirm,
    /// Abandon the round; yields an empty selection.
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStep {
    Pending,
    Done(Selection),
}

/// One row of the rendered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRow<'a> {
    pub index: usize,
    pub word: &'a Word,
    pub marked: bool,
    pub is_seed: bool,
    pub is_cursor: bool,
}

#[derive(Debug, Clone)]
pub struct SelectionState<'a> {
    pool: &'a CandidatePool,
    marked: Vec<bool>,
    marked_count: usize,
    cursor: usize,
    page_size: usize,
}

impl<'a> SelectionState<'a> {
    /// Starts with nothing marked and the cursor on the first item.
    #[must_use]
    pub fn new(pool: &'a CandidatePool) -> Self {
        Self {
            pool,
            marked: vec![false; pool.len()],
            marked_count: 0,
            cursor: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn pool(&self) -> &'a CandidatePool {
        self.pool
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn marked_count(&self) -> usize {
        self.marked_count
    }

    #[must_use]
    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.get(index).copied().unwrap_or(false)
    }

    /// Marks beyond [`MAX_SELECTION`] are allowed but dropped on confirm.
    #[must_use]
    pub fn over_limit(&self) -> bool {
        self.marked_count > MAX_SELECTION
    }

    pub fn set_page_size(&mut self, rows: usize) {
        self.page_size = rows.max(1);
    }

    pub fn rows(&self) -> impl Iterator<Item = SelectionRow<'a>> + '_ {
        self.pool
            .iter()
            .enumerate()
            .map(|(index, word)| SelectionRow {
                index,
                word,
                marked: self.marked[index],
                is_seed: self.pool.is_seed(index),
                is_cursor: index == self.cursor,
            })
    }

    fn last_index(&self) -> usize {
        self.pool.len().saturating_sub(1)
    }

    fn toggle(&mut self, index: usize) {
        let Some(mark) = self.marked.get_mut(index) else {
            return;
        };
        *mark = !*mark;
        if *mark {
            self.marked_count += 1;
        } else {
            self.marked_count -= 1;
        }
    }

    /// The marked words in pool order, capped at [`MAX_SELECTION`].
    #[must_use]
    pub fn selection(&self) -> Selection {
        Selection::from_marked(self.pool, &self.marked)
    }

    pub fn apply(&mut self, event: SelectionEvent) -> SelectionStep {
        match event {
            SelectionEvent::Up => self.cursor = self.cursor.saturating_sub(1),
            SelectionEvent::Down => self.cursor = (self.cursor + 1).min(self.last_index()),
            SelectionEvent::PageUp => self.cursor = self.cursor.saturating_sub(self.page_size),
            SelectionEvent::PageDown => {
                self.cursor = (self.cursor + self.page_size).min(self.last_index());
            }
            SelectionEvent::First => self.cursor = 0,
            SelectionEvent::Last => self.cursor = self.last_index(),
            SelectionEvent::ToggleCursor => self.toggle(self.cursor),
            SelectionEvent::Toggle(index) => {
                if index < self.pool.len() {
                    self.cursor = index;
                    self.toggle(index);
                }
            }
            SelectionEvent::Confirm => return SelectionStep::Done(self.selection()),
            SelectionEvent::Cancel => return SelectionStep::Done(Selection::empty()),
        }
        SelectionStep::Pending
    }
}

/// Presents a pool and returns the user's choice.
///
/// A cancelled dialog is an empty [`Selection`], not an error. Errors are
/// reserved for front-end failures (terminal I/O and the like).
pub trait WordSelector {
    fn select(
        &mut self,
        pool: &CandidatePool,
        round: usize,
    ) -> impl Future<Output = anyhow::Result<Selection>>;
}

impl<S: WordSelector + ?Sized> WordSelector for &mut S {
    fn select(
        &mut self,
        pool: &CandidatePool,
        round: usize,
    ) -> impl Future<Output = anyhow::Result<Selection>> {
        (**self).select(pool, round)
    }
}
