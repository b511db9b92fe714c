//! # Selection Store
//!
//! Current focus plus browser-style back/forward history.
//!
//! ```text
//! history: [a, b, c, d]     select(e) at c  →  [a, b, c, e]
//!                 ^ index                                ^
//! ```

use apiforge_outline::Selection;

pub const DEFAULT_MAX_SELECTION_HISTORY: usize = 50;

#[derive(Debug)]
pub struct SelectionStore {
    current: Selection,
    history: Vec<Selection>,

    /// Position of `current` in `history`; `None` before the first select
    index: Option<usize>,

    max_history: usize,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::with_max_history(DEFAULT_MAX_SELECTION_HISTORY)
    }

    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            current: Selection::none(),
            history: Vec::new(),
            index: None,
            max_history: max_history.max(1),
        }
    }

    pub fn current(&self) -> &Selection {
        &self.current
    }

    /// Focus `selection`. Re-selecting the current target (same type and
    /// path) only refreshes its context and leaves history alone.
    pub fn select(&mut self, selection: Selection) {
        if selection.same_target(&self.current) {
            if let Some(index) = self.index {
                self.history[index] = selection.clone();
            }
            self.current = selection;
            return;
        }

        if let Some(index) = self.index {
            self.history.truncate(index + 1);
        }
        self.history.push(selection.clone());
        if self.history.len() > self.max_history {
            let excess = self.history.len() - self.max_history;
            self.history.drain(..excess);
        }
        self.index = Some(self.history.len() - 1);
        self.current = selection;
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self.index, Some(index) if index > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        matches!(self.index, Some(index) if index + 1 < self.history.len())
    }

    /// Step back; returns the newly current selection.
    pub fn go_back(&mut self) -> Option<&Selection> {
        let index = self.index.filter(|&index| index > 0)? - 1;
        self.move_to(index)
    }

    /// Step forward; returns the newly current selection.
    pub fn go_forward(&mut self) -> Option<&Selection> {
        let index = self.index.filter(|&index| index + 1 < self.history.len())? + 1;
        self.move_to(index)
    }

    pub fn history(&self) -> &[Selection] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.current = Selection::none();
        self.history.clear();
        self.index = None;
    }

    fn move_to(&mut self, index: usize) -> Option<&Selection> {
        self.current = self.history.get(index)?.clone();
        self.index = Some(index);
        Some(&self.current)
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}
