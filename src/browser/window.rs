use std::ops::Range;

/// A selection cursor plus the scroll offset of the rows rendered around it.
///
/// Whenever `len > 0`: `offset <= selected <= offset + height - 1` and
/// `selected < len`. An empty list always has `selected == offset == 0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListWindow {
    selected: usize,
    offset: usize,
    len: usize,
    height: usize,
}

impl Default for ListWindow {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ListWindow {
    pub fn new(height: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len: 0,
            height: height.max(1),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The selected index, or `None` for an empty list.
    pub fn cursor(&self) -> Option<usize> {
        (self.len > 0).then_some(self.selected)
    }

    /// Indices of the rows that fit in the viewport.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.height).min(self.len);
        self.offset.min(end)..end
    }

    pub fn move_down(&mut self) {
        self.select(self.selected.saturating_add(1));
    }

    pub fn move_up(&mut self) {
        self.select(self.selected.saturating_sub(1));
    }

    pub fn page_down(&mut self) {
        self.select(self.selected.saturating_add(self.height));
    }

    pub fn page_up(&mut self) {
        self.select(self.selected.saturating_sub(self.height));
    }

    pub fn home(&mut self) {
        self.select(0);
    }

    pub fn end(&mut self) {
        self.select(self.len.saturating_sub(1));
    }

    /// Move the cursor to `index` (clamped) and scroll the minimum needed.
    pub fn select(&mut self, index: usize) {
        if self.len == 0 {
            self.selected = 0;
            self.offset = 0;
            return;
        }
        self.selected = index.min(self.len - 1);
        self.scroll_to_cursor();
    }

    /// React to the list growing or shrinking. The cursor only moves when it
    /// would fall past the end.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
            self.offset = 0;
            return;
        }
        self.selected = self.selected.min(len - 1);
        // Shrinking can leave blank rows below the last item; pull the
        // window back up while keeping the cursor visible.
        let max_offset = len.saturating_sub(self.height);
        self.offset = self.offset.min(max_offset);
        self.scroll_to_cursor();
    }

    /// Replace the list and put the cursor back at the top.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.selected = 0;
        self.offset = 0;
    }

    /// React to a viewport resize without moving the cursor. The offset
    /// becomes the smallest one that still shows the cursor.
    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        if self.len == 0 {
            return;
        }
        self.offset = (self.selected + 1).saturating_sub(self.height);
    }

    fn scroll_to_cursor(&mut self) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected > self.offset + self.height - 1 {
            self.offset = self.selected + 1 - self.height;
        }
    }
}

#[cfg(test)]
#[path = "../tests/browser/window_tests.rs"]
mod tests;
