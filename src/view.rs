//! Declarative description of one frame.
//!
//! Screens produce a [`ScreenView`]; the terminal layer decides how it looks.

/// Semantic colouring of a piece of text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Normal,
    Dim,
    Accent,
    Good,
    Warn,
    Bad,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
}

impl Cell {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// One line of cells, rendered left to right with a gap between them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new().cell(text, Tone::Normal)
    }

    pub fn cell(mut self, text: impl Into<String>, tone: Tone) -> Self {
        self.cells.push(Cell::new(text, tone));
        self
    }

    /// Concatenated cell text, mostly for assertions.
    pub fn plain(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("  ")
    }
}

/// The slice of a list that fits the viewport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowWindow {
    /// Only the visible rows.
    pub rows: Vec<Row>,
    /// Index into `rows` of the cursor, when the list has focus.
    pub selected: Option<usize>,
    pub offset: usize,
    pub total: usize,
}

impl RowWindow {
    /// 1-based cursor position out of the total, e.g. `3/120`.
    pub fn position(&self) -> Option<String> {
        let sel = self.selected?;
        Some(format!("{}/{}", self.offset + sel + 1, self.total))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    Loading(String),
    Error(String),
    NotFound(String),
    Empty(String),
    Rows(RowWindow),
    Text(Vec<Row>),
}

/// The free-text filter above a list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterLine {
    pub text: String,
    /// Cursor position in chars.
    pub cursor: usize,
    pub focused: bool,
    /// Typed but not yet applied.
    pub pending: bool,
    pub placeholder: &'static str,
}

/// A box drawn over the screen, e.g. a confirmation prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overlay {
    pub title: String,
    pub lines: Vec<Row>,
    pub tone: Tone,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenView {
    pub header: String,
    pub filter: Option<FilterLine>,
    pub body: Body,
    pub notice: Option<Cell>,
    pub footer: String,
    /// Short right-aligned status, e.g. a loading marker or list position.
    pub status: Option<String>,
    pub overlay: Option<Overlay>,
}

impl ScreenView {
    pub fn new(header: impl Into<String>, body: Body, footer: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            filter: None,
            body,
            notice: None,
            footer: footer.into(),
            status: None,
            overlay: None,
        }
    }
}
