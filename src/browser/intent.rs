/// What a key press means, independent of the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Confirm,
    Cancel,
    Char(char),
    Backspace,
    Left,
    Right,
    Quit,
}
