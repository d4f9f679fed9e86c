/// Single-line editing state for the palette text input.
///
/// When the overlay opens (or focus jumps back from the list) the whole
/// text is selected so the next typed character replaces it, matching the
/// select-on-focus behavior of a spotlight input.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputState {
    text: String,
    /// Byte offset of the caret; always on a char boundary.
    caret: usize,
    all_selected: bool,
}

impl InputState {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn all_selected(&self) -> bool {
        self.all_selected
    }

    /// Caret position in characters, for rendering.
    pub fn caret_chars(&self) -> usize {
        self.text[..self.caret].chars().count()
    }

    pub fn select_all(&mut self) {
        self.all_selected = !self.text.is_empty();
        self.caret = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.caret = 0;
        self.all_selected = false;
    }

    pub fn insert(&mut self, ch: char) {
        if self.all_selected {
            self.clear();
        }
        self.text.insert(self.caret, ch);
        self.caret += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.all_selected {
            self.clear();
            return;
        }
        if let Some(prev) = self.text[..self.caret].chars().next_back() {
            self.caret -= prev.len_utf8();
            self.text.remove(self.caret);
        }
    }

    pub fn move_left(&mut self) {
        self.all_selected = false;
        if let Some(prev) = self.text[..self.caret].chars().next_back() {
            self.caret -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        self.all_selected = false;
        if let Some(next) = self.text[self.caret..].chars().next() {
            self.caret += next.len_utf8();
        }
    }
}
