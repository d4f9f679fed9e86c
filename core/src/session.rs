use crate::cursor::Cursor;
use crate::cursor::MoveUp;
use crate::cursor::move_down;
use crate::cursor::move_up;
use crate::cursor::selected;
use crate::hit::Group;
use crate::hit::Hit;
use crate::input::InputState;
use crate::query::Commit;
use crate::query::DebounceToken;
use crate::query::QueryPipeline;

/// Which element receives list-navigation keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Input,
    List,
}

/// Result of a navigation key while the overlay is visible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavOutcome {
    /// Cursor moved (or focus entered the list).
    Moved,
    /// Focus returned to the text input; its text is selected.
    FocusInput,
    /// Nothing navigable on screen.
    Ignored,
}

/// One palette session: overlay visibility, the query pipeline and its
/// grouped results, the navigation cursor, and the input field. The cursor
/// and groups are owned here exclusively and never shared; every groups
/// replacement resets the cursor to the list head.
#[derive(Debug, Default)]
pub struct PaletteSession {
    visible: bool,
    focus: Focus,
    input: InputState,
    pipeline: QueryPipeline,
    cursor: Cursor,
}

impl Default for Focus {
    fn default() -> Self {
        Self::Input
    }
}

impl PaletteSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn pipeline(&self) -> &QueryPipeline {
        &self.pipeline
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn groups(&self) -> &[Group] {
        self.pipeline.groups().unwrap_or_default()
    }

    /// Explicit trigger or hotkey. On becoming visible the input gains
    /// focus with its text fully selected and the cursor resets.
    pub fn toggle(&mut self) {
        if self.visible {
            self.hide();
        } else {
            self.visible = true;
            self.focus_input();
            tracing::debug!("palette shown");
        }
    }

    /// Escape: force-hide, regardless of focus.
    pub fn hide(&mut self) {
        self.visible = false;
        tracing::debug!("palette hidden");
    }

    fn focus_input(&mut self) {
        self.focus = Focus::Input;
        self.input.select_all();
        self.cursor = Cursor::reset();
    }

    /// A typed character. Returns the debounce token to arm.
    pub fn type_char(&mut self, ch: char) -> DebounceToken {
        self.input.insert(ch);
        self.keystroke()
    }

    /// Backspace in the input. `None` when the text did not change.
    pub fn backspace(&mut self) -> Option<DebounceToken> {
        let before = self.input.text().to_string();
        self.input.backspace();
        (self.input.text() != before).then(|| self.keystroke())
    }

    fn keystroke(&mut self) -> DebounceToken {
        self.focus = Focus::Input;
        self.pipeline.on_keystroke(self.input.text())
    }

    /// Caret movement inside the input. Collapses an active select-all.
    pub fn caret_left(&mut self) {
        self.input.move_left();
    }

    pub fn caret_right(&mut self) {
        self.input.move_right();
    }

    pub fn on_debounce_elapsed(&mut self, token: DebounceToken) -> Option<Commit> {
        self.pipeline.on_debounce_elapsed(token)
    }

    pub fn on_search_success(&mut self, seq: u64, hits: Vec<Hit>) -> bool {
        let applied = self.pipeline.on_search_success(seq, hits);
        if applied {
            // New results: back to the list head, like resetting the scroll
            // position and active indices when a response lands.
            self.cursor = Cursor::reset();
            self.focus = Focus::Input;
        }
        applied
    }

    pub fn on_search_failure(&mut self, seq: u64, message: String) -> bool {
        let applied = self.pipeline.on_search_failure(seq, message);
        if applied {
            self.cursor = Cursor::reset();
            self.focus = Focus::Input;
        }
        applied
    }

    pub fn move_down(&mut self) -> NavOutcome {
        if self.groups().is_empty() {
            return NavOutcome::Ignored;
        }
        if self.focus == Focus::Input {
            // First ArrowDown enters the list at the cursor (list head).
            self.focus = Focus::List;
            return NavOutcome::Moved;
        }
        self.cursor = move_down(self.groups(), self.cursor);
        NavOutcome::Moved
    }

    pub fn move_up(&mut self) -> NavOutcome {
        if self.groups().is_empty() || self.focus == Focus::Input {
            return NavOutcome::Ignored;
        }
        match move_up(self.groups(), self.cursor) {
            MoveUp::Moved(cursor) => {
                self.cursor = cursor;
                NavOutcome::Moved
            }
            MoveUp::FocusInput => {
                self.focus_input();
                NavOutcome::FocusInput
            }
        }
    }

    /// Enter: resolve the cursor target to its id. Does not hide the
    /// overlay; visibility stays under independent control.
    pub fn commit(&self) -> Option<String> {
        let id = selected(self.groups(), self.cursor)?.id.clone();
        tracing::info!(%id, "selection committed");
        Some(id)
    }

    /// Pointer click on a rendered item: move the cursor there and commit.
    pub fn commit_at(&mut self, group: usize, item: usize) -> Option<String> {
        let target = Cursor::new(group, item);
        let id = selected(self.groups(), target)?.id.clone();
        self.cursor = target;
        self.focus = Focus::List;
        tracing::info!(%id, "selection committed by click");
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ready_session(hits: Vec<Hit>) -> PaletteSession {
        let mut session = PaletteSession::new();
        session.toggle();
        let mut token = None;
        for ch in "model".chars() {
            token = Some(session.type_char(ch));
        }
        let commit = token.and_then(|t| session.on_debounce_elapsed(t));
        let Some(Commit::Fetch { seq, .. }) = commit else {
            panic!("expected a fetch commit");
        };
        assert!(session.on_search_success(seq, hits));
        session
    }

    fn sample_hits() -> Vec<Hit> {
        vec![
            Hit::new("facebook/224", "image-classification"),
            Hit::new("facebook/384", "image-classification"),
            Hit::new("openai/whisper", "speech-recognition"),
        ]
    }

    #[test]
    fn showing_the_overlay_selects_input_text_and_resets_cursor() {
        let mut session = ready_session(sample_hits());
        session.move_down();
        session.move_down();
        session.hide();

        session.toggle();
        assert!(session.visible());
        assert_eq!(session.focus(), Focus::Input);
        assert!(session.input().all_selected());
        assert_eq!(session.cursor(), Cursor::reset());
    }

    #[test]
    fn arrow_down_enters_the_list_then_walks_it() {
        let mut session = ready_session(sample_hits());
        assert_eq!(session.move_down(), NavOutcome::Moved);
        assert_eq!(session.focus(), Focus::List);
        assert_eq!(session.cursor(), Cursor::new(0, 0));

        session.move_down();
        assert_eq!(session.cursor(), Cursor::new(0, 1));
        session.move_down();
        assert_eq!(session.cursor(), Cursor::new(1, 0));
    }

    #[test]
    fn arrow_up_from_list_top_refocuses_the_input() {
        let mut session = ready_session(sample_hits());
        session.move_down();
        assert_eq!(session.move_up(), NavOutcome::FocusInput);
        assert_eq!(session.focus(), Focus::Input);
        assert!(session.input().all_selected());
        assert_eq!(session.cursor(), Cursor::reset());
    }

    #[test]
    fn navigation_is_ignored_with_no_results() {
        let mut session = PaletteSession::new();
        session.toggle();
        assert_eq!(session.move_down(), NavOutcome::Ignored);
        assert_eq!(session.move_up(), NavOutcome::Ignored);
        assert_eq!(session.commit(), None);
    }

    #[test]
    fn commit_resolves_the_cursor_target() {
        let mut session = ready_session(sample_hits());
        session.move_down();
        session.move_down();
        assert_eq!(session.commit(), Some("facebook/384".to_string()));
        // Committing does not close the overlay.
        assert!(session.visible());
    }

    #[test]
    fn click_commits_and_moves_the_cursor() {
        let mut session = ready_session(sample_hits());
        assert_eq!(session.commit_at(1, 0), Some("openai/whisper".to_string()));
        assert_eq!(session.cursor(), Cursor::new(1, 0));
        assert_eq!(session.commit_at(5, 0), None);
    }

    #[test]
    fn new_results_reset_the_cursor() {
        let mut session = ready_session(sample_hits());
        session.move_down();
        session.move_down();

        let token = session.type_char('s');
        let Some(Commit::Fetch { seq, .. }) = session.on_debounce_elapsed(token) else {
            panic!("expected a fetch commit");
        };
        assert!(session.on_search_success(seq, vec![Hit::new("solo", "tools")]));
        assert_eq!(session.cursor(), Cursor::reset());
        assert_eq!(session.focus(), Focus::Input);
    }

    #[test]
    fn clearing_the_query_leaves_navigation_inert() {
        let mut session = ready_session(sample_hits());
        session.input_clear_for_test();
        let token = session.keystroke();
        assert_eq!(session.on_debounce_elapsed(token), Some(Commit::Cleared));
        assert_eq!(session.move_down(), NavOutcome::Ignored);
    }

    impl PaletteSession {
        fn input_clear_for_test(&mut self) {
            self.input.clear();
        }
    }
}
