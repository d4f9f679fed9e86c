use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseButton;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use spotlight_core::PaletteConfig;
use spotlight_core::PaletteSession;
use spotlight_core::SearchProvider;
use tokio::select;
use tokio::sync::mpsc::unbounded_channel;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::palette_view::PaletteView;
use crate::search_driver::SearchDriver;
use crate::tui::Tui;

pub(crate) struct App {
    session: PaletteSession,
    search: SearchDriver,
    app_event_tx: AppEventSender,
    hotkey: char,
    last_selection: Option<String>,
    /// Size of the last drawn frame; mouse events carry coordinates only.
    last_screen: Rect,
}

pub(crate) async fn run_app(
    config: &PaletteConfig,
    provider: Arc<dyn SearchProvider>,
) -> Result<Option<String>> {
    let (app_event_tx, mut app_event_rx) = unbounded_channel();
    let app_event_tx = AppEventSender::new(app_event_tx);

    let mut app = App {
        session: PaletteSession::new(),
        search: SearchDriver::new(
            provider,
            Duration::from_millis(config.debounce_ms),
            app_event_tx.clone(),
        ),
        app_event_tx,
        hotkey: config.hotkey,
        last_selection: None,
        last_screen: Rect::default(),
    };

    let mut tui = Tui::new()?;
    let tui_events = tui.event_stream();
    tokio::pin!(tui_events);

    app.draw(&mut tui)?;
    while select! {
        Some(event) = app_event_rx.recv() => {
            app.handle_app_event(event)
        }
        Some(Ok(event)) = tui_events.next() => {
            app.handle_terminal_event(event)
        }
    } {
        app.draw(&mut tui)?;
    }
    tui.terminal.clear()?;
    Ok(app.last_selection)
}

impl App {
    /// Returns false when the loop should exit.
    fn handle_app_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::DebounceElapsed(token) => {
                if let Some(commit) = self.session.on_debounce_elapsed(token) {
                    self.search.on_commit(commit);
                }
            }
            AppEvent::SearchResult { seq, query, hits } => {
                if !self.session.on_search_success(seq, hits) {
                    tracing::debug!(seq, %query, "discarded stale search result");
                }
            }
            AppEvent::SearchFailed {
                seq,
                query,
                message,
            } => {
                tracing::warn!(seq, %query, %message, "search failed");
                self.session.on_search_failure(seq, message);
            }
            AppEvent::ExitRequest => return false,
        }
        true
    }

    fn handle_terminal_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key_event) => self.handle_key_event(key_event),
            Event::Mouse(mouse_event) => {
                self.handle_mouse_event(mouse_event);
                true
            }
            Event::Paste(pasted) => {
                if self.session.visible() {
                    let mut token = None;
                    for ch in pasted.chars().filter(|ch| !ch.is_control()) {
                        token = Some(self.session.type_char(ch));
                    }
                    if let Some(token) = token {
                        self.search.arm_debounce(token);
                    }
                }
                true
            }
            _ => true,
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) -> bool {
        let KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press | KeyEventKind::Repeat,
            ..
        } = key_event
        else {
            // Ignore release events.
            return true;
        };

        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.app_event_tx.send(AppEvent::ExitRequest);
            return true;
        }
        if self.is_hotkey(code, modifiers) {
            self.session.toggle();
            return true;
        }
        if !self.session.visible() {
            if code == KeyCode::Char('q') {
                self.app_event_tx.send(AppEvent::ExitRequest);
            }
            return true;
        }

        match code {
            KeyCode::Esc => self.session.hide(),
            KeyCode::Down => {
                self.session.move_down();
            }
            KeyCode::Up => {
                self.session.move_up();
            }
            KeyCode::Left => self.session.caret_left(),
            KeyCode::Right => self.session.caret_right(),
            KeyCode::Enter => {
                // Committing leaves the overlay open; only Esc or the
                // hotkey close it.
                if let Some(id) = self.session.commit() {
                    self.last_selection = Some(id);
                }
            }
            KeyCode::Backspace => {
                if let Some(token) = self.session.backspace() {
                    self.search.arm_debounce(token);
                }
            }
            KeyCode::Char(ch) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                let token = self.session.type_char(ch);
                self.search.arm_debounce(token);
            }
            _ => {}
        }
        true
    }

    /// Ctrl+<hotkey> or Super+<hotkey>, matching either letter case.
    fn is_hotkey(&self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let KeyCode::Char(ch) = code else {
            return false;
        };
        ch.eq_ignore_ascii_case(&self.hotkey)
            && modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER)
    }

    fn handle_mouse_event(&mut self, mouse_event: MouseEvent) {
        if !self.session.visible() {
            return;
        }
        if mouse_event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let overlay = PaletteView::overlay_area(self.screen_area());
        let view = PaletteView {
            session: &self.session,
        };
        if let Some((group, item)) = view.hit_test(overlay, mouse_event.column, mouse_event.row)
            && let Some(id) = self.session.commit_at(group, item)
        {
            self.last_selection = Some(id);
        }
    }

    fn screen_area(&self) -> Rect {
        // The overlay area only depends on the size, which mouse events do
        // not carry; fall back to the last drawn size.
        self.last_screen
    }

    fn draw(&mut self, tui: &mut Tui) -> Result<()> {
        let session = &self.session;
        let last_selection = self.last_selection.as_deref();
        let hotkey = self.hotkey;
        let mut screen = Rect::default();
        tui.terminal.draw(|frame| {
            screen = frame.area();
            render_backdrop(last_selection, hotkey, frame.area(), frame.buffer_mut());
            if session.visible() {
                let overlay = PaletteView::overlay_area(frame.area());
                let view = PaletteView { session };
                view.render(overlay, frame.buffer_mut());
                if let Some((x, y)) = view.cursor_pos(overlay) {
                    frame.set_cursor_position((x, y));
                }
            }
        })?;
        self.last_screen = screen;
        Ok(())
    }
}

fn render_backdrop(last_selection: Option<&str>, hotkey: char, area: Rect, buf: &mut Buffer) {
    let hotkey = hotkey.to_ascii_uppercase();
    let mut lines = vec![
        Line::from(""),
        Line::from(format!("  Press Ctrl+{hotkey} to search").dim()),
    ];
    if let Some(id) = last_selection {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            "  Last selection: ".into(),
            id.to_string().bold(),
        ]));
    }
    Paragraph::new(lines)
        .block(Block::bordered().title(" spotlight ".dim()))
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use spotlight_core::Hit;
    use spotlight_core::SearchError;
    use tokio::sync::mpsc::UnboundedReceiver;

    struct StaticProvider(Vec<Hit>);

    #[async_trait]
    impl SearchProvider for StaticProvider {
        async fn search(&self, _query: &str) -> Result<Vec<Hit>, SearchError> {
            Ok(self.0.clone())
        }
    }

    fn test_app() -> (App, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = unbounded_channel();
        let tx = AppEventSender::new(tx);
        let provider = Arc::new(StaticProvider(vec![
            Hit::new("facebook/224", "image-classification"),
            Hit::new("openai/whisper", "speech-recognition"),
        ]));
        let app = App {
            session: PaletteSession::new(),
            search: SearchDriver::new(provider, Duration::from_millis(200), tx.clone()),
            app_event_tx: tx,
            hotkey: 'k',
            last_selection: None,
            last_screen: Rect::new(0, 0, 80, 24),
        };
        (app, rx)
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    /// Drives one keystroke through debounce and search completion.
    async fn settle(app: &mut App, rx: &mut UnboundedReceiver<AppEvent>) {
        while app.session.pipeline().groups().is_none() {
            let Some(event) = rx.recv().await else {
                panic!("event channel closed before results arrived");
            };
            app.handle_app_event(event);
        }
    }

    #[tokio::test]
    async fn hotkey_toggles_the_overlay_in_either_case() {
        let (mut app, _rx) = test_app();
        app.handle_terminal_event(key(KeyCode::Char('k'), KeyModifiers::CONTROL));
        assert!(app.session.visible());
        app.handle_terminal_event(key(KeyCode::Char('K'), KeyModifiers::SUPER));
        assert!(!app.session.visible());
    }

    #[tokio::test(start_paused = true)]
    async fn typing_debounces_then_results_arrive() {
        let (mut app, mut rx) = test_app();
        app.handle_terminal_event(key(KeyCode::Char('k'), KeyModifiers::CONTROL));
        app.handle_terminal_event(key(KeyCode::Char('w'), KeyModifiers::NONE));
        settle(&mut app, &mut rx).await;

        let groups = app.session.pipeline().groups();
        let Some(groups) = groups else {
            panic!("expected grouped results");
        };
        assert_eq!(groups.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn enter_commits_the_active_item_and_keeps_the_overlay_open() {
        let (mut app, mut rx) = test_app();
        app.handle_terminal_event(key(KeyCode::Char('k'), KeyModifiers::CONTROL));
        app.handle_terminal_event(key(KeyCode::Char('w'), KeyModifiers::NONE));
        settle(&mut app, &mut rx).await;

        app.handle_terminal_event(key(KeyCode::Down, KeyModifiers::NONE));
        app.handle_terminal_event(key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.last_selection.as_deref(), Some("facebook/224"));
        assert!(app.session.visible(), "only Esc or the hotkey close the overlay");

        app.handle_terminal_event(key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!app.session.visible());
    }

    #[tokio::test]
    async fn escape_hides_and_q_only_exits_while_hidden() {
        let (mut app, mut rx) = test_app();
        app.handle_terminal_event(key(KeyCode::Char('k'), KeyModifiers::CONTROL));
        assert!(app.handle_terminal_event(key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(app.session.visible(), "q is a query character while open");

        assert!(app.handle_terminal_event(key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(!app.session.visible());

        app.handle_terminal_event(key(KeyCode::Char('q'), KeyModifiers::NONE));
        let mut exit_requested = false;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, AppEvent::ExitRequest) {
                exit_requested = true;
                assert!(!app.handle_app_event(event));
            }
        }
        assert!(exit_requested, "q on the backdrop requests an exit");
    }

    #[tokio::test]
    async fn ctrl_c_requests_an_exit_from_anywhere() {
        let (mut app, mut rx) = test_app();
        app.handle_terminal_event(key(KeyCode::Char('k'), KeyModifiers::CONTROL));
        app.handle_terminal_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let Ok(event) = rx.try_recv() else {
            panic!("expected an exit request");
        };
        assert!(matches!(event, AppEvent::ExitRequest));
        assert!(!app.handle_app_event(event));
    }

    #[tokio::test(start_paused = true)]
    async fn click_on_a_result_commits_it() {
        let (mut app, mut rx) = test_app();
        app.handle_terminal_event(key(KeyCode::Char('k'), KeyModifiers::CONTROL));
        app.handle_terminal_event(key(KeyCode::Char('w'), KeyModifiers::NONE));
        settle(&mut app, &mut rx).await;

        let overlay = PaletteView::overlay_area(app.last_screen);
        // First item row: inner top, past the input line and first heading.
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: overlay.x + 4,
            row: overlay.y + 3,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_terminal_event(Event::Mouse(mouse));
        assert_eq!(app.last_selection.as_deref(), Some("facebook/224"));
        assert!(app.session.visible(), "a click commits without closing");
    }
}
