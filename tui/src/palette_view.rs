use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Widget;
use spotlight_core::Group;
use spotlight_core::PaletteSession;
use spotlight_core::QueryPhase;
use unicode_width::UnicodeWidthStr;

const MAX_OVERLAY_WIDTH: u16 = 64;
const PLACEHOLDER: &str = "Spotlight search";

/// One rendered line of the result list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Row {
    Heading(usize),
    Item { group: usize, item: usize },
}

/// Renders the palette overlay: input line, grouped result list with the
/// active item highlighted, empty/error states, and a footer hint. The
/// same row layout backs `hit_test`, so pointer clicks resolve to exactly
/// the `(group, item)` that was drawn.
pub(crate) struct PaletteView<'a> {
    pub session: &'a PaletteSession,
}

impl PaletteView<'_> {
    /// Centered in the upper half of the screen, spotlight-style.
    pub(crate) fn overlay_area(screen: Rect) -> Rect {
        let width = screen
            .width
            .saturating_sub(4)
            .clamp(20, MAX_OVERLAY_WIDTH)
            .min(screen.width);
        let height = (screen.height / 2).clamp(6, 18).min(screen.height);
        let x = screen.x + (screen.width.saturating_sub(width)) / 2;
        let y = screen.y + 2.min(screen.height.saturating_sub(height));
        Rect::new(x, y, width, height)
    }

    pub(crate) fn render(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title(" Spotlight ".bold());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        self.render_input(Rect { height: 1, ..inner }, buf);

        let list_area = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(2),
            ..inner
        };
        self.render_results(list_area, buf);

        let footer_area = Rect {
            y: inner.y + inner.height - 1,
            height: 1,
            ..inner
        };
        Line::from("↑/↓ navigate · Enter select · Esc close".dim()).render(footer_area, buf);
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        let input = self.session.input();
        let line = if input.text().is_empty() {
            Line::from(vec!["› ".into(), PLACEHOLDER.dim().italic()])
        } else if input.all_selected() {
            Line::from(vec!["› ".into(), input.text().to_string().reversed()])
        } else {
            Line::from(vec!["› ".into(), Span::from(input.text().to_string())])
        };
        line.render(area, buf);
    }

    fn render_results(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let pipeline = self.session.pipeline();
        let mut y = area.y;

        if let Some(error) = pipeline.last_error() {
            Line::from(format!("search failed: {error}").red()).render(
                Rect { y, height: 1, ..area },
                buf,
            );
            y += 1;
        }

        let Some(groups) = pipeline.groups() else {
            if matches!(pipeline.phase(), QueryPhase::Pending | QueryPhase::Fetching) {
                Line::from("Searching…".dim()).render(Rect { y, height: 1, ..area }, buf);
            }
            return;
        };
        if groups.is_empty() {
            if pipeline.last_error().is_none() {
                Line::from("No results found".dim().italic()).render(
                    Rect { y, height: 1, ..area },
                    buf,
                );
            }
            return;
        }

        let remaining = (area.y + area.height).saturating_sub(y) as usize;
        let rows = flattened(groups);
        let offset = scroll_offset(&rows, self.active_row(&rows), remaining);
        for row in rows.iter().skip(offset).take(remaining) {
            let rect = Rect { y, height: 1, ..area };
            self.render_row(groups, *row, rect, buf);
            y += 1;
        }
    }

    fn render_row(&self, groups: &[Group], row: Row, area: Rect, buf: &mut Buffer) {
        match row {
            Row::Heading(group) => {
                Line::from(groups[group].category.clone().bold().underlined()).render(area, buf);
            }
            Row::Item { group, item } => {
                let hit = &groups[group].items[item];
                let cursor = self.session.cursor();
                let active = self.session.focus() == spotlight_core::Focus::List
                    && cursor.group == group
                    && cursor.item == item;
                let marker = if active { "› " } else { "  " };
                let mut spans: Vec<Span> = vec![marker.into()];
                if active {
                    spans.push(hit.id.clone().bold().cyan());
                } else {
                    spans.push(hit.id.clone().into());
                }
                if let Some(author) = &hit.author {
                    let used = 2 + hit.id.width() + 2;
                    let pad = (area.width as usize).saturating_sub(used + author.width());
                    if pad > 0 {
                        spans.push(" ".repeat(pad).into());
                        spans.push(author.clone().dim());
                    }
                }
                Line::from(spans).render(area, buf);
            }
        }
    }

    fn active_row(&self, rows: &[Row]) -> usize {
        let cursor = self.session.cursor();
        rows.iter()
            .position(|row| {
                matches!(row, Row::Item { group, item }
                    if *group == cursor.group && *item == cursor.item)
            })
            .unwrap_or(0)
    }

    /// Terminal cursor position: on the input caret while the input has
    /// focus, hidden otherwise.
    pub(crate) fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        if self.session.focus() != spotlight_core::Focus::Input {
            return None;
        }
        let inner_x = area.x + 1 + 2; // border + "› "
        let caret = self.session.input().caret_chars() as u16;
        Some((inner_x + caret, area.y + 1))
    }

    /// Resolves a click inside the overlay to the item drawn at that row.
    pub(crate) fn hit_test(&self, area: Rect, x: u16, y: u16) -> Option<(usize, usize)> {
        let inner = Block::bordered().inner(area);
        if x < inner.x || x >= inner.x + inner.width {
            return None;
        }
        let list_top = inner.y + 1 + u16::from(self.session.pipeline().last_error().is_some());
        let list_height = inner.height.saturating_sub(2) as usize;
        if y < list_top || y >= inner.y + inner.height - 1 {
            return None;
        }
        let groups = self.session.pipeline().groups()?;
        let rows = flattened(groups);
        let visible = list_height.saturating_sub(usize::from(
            self.session.pipeline().last_error().is_some(),
        ));
        let offset = scroll_offset(&rows, self.active_row(&rows), visible);
        match rows.get(offset + (y - list_top) as usize) {
            Some(Row::Item { group, item }) => Some((*group, *item)),
            _ => None,
        }
    }
}

fn flattened(groups: &[Group]) -> Vec<Row> {
    let mut rows = Vec::new();
    for (g, group) in groups.iter().enumerate() {
        rows.push(Row::Heading(g));
        for i in 0..group.len() {
            rows.push(Row::Item { group: g, item: i });
        }
    }
    rows
}

/// First visible row index, chosen so the active row stays on screen.
fn scroll_offset(rows: &[Row], active: usize, viewport: usize) -> usize {
    if viewport == 0 || rows.len() <= viewport {
        return 0;
    }
    let max_offset = rows.len() - viewport;
    active.saturating_sub(viewport.saturating_sub(1)).min(max_offset)
}
