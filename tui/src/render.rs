//! Rendering of the word picker.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use wordwalk_engine::{MAX_SELECTION, SelectionRow, SelectionState};

use crate::theme::{Glyphs, Palette, styles};

/// Geometry of the list as last drawn, used to resolve mouse clicks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListLayout {
    pub area: Rect,
    /// Pool index of the first visible row.
    pub offset: usize,
    pub len: usize,
}

impl ListLayout {
    #[must_use]
    pub fn visible_rows(&self) -> usize {
        usize::from(self.area.height)
    }

    /// Pool index under a terminal cell, if any.
    #[must_use]
    pub fn index_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.area;
        let inside = column >= area.x
            && column < area.x.saturating_add(area.width)
            && row >= area.y
            && row < area.y.saturating_add(area.height);
        if !inside {
            return None;
        }
        let index = self.offset + usize::from(row - area.y);
        (index < self.len).then_some(index)
    }
}

/// Scroll position of the list. Keeps the cursor on screen.
#[derive(Debug, Default)]
pub struct ListView {
    offset: usize,
}

impl ListView {
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn follow(&mut self, cursor: usize, len: usize, height: usize) {
        if height == 0 {
            return;
        }
        if cursor < self.offset {
            self.offset = cursor;
        } else if cursor >= self.offset + height {
            self.offset = cursor + 1 - height;
        }
        self.offset = self.offset.min(len.saturating_sub(height));
    }
}

fn divider<'a>(width: usize, label: Option<String>, palette: &Palette, glyphs: &Glyphs) -> Line<'a> {
    let rule = Style::default().fg(palette.primary_dim);
    match label {
        Some(label) => {
            let label = format!(" {label} ");
            let rest = width.saturating_sub(label.width() + 2);
            Line::from(vec![
                Span::styled(glyphs.divider.repeat(2), rule),
                Span::styled(label, styles::key_hint(palette)),
                Span::styled(glyphs.divider.repeat(rest), rule),
            ])
        }
        None => Line::from(Span::styled(glyphs.divider.repeat(width), rule)),
    }
}

fn header_line<'a>(state: &SelectionState<'_>, width: usize, palette: &Palette) -> Line<'a> {
    let left = "Pick next seeds";
    let count = format!("{}/{MAX_SELECTION} marked", state.marked_count());
    let count_style = if state.over_limit() {
        Style::default()
            .fg(palette.warning)
            .add_modifier(Modifier::BOLD)
    } else if state.marked_count() > 0 {
        styles::marked(palette)
    } else {
        styles::key_hint(palette)
    };
    let filler = width.saturating_sub(left.width() + count.width());

    Line::from(vec![
        Span::styled(left, Style::default().fg(palette.text_secondary)),
        Span::raw(" ".repeat(filler)),
        Span::styled(count, count_style),
    ])
}

fn row_line<'a>(row: &SelectionRow<'_>, width: usize, palette: &Palette, glyphs: &Glyphs) -> Line<'a> {
    let pointer = if row.is_cursor { glyphs.cursor } else { " " };
    let checkbox = if row.marked {
        glyphs.checked
    } else {
        glyphs.unchecked
    };
    let left = format!(" {pointer} {checkbox} {}", row.word);
    let tag = if row.is_seed { "seed" } else { "" };
    let filler = width.saturating_sub(left.width() + tag.width() + 1);

    let bg = row.is_cursor.then_some(palette.bg_highlight);
    let mut left_style = if row.marked {
        styles::marked(palette)
    } else if row.is_cursor {
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.text_secondary)
    };
    let mut filler_style = Style::default();
    let mut tag_style = styles::seed_tag(palette);
    if let Some(bg) = bg {
        left_style = left_style.bg(bg);
        filler_style = filler_style.bg(bg);
        tag_style = tag_style.bg(bg);
    }

    let mut spans = vec![Span::styled(left, left_style)];
    if filler > 0 {
        spans.push(Span::styled(" ".repeat(filler), filler_style));
    }
    if !tag.is_empty() {
        spans.push(Span::styled(tag, tag_style));
        spans.push(Span::styled(" ", filler_style));
    }
    Line::from(spans)
}

fn key_hints<'a>(palette: &Palette, glyphs: &Glyphs) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!("{}{}", glyphs.arrow_up, glyphs.arrow_down),
            styles::key_highlight(palette),
        ),
        Span::styled(" move  ", styles::key_hint(palette)),
        Span::styled("Space", styles::key_highlight(palette)),
        Span::styled(" toggle  ", styles::key_hint(palette)),
        Span::styled("Enter", styles::key_highlight(palette)),
        Span::styled(" confirm  ", styles::key_hint(palette)),
        Span::styled("Ctrl+C", styles::key_highlight(palette)),
        Span::styled(" cancel", styles::key_hint(palette)),
    ])
}

/// Draws the picker over the whole frame and returns the list geometry.
pub fn draw_selection(
    frame: &mut Frame,
    state: &SelectionState<'_>,
    view: &mut ListView,
    round: usize,
    palette: &Palette,
    glyphs: &Glyphs,
) -> ListLayout {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.primary))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::horizontal(1))
        .title(Line::from(Span::styled(
            format!(" Wordwalk {} Round {round} ", glyphs.separator),
            styles::title(palette),
        )));
    let inner = block.inner(frame.area());
    frame.render_widget(block, frame.area());

    let [header_area, top_rule, list_area, bottom_rule, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);
    let width = usize::from(inner.width);

    let len = state.pool().len();
    let height = usize::from(list_area.height);
    view.follow(state.cursor(), len, height);
    let offset = view.offset();

    let rows: Vec<Line> = state
        .rows()
        .skip(offset)
        .take(height)
        .map(|row| row_line(&row, width, palette, glyphs))
        .collect();

    let above = (offset > 0).then(|| format!("{} {offset} more", glyphs.arrow_up));
    let hidden_below = len.saturating_sub(offset + height);
    let below = (hidden_below > 0).then(|| format!("{} {hidden_below} more", glyphs.arrow_down));

    frame.render_widget(Paragraph::new(header_line(state, width, palette)), header_area);
    frame.render_widget(Paragraph::new(divider(width, above, palette, glyphs)), top_rule);
    frame.render_widget(Paragraph::new(rows), list_area);
    frame.render_widget(Paragraph::new(divider(width, below, palette, glyphs)), bottom_rule);
    frame.render_widget(Paragraph::new(key_hints(palette, glyphs)), footer_area);

    ListLayout {
        area: list_area,
        offset,
        len,
    }
}
