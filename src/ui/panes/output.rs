//! Output column rendering: the nine collapsible compiler-artifact sections.
//!
//! The column is modeled as a flat list of virtual rows: one aggregate
//! toggle-all row, then per section a header row followed by its body rows
//! (zero while collapsed). [`layout_sections`] builds that list; rendering
//! draws it through the scroll window and mouse hit-testing indexes into the
//! same list, so a click can never land on a different row than the one
//! painted there.

use rustc_hash::FxHashMap;

use crate::ui::sections::{section_title, SectionManager, SECTION_IDS, SHORTCUT_SECTIONS};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Per-section body heights, in rows.
#[derive(Debug, Clone, Copy)]
pub struct SectionRows {
    pub body_rows: u16,
    pub expanded_rows: u16,
}

/// One virtual row of the output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRow {
    /// The aggregate collapse/expand control at the top.
    ToggleAll,
    SectionHeader(&'static str),
    /// Body row `usize` (0-based) of a visible section.
    SectionBody(&'static str, usize),
}

/// Section contents keyed by section id, one string per display line.
pub type SectionContents = FxHashMap<&'static str, Vec<String>>;

fn body_height(
    manager: &SectionManager,
    contents: &SectionContents,
    rows: SectionRows,
    id: &'static str,
) -> usize {
    if manager.is_collapsed(id) {
        return 0;
    }
    let cap = if manager.is_expanded(id) {
        rows.expanded_rows
    } else {
        rows.body_rows
    } as usize;
    let len = contents.get(id).map(Vec::len).unwrap_or(0);
    len.clamp(1, cap)
}

/// Build the virtual-row list for the current visibility state.
pub fn layout_sections(
    manager: &SectionManager,
    contents: &SectionContents,
    rows: SectionRows,
) -> Vec<OutputRow> {
    let mut out = vec![OutputRow::ToggleAll];
    for id in SECTION_IDS {
        out.push(OutputRow::SectionHeader(id));
        for i in 0..body_height(manager, contents, rows, id) {
            out.push(OutputRow::SectionBody(id, i));
        }
    }
    out
}

/// Total content height in rows, for the deferred min-height check.
pub fn content_height(
    manager: &SectionManager,
    contents: &SectionContents,
    rows: SectionRows,
) -> u16 {
    layout_sections(manager, contents, rows).len() as u16
}

/// Map a click inside the pane to the virtual row under it. Clicks on the
/// border or past the last row return `None`.
pub fn row_at(
    area: Rect,
    scroll: usize,
    manager: &SectionManager,
    contents: &SectionContents,
    rows: SectionRows,
    x: u16,
    y: u16,
) -> Option<OutputRow> {
    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    if x < inner.x || x >= inner.x + inner.width || y < inner.y || y >= inner.y + inner.height {
        return None;
    }
    let index = (y - inner.y) as usize + scroll;
    layout_sections(manager, contents, rows).get(index).copied()
}

fn shortcut_hint(id: &str) -> Option<String> {
    SHORTCUT_SECTIONS
        .iter()
        .position(|s| *s == id)
        .map(|i| format!(" Ctrl+{}", i + 1))
}

fn header_line(manager: &SectionManager, id: &'static str) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("{} {}", manager.glyph(id), section_title(id)),
            Style::default()
                .fg(DEFAULT_THEME.section_header)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(hint) = shortcut_hint(id) {
        spans.push(Span::styled(hint, Style::default().fg(DEFAULT_THEME.hint)));
    }
    Line::from(spans)
}

fn toggle_all_line(manager: &SectionManager) -> Line<'static> {
    let label = if manager.all_collapsed() {
        "▶ Expand all sections"
    } else {
        "▼ Collapse all sections"
    };
    Line::from(vec![
        Span::styled(
            label,
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" Ctrl+Shift+A", Style::default().fg(DEFAULT_THEME.hint)),
    ])
}

fn body_line(contents: &SectionContents, id: &'static str, i: usize, last: bool) -> Line<'static> {
    let lines = contents.get(id).map(Vec::as_slice).unwrap_or(&[]);
    if lines.is_empty() {
        return Line::from(Span::styled(
            "  (empty)",
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }
    // Last visible row stands in for everything clipped below it.
    if last && lines.len() > i + 1 {
        return Line::from(Span::styled(
            format!("  … {} more lines", lines.len() - i),
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }
    Line::from(Span::styled(
        format!("  {}", lines[i]),
        Style::default().fg(DEFAULT_THEME.fg),
    ))
}

/// Render the output column through the scroll window.
pub fn render_output_pane(
    frame: &mut Frame,
    area: Rect,
    manager: &SectionManager,
    contents: &SectionContents,
    rows: SectionRows,
    scroll: usize,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };
    let block = Block::default()
        .title(" Output ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let layout = layout_sections(manager, contents, rows);
    let visible_height = area.height.saturating_sub(2) as usize;

    let rendered: Vec<Line> = layout
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible_height)
        .map(|(idx, row)| match *row {
            OutputRow::ToggleAll => toggle_all_line(manager),
            OutputRow::SectionHeader(id) => header_line(manager, id),
            OutputRow::SectionBody(id, i) => {
                let last = !matches!(layout.get(idx + 1), Some(OutputRow::SectionBody(other, _)) if *other == id);
                body_line(contents, id, i, last)
            }
        })
        .collect();

    let paragraph = Paragraph::new(rendered).block(block);
    frame.render_widget(paragraph, area);
}

/// Clamp a scroll offset so the last page stays full where possible.
pub fn max_scroll(
    manager: &SectionManager,
    contents: &SectionContents,
    rows: SectionRows,
    viewport_height: u16,
) -> usize {
    let total = layout_sections(manager, contents, rows).len();
    let visible = viewport_height.saturating_sub(2) as usize;
    total.saturating_sub(visible)
}
