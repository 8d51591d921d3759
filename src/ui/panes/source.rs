//! Source editor pane rendering with syntax highlighting
//!
//! This module renders the left pane, which holds the editable mini-C program.
//! It applies basic syntax highlighting, draws the cursor as a reversed cell,
//! and keeps the cursor line inside the viewport.
//!
//! # Rendering
//!
//! The pane uses a simple character-by-character tokenizer to apply syntax
//! highlighting styles without requiring a full lexer, so even source that the
//! real lexer rejects still renders sensibly.

use crate::ui::editor::SourceEditor;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Simple syntax highlighting for mini-C code
fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Handle strings
        if c == '"' {
            if !current_word.is_empty() {
                spans.push(Span::raw(current_word.clone()));
                current_word.clear();
            }
            let mut end = i + 1;
            while end < chars.len() && chars[end] != '"' {
                end += 1;
            }
            if end < chars.len() {
                end += 1;
            }
            let text: String = chars[i..end].iter().collect();
            spans.push(Span::styled(
                text,
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        // Handle non-alphanumeric (delimiters)
        if !c.is_alphanumeric() && c != '_' {
            if !current_word.is_empty() {
                spans.push(Span::styled(
                    current_word.clone(),
                    get_word_style(&current_word),
                ));
                current_word.clear();
            }

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                '+' | '-' | '*' | '/' | '=' | '<' | '>' | '!' => {
                    Style::default().fg(DEFAULT_THEME.fg)
                }
                _ => Style::default(),
            };

            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        let style = get_word_style(&current_word);
        spans.push(Span::styled(current_word, style));
    }

    Line::from(spans)
}

fn get_word_style(word: &str) -> Style {
    match word {
        "int" | "char" | "string" => Style::default().fg(DEFAULT_THEME.type_name),
        "if" | "else" | "while" | "for" | "return" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        _ => {
            if word.chars().all(|c| c.is_ascii_digit()) {
                Style::default().fg(DEFAULT_THEME.number)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            }
        }
    }
}

/// Render the source editor pane
pub fn render_source_pane(frame: &mut Frame, area: Rect, editor: &mut SourceEditor, is_focused: bool) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let title = if editor.is_dirty() {
        " Source * "
    } else {
        " Source "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let (cursor_row, cursor_col) = editor.cursor();

    // Keep the cursor line inside the viewport.
    if cursor_row < editor.scroll {
        editor.scroll = cursor_row;
    } else if cursor_row >= editor.scroll + visible_height {
        editor.scroll = cursor_row + 1 - visible_height;
    }
    let scroll = editor.scroll;

    let visible_lines: Vec<Line> = editor
        .lines()
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible_height)
        .map(|(idx, line)| {
            let is_cursor_line = idx == cursor_row;
            let line_num_str = format!("{:4} ", idx + 1);
            let num_style = if is_cursor_line {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut content_line = highlight_source_code(line);

            if is_cursor_line {
                for span in &mut content_line.spans {
                    span.style = span
                        .style
                        .patch(Style::default().bg(DEFAULT_THEME.current_line_bg));
                }
                if is_focused {
                    content_line = overlay_cursor(line, cursor_col);
                }
            }

            let mut final_spans = vec![Span::styled(line_num_str, num_style)];
            final_spans.extend(content_line.spans);
            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Re-split the highlighted line so the cursor cell renders reversed. Styles
/// to the left and right of the cursor are discarded for that one line; the
/// cursor is more important than per-character color under it.
fn overlay_cursor(raw: &str, cursor_col: usize) -> Line<'static> {
    let chars: Vec<char> = raw.chars().collect();
    let before: String = chars.iter().take(cursor_col).collect();
    let at: String = chars
        .get(cursor_col)
        .map(|c| c.to_string())
        .unwrap_or_else(|| " ".to_string());
    let after: String = chars.iter().skip(cursor_col + 1).collect();

    let bg = Style::default().bg(DEFAULT_THEME.current_line_bg);
    Line::from(vec![
        Span::styled(before, bg.fg(DEFAULT_THEME.fg)),
        Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)),
        Span::styled(after, bg.fg(DEFAULT_THEME.fg)),
    ])
}
