//! Main TUI application state and logic

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::Paragraph,
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::logger;
use crate::ui::editor::SourceEditor;
use crate::ui::panes::output::{
    content_height, max_scroll, render_output_pane, row_at, OutputRow, SectionContents,
    SectionRows,
};
use crate::ui::panes::source::render_source_pane;
use crate::ui::panes::status::{render_status_bar, StatusState};
use crate::ui::sections::{command_for_key, SectionCommand, SectionManager, PRIMARY_SECTION};
use crate::ui::split::SplitPane;
use crate::ui::theme::DEFAULT_THEME;

/// Result of running a submission, as the UI consumes it. The UI never sees
/// compiler types directly; the hook translates.
pub struct SubmitOutcome {
    pub success: bool,
    pub message: String,
    /// Replacement contents per section id. Ids not listed are cleared.
    pub sections: Vec<(&'static str, Vec<String>)>,
}

/// Submission hook wired in by `main`.
pub type SubmitFn = Box<dyn FnMut(&str) -> SubmitOutcome>;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Editor,
    Output,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Editor => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Editor,
        }
    }
}

/// Pane rects from the last render, used to hit-test mouse events.
#[derive(Debug, Clone, Copy, Default)]
struct LayoutRects {
    left: Rect,
    splitter: Rect,
    right: Rect,
}

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

/// The main application state
pub struct App {
    pub editor: SourceEditor,
    pub split: SplitPane,
    pub sections: SectionManager,
    contents: SectionContents,

    pub focused_pane: FocusedPane,
    pub output_scroll: usize,
    pub should_quit: bool,
    pub status_message: String,
    status_state: StatusState,

    submit: SubmitFn,
    rows: SectionRows,
    double_click_window: Duration,

    layout: LayoutRects,
    /// Last left-down on the splitter, for double-click synthesis.
    last_splitter_press: Option<Instant>,
    /// Last left-down on a section body.
    last_body_press: Option<(Instant, &'static str)>,
}

impl App {
    pub fn new(config: &Config, initial_source: String, submit: SubmitFn) -> Self {
        App {
            editor: SourceEditor::new(&initial_source),
            split: SplitPane::new(config.split_fraction, config.min_pane_width),
            sections: SectionManager::new(Duration::from_millis(config.reflow_delay_ms)),
            contents: SectionContents::default(),
            focused_pane: FocusedPane::Editor,
            output_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready! Press F5 to compile"),
            status_state: StatusState::Idle,
            submit,
            rows: SectionRows {
                body_rows: config.body_rows,
                expanded_rows: config.expanded_rows,
            },
            double_click_window: Duration::from_millis(config.double_click_ms),
            layout: LayoutRects::default(),
            last_splitter_press: None,
            last_body_press: None,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Deferred re-measurement of the output column after visibility
            // or content changes.
            if self.sections.poll_reflow(Instant::now()) {
                let viewport = self.layout.right.height.saturating_sub(2);
                let height = content_height(&self.sections, &self.contents, self.rows);
                self.sections.apply_reflow(height, viewport);
                self.clamp_output_scroll();
            }

            // Poll with timeout so timers keep ticking without input.
            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) => {
                        if key.kind == KeyEventKind::Press {
                            self.handle_key_event(key);
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        let (left, splitter, right) = self.split.split(pane_area);
        self.layout = LayoutRects {
            left,
            splitter,
            right,
        };

        if left.width > 0 {
            render_source_pane(
                frame,
                left,
                &mut self.editor,
                self.focused_pane == FocusedPane::Editor,
            );
        }

        self.render_splitter(frame, splitter);

        self.clamp_output_scroll();
        render_output_pane(
            frame,
            right,
            &self.sections,
            &self.contents,
            self.rows,
            self.output_scroll,
            self.focused_pane == FocusedPane::Output,
        );

        render_status_bar(
            frame,
            status_area,
            &self.status_message,
            self.status_state,
            self.split.is_hidden(),
        );
    }

    fn render_splitter(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 {
            return;
        }
        let color = if self.split.is_dragging() {
            DEFAULT_THEME.splitter_drag
        } else {
            DEFAULT_THEME.splitter
        };
        let lines: Vec<Line> = (0..area.height).map(|_| Line::from("│")).collect();
        let paragraph = Paragraph::new(lines).style(Style::default().fg(color));
        frame.render_widget(paragraph, area);
    }

    fn clamp_output_scroll(&mut self) {
        let limit = max_scroll(
            &self.sections,
            &self.contents,
            self.rows,
            self.layout.right.height,
        );
        if self.output_scroll > limit {
            self.output_scroll = limit;
        }
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        {
            self.should_quit = true;
            return;
        }

        // Section shortcuts win over pane-local editing.
        if let Some(command) = command_for_key(&key) {
            self.run_section_command(command);
            return;
        }

        match key.code {
            KeyCode::F(5) => {
                self.submit_source();
                return;
            }
            KeyCode::F(6) => {
                self.focused_pane = self.focused_pane.next();
                return;
            }
            _ => {}
        }

        match self.focused_pane {
            FocusedPane::Editor => {
                self.editor.handle_key(&key);
            }
            FocusedPane::Output => match key.code {
                KeyCode::Up => self.scroll_output(-1),
                KeyCode::Down => self.scroll_output(1),
                KeyCode::PageUp => self.scroll_output(-10),
                KeyCode::PageDown => self.scroll_output(10),
                KeyCode::Home => self.output_scroll = 0,
                _ => {}
            },
        }
    }

    fn run_section_command(&mut self, command: SectionCommand) {
        self.sections.execute(command);
        self.status_message = match command {
            SectionCommand::Toggle(id) => {
                if self.sections.is_collapsed(id) {
                    format!("Collapsed {}", id)
                } else {
                    format!("Expanded {}", id)
                }
            }
            SectionCommand::ToggleAll => {
                if self.sections.all_collapsed() {
                    "Collapsed all sections".to_string()
                } else {
                    "Expanded all sections".to_string()
                }
            }
            SectionCommand::ExpandAll => "Expanded all sections".to_string(),
            SectionCommand::CollapseAll => "Collapsed all sections".to_string(),
        };
    }

    fn scroll_output(&mut self, delta: i32) {
        let limit = max_scroll(
            &self.sections,
            &self.contents,
            self.rows,
            self.layout.right.height,
        );
        let next = self.output_scroll as i32 + delta;
        self.output_scroll = next.clamp(0, limit as i32) as usize;
    }

    /// Handle mouse events
    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.handle_left_down(mouse.column, mouse.row)
            }
            // While a splitter drag is live, drag events move the splitter
            // and nothing else; no pane sees them.
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.split.is_dragging() {
                    self.split.drag_to(mouse.column);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.split.end_drag() {
                    self.sections.schedule_reflow(Instant::now());
                }
            }
            MouseEventKind::ScrollUp => self.handle_scroll(mouse.column, mouse.row, -1),
            MouseEventKind::ScrollDown => self.handle_scroll(mouse.column, mouse.row, 1),
            _ => {}
        }
    }

    fn handle_left_down(&mut self, x: u16, y: u16) {
        if contains(self.layout.splitter, x, y) {
            // Two presses within the window form a double-click and flip the
            // hidden state instead of starting a new drag.
            let now = Instant::now();
            let is_double = self
                .last_splitter_press
                .is_some_and(|t| now.duration_since(t) <= self.double_click_window);
            if is_double {
                self.last_splitter_press = None;
                self.split.toggle_hidden(self.layout_width());
                self.sections.schedule_reflow(now);
                self.status_message = if self.split.is_hidden() {
                    "Editor hidden (double-click the splitter to restore)".to_string()
                } else {
                    "Editor restored".to_string()
                };
            } else {
                self.last_splitter_press = Some(now);
                self.split.begin_drag(x, self.layout_width());
            }
            return;
        }

        if contains(self.layout.right, x, y) {
            self.focused_pane = FocusedPane::Output;
            self.handle_output_click(x, y);
            return;
        }

        if contains(self.layout.left, x, y) {
            self.focused_pane = FocusedPane::Editor;
        }
    }

    fn handle_output_click(&mut self, x: u16, y: u16) {
        let row = row_at(
            self.layout.right,
            self.output_scroll,
            &self.sections,
            &self.contents,
            self.rows,
            x,
            y,
        );
        match row {
            Some(OutputRow::ToggleAll) => self.run_section_command(SectionCommand::ToggleAll),
            Some(OutputRow::SectionHeader(id)) => {
                self.run_section_command(SectionCommand::Toggle(id))
            }
            Some(OutputRow::SectionBody(id, _)) => {
                // The enlarge gesture is the section's resize affordance;
                // collapsed sections do not take it.
                if !self.sections.resize_enabled(id) {
                    return;
                }
                let now = Instant::now();
                let is_double = self
                    .last_body_press
                    .is_some_and(|(t, prev)| {
                        prev == id && now.duration_since(t) <= self.double_click_window
                    });
                if is_double {
                    self.last_body_press = None;
                    self.sections.expand_section(id);
                    self.status_message = if self.sections.is_expanded(id) {
                        format!("Enlarged {}", id)
                    } else {
                        format!("Restored {}", id)
                    };
                } else {
                    self.last_body_press = Some((now, id));
                }
            }
            None => {}
        }
    }

    fn handle_scroll(&mut self, x: u16, y: u16, delta: i32) {
        if contains(self.layout.right, x, y) {
            self.scroll_output(delta);
        } else if contains(self.layout.left, x, y) {
            let next = self.editor.scroll as i32 + delta;
            let limit = self.editor.line_count().saturating_sub(1) as i32;
            self.editor.scroll = next.clamp(0, limit) as usize;
        }
    }

    fn layout_width(&self) -> u16 {
        self.layout.left.width + self.layout.splitter.width + self.layout.right.width
    }

    /// Compile the buffer and swap the section contents for the result.
    pub fn submit_source(&mut self) {
        let source = self.editor.text();
        let outcome = (self.submit)(&source);

        self.contents.clear();
        for (id, lines) in outcome.sections {
            self.contents.insert(id, lines);
        }

        if outcome.success {
            self.status_state = StatusState::Success;
            logger::info(format!("compile ok: {}", outcome.message));
        } else {
            self.status_state = StatusState::Failure;
            // Failures land in the primary section, so force it visible.
            self.sections.show(PRIMARY_SECTION);
            logger::warn(format!("compile failed: {}", outcome.message));
        }
        self.status_message = outcome.message;
        self.editor.mark_clean();
        self.output_scroll = 0;
        self.sections.schedule_reflow(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::default()
    }

    fn app_with(submit: SubmitFn) -> App {
        App::new(&test_config(), "int x;".to_string(), submit)
    }

    #[test]
    fn test_submit_replaces_contents_and_marks_clean() {
        let mut app = app_with(Box::new(|src| SubmitOutcome {
            success: true,
            message: format!("compiled {} bytes", src.len()),
            sections: vec![("asm", vec!["MOV AX, 1".to_string()])],
        }));
        app.editor.handle_key(&KeyEvent::new(
            KeyCode::Char('x'),
            KeyModifiers::NONE,
        ));
        assert!(app.editor.is_dirty());

        app.submit_source();
        assert!(!app.editor.is_dirty());
        assert_eq!(app.contents.get("asm").unwrap()[0], "MOV AX, 1");
        assert!(app.sections.poll_reflow(
            Instant::now() + Duration::from_millis(100)
        ));
    }

    #[test]
    fn test_failed_submit_forces_primary_visible() {
        let mut app = app_with(Box::new(|_| SubmitOutcome {
            success: false,
            message: "syntax error".to_string(),
            sections: vec![(PRIMARY_SECTION, vec!["syntax error".to_string()])],
        }));
        app.sections.hide(PRIMARY_SECTION);

        app.submit_source();
        assert!(!app.sections.is_collapsed(PRIMARY_SECTION));
        assert_eq!(app.status_message, "syntax error");
    }

    #[test]
    fn test_focus_cycles_with_f6() {
        let mut app = app_with(Box::new(|_| SubmitOutcome {
            success: true,
            message: String::new(),
            sections: vec![],
        }));
        assert_eq!(app.focused_pane, FocusedPane::Editor);
        app.handle_key_event(KeyEvent::new(KeyCode::F(6), KeyModifiers::NONE));
        assert_eq!(app.focused_pane, FocusedPane::Output);
        app.handle_key_event(KeyEvent::new(KeyCode::F(6), KeyModifiers::NONE));
        assert_eq!(app.focused_pane, FocusedPane::Editor);
    }

    #[test]
    fn test_section_shortcut_wins_over_editor() {
        let mut app = app_with(Box::new(|_| SubmitOutcome {
            success: true,
            message: String::new(),
            sections: vec![],
        }));
        let before = app.editor.text();
        app.handle_key_event(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::CONTROL));
        assert_eq!(app.editor.text(), before);
        assert!(app.sections.is_collapsed("asm"));
    }

    #[test]
    fn test_ctrl_q_quits() {
        let mut app = app_with(Box::new(|_| SubmitOutcome {
            success: true,
            message: String::new(),
            sections: vec![],
        }));
        app.handle_key_event(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
