//! Collapse/expand state for the compiler output sections.
//!
//! The output column holds a fixed, ordered registry of nine sections, one per
//! compiler artifact. Each section can be collapsed (body hidden, `▶` glyph)
//! or expanded to an enlarged size (`▼` glyph, taller body); the two flags are
//! orthogonal except that a collapsed section is never simultaneously
//! expanded. The aggregate "toggle all" control is derived from the sets on
//! every invocation rather than tracked separately, so interleaved
//! single-section toggles can never desynchronize it.
//!
//! [`SectionManager`] owns the two id sets and the deferred re-measurement
//! timer; rendering reads the state, it never writes it.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rustc_hash::FxHashSet;

use crate::ui::reflow::ReflowTimer;

/// Fixed registry of section ids, in display order. The ids double as the
/// keys of the submission contract.
pub const SECTION_IDS: [&str; 9] = [
    "opt_area",
    "asm",
    "tokens",
    "symbol_table",
    "keyword_table",
    "identifier_table",
    "constant_table",
    "operator_table",
    "separator_table",
];

/// The primary output region; failure messages land here.
pub const PRIMARY_SECTION: &str = "opt_area";

/// Sections reachable through Ctrl+1..Ctrl+4.
pub const SHORTCUT_SECTIONS: [&str; 4] = ["opt_area", "asm", "tokens", "symbol_table"];

/// Human-readable section titles for headers.
pub fn section_title(id: &str) -> &'static str {
    match id {
        "opt_area" => "Quadruples",
        "asm" => "Assembly",
        "tokens" => "Token Stream",
        "symbol_table" => "Symbol Table",
        "keyword_table" => "Keywords",
        "identifier_table" => "Identifiers",
        "constant_table" => "Constants",
        "operator_table" => "Operators",
        "separator_table" => "Separators",
        _ => "?",
    }
}

/// Commands produced by the global keyboard dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionCommand {
    Toggle(&'static str),
    ToggleAll,
    ExpandAll,
    CollapseAll,
}

/// Map a key event to a section command.
///
/// Ctrl+1..4 toggle the four main sections; Ctrl+Shift+A/E/C run the
/// aggregate operations. Anything else falls through to the focused pane, so
/// this dispatcher and the editor never fight over a key.
pub fn command_for_key(key: &KeyEvent) -> Option<SectionCommand> {
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::SHIFT) {
        return match key.code {
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'a' => Some(SectionCommand::ToggleAll),
                'e' => Some(SectionCommand::ExpandAll),
                'c' => Some(SectionCommand::CollapseAll),
                _ => None,
            },
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            Some(SectionCommand::Toggle(SHORTCUT_SECTIONS[idx]))
        }
        _ => None,
    }
}

/// Collapse/expand state for all registered sections.
#[derive(Debug)]
pub struct SectionManager {
    collapsed: FxHashSet<&'static str>,
    expanded: FxHashSet<&'static str>,
    /// Raised min-height of the output column, in rows, when content would
    /// otherwise be clipped.
    min_height: Option<u16>,
    reflow: ReflowTimer,
}

impl SectionManager {
    pub fn new(reflow_delay: Duration) -> Self {
        Self {
            collapsed: FxHashSet::default(),
            expanded: FxHashSet::default(),
            min_height: None,
            reflow: ReflowTimer::new(reflow_delay),
        }
    }

    /// Resolve an id against the fixed registry. Unknown ids resolve to
    /// `None` and every operation treats them as a no-op.
    fn lookup(id: &str) -> Option<&'static str> {
        SECTION_IDS.iter().find(|s| **s == id).copied()
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Vertical-resize affordance: disabled while collapsed.
    pub fn resize_enabled(&self, id: &str) -> bool {
        !self.is_collapsed(id)
    }

    /// Toggle indicator for the section header. Pure function of the sets, so
    /// the glyph can never drift from the underlying state.
    pub fn glyph(&self, id: &str) -> char {
        if self.is_collapsed(id) {
            '▶'
        } else {
            '▼'
        }
    }

    pub fn all_collapsed(&self) -> bool {
        SECTION_IDS.iter().all(|id| self.collapsed.contains(id))
    }

    pub fn collapsed_count(&self) -> usize {
        self.collapsed.len()
    }

    pub fn toggle_section(&mut self, id: &str) {
        if self.is_collapsed(id) {
            self.show(id);
        } else {
            self.hide(id);
        }
    }

    pub fn show(&mut self, id: &str) {
        let Some(id) = Self::lookup(id) else { return };
        self.collapsed.remove(id);
        self.reflow.schedule(Instant::now());
    }

    pub fn hide(&mut self, id: &str) {
        let Some(id) = Self::lookup(id) else { return };
        self.collapsed.insert(id);
        // Collapsing forcibly un-maximizes.
        self.expanded.remove(id);
        self.reflow.schedule(Instant::now());
    }

    /// Double-click on a section body: flip the enlarged state, forcing the
    /// section visible first.
    pub fn expand_section(&mut self, id: &str) {
        let Some(id) = Self::lookup(id) else { return };
        if self.collapsed.contains(id) {
            self.show(id);
        }
        if !self.expanded.remove(id) {
            self.expanded.insert(id);
        }
        self.reflow.schedule(Instant::now());
    }

    /// Aggregate toggle, recomputed from the sets on every call.
    pub fn toggle_all_sections(&mut self) {
        if self.all_collapsed() {
            self.expand_all_sections();
        } else {
            self.collapse_all_sections();
        }
    }

    pub fn collapse_all_sections(&mut self) {
        for id in SECTION_IDS {
            if !self.collapsed.contains(id) {
                self.hide(id);
            }
        }
    }

    pub fn expand_all_sections(&mut self) {
        for id in SECTION_IDS {
            if self.collapsed.contains(id) {
                self.show(id);
            }
        }
    }

    pub fn execute(&mut self, command: SectionCommand) {
        match command {
            SectionCommand::Toggle(id) => self.toggle_section(id),
            SectionCommand::ToggleAll => self.toggle_all_sections(),
            SectionCommand::ExpandAll => self.expand_all_sections(),
            SectionCommand::CollapseAll => self.collapse_all_sections(),
        }
    }

    /// Arm the deferred re-measurement (also used after submissions replace
    /// section contents).
    pub fn schedule_reflow(&mut self, now: Instant) {
        self.reflow.schedule(now);
    }

    /// Poll the deferred check; returns `true` when the caller should
    /// re-measure and call [`SectionManager::apply_reflow`].
    pub fn poll_reflow(&mut self, now: Instant) -> bool {
        self.reflow.fire(now)
    }

    /// Record the measured content height. The minimum height only rises
    /// above the viewport when content would otherwise be clipped.
    pub fn apply_reflow(&mut self, content_height: u16, viewport_height: u16) {
        if content_height > viewport_height {
            self.min_height = Some(content_height);
        } else {
            self.min_height = None;
        }
    }

    pub fn min_height(&self) -> Option<u16> {
        self.min_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SectionManager {
        SectionManager::new(Duration::from_millis(50))
    }

    #[test]
    fn test_hide_then_expand_leaves_visible_and_expanded() {
        let mut mgr = manager();
        mgr.hide("tokens");
        mgr.expand_section("tokens");

        assert!(!mgr.is_collapsed("tokens"));
        assert!(mgr.is_expanded("tokens"));
    }

    #[test]
    fn test_collapse_unmaximizes() {
        let mut mgr = manager();
        mgr.expand_section("asm");
        assert!(mgr.is_expanded("asm"));

        mgr.hide("asm");
        assert!(mgr.is_collapsed("asm"));
        assert!(!mgr.is_expanded("asm"));
    }

    #[test]
    fn test_resize_affordance_follows_visibility() {
        let mut mgr = manager();
        assert!(mgr.resize_enabled("asm"));

        mgr.hide("asm");
        assert!(!mgr.resize_enabled("asm"));

        mgr.show("asm");
        assert!(mgr.resize_enabled("asm"));
    }

    #[test]
    fn test_glyph_follows_state() {
        let mut mgr = manager();
        assert_eq!(mgr.glyph("opt_area"), '▼');
        mgr.hide("opt_area");
        assert_eq!(mgr.glyph("opt_area"), '▶');
        mgr.show("opt_area");
        assert_eq!(mgr.glyph("opt_area"), '▼');
    }

    #[test]
    fn test_toggle_all_oscillates() {
        let mut mgr = manager();
        // Partially collapsed: 3 of 9.
        mgr.hide("asm");
        mgr.hide("tokens");
        mgr.hide("symbol_table");

        // Not all collapsed, so the aggregate collapses everything.
        mgr.toggle_all_sections();
        assert!(mgr.all_collapsed());

        mgr.toggle_all_sections();
        assert_eq!(mgr.collapsed_count(), 0);

        mgr.toggle_all_sections();
        assert!(mgr.all_collapsed());
    }

    #[test]
    fn test_sweeps_are_idempotent() {
        let mut mgr = manager();
        mgr.collapse_all_sections();
        mgr.collapse_all_sections();
        assert!(mgr.all_collapsed());

        mgr.expand_all_sections();
        mgr.expand_all_sections();
        assert_eq!(mgr.collapsed_count(), 0);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut mgr = manager();
        mgr.toggle_section("nonexistent");
        mgr.expand_section("nonexistent");
        assert_eq!(mgr.collapsed_count(), 0);
        assert!(!mgr.is_expanded("nonexistent"));
    }

    #[test]
    fn test_collapse_all_show_expand_scenario() {
        let mut mgr = manager();
        mgr.collapse_all_sections();
        assert_eq!(mgr.collapsed_count(), 9);

        mgr.show("tokens");
        assert_eq!(mgr.collapsed_count(), 8);
        assert!(!mgr.is_collapsed("tokens"));
        assert!(!mgr.is_expanded("tokens"));

        mgr.expand_section("tokens");
        assert!(mgr.is_expanded("tokens"));
        assert!(!mgr.is_collapsed("tokens"));
    }

    #[test]
    fn test_keyboard_matches_click_path() {
        let mut by_key = manager();
        let mut by_click = manager();

        let key = KeyEvent::new(KeyCode::Char('3'), KeyModifiers::CONTROL);
        let cmd = command_for_key(&key).expect("Ctrl+3 should dispatch");
        assert_eq!(cmd, SectionCommand::Toggle("tokens"));

        by_key.execute(cmd);
        by_click.toggle_section("tokens");

        assert_eq!(by_key.is_collapsed("tokens"), by_click.is_collapsed("tokens"));
        assert_eq!(by_key.is_expanded("tokens"), by_click.is_expanded("tokens"));
    }

    #[test]
    fn test_dispatch_table() {
        let ctrl = KeyModifiers::CONTROL;
        let ctrl_shift = KeyModifiers::CONTROL | KeyModifiers::SHIFT;

        assert_eq!(
            command_for_key(&KeyEvent::new(KeyCode::Char('1'), ctrl)),
            Some(SectionCommand::Toggle("opt_area"))
        );
        assert_eq!(
            command_for_key(&KeyEvent::new(KeyCode::Char('A'), ctrl_shift)),
            Some(SectionCommand::ToggleAll)
        );
        assert_eq!(
            command_for_key(&KeyEvent::new(KeyCode::Char('e'), ctrl_shift)),
            Some(SectionCommand::ExpandAll)
        );
        assert_eq!(
            command_for_key(&KeyEvent::new(KeyCode::Char('c'), ctrl_shift)),
            Some(SectionCommand::CollapseAll)
        );
        // Plain keys fall through to the focused pane.
        assert_eq!(
            command_for_key(&KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            command_for_key(&KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn test_visibility_change_arms_reflow() {
        let mut mgr = manager();
        mgr.hide("asm");
        let later = Instant::now() + Duration::from_millis(60);
        assert!(mgr.poll_reflow(later));

        mgr.apply_reflow(80, 40);
        assert_eq!(mgr.min_height(), Some(80));
        mgr.apply_reflow(30, 40);
        assert_eq!(mgr.min_height(), None);
    }
}
