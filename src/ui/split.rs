//! Split-pane resizer for the editor/output layout.
//!
//! The main area is divided into a left pane (source editor), a one-cell
//! splitter column, and a right pane (output sections). Dragging the splitter
//! resizes both panes; double-clicking it hides the left pane entirely and a
//! second double-click restores the width it had before hiding.
//!
//! [`SplitPane`] is a plain state machine over cell geometry: it never touches
//! the terminal. The app feeds it mouse positions and the current container
//! width, and reads back pane rects for rendering and hit-testing. All bad
//! geometry (too-narrow terminal, out-of-range drags) is silently clamped.

use ratatui::layout::Rect;

/// Ephemeral drag state, captured on mouse-down over the splitter and dropped
/// on mouse-up.
#[derive(Debug, Clone, Copy)]
pub struct DragSession {
    origin_pointer_x: u16,
    origin_left_width: u16,
    container_width: u16,
    splitter_width: u16,
}

/// Two-pane split with a draggable, double-clickable splitter.
///
/// States: `Idle` (`drag.is_none() && !hidden`), `Dragging` (`drag.is_some()`),
/// `LeftHidden` (`hidden`). A hidden pane can never be mid-drag.
#[derive(Debug)]
pub struct SplitPane {
    left_fraction: f64,
    right_fraction: f64,
    hidden: bool,
    /// Left fraction to restore after unhiding.
    last_left_width: f64,
    min_width: u16,
    splitter_width: u16,
    drag: Option<DragSession>,
}

impl SplitPane {
    pub fn new(initial_left: f64, min_width: u16) -> Self {
        let initial_left = initial_left.clamp(0.0, 1.0);
        Self {
            left_fraction: initial_left,
            right_fraction: 1.0 - initial_left,
            hidden: false,
            last_left_width: initial_left,
            min_width,
            splitter_width: 1,
            drag: None,
        }
    }

    pub fn left_fraction(&self) -> f64 {
        self.left_fraction
    }

    pub fn right_fraction(&self) -> f64 {
        self.right_fraction
    }

    pub fn last_left_width(&self) -> f64 {
        self.last_left_width
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn splitter_width(&self) -> u16 {
        self.splitter_width
    }

    /// Start a drag session. Refused while the left pane is hidden.
    pub fn begin_drag(&mut self, pointer_x: u16, container_width: u16) -> bool {
        if self.hidden || self.drag.is_some() {
            return false;
        }
        self.drag = Some(DragSession {
            origin_pointer_x: pointer_x,
            origin_left_width: self.left_cells(container_width),
            container_width,
            splitter_width: self.splitter_width,
        });
        true
    }

    /// Move the splitter to follow the pointer. No-op outside a drag session.
    pub fn drag_to(&mut self, pointer_x: u16) {
        let Some(session) = self.drag else {
            return;
        };

        let delta = pointer_x as i32 - session.origin_pointer_x as i32;
        let candidate = session.origin_left_width as i32 + delta;

        let container = session.container_width as i32;
        let min = self.min_width as i32;
        let max = container - min - session.splitter_width as i32;
        // When the container is too narrow for two min-width panes the lower
        // bound wins and the result pins to min_width; a container smaller
        // than min_width itself caps at the container so both fractions stay
        // inside [0, 1].
        let clamped = candidate.min(max).max(min).min(container);

        if container <= 0 {
            return;
        }
        self.left_fraction = clamped as f64 / container as f64;
        self.right_fraction = (container - clamped - session.splitter_width as i32).max(0) as f64
            / container as f64;
        self.last_left_width = self.left_fraction;
    }

    /// End the drag session. Returns `true` if one was live.
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Double-click on the splitter: hide the left pane, or restore the width
    /// it had before hiding. Ignored while a drag session is live.
    pub fn toggle_hidden(&mut self, container_width: u16) {
        if self.drag.is_some() {
            return;
        }
        let splitter_fraction = self.splitter_fraction(container_width);
        if self.hidden {
            self.left_fraction = self.last_left_width;
            self.right_fraction = 1.0 - self.last_left_width - splitter_fraction;
            self.hidden = false;
        } else {
            self.last_left_width = self.left_fraction;
            self.left_fraction = 0.0;
            self.right_fraction = 1.0 - splitter_fraction;
            self.hidden = true;
        }
    }

    fn splitter_fraction(&self, container_width: u16) -> f64 {
        if container_width == 0 {
            return 0.0;
        }
        self.splitter_width as f64 / container_width as f64
    }

    fn left_cells(&self, container_width: u16) -> u16 {
        if self.hidden {
            return 0;
        }
        let cells = (self.left_fraction * container_width as f64).round() as i32;
        cells.clamp(0, container_width.saturating_sub(self.splitter_width) as i32) as u16
    }

    /// Carve the container into (left, splitter, right) rects.
    pub fn split(&self, area: Rect) -> (Rect, Rect, Rect) {
        let left_width = self.left_cells(area.width);
        let splitter_width = self.splitter_width.min(area.width.saturating_sub(left_width));
        let right_width = area
            .width
            .saturating_sub(left_width)
            .saturating_sub(splitter_width);

        let left = Rect {
            x: area.x,
            y: area.y,
            width: left_width,
            height: area.height,
        };
        let splitter = Rect {
            x: area.x + left_width,
            y: area.y,
            width: splitter_width,
            height: area.height,
        };
        let right = Rect {
            x: area.x + left_width + splitter_width,
            y: area.y,
            width: right_width,
            height: area.height,
        };
        (left, splitter, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn pane() -> SplitPane {
        SplitPane::new(0.5, 20)
    }

    #[test]
    fn test_drag_keeps_fraction_sum() {
        let container = 120;
        let mut split = pane();
        assert!(split.begin_drag(60, container));

        let splitter_fraction = 1.0 / container as f64;
        for x in [61, 70, 45, 90, 30, 100] {
            split.drag_to(x);
            let sum = split.left_fraction() + split.right_fraction();
            assert!(
                (sum - (1.0 - splitter_fraction)).abs() < TOLERANCE,
                "sum {} at x={}",
                sum,
                x
            );
        }
    }

    #[test]
    fn test_drag_clamps_to_bounds() {
        let container = 120;
        let mut split = pane();
        split.begin_drag(60, container);

        split.drag_to(0);
        assert!((split.left_fraction() - 20.0 / 120.0).abs() < TOLERANCE);

        // Pointer far right of the container still respects the right pane's
        // minimum width.
        split.drag_to(400);
        assert!((split.left_fraction() - 99.0 / 120.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_too_narrow_container_pins_to_min() {
        // 30 cells cannot hold two 20-cell panes plus the splitter.
        let container = 30;
        let mut split = pane();
        split.begin_drag(15, container);

        split.drag_to(29);
        assert!((split.left_fraction() - 20.0 / 30.0).abs() < TOLERANCE);
        split.drag_to(0);
        assert!((split.left_fraction() - 20.0 / 30.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_degenerate_container_keeps_fractions_in_range() {
        // 15 cells is narrower than a single min-width pane.
        let container = 15;
        let mut split = pane();
        split.begin_drag(7, container);

        for x in [0, 7, 200] {
            split.drag_to(x);
            assert!((0.0..=1.0).contains(&split.left_fraction()));
            assert!((0.0..=1.0).contains(&split.right_fraction()));
        }
    }

    #[test]
    fn test_hide_then_show_roundtrips_width() {
        let container = 120;
        let mut split = pane();
        split.begin_drag(60, container);
        split.drag_to(80);
        split.end_drag();
        let before = split.left_fraction();

        split.toggle_hidden(container);
        assert!(split.is_hidden());
        assert!(split.left_fraction().abs() < TOLERANCE);
        assert!((split.right_fraction() - (1.0 - 1.0 / 120.0)).abs() < TOLERANCE);

        split.toggle_hidden(container);
        assert!(!split.is_hidden());
        assert!((split.left_fraction() - before).abs() < TOLERANCE);
    }

    #[test]
    fn test_no_drag_while_hidden() {
        let container = 120;
        let mut split = pane();
        split.toggle_hidden(container);
        assert!(!split.begin_drag(60, container));
        assert!(!split.is_dragging());
    }

    #[test]
    fn test_toggle_ignored_while_dragging() {
        let container = 120;
        let mut split = pane();
        split.begin_drag(60, container);
        split.toggle_hidden(container);
        assert!(!split.is_hidden());
        assert!(split.is_dragging());
    }

    #[test]
    fn test_split_rects_tile_the_area() {
        let split = pane();
        let area = Rect {
            x: 0,
            y: 1,
            width: 121,
            height: 30,
        };
        let (left, splitter, right) = split.split(area);
        assert_eq!(left.width + splitter.width + right.width, area.width);
        assert_eq!(splitter.x, left.x + left.width);
        assert_eq!(right.x, splitter.x + splitter.width);
    }

    #[test]
    fn test_hidden_split_gives_left_zero_width() {
        let mut split = pane();
        let area = Rect {
            x: 0,
            y: 0,
            width: 120,
            height: 30,
        };
        split.toggle_hidden(area.width);
        let (left, splitter, right) = split.split(area);
        assert_eq!(left.width, 0);
        assert_eq!(splitter.width, 1);
        assert_eq!(right.width, 119);
    }
}
