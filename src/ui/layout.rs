use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::ui::components::keyboard::KEYBOARD_HEIGHT;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Full,    // keyboard and hazard bar
    Compact, // hazard bar only, keyboard hidden
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.height >= 22 && area.width >= 55 {
            LayoutTier::Full
        } else {
            LayoutTier::Compact
        }
    }

    pub fn show_keyboard(&self) -> bool {
        *self == LayoutTier::Full
    }
}

/// Regions of the session screen. The same computation serves rendering and
/// mouse hit-testing, so both always agree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionLayout {
    pub header: Rect,
    pub board: Rect,
    pub hazard: Rect,
    pub retry: Rect,
    pub keyboard: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

pub const RETRY_WIDTH: u16 = 20;

impl SessionLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);
        let keyboard_height = if tier.show_keyboard() { KEYBOARD_HEIGHT } else { 0 };

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(7),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(keyboard_height),
                Constraint::Length(1),
            ])
            .split(area);

        let retry_row = vertical[3];
        let retry_width = RETRY_WIDTH.min(retry_row.width);
        let retry = Rect::new(
            retry_row.x + (retry_row.width - retry_width) / 2,
            retry_row.y,
            retry_width,
            retry_row.height,
        );

        Self {
            header: vertical[0],
            board: vertical[1],
            hazard: vertical[2],
            retry,
            keyboard: tier.show_keyboard().then_some(vertical[4]),
            footer: vertical[5],
            tier,
        }
    }
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width || !has_hint {
            current = candidate;
            has_hint = true;
        } else {
            out.push(current);
            current = format!("{prefix}{hint}");
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 14;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}
