use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::session::input::InputEvent;
use crate::ui::theme::Theme;

/// A clickable key on the on-screen keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyTarget {
    Letter(char),
    Backspace,
}

impl KeyTarget {
    pub fn to_input(self) -> InputEvent {
        match self {
            KeyTarget::Letter(ch) => InputEvent::Letter(ch),
            KeyTarget::Backspace => InputEvent::Backspace,
        }
    }

    fn label(self) -> String {
        match self {
            KeyTarget::Letter(ch) => format!("[ {} ]", ch.to_ascii_uppercase()),
            KeyTarget::Backspace => "[DEL]".to_string(),
        }
    }
}

const ROWS: &[&[char]] = &[
    &['q', 'w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p'],
    &['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l'],
    &['z', 'x', 'c', 'v', 'b', 'n', 'm'],
];

const KEY_WIDTH: u16 = 5;
const ROW_OFFSETS: [u16; 3] = [1, 3, 5];
/// Widest row: the top one, offset plus ten keys.
const GRID_WIDTH: u16 = 1 + 10 * KEY_WIDTH;

/// Outer height the widget needs, borders included.
pub const KEYBOARD_HEIGHT: u16 = 5;

/// Screen rectangles of every key inside the bordered `area`. Keys that do
/// not fit are left out.
pub fn key_layout(area: Rect) -> Vec<(KeyTarget, Rect)> {
    let inner = Block::bordered().inner(area);
    let left = inner.x + inner.width.saturating_sub(GRID_WIDTH) / 2;
    let right = inner.x + inner.width;
    let mut keys = Vec::new();

    for (row_idx, row) in ROWS.iter().enumerate() {
        let y = inner.y + row_idx as u16;
        if y >= inner.y + inner.height {
            break;
        }
        let mut targets: Vec<KeyTarget> = row.iter().map(|&ch| KeyTarget::Letter(ch)).collect();
        if row_idx == ROWS.len() - 1 {
            targets.push(KeyTarget::Backspace);
        }

        for (col_idx, target) in targets.into_iter().enumerate() {
            let x = left + ROW_OFFSETS[row_idx] + col_idx as u16 * KEY_WIDTH;
            if x + KEY_WIDTH > right {
                break;
            }
            keys.push((target, Rect::new(x, y, KEY_WIDTH, 1)));
        }
    }
    keys
}

/// Hit-test a mouse position against the keyboard drawn in `area`.
pub fn key_at(area: Rect, column: u16, row: u16) -> Option<KeyTarget> {
    let pos = Position::new(column, row);
    key_layout(area)
        .into_iter()
        .find(|(_, rect)| rect.contains(pos))
        .map(|(target, _)| target)
}

pub struct Keyboard<'a> {
    pub enabled: bool,
    pub pressed: Option<KeyTarget>,
    pub theme: &'a Theme,
}

impl<'a> Keyboard<'a> {
    pub fn new(enabled: bool, pressed: Option<KeyTarget>, theme: &'a Theme) -> Self {
        Self {
            enabled,
            pressed,
            theme,
        }
    }
}

impl Widget for Keyboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Keys ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let keys = key_layout(area);
        block.render(area, buf);

        for (target, rect) in keys {
            let style = if !self.enabled {
                Style::default().fg(colors.slot_empty()).bg(colors.bg())
            } else if self.pressed == Some(target) {
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else if target == KeyTarget::Backspace {
                Style::default().fg(colors.warning()).bg(colors.bg())
            } else {
                Style::default().fg(colors.key_fg()).bg(colors.bg())
            };
            buf.set_string(rect.x, rect.y, target.label(), style);
        }
    }
}
