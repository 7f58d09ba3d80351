use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::view::{SessionView, SlotState, SlotView};
use crate::ui::theme::{Theme, ThemeColors};

/// Definition prompt above the row of letter slots.
pub struct WordBoard<'a> {
    view: &'a SessionView,
    theme: &'a Theme,
}

impl<'a> WordBoard<'a> {
    pub fn new(view: &'a SessionView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }
}

fn slot_text(slot: &SlotView) -> String {
    match slot.ch {
        Some(' ') => " \u{00b7} ".to_string(),
        Some(ch) => format!(" {} ", ch.to_uppercase()),
        None => " _ ".to_string(),
    }
}

fn slot_style(slot: &SlotView, colors: &ThemeColors) -> Style {
    let base = match slot.state {
        SlotState::Empty => Style::default().fg(colors.slot_empty()),
        SlotState::Filled => Style::default()
            .fg(colors.slot_filled())
            .add_modifier(Modifier::BOLD),
        SlotState::Prefilled => Style::default().fg(colors.slot_prefilled()),
        SlotState::Correct => Style::default()
            .fg(colors.slot_correct())
            .add_modifier(Modifier::BOLD),
        SlotState::Wrong => Style::default()
            .fg(colors.slot_wrong())
            .add_modifier(Modifier::CROSSED_OUT),
    };
    if slot.active {
        base.fg(colors.bg()).bg(colors.slot_active())
    } else {
        base
    }
}

fn slot_line<'s>(slots: &[SlotView], colors: &ThemeColors) -> Line<'s> {
    let spans: Vec<Span> = slots
        .iter()
        .map(|slot| Span::styled(slot_text(slot), slot_style(slot, colors)))
        .collect();
    Line::from(spans)
}

impl Widget for WordBoard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Definition ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(self.view.definition.as_str())
            .style(Style::default().fg(colors.definition()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout[0], buf);

        Paragraph::new(slot_line(&self.view.slots, colors))
            .alignment(Alignment::Center)
            .render(layout[2], buf);

        if let Some(ref word) = self.view.revealed {
            let line = Line::from(vec![
                Span::styled("Answer: ", Style::default().fg(colors.fg())),
                Span::styled(
                    word.as_str(),
                    Style::default()
                        .fg(colors.slot_correct())
                        .add_modifier(Modifier::BOLD),
                ),
            ]);
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .render(layout[4], buf);
        } else if let Some(ref reward) = self.view.reward {
            Paragraph::new(Span::styled(
                reward.as_str(),
                Style::default()
                    .fg(colors.reward())
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .render(layout[4], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(ch: Option<char>, state: SlotState) -> SlotView {
        SlotView {
            ch,
            state,
            active: false,
        }
    }

    #[test]
    fn test_slot_text_uppercases_and_marks_gaps() {
        assert_eq!(slot_text(&slot(Some('a'), SlotState::Filled)), " A ");
        assert_eq!(slot_text(&slot(None, SlotState::Empty)), " _ ");
        assert_eq!(slot_text(&slot(Some('-'), SlotState::Prefilled)), " - ");
        assert_eq!(slot_text(&slot(Some(' '), SlotState::Prefilled)), " \u{00b7} ");
    }

    #[test]
    fn test_active_slot_is_highlighted() {
        let colors = ThemeColors::default();
        let mut active = slot(None, SlotState::Empty);
        active.active = true;
        let style = slot_style(&active, &colors);
        assert_eq!(style.bg, Some(colors.slot_active()));
    }
}
