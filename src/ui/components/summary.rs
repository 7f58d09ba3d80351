use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::result::SessionSummary;
use crate::ui::theme::Theme;

pub struct Summary<'a> {
    pub summary: &'a SessionSummary,
    pub theme: &'a Theme,
}

impl<'a> Summary<'a> {
    pub fn new(summary: &'a SessionSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for Summary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.fg());
        let detail = Style::default().fg(colors.slot_empty());

        let block = Block::bordered()
            .title(" Mission Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Span::styled(
            "Results",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let s = self.summary;
        Paragraph::new(Line::from(vec![
            Span::styled("  Score:    ", label),
            Span::styled(
                format!("{} XP", s.score),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  (best combo x{})", s.best_combo), detail),
        ]))
        .render(layout[1], buf);

        let accuracy = s.accuracy();
        let acc_color = if accuracy >= 90.0 {
            colors.success()
        } else if accuracy >= 70.0 {
            colors.warning()
        } else {
            colors.error()
        };
        Paragraph::new(Line::from(vec![
            Span::styled("  Accuracy: ", label),
            Span::styled(
                format!("{accuracy:.1}%"),
                Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({} misses in {} attempts)", s.failures, s.attempts),
                detail,
            ),
        ]))
        .render(layout[2], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("  Words:    ", label),
            Span::styled(format!("{}", s.words), label),
            Span::styled(
                format!("  ({}/{} operations)", s.completed_ops, s.total_ops),
                detail,
            ),
        ]))
        .render(layout[3], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("  Time:     ", label),
            Span::styled(format!("{:.1}s", s.elapsed_secs), label),
        ]))
        .render(layout[4], buf);

        Paragraph::new(Span::styled(
            "  [Enter] Play again  [q/Esc] Menu",
            Style::default().fg(colors.accent()),
        ))
        .render(layout[6], buf);
    }
}
