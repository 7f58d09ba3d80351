use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::session::view::HudView;
use crate::ui::theme::Theme;

/// Header strip: mission progress, score and the running combo.
pub struct Hud<'a> {
    pub hud: HudView,
    pub dictionary: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Hud<'a> {
    pub fn new(hud: HudView, dictionary: &'a str, theme: &'a Theme) -> Self {
        Self {
            hud,
            dictionary,
            theme,
        }
    }
}

impl Widget for Hud<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let bar = Style::default().bg(colors.header_bg());

        let mut spans = vec![
            Span::styled(
                " wordfall ",
                bar.fg(colors.header_fg()).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {} ", self.dictionary), bar.fg(colors.slot_empty())),
            Span::styled(
                format!("| MISSION {} ", self.hud.progress_label()),
                bar.fg(colors.header_fg()),
            ),
            Span::styled(
                format!("| {} XP ", self.hud.score),
                bar.fg(colors.accent()).add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(combo) = self.hud.combo_label() {
            spans.push(Span::styled(
                format!("| {combo} "),
                bar.fg(colors.reward()).add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans))
            .style(bar)
            .render(area, buf);
    }
}
