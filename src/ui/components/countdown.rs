use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

/// The 3-2-1 overlay shown before play begins.
pub struct CountdownOverlay<'a> {
    pub secs_left: f64,
    pub theme: &'a Theme,
}

impl Widget for &CountdownOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let popup = centered_rect(30, 30, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let digit = self.secs_left.ceil().max(1.0) as u32;
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                digit.to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Get ready...",
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
