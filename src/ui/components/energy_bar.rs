use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::game::GameSession;
use crate::ui::theme::Theme;

/// Nitro gauge + heat banner for Typing Challenge.
pub struct EnergyBar<'a> {
    pub session: &'a GameSession,
    pub theme: &'a Theme,
}

impl Widget for &EnergyBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let energy = self.session.energy();
        let heat = self.session.heat();

        let title = if self.session.heat_transitioning() {
            format!(" {} ... ", heat.name)
        } else {
            format!(" {} ", heat.name)
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(if energy.is_low() {
                colors.error()
            } else {
                colors.border()
            }));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (energy.ratio() * f64::from(inner.width)) as u16;
        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().bg(if energy.is_low() {
                    colors.error()
                } else {
                    colors.bar_filled()
                })
            } else {
                Style::default().bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label = format!("{:.1}/{:.0}", energy.energy(), energy.max());
        let label_x = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(
            label_x,
            inner.y,
            &label,
            Style::default()
                .fg(colors.fg())
                .add_modifier(Modifier::BOLD),
        );

        if inner.height > 1 {
            Paragraph::new(Line::from(Span::styled(
                format!(" drains every {:.2}s", heat.decay_interval),
                Style::default().fg(colors.muted()),
            )))
            .render(Rect::new(inner.x, inner.y + 1, inner.width, 1), buf);
        }
    }
}
