use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::session::state::Miss;
use crate::session::summary::SessionSummary;
use crate::store::schema::PersonalBest;
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

const MAX_MISSES_SHOWN: usize = 6;

pub struct SummaryScreen<'a> {
    pub summary: &'a SessionSummary,
    pub misses: &'a [Miss],
    pub personal_best: Option<&'a PersonalBest>,
    pub new_high_score: bool,
    pub theme: &'a Theme,
}

impl Widget for &SummaryScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let popup = centered_rect(60, 70, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" Game Over ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let summary = self.summary;
        let (minutes, seconds) = summary.time_spent();

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{} {}", summary.mode.label(), summary.style.label()),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "Words: {} correct / {} missed",
                    summary.words_correct, summary.words_incorrect
                ),
                Style::default().fg(colors.fg()),
            )),
            Line::from(Span::styled(
                format!("Best streak: {}", summary.highest_streak),
                Style::default().fg(colors.success()),
            )),
            Line::from(Span::styled(
                format!("Time: {minutes}:{seconds:02}"),
                Style::default().fg(colors.fg()),
            )),
        ];

        if let Some(wpm) = summary.wpm {
            lines.push(Line::from(Span::styled(
                format!("WPM: {wpm:.0}"),
                Style::default().fg(colors.fg()),
            )));
        }
        if let Some(total) = summary.challenge_total_score {
            lines.push(Line::from(Span::styled(
                format!("Challenge score: {total}"),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )));
        }

        if self.new_high_score {
            lines.push(Line::from(Span::styled(
                "\u{2605} New personal best!",
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            )));
        } else if let Some(best) = self.personal_best {
            lines.push(Line::from(Span::styled(
                format!("Personal best: {}", best.primary_metric()),
                Style::default().fg(colors.muted()),
            )));
        }

        if !self.misses.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Missed words:",
                Style::default().fg(colors.error()),
            )));
            for miss in self.misses.iter().rev().take(MAX_MISSES_SHOWN) {
                lines.push(Line::from(Span::styled(
                    format!("  {}  (you typed: {})", miss.expected, miss.answered),
                    Style::default().fg(colors.muted()),
                )));
            }
            if self.misses.len() > MAX_MISSES_SHOWN {
                lines.push(Line::from(Span::styled(
                    format!("  ... and {} more", self.misses.len() - MAX_MISSES_SHOWN),
                    Style::default().fg(colors.muted()),
                )));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "r restart   esc menu",
            Style::default().fg(colors.muted()),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
