use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::session::game::GameSession;
use crate::session::state::{GameMode, GameStyle};
use crate::store::schema::PersonalBest;
use crate::ui::theme::Theme;

pub struct Hud<'a> {
    pub session: &'a GameSession,
    pub personal_best: Option<&'a PersonalBest>,
    pub theme: &'a Theme,
}

impl Widget for &Hud<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let session = self.session;
        let state = session.state();
        let settings = session.settings();

        let mut spans: Vec<Span> = vec![
            Span::styled(
                format!(
                    " {} {} ",
                    settings.mode.label(),
                    settings.style.label()
                ),
                Style::default()
                    .fg(colors.header_fg())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("| {} ", settings.difficulty.label()),
                Style::default().fg(colors.header_fg()),
            ),
        ];

        if settings.style == GameStyle::Challenge && settings.mode.updates_dda() {
            spans.push(Span::styled(
                format!("| Level {} ", session.dda_level().label()),
                Style::default().fg(colors.accent()),
            ));
        }

        if settings.mode.uses_lives() {
            let lives = "\u{2665} ".repeat(state.lives as usize);
            spans.push(Span::styled(
                format!("| {} ", if lives.is_empty() { "-- ".into() } else { lives }),
                Style::default().fg(colors.error()),
            ));
        }

        spans.push(Span::styled(
            format!("| Words {} ", state.score),
            Style::default().fg(colors.header_fg()),
        ));
        spans.push(Span::styled(
            format!("| Streak {} (best {}) ", state.streak, state.best_streak),
            Style::default().fg(colors.success()),
        ));

        if settings.style == GameStyle::Challenge {
            spans.push(Span::styled(
                format!("| Score {} ", state.total_challenge_score),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ));
        }

        match settings.mode {
            GameMode::Typing => {
                let clock = match session.clock_remaining() {
                    Some(secs) => format!("| {:.0}s left ", secs.ceil()),
                    None => String::from("| \u{221e} "),
                };
                spans.push(Span::styled(clock, Style::default().fg(colors.warning())));
            }
            _ => {
                let elapsed = session.elapsed_secs() as u64;
                spans.push(Span::styled(
                    format!("| {}:{:02} ", elapsed / 60, elapsed % 60),
                    Style::default().fg(colors.header_fg()),
                ));
            }
        }

        if let Some(best) = self.personal_best {
            spans.push(Span::styled(
                format!("| Best {} ", best.primary_metric()),
                Style::default().fg(colors.muted()),
            ));
        }

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(colors.header_bg()))
            .render(area, buf);
    }
}
