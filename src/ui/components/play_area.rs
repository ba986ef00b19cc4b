use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::game::GameSession;
use crate::session::state::{GameMode, GameStyle, TransitionKind};
use crate::ui::theme::Theme;

pub struct PlayArea<'a> {
    pub session: &'a GameSession,
    pub theme: &'a Theme,
}

impl PlayArea<'_> {
    fn prompt_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let session = self.session;
        let state = session.state();

        // During the reveal lock, show the verdict instead of the prompt.
        if let Some(transition) = state.transition {
            if let TransitionKind::Reveal { correct, .. } = transition.kind {
                return if correct {
                    vec![
                        Line::from(""),
                        Line::from(Span::styled(
                            "\u{2713} Correct!",
                            Style::default()
                                .fg(colors.success())
                                .add_modifier(Modifier::BOLD),
                        )),
                    ]
                } else {
                    let expected = state
                        .misses
                        .last()
                        .map(|miss| miss.expected.clone())
                        .unwrap_or_default();
                    vec![
                        Line::from(""),
                        Line::from(Span::styled(
                            "\u{2717} Wrong",
                            Style::default()
                                .fg(colors.error())
                                .add_modifier(Modifier::BOLD),
                        )),
                        Line::from(Span::styled(
                            format!("The word was: {expected}"),
                            Style::default().fg(colors.fg()),
                        )),
                    ]
                };
            }
        }

        let Some(word) = state.current_word() else {
            return vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No words available for this selection.",
                    Style::default().fg(colors.warning()),
                )),
            ];
        };

        match session.settings().mode {
            GameMode::Echo => {
                let mut lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "\u{1f50a}  Listen and type the word",
                        Style::default().fg(colors.accent()),
                    )),
                ];
                if let Some(secs) = session.answer_remaining() {
                    lines.push(Line::from(Span::styled(
                        format!("{secs:.1}s"),
                        Style::default()
                            .fg(if secs <= 2.0 {
                                colors.error()
                            } else {
                                colors.warning()
                            })
                            .add_modifier(Modifier::BOLD),
                    )));
                } else if state.awaiting_speech {
                    lines.push(Line::from(Span::styled(
                        "Get ready...",
                        Style::default().fg(colors.muted()),
                    )));
                }
                lines.push(Line::from(Span::styled(
                    if state.replay_used {
                        "replayed (no time bonus)"
                    } else {
                        "ctrl+l replay"
                    },
                    Style::default().fg(colors.muted()),
                )));
                lines
            }
            GameMode::Typing => {
                vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        word.word.clone(),
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        word.meaning.clone(),
                        Style::default().fg(colors.muted()),
                    )),
                ]
            }
            GameMode::Memory => {
                if state.word_visible {
                    vec![
                        Line::from(""),
                        Line::from(Span::styled(
                            word.word.clone(),
                            Style::default()
                                .fg(colors.accent())
                                .add_modifier(Modifier::BOLD),
                        )),
                        Line::from(Span::styled(
                            "Memorize...",
                            Style::default().fg(colors.warning()),
                        )),
                    ]
                } else {
                    let mut lines = vec![
                        Line::from(""),
                        Line::from(Span::styled(
                            "Now type!",
                            Style::default().fg(colors.accent()),
                        )),
                    ];
                    if let Some(secs) = session.answer_remaining() {
                        lines.push(Line::from(Span::styled(
                            format!("{secs:.1}s"),
                            Style::default().fg(colors.warning()),
                        )));
                    }
                    lines
                }
            }
            GameMode::MeaningMatch => {
                let mut lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        word.meaning.clone(),
                        Style::default().fg(colors.accent()),
                    )),
                    Line::from(Span::styled(
                        "Type the word this means",
                        Style::default().fg(colors.muted()),
                    )),
                ];
                if let Some(secs) = session.answer_remaining() {
                    lines.push(Line::from(Span::styled(
                        format!("{secs:.1}s"),
                        Style::default().fg(colors.warning()),
                    )));
                }
                lines
            }
        }
    }
}

impl Widget for &PlayArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let state = self.session.state();
        let settings = self.session.settings();

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(3)])
            .split(inner);

        Paragraph::new(self.prompt_lines())
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        // Input line with a block cursor.
        let input_locked = state.is_transitioning()
            || (settings.mode == GameMode::Memory && state.word_visible);
        let input_style = if input_locked {
            Style::default().fg(colors.muted())
        } else {
            Style::default().fg(colors.fg())
        };
        let mut spans = vec![
            Span::styled("  > ", Style::default().fg(colors.accent())),
            Span::styled(state.input.clone(), input_style),
        ];
        if !input_locked {
            spans.push(Span::styled(
                "\u{2588}",
                Style::default().fg(colors.accent_dim()),
            ));
        }

        // Score-breakdown toast for the last correct challenge answer.
        let mut lines = vec![Line::from(spans)];
        if settings.style == GameStyle::Challenge {
            if let Some(breakdown) = &state.last_breakdown {
                let detail = if settings.mode == GameMode::Typing {
                    format!(
                        "  +{}  ({} x{:.2} combo)",
                        breakdown.final_score, breakdown.base, breakdown.combo_multiplier
                    )
                } else {
                    format!(
                        "  +{}  ({} + {} time) x{:.2} + {} streak",
                        breakdown.final_score,
                        breakdown.base,
                        breakdown.time_bonus,
                        breakdown.difficulty_multiplier,
                        breakdown.streak_bonus
                    )
                };
                lines.push(Line::from(Span::styled(
                    detail,
                    Style::default().fg(colors.success()),
                )));
            }
        }
        Paragraph::new(lines).render(layout[1], buf);
    }
}
