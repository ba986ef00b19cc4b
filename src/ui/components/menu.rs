use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::dda::CefrLevel;
use crate::session::game::GameSettings;
use crate::session::state::{GameMode, GameStyle};
use crate::ui::theme::Theme;
use crate::words::DifficultyId;

const STYLES: [GameStyle; 2] = [GameStyle::Practice, GameStyle::Challenge];
const DURATIONS: [Option<f64>; 5] = [Some(30.0), Some(60.0), Some(90.0), Some(120.0), None];

const DIFFICULTIES: [DifficultyId; 8] = [
    DifficultyId::Dda,
    DifficultyId::Cefr(CefrLevel::A1),
    DifficultyId::Cefr(CefrLevel::A2),
    DifficultyId::Cefr(CefrLevel::B1),
    DifficultyId::Cefr(CefrLevel::B2),
    DifficultyId::Cefr(CefrLevel::C1),
    DifficultyId::Cefr(CefrLevel::C2),
    DifficultyId::Endless,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuRow {
    Mode,
    Style,
    Difficulty,
    Duration,
}

const ROWS: [MenuRow; 4] = [
    MenuRow::Mode,
    MenuRow::Style,
    MenuRow::Difficulty,
    MenuRow::Duration,
];

pub struct SetupMenu<'a> {
    pub row: usize,
    pub mode_idx: usize,
    pub style_idx: usize,
    pub difficulty_idx: usize,
    pub duration_idx: usize,
    pub theme: &'a Theme,
}

impl<'a> SetupMenu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            row: 0,
            mode_idx: 0,
            style_idx: 1,
            difficulty_idx: 0,
            duration_idx: 1,
            theme,
        }
    }

    pub fn next_row(&mut self) {
        self.row = (self.row + 1) % ROWS.len();
    }

    pub fn prev_row(&mut self) {
        self.row = if self.row == 0 {
            ROWS.len() - 1
        } else {
            self.row - 1
        };
    }

    pub fn cycle(&mut self, forward: bool) {
        fn step(idx: usize, len: usize, forward: bool) -> usize {
            if forward {
                (idx + 1) % len
            } else if idx == 0 {
                len - 1
            } else {
                idx - 1
            }
        }
        match ROWS[self.row] {
            MenuRow::Mode => self.mode_idx = step(self.mode_idx, GameMode::ALL.len(), forward),
            MenuRow::Style => self.style_idx = step(self.style_idx, STYLES.len(), forward),
            MenuRow::Difficulty => {
                self.difficulty_idx = step(self.difficulty_idx, DIFFICULTIES.len(), forward)
            }
            MenuRow::Duration => {
                self.duration_idx = step(self.duration_idx, DURATIONS.len(), forward)
            }
        }
    }

    pub fn select_mode(&mut self, mode: GameMode) {
        if let Some(idx) = GameMode::ALL.iter().position(|m| *m == mode) {
            self.mode_idx = idx;
        }
    }

    pub fn select_style(&mut self, style: GameStyle) {
        if let Some(idx) = STYLES.iter().position(|s| *s == style) {
            self.style_idx = idx;
        }
    }

    pub fn select_difficulty(&mut self, difficulty: DifficultyId) {
        if let Some(idx) = DIFFICULTIES.iter().position(|d| *d == difficulty) {
            self.difficulty_idx = idx;
        }
    }

    pub fn select_duration(&mut self, duration: Option<f64>) {
        if let Some(idx) = DURATIONS.iter().position(|d| *d == duration) {
            self.duration_idx = idx;
        }
    }

    pub fn mode(&self) -> GameMode {
        GameMode::ALL[self.mode_idx]
    }

    pub fn style(&self) -> GameStyle {
        STYLES[self.style_idx]
    }

    pub fn difficulty(&self) -> DifficultyId {
        DIFFICULTIES[self.difficulty_idx]
    }

    pub fn settings(&self) -> GameSettings {
        let mut settings = GameSettings::new(self.mode(), self.style(), self.difficulty());
        settings.typing_duration_secs = DURATIONS[self.duration_idx];
        settings
    }

    fn mode_description(&self) -> &'static str {
        match self.mode() {
            GameMode::Echo => "Listen to the word, then type it",
            GameMode::Typing => "Type words against the clock",
            GameMode::Memory => "Memorize the word before it hides",
            GameMode::MeaningMatch => "Type the word for a given meaning",
        }
    }

    fn row_value(&self, row: MenuRow) -> String {
        match row {
            MenuRow::Mode => self.mode().label().to_string(),
            MenuRow::Style => self.style().label().to_string(),
            MenuRow::Difficulty => self.difficulty().label().to_string(),
            MenuRow::Duration => match DURATIONS[self.duration_idx] {
                Some(secs) => format!("{}s", secs as u32),
                None => "Unlimited".to_string(),
            },
        }
    }

    fn row_label(row: MenuRow) -> &'static str {
        match row {
            MenuRow::Mode => "Mode",
            MenuRow::Style => "Style",
            MenuRow::Difficulty => "Words",
            MenuRow::Duration => "Typing timer",
        }
    }
}

impl Widget for &SetupMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(ROWS.len() as u16 * 2),
                Constraint::Length(2),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "wordrush",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Terminal Vocabulary Trainer",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let mut lines: Vec<Line> = Vec::new();
        for (i, row) in ROWS.iter().enumerate() {
            let is_selected = i == self.row;
            let indicator = if is_selected { ">" } else { " " };
            let style = Style::default()
                .fg(if is_selected {
                    colors.accent()
                } else {
                    colors.fg()
                })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });
            lines.push(Line::from(Span::styled(
                format!(
                    " {indicator} {:<14} < {} >",
                    SetupMenu::row_label(*row),
                    self.row_value(*row)
                ),
                style,
            )));
            lines.push(Line::from(""));
        }
        Paragraph::new(lines).render(layout[1], buf);

        let hint = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("  {}", self.mode_description()),
                Style::default().fg(colors.muted()),
            )),
            Line::from(Span::styled(
                "  enter start   arrows change   q quit",
                Style::default().fg(colors.muted()),
            )),
        ]);
        hint.render(layout[2], buf);
    }
}
