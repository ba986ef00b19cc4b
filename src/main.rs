mod app;
mod audio;
mod config;
mod engine;
mod event;
mod session;
mod store;
mod ui;
mod words;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use session::state::{GameMode, GameStatus, GameStyle};
use ui::components::countdown::CountdownOverlay;
use ui::components::energy_bar::EnergyBar;
use ui::components::hud::Hud;
use ui::components::play_area::PlayArea;
use ui::components::summary_screen::SummaryScreen;
use ui::layout::AppLayout;
use words::DifficultyId;

/// Timer callbacks can arrive late after a suspend; clamp one step so the
/// session does not fast-forward through reveal windows.
const MAX_FRAME_SECS: f64 = 0.5;

#[derive(Parser)]
#[command(
    name = "wordrush",
    version,
    about = "Terminal vocabulary trainer with adaptive difficulty"
)]
struct Cli {
    #[arg(short, long, help = "Game mode (echo, typing, memory, meaning-match)")]
    mode: Option<String>,

    #[arg(short, long, help = "Game style (practice, challenge)")]
    style: Option<String>,

    #[arg(short, long, help = "Word pool (a1..c2, endless, dda)")]
    difficulty: Option<String>,

    #[arg(long, help = "Typing countdown in seconds (0 = unlimited)")]
    duration: Option<u32>,

    #[arg(short, long, help = "Player name attached to score records")]
    player: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app = App::new();

    if let Some(player) = cli.player {
        app.config.player_name = Some(player);
        app.config.validate();
    }
    if let Some(theme_name) = cli.theme {
        if let Some(theme) = ui::theme::Theme::load(&theme_name) {
            let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));
            app.theme = theme;
            app.menu.theme = theme;
        }
    }
    if let Some(mode) = cli.mode.as_deref().and_then(GameMode::parse) {
        app.menu.select_mode(mode);
    }
    if let Some(style) = cli.style.as_deref().and_then(GameStyle::parse) {
        app.menu.select_style(style);
    }
    if let Some(difficulty) = cli.difficulty.as_deref().and_then(DifficultyId::parse) {
        app.menu.select_difficulty(difficulty);
    }
    if let Some(duration) = cli.duration {
        let duration = if duration == 0 {
            None
        } else {
            Some(f64::from(duration.min(600)))
        };
        app.menu.select_duration(duration);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    let mut last_frame = Instant::now();
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;

        // Game time advances on every loop pass, input or tick, so timers
        // keep moving under sustained typing.
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f64().min(MAX_FRAME_SECS);
        last_frame = now;
        app.advance(dt);

        match event {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => {}
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Game => handle_game_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev_row(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next_row(),
        KeyCode::Left | KeyCode::Char('h') => app.menu.cycle(false),
        KeyCode::Right | KeyCode::Char('l') => app.menu.cycle(true),
        KeyCode::Enter => app.start_session(),
        _ => {}
    }
}

fn handle_game_key(app: &mut App, key: KeyEvent) {
    let Some(session) = &app.session else {
        app.screen = AppScreen::Menu;
        return;
    };
    let game_over = session.state().status == GameStatus::GameOver;

    if game_over {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => app.restart_session(),
            KeyCode::Esc => app.back_to_menu(),
            _ => {}
        }
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('r') => app.restart_session(),
            KeyCode::Char('l') => {
                if let Some(session) = &mut app.session {
                    session.replay_word();
                }
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.back_to_menu(),
        code => {
            if let Some(session) = &mut app.session {
                match code {
                    KeyCode::Enter => session.submit(),
                    KeyCode::Backspace => session.backspace(),
                    KeyCode::Char(ch) => session.push_char(ch),
                    _ => {}
                }
            }
        }
    }
}

fn render(frame: &mut Frame, app: &App) {
    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Game => render_game(frame, app),
    }
}

fn render_menu(frame: &mut Frame, app: &App) {
    frame.render_widget(&app.menu, frame.area());

    if let Some(status) = &app.status_line {
        let area = frame.area();
        if area.height > 1 {
            let line = ratatui::layout::Rect::new(area.x, area.bottom() - 1, area.width, 1);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!(" {status}"),
                    Style::default().fg(app.theme.colors.warning()),
                ))),
                line,
            );
        }
    }
}

fn render_game(frame: &mut Frame, app: &App) {
    let Some(session) = &app.session else {
        return;
    };
    let theme = app.theme;
    let layout = AppLayout::new(frame.area());

    frame.render_widget(
        &Hud {
            session,
            personal_best: app.personal_best.as_ref(),
            theme,
        },
        layout.header,
    );

    let settings = session.settings();
    let nitro = settings.mode == GameMode::Typing && settings.style == GameStyle::Challenge;
    if nitro {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(4)])
            .split(layout.main);
        frame.render_widget(&PlayArea { session, theme }, parts[0]);
        frame.render_widget(&EnergyBar { session, theme }, parts[1]);
    } else {
        frame.render_widget(&PlayArea { session, theme }, layout.main);
    }

    let mut hints = String::from(" enter submit   esc menu   ctrl+r restart");
    if settings.mode == GameMode::Echo {
        hints.push_str("   ctrl+l replay");
    }
    let footer_text = match (&app.status_line, session.supply_warnings().last()) {
        (Some(status), _) => format!(" {status}"),
        (None, Some(warning)) => format!(" {warning}"),
        (None, None) => hints,
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            footer_text,
            Style::default().fg(theme.colors.muted()),
        ))),
        layout.footer,
    );

    match session.state().status {
        GameStatus::Countdown => {
            frame.render_widget(
                &CountdownOverlay {
                    secs_left: session.state().countdown_left,
                    theme,
                },
                frame.area(),
            );
        }
        GameStatus::GameOver => {
            if let Some(summary) = &app.last_summary {
                frame.render_widget(
                    &SummaryScreen {
                        summary,
                        misses: &session.state().misses,
                        personal_best: app.personal_best.as_ref(),
                        new_high_score: app.new_high_score,
                        theme,
                    },
                    frame.area(),
                );
            }
        }
        GameStatus::Playing => {}
    }
}
