use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use wordfall::app::{App, AppScreen};
use wordfall::config::Config;
use wordfall::event::{AppEvent, EventHandler};
use wordfall::logging;
use wordfall::session::round::RoundPhase;
use wordfall::source::dictionary::{self, Library};
use wordfall::ui;
use wordfall::ui::components::hud::Hud;
use wordfall::ui::components::keyboard::Keyboard;
use wordfall::ui::components::progress_bar::ProgressBar;
use wordfall::ui::components::summary::Summary;
use wordfall::ui::components::word_board::WordBoard;
use wordfall::ui::layout::SessionLayout;

#[derive(Parser)]
#[command(name = "wordfall", version, about = "Terminal vocabulary drill: fill in the missing letters")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Only play words from this dictionary id")]
    dictionary: Option<u64>,

    #[arg(long, help = "Game server base URL (plays offline when omitted)")]
    server: Option<String>,

    #[arg(long, help = "User id sent to the game server")]
    user: Option<u64>,

    #[arg(long, help = "Game server login name (password comes from the config)")]
    username: Option<String>,

    #[arg(short, long, help = "Number of words per offline session")]
    size: Option<usize>,

    #[arg(long, help = "Do not speak words aloud")]
    no_speech: bool,

    #[arg(long, help = "Print the available dictionaries and exit")]
    list_dictionaries: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_dictionaries {
        let library = Library::load_with_user_dir(dictionary::user_dictionary_dir().as_deref());
        for dictionary in library.dictionaries() {
            let status = if dictionary.is_active { "" } else { " (inactive)" };
            println!(
                "{:>4}  {} - {} words{status}",
                dictionary.id,
                dictionary.name,
                dictionary.words.len()
            );
        }
        return Ok(());
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        eprintln!("warning: ignoring unreadable config: {err:#}");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if cli.dictionary.is_some() {
        config.dictionary_id = cli.dictionary;
    }
    if cli.server.is_some() {
        config.server_url = cli.server;
    }
    if cli.user.is_some() {
        config.user_id = cli.user;
    }
    if cli.username.is_some() {
        config.username = cli.username;
    }
    if let Some(size) = cli.size {
        config.session_size = size;
    }
    if cli.no_speech {
        config.speech_enabled = false;
    }
    config.normalize();

    if let Err(err) = logging::init(&config.log_level) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let mut app = App::new(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(50));

    let result = run_app(&mut terminal, &mut app, &events);

    app.leave_session();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "exiting on error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        let completed = terminal.draw(|frame| render(frame, app))?;
        app.viewport = completed.area;

        let event = events.next()?;
        // Mouse motion and key repeat can starve Tick, so timers advance every pass.
        app.tick();
        match event {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
            AppEvent::Tick | AppEvent::Resize => {}
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
        AppScreen::Session => handle_session_key(app, key),
        AppScreen::Summary => handle_summary_key(app, key),
        AppScreen::Notice => app.dismiss_notice(),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.start_session(),
        KeyCode::Char('d') => app.cycle_dictionary(),
        KeyCode::Up | KeyCode::Char('k') => app.menu_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu_next(),
        KeyCode::Enter => app.activate_menu(),
        _ => {}
    }
}

fn handle_session_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.leave_session(),
        KeyCode::Enter if app.retry_visible() => app.retry(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('r') => app.start_session(),
        KeyCode::Char('q') | KeyCode::Esc => app.leave_session(),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        app.click_at(mouse.column, mouse.row, Instant::now());
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Session => render_session(frame, app),
        AppScreen::Summary => render_summary(frame, app),
        AppScreen::Notice => render_notice(frame, app),
    }
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " wordfall ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", app.source_description()),
            Style::default().fg(colors.slot_empty()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let menu_area = ui::layout::centered_rect(50, 70, layout[1]);
    frame.render_widget(&app.menu(), menu_area);

    let footer = Paragraph::new(Line::from(Span::styled(
        " [1/Enter] Start  [d] Dictionary  [q] Quit ",
        Style::default().fg(colors.slot_empty()),
    )));
    frame.render_widget(footer, layout[2]);
}

fn render_session(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let Some(view) = app.session.as_ref().and_then(|s| s.view(Instant::now())) else {
        return;
    };
    let layout = SessionLayout::new(area);
    let dictionary = app.dictionary_label();

    frame.render_widget(Hud::new(view.hud, &dictionary, &app.theme), layout.header);
    frame.render_widget(WordBoard::new(&view, &app.theme), layout.board);

    match view.hazard_progress {
        Some(progress) => frame.render_widget(ProgressBar::hazard(progress, &app.theme), layout.hazard),
        None => {
            let caption = match view.phase {
                RoundPhase::Success => "CLEAR",
                _ => "STANDBY",
            };
            let bar = ProgressBar::new("Mission", view.hud.ratio(), &app.theme)
                .caption(format!("{caption} {}", view.hud.progress_label()));
            frame.render_widget(bar, layout.hazard);
        }
    }

    if view.retry_visible {
        let button = Paragraph::new(Span::styled(
            "RETRY [Enter]",
            Style::default()
                .fg(colors.warning())
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(Style::default().fg(colors.warning())));
        frame.render_widget(button, layout.retry);
    }

    if let Some(keyboard_area) = layout.keyboard {
        let enabled = matches!(view.phase, RoundPhase::Collecting);
        frame.render_widget(
            Keyboard::new(enabled, app.pressed_key(), &app.theme),
            keyboard_area,
        );
    }

    let hints = ui::layout::pack_hint_lines(
        &["[a-z] Fill", "[Backspace] Erase", "[Enter] Retry", "[Esc] Abort"],
        layout.footer.width as usize,
    );
    let footer = Paragraph::new(Line::from(Span::styled(
        hints.first().cloned().unwrap_or_default(),
        Style::default().fg(colors.slot_empty()),
    )));
    frame.render_widget(footer, layout.footer);
}

fn render_summary(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    if let Some(ref summary) = app.last_summary {
        let centered = ui::layout::centered_rect(60, 60, area);
        frame.render_widget(Summary::new(summary, &app.theme), centered);
    }
}

fn render_notice(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let centered = ui::layout::centered_rect(50, 30, area);

    let message = app.notice.as_deref().unwrap_or_default();
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(colors.fg()))),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to return to the menu",
            Style::default().fg(colors.slot_empty()),
        )),
    ];
    let notice = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::bordered()
                .title(" Notice ")
                .border_style(Style::default().fg(colors.error()))
                .style(Style::default().bg(colors.bg())),
        );
    frame.render_widget(notice, centered);
}
