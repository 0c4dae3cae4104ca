mod app;
mod input;
mod ui;

use app::App;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use harmony::build_info;
use harmony::config::Settings;
use harmony::core::{INPUT_POLL_MS, MAX_SNAKE_DT_MS};
use harmony::games::GameKind;
use harmony::utils::{logging, JsonStore};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Screen to open first, from the command line.
enum Start {
    Menu,
    Game(GameKind),
    Tournament,
    Leaderboard,
}

fn parse_args() -> Start {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        return Start::Menu;
    }
    match args[1].as_str() {
        "runner" => Start::Game(GameKind::Runner),
        "snake" => Start::Game(GameKind::SnakeBattle),
        "boxing" => Start::Game(GameKind::Boxing),
        "tournament" => Start::Tournament,
        "leaderboard" => Start::Leaderboard,
        "--version" | "-v" => {
            println!("{}", build_info::version_line());
            std::process::exit(0);
        }
        "--help" | "-h" => {
            println!("Harmony - two-player terminal minigames\n");
            println!("Usage: harmony [command]\n");
            println!("Commands:");
            println!("  runner       Play Harmonic Flight");
            println!("  snake        Play Snake Battle");
            println!("  boxing       Play Just Fight");
            println!("  tournament   Start a tournament");
            println!("  leaderboard  Show the tournament leaderboard");
            println!("  --version    Show version information");
            println!("  --help       Show this help message");
            println!("\nPlayer 1: W/A/S/D   Player 2: arrow keys");
            std::process::exit(0);
        }
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Run 'harmony --help' for usage.");
            std::process::exit(1);
        }
    }
}

fn main() -> io::Result<()> {
    let start = parse_args();

    let store = JsonStore::open_default().map_err(io::Error::other)?;
    let settings = Settings::load(&store);
    match logging::init(store.root(), &settings.log_filter) {
        Ok(path) => info!(
            log = %path.display(),
            version = %build_info::version_line(),
            "harmony starting"
        ),
        Err(e) => eprintln!("Logging disabled: {}", e),
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let key_release_supported = matches!(supports_keyboard_enhancement(), Ok(true));
    if key_release_supported {
        stdout.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, settings, key_release_supported);
    match start {
        Start::Menu => {}
        Start::Game(kind) => app.play(kind),
        Start::Tournament => app.resume_tournament(),
        Start::Leaderboard => app.open_leaderboard(),
    }

    let result = run(&mut terminal, &mut app);

    // Restore terminal even if the loop failed
    if key_release_supported {
        let _ = terminal.backend_mut().execute(PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        warn!(error = %e, "terminal loop failed");
    }
    info!("harmony exiting");
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(Duration::from_millis(INPUT_POLL_MS))? {
            // Drain everything queued so held keys don't lag behind.
            loop {
                if let Event::Key(key) = event::read()? {
                    let ctrl_c = key.kind == KeyEventKind::Press
                        && key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL);
                    if ctrl_c {
                        app.should_quit = true;
                        break;
                    }
                    app.handle_key(key);
                }
                if !event::poll(Duration::from_millis(0))? {
                    break;
                }
            }
        }

        // Games clamp the step themselves; this bounds catch-up after a stall.
        let elapsed = last_tick.elapsed();
        last_tick = Instant::now();
        app.tick((elapsed.as_millis() as u64).min(MAX_SNAKE_DT_MS));
    }

    Ok(())
}
