//! Workout tracker TUI.

mod api;
mod auth;
mod config;
mod http;
mod io;
mod notify;
mod state;
mod storage;
mod ui;

#[cfg(test)]
mod test_support;

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use color_eyre::eyre::WrapErr;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use gymtrack_core::Phase;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use auth::Route;
use config::AppConfig;
use http::ApiClient;
use notify::Notifier;
use state::{App, TrackerScreen};
use storage::{LocalStorage, RestTimerStorage, TokenStorage};

const TICK_RATE: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = AppConfig::load().wrap_err("loading configuration")?;
    init_tracing(&config.log.path)?;
    info!(base_url = %config.api.base_url, "starting");

    if let Some(dir) = config.storage.path.parent() {
        fs::create_dir_all(dir).wrap_err("creating storage directory")?;
    }
    let store = LocalStorage::open(&config.storage.path);
    let tokens = TokenStorage::new(store.clone());
    let timers = RestTimerStorage::new(store);

    let client = ApiClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
        tokens.clone(),
    )
    .wrap_err("building API client")?;

    let io = io::spawn(client);
    let (notifier, alerts) = Notifier::spawn(config.notifications.enabled);
    let mut app = App::new(io, notifier, alerts, &tokens, timers);

    let mut terminal = ratatui::init();
    let result = run(&mut app, &mut terminal);
    ratatui::restore();

    result
}

/// Logs go to a file; stdout belongs to the terminal UI.
fn init_tracing(path: &Path) -> color_eyre::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).wrap_err("creating log directory")?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("opening log file {}", path.display()))?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn,gymtrack=info,gymtrack_core=info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(env_filter)
        .try_init()
        .wrap_err("installing tracing subscriber")?;

    Ok(())
}

fn run(app: &mut App, terminal: &mut ratatui::DefaultTerminal) -> color_eyre::Result<()> {
    let mut last_tick = Instant::now();

    while app.running {
        app.poll_io();
        if last_tick.elapsed() >= TICK_RATE {
            app.tick();
            last_tick = Instant::now();
        }

        terminal.draw(|f| ui::render(app, f))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                app.running = false;
                continue;
            }

            if app.notice.is_some() {
                app.dismiss_notice();
                continue;
            }

            if app.auth.is_loading() {
                if key.code == KeyCode::Esc {
                    app.running = false;
                }
                continue;
            }

            match app.route {
                Route::Login | Route::Register => handle_auth_key(app, key.code, key.modifiers),
                Route::Plans => handle_plans_key(app, key.code, key.modifiers),
                Route::History => handle_history_key(app, key.code),
                Route::Exercises => handle_exercises_key(app, key.code),
                Route::Profiles => handle_profiles_key(app, key.code),
                Route::Tracker => handle_tracker_key(app, key.code),
            }
        }
    }

    Ok(())
}

fn handle_auth_key(app: &mut App, code: KeyCode, mods: KeyModifiers) {
    use KeyCode::*;

    let register = app.is_register();
    match code {
        Esc => app.running = false,
        Tab => app.auth_form.next_field(register),
        BackTab => app.auth_form.prev_field(register),
        Enter => app.submit_auth(),
        Backspace => app.auth_form.backspace(register),
        Char('l') if mods.contains(KeyModifiers::CONTROL) => app.navigate(Route::Login),
        Char('r') if mods.contains(KeyModifiers::CONTROL) => app.navigate(Route::Register),
        Char(ch) => app.auth_form.push_char(register, ch),
        _ => {}
    }
}

fn handle_plans_key(app: &mut App, code: KeyCode, mods: KeyModifiers) {
    use KeyCode::*;

    if code == Char('d') {
        app.delete_plan();
        return;
    }
    app.disarm_delete();

    match code {
        Esc | Char('q') => app.running = false,
        Down | Char('j') => app.select_plan(1),
        Up | Char('k') => app.select_plan(-1),
        Enter => app.open_tracker(true),
        Char('r') => app.open_tracker(false),
        Char('y') => app.duplicate_plan(),
        F(2) => app.navigate(Route::History),
        F(3) => app.navigate(Route::Exercises),
        F(4) => app.navigate(Route::Profiles),
        F(5) => app.reload(),
        Char('o') if mods.contains(KeyModifiers::CONTROL) => app.logout(),
        _ => {}
    }
}

fn handle_history_key(app: &mut App, code: KeyCode) {
    use KeyCode::*;

    if app.session_view.is_some() {
        if matches!(code, Esc | Enter | Char('q')) {
            app.close_session();
        }
        return;
    }

    match code {
        Char('q') => app.running = false,
        Esc | F(1) => app.navigate(Route::Plans),
        Down | Char('j') => app.select_history(1),
        Up | Char('k') => app.select_history(-1),
        Enter => app.open_session(),
        F(5) => app.reload(),
        _ => {}
    }
}

fn handle_exercises_key(app: &mut App, code: KeyCode) {
    use KeyCode::*;

    if app.exercises.detail.is_some() {
        if matches!(code, Esc | Enter | Char('q')) {
            app.close_exercise();
        }
        return;
    }

    match code {
        Char('q') => app.running = false,
        Esc | F(1) => app.navigate(Route::Plans),
        Down | Char('j') => app.select_exercise(1),
        Up | Char('k') => app.select_exercise(-1),
        Right | Char('n') => app.exercise_page(1),
        Left | Char('p') => app.exercise_page(-1),
        Char('c') => app.cycle_category(),
        Char('m') => app.cycle_muscle_group(),
        Enter => app.open_exercise(),
        F(5) => app.reload(),
        _ => {}
    }
}

fn handle_profiles_key(app: &mut App, code: KeyCode) {
    use KeyCode::*;

    if app.session_view.is_some() {
        if matches!(code, Esc | Enter | Char('q')) {
            app.close_session();
        }
        return;
    }

    let viewing = app.profiles.viewing.is_some();
    match code {
        Char('q') => app.running = false,
        Esc if viewing => app.close_profile(),
        Esc | F(1) => app.navigate(Route::Plans),
        Down | Char('j') => app.select_profile(1),
        Up | Char('k') => app.select_profile(-1),
        Enter if viewing => app.open_session(),
        Enter => app.open_profile(),
        Char('v') => app.toggle_profile_visibility(),
        F(5) => app.reload(),
        _ => {}
    }
}

fn handle_tracker_key(app: &mut App, code: KeyCode) {
    use KeyCode::*;

    if app.custom_is_open() {
        match code {
            Esc => app.custom_close(),
            Tab => app.custom_next_field(),
            Down => app.custom_move(1),
            Up => app.custom_move(-1),
            Enter => app.custom_submit(),
            Backspace => app.custom_backspace(),
            Char(ch) if !ch.is_control() => app.custom_char(ch),
            _ => {}
        }
        return;
    }

    let phase = match &app.tracker {
        TrackerScreen::Active(page) => page.tracker.phase(),
        _ => {
            if matches!(code, Esc | Enter) {
                app.leave_tracker();
            }
            return;
        }
    };

    match phase {
        Phase::Finished | Phase::Canceled => {
            if matches!(code, Esc | Enter) {
                app.leave_tracker();
            }
        }
        Phase::Resting { .. } => match code {
            Esc => app.leave_tracker(),
            Char(' ') | Char('k') => app.skip_rest(),
            Char('f') => app.finish_workout(),
            Char('x') => app.cancel_workout(),
            _ => {}
        },
        Phase::ActiveSet => match code {
            Esc => app.leave_tracker(),
            Enter => app.log_set(),
            Tab | BackTab => app.form_toggle_field(),
            Backspace => app.form_backspace(),
            Char('s') => app.skip_set(),
            Char('c') => app.custom_open(),
            Char('f') => app.finish_workout(),
            Char('x') => app.cancel_workout(),
            Char(ch) if ch.is_ascii_digit() || ch == '.' => app.form_char(ch),
            _ => {}
        },
    }
}
