//! UI rendering.

use chrono::Local;
use gymtrack_core::models::{Exercise, SessionStatus, SessionSummary};
use gymtrack_core::{FormField, Phase, Tracker, format_clock};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Cell, Clear, Paragraph, Row, Table, Wrap},
};

use crate::auth::Route;
use crate::io::SessionDetail;
use crate::state::{
    App, AuthField, AuthForm, CustomField, CustomForm, Detail, TrackerPage, TrackerScreen,
};

const PLANS_HINTS: &str = "↑/↓: select • Enter: start • r: resume • y: copy • d d: delete • F2: history • F3: exercises • F4: people • F5: reload • Ctrl+O: sign out • q: quit";
const HISTORY_HINTS: &str = "↑/↓: select • Enter: details • F1/Esc: plans • F5: reload • q: quit";
const EXERCISES_HINTS: &str = "↑/↓: select • ←/→: page • c: category • m: muscle • Enter: details • F1/Esc: plans • q: quit";
const PROFILES_HINTS: &str = "↑/↓: select • Enter: open • v: toggle my visibility • Esc: back • F5: reload • q: quit";
const DETAIL_HINTS: &str = "Esc/Enter: close";
const SET_HINTS: &str = "digits: edit • Tab: reps/weight • Enter: log • s: skip set • c: extra set • f: finish • x: cancel • Esc: leave";
const REST_HINTS: &str = "Space: skip rest • f: finish • x: cancel • Esc: leave";

pub fn render(app: &App, frame: &mut Frame) {
    if app.auth.is_loading() {
        render_splash(frame, "Checking your session...");
        return;
    }

    let [main, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(4)]).areas(frame.area());

    let hints = match app.route {
        Route::Login | Route::Register => {
            render_auth(app, frame, main);
            "Tab/Shift+Tab: fields • Enter: submit • Ctrl+L login • Ctrl+R register • Esc quits"
        }
        Route::Plans => {
            render_plans(app, frame, main);
            PLANS_HINTS
        }
        Route::History => {
            render_history(app, frame, main);
            HISTORY_HINTS
        }
        Route::Exercises => {
            render_exercises(app, frame, main);
            if app.exercises.detail.is_some() {
                DETAIL_HINTS
            } else {
                EXERCISES_HINTS
            }
        }
        Route::Profiles => {
            render_profiles(app, frame, main);
            PROFILES_HINTS
        }
        Route::Tracker => render_tracker(app, frame, main),
    };
    let hints = if app.session_view.is_some() {
        DETAIL_HINTS
    } else {
        hints
    };

    render_status(frame, status, &app.status, hints);

    if let Some(view) = &app.session_view {
        render_session_detail(frame, &view.detail);
    }

    if let Some(notice) = &app.notice {
        render_notice(frame, notice);
    }
}

fn render_splash(frame: &mut Frame, text: &str) {
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::bordered().title("Gymtrack")),
        frame.area(),
    );
}

fn render_auth(app: &App, frame: &mut Frame, area: Rect) {
    let register = app.is_register();
    let form = &app.auth_form;
    let focused = form.focused(register);

    let mut lines = vec![auth_tabs(register), Line::from("")];
    for &field in AuthForm::fields(register) {
        let (label, value, mask) = match field {
            AuthField::Username => ("Username", &form.username, false),
            AuthField::Email => ("Email", &form.email, false),
            AuthField::Password => ("Password", &form.password, true),
            AuthField::Confirm => ("Confirm", &form.confirm, true),
        };
        lines.push(field_line(label, value, field == focused, mask));
    }
    if !form.status.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(form.status.clone()).fg(Color::Red));
    }

    let title = if register { "Gymtrack • Register" } else { "Gymtrack • Login" };
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::bordered()
                .title(title)
                .title_alignment(Alignment::Center),
        ),
        area,
    );
}

fn auth_tabs(register: bool) -> Line<'static> {
    let tab = |label: &'static str, active: bool| {
        Span::styled(
            label,
            if active {
                Style::default().bold().green()
            } else {
                Style::default().dim()
            },
        )
    };
    Line::from(vec![
        tab(" Login ", !register),
        Span::raw(" • "),
        tab(" Register ", register),
    ])
    .alignment(Alignment::Center)
}

fn field_line(label: &str, value: &str, focused: bool, mask: bool) -> Line<'static> {
    let mut display = if mask {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    if display.is_empty() {
        display = "_".repeat(6);
    }

    let mut spans = vec![
        Span::styled(format!("{label}: "), Style::default().bold()),
        Span::raw(display),
    ];

    if focused {
        for span in spans.iter_mut() {
            span.style = span.style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
        }
    }

    Line::from(spans)
}

fn render_plans(app: &App, frame: &mut Frame, area: Rect) {
    let page = &app.plans;
    let [banner, list] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let who = app
        .auth
        .user()
        .map(|u| u.username.as_str())
        .unwrap_or("you");
    let banner_text = match page.active_session {
        Some(id) => Line::from(vec![
            Span::raw(format!("Hi {who}. ")),
            Span::styled(
                format!("Workout #{id} is in progress, press r to resume."),
                Style::default().bold().cyan(),
            ),
        ]),
        None => Line::from(format!("Hi {who}. Pick a plan to start a workout.")),
    };
    frame.render_widget(
        Paragraph::new(banner_text).block(Block::bordered().title("Gymtrack")),
        banner,
    );

    let block = Block::bordered().title("Workout plans");
    if let Some(err) = &page.error {
        frame.render_widget(Paragraph::new(format!("Load error: {err}")).block(block), list);
        return;
    }
    if page.plans.is_empty() {
        let text = if page.loading { "Loading..." } else { "No plans yet" };
        frame.render_widget(Paragraph::new(text).block(block), list);
        return;
    }

    let rows: Vec<Row> = page
        .plans
        .iter()
        .enumerate()
        .map(|(i, plan)| {
            let sets: usize = plan.groups.iter().map(|g| g.sets.len()).sum();
            let style = if page.pending_delete == Some(plan.id) {
                Style::default().red().bold()
            } else if i == page.selected {
                Style::default().yellow().bold()
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(plan.name.clone()),
                Cell::from(format!("{} groups", plan.groups.len())),
                Cell::from(format!("{sets} sets")),
                Cell::from(plan.description.clone().unwrap_or_default()),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Min(0),
        ],
    )
    .column_spacing(1)
    .block(block);
    frame.render_widget(table, list);
}

fn render_history(app: &App, frame: &mut Frame, area: Rect) {
    let page = &app.history;
    let block = Block::bordered().title("History");

    if let Some(err) = &page.error {
        frame.render_widget(Paragraph::new(format!("Load error: {err}")).block(block), area);
        return;
    }
    if page.sessions.is_empty() {
        let text = if page.loading { "Loading..." } else { "No workouts yet" };
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    frame.render_widget(session_table(&page.sessions, page.selected).block(block), area);
}

fn session_table(sessions: &[SessionSummary], selected: usize) -> Table<'static> {
    let rows: Vec<Row> = sessions
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let (label, color) = status_label(&s.status);
            let mut style = Style::default();
            if i == selected {
                style = style.bold();
            }
            Row::new(vec![
                Cell::from(
                    s.date_started
                        .with_timezone(&Local)
                        .format("%a %b %e %H:%M")
                        .to_string(),
                ),
                Cell::from(s.plan_name.clone().unwrap_or_else(|| "Free workout".into())),
                Cell::from(label).style(Style::default().fg(color)),
                Cell::from(format!("{} sets", s.set_count)),
            ])
            .style(style)
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Percentage(40),
            Constraint::Length(12),
            Constraint::Min(0),
        ],
    )
    .column_spacing(1)
}

fn status_label(status: &SessionStatus) -> (&'static str, Color) {
    match status {
        SessionStatus::InProgress => ("in progress", Color::Cyan),
        SessionStatus::Completed => ("completed", Color::Green),
        SessionStatus::Cancelled => ("cancelled", Color::Red),
    }
}

fn render_session_detail(frame: &mut Frame, detail: &Detail<SessionDetail>) {
    let popup = centered(frame.area(), 80, 70);
    frame.render_widget(Clear, popup);

    let loaded = match detail {
        Detail::Loading => {
            frame.render_widget(
                Paragraph::new("Loading...").block(Block::bordered().title("Workout")),
                popup,
            );
            return;
        }
        Detail::Failed(e) => {
            frame.render_widget(
                Paragraph::new(format!("Load error: {e}"))
                    .wrap(Wrap { trim: true })
                    .block(Block::bordered().title("Workout")),
                popup,
            );
            return;
        }
        Detail::Loaded(loaded) => loaded,
    };

    let session = &loaded.session;
    let [head, body] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(popup);

    let title = session
        .plan_details
        .as_ref()
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "Free workout".into());
    let (label, color) = status_label(&session.status);
    let started = session.date_started.with_timezone(&Local);
    let duration = session
        .date_finished
        .map(|end| {
            let secs = (end - session.date_started).num_seconds().max(0);
            format!("{} min", secs / 60)
        })
        .unwrap_or_else(|| "-".into());
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(vec![
                Span::raw(format!(
                    "{} on {} ",
                    session.owner_username,
                    started.format("%a %b %e %H:%M")
                )),
                Span::styled(label, Style::default().fg(color)),
            ]),
            Line::from(format!("Duration: {duration}")).dim(),
        ])
        .block(Block::bordered().title(title)),
        head,
    );

    let rows: Vec<Row> = session
        .logged_sets
        .iter()
        .map(|s| {
            Row::new(vec![
                Cell::from(format!("#{}", s.order)),
                Cell::from(loaded.exercises.name(s.exercise)),
                Cell::from(format!("{} × {} kg", s.actual_reps, s.actual_weight)),
                Cell::from(if s.planned_set.is_some() { "" } else { "extra" })
                    .style(Style::default().dim()),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(50),
            Constraint::Length(16),
            Constraint::Min(0),
        ],
    )
    .block(Block::bordered().title(format!("Sets ({})", session.logged_sets.len())));
    frame.render_widget(table, body);
}

fn render_exercises(app: &App, frame: &mut Frame, area: Rect) {
    let page = &app.exercises;
    let [filters, list] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let filter = |value: Option<&str>| value.unwrap_or("all").to_string();
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Category: "),
            Span::styled(filter(page.category_name()), Style::default().cyan()),
            Span::raw("   Muscle: "),
            Span::styled(filter(page.muscle_group_name()), Style::default().cyan()),
            Span::raw(format!("   Page {} ({} total)", page.page.max(1), page.count)),
        ]))
        .block(Block::bordered().title("Exercise library")),
        filters,
    );

    let block = Block::bordered().title("Exercises");
    if let Some(err) = &page.error {
        frame.render_widget(Paragraph::new(format!("Load error: {err}")).block(block), list);
        return;
    }
    let visible = page.visible();
    if visible.is_empty() {
        let text = if page.loading {
            "Loading..."
        } else {
            "No matching exercises on this page"
        };
        frame.render_widget(Paragraph::new(text).block(block), list);
        return;
    }

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let style = if i == page.selected {
                Style::default().yellow().bold()
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(e.name.clone()),
                Cell::from(e.category.clone()),
                Cell::from(e.level.clone()),
                Cell::from(e.primary_muscles.join(", ")),
            ])
            .style(style)
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Min(0),
        ],
    )
    .column_spacing(1)
    .block(block);
    frame.render_widget(table, list);

    if let Some((_, detail)) = &page.detail {
        render_exercise_detail(frame, detail);
    }
}

fn render_exercise_detail(frame: &mut Frame, detail: &Detail<Exercise>) {
    let popup = centered(frame.area(), 70, 70);
    frame.render_widget(Clear, popup);

    let (title, lines) = match detail {
        Detail::Loading => ("Exercise".to_string(), vec![Line::from("Loading...")]),
        Detail::Failed(e) => (
            "Exercise".to_string(),
            vec![Line::from(format!("Load error: {e}"))],
        ),
        Detail::Loaded(e) => (e.name.clone(), exercise_lines(e)),
    };
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title(title)),
        popup,
    );
}

fn exercise_lines(e: &Exercise) -> Vec<Line<'static>> {
    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().bold()),
            Span::raw(value),
        ])
    };
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".into());

    let mut lines = vec![
        field("Category", e.category.clone()),
        field("Level", e.level.clone()),
        field("Equipment", optional(&e.equipment)),
        field("Force", optional(&e.force)),
        field("Mechanic", optional(&e.mechanic)),
        field("Primary", e.primary_muscles.join(", ")),
        field("Secondary", e.secondary_muscles.join(", ")),
        Line::from(""),
    ];
    lines.extend(
        e.instructions
            .iter()
            .enumerate()
            .map(|(i, step)| Line::from(format!("{}. {step}", i + 1))),
    );
    lines
}

fn render_profiles(app: &App, frame: &mut Frame, area: Rect) {
    let page = &app.profiles;
    let [banner, body] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let banner_text = match &page.me {
        Some(me) if me.is_public => Line::from(vec![
            Span::raw(format!("{}: your profile is ", me.username)),
            Span::styled("public", Style::default().green().bold()),
        ]),
        Some(me) => Line::from(vec![
            Span::raw(format!("{}: your profile is ", me.username)),
            Span::styled("private", Style::default().dim().bold()),
        ]),
        None => Line::from("Your profile is not loaded"),
    };
    frame.render_widget(
        Paragraph::new(banner_text).block(Block::bordered().title("People")),
        banner,
    );

    if let Some(view) = &page.viewing {
        let name = view
            .profile
            .as_ref()
            .map(|p| format!("{} {}", p.first_name, p.last_name).trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| view.username.clone());
        let block = Block::bordered().title(format!("{name} (@{})", view.username));
        if let Some(err) = &view.error {
            frame.render_widget(Paragraph::new(format!("Load error: {err}")).block(block), body);
        } else if view.sessions.is_empty() {
            let text = if view.loading { "Loading..." } else { "No workouts shared" };
            frame.render_widget(Paragraph::new(text).block(block), body);
        } else {
            let table = session_table(&view.sessions, view.selected).block(block);
            frame.render_widget(table, body);
        }
        return;
    }

    let block = Block::bordered().title("Public profiles");
    if let Some(err) = &page.error {
        frame.render_widget(Paragraph::new(format!("Load error: {err}")).block(block), body);
        return;
    }
    if page.profiles.is_empty() {
        let text = if page.loading { "Loading..." } else { "No public profiles" };
        frame.render_widget(Paragraph::new(text).block(block), body);
        return;
    }

    let rows: Vec<Row> = page
        .profiles
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let style = if i == page.selected {
                Style::default().yellow().bold()
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(p.username.clone()),
                Cell::from(format!("{} {}", p.first_name, p.last_name)),
                Cell::from(
                    p.date_joined
                        .with_timezone(&Local)
                        .format("since %b %Y")
                        .to_string(),
                ),
                Cell::from(p.about_me.clone().unwrap_or_default()),
            ])
            .style(style)
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Percentage(25),
            Constraint::Length(12),
            Constraint::Min(0),
        ],
    )
    .column_spacing(1)
    .block(block);
    frame.render_widget(table, body);
}

fn render_tracker(app: &App, frame: &mut Frame, area: Rect) -> &'static str {
    match &app.tracker {
        TrackerScreen::Idle | TrackerScreen::Loading => {
            frame.render_widget(
                Paragraph::new("Loading workout...")
                    .alignment(Alignment::Center)
                    .block(Block::bordered().title("Workout")),
                area,
            );
            "Esc: back"
        }
        TrackerScreen::NoSession => {
            frame.render_widget(
                Paragraph::new("No workout in progress. Pick a plan to start one.")
                    .alignment(Alignment::Center)
                    .block(Block::bordered().title("Workout")),
                area,
            );
            "Esc: back to plans"
        }
        TrackerScreen::Failed(err) => {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from("This workout cannot be tracked.").bold(),
                    Line::from(""),
                    Line::from(err.clone()).fg(Color::Red),
                ])
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::bordered().title("Workout")),
                area,
            );
            "Esc: back to plans"
        }
        TrackerScreen::Active(page) => render_active(frame, area, page),
    }
}

fn render_active(frame: &mut Frame, area: Rect, page: &TrackerPage) -> &'static str {
    let tracker = &page.tracker;
    let [header, body, logged] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(8),
    ])
    .areas(area);

    let plan = tracker.plan();
    frame.render_widget(
        Paragraph::new(format!(
            "{} • group {}/{} • set {}/{}",
            plan.name,
            tracker.cursor().group + 1,
            plan.groups.len(),
            tracker.cursor().set + 1,
            tracker.current_group().sets.len(),
        ))
        .block(Block::bordered().title(format!("Workout #{}", tracker.session_id()))),
        header,
    );

    let hints = match tracker.phase() {
        Phase::Resting { remaining } => {
            render_rest(frame, body, tracker, remaining);
            REST_HINTS
        }
        Phase::ActiveSet => {
            render_set(frame, body, tracker);
            SET_HINTS
        }
        Phase::Finished | Phase::Canceled => {
            let text = if tracker.phase() == Phase::Finished {
                "Workout complete. Nice work!"
            } else {
                "Workout canceled."
            };
            frame.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .block(Block::bordered()),
                body,
            );
            "Enter/Esc: back to plans"
        }
    };

    render_logged(frame, logged, tracker);

    if let Some(custom) = &page.custom {
        render_custom(frame, area, page, custom);
        return "↑/↓: pick • Tab: field • Enter: log • Esc: close";
    }
    hints
}

fn render_set(frame: &mut Frame, area: Rect, tracker: &Tracker) {
    let mut lines = Vec::new();

    if tracker.awaiting_finish() {
        lines.push(Line::from("All planned sets are logged.").bold());
        lines.push(Line::from("Press f to finish the workout."));
    } else {
        let set = tracker.current_set();
        let form = tracker.form();
        lines.push(Line::from(tracker.current_exercise_name()).bold().cyan());
        lines.push(Line::from(format!(
            "Target: {} reps @ {} kg",
            set.target_reps.as_deref().unwrap_or("-"),
            set.target_weight.as_deref().unwrap_or("-"),
        )));
        lines.push(Line::from(""));
        lines.push(field_line(
            "Reps",
            &form.reps,
            form.field == FormField::Reps,
            false,
        ));
        lines.push(field_line(
            "Weight (kg)",
            &form.weight,
            form.field == FormField::Weight,
            false,
        ));
        if tracker.is_last_set_in_group() && !tracker.is_last_group() {
            lines.push(Line::from(""));
            lines.push(Line::from("Last set of this group.").dim());
        }
    }

    if tracker.is_busy() {
        lines.push(Line::from(""));
        lines.push(Line::from("Saving...").dim());
    }
    if let Some(err) = tracker.error() {
        lines.push(Line::from(""));
        lines.push(Line::from(err.to_string()).fg(Color::Red));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title("Current set")),
        area,
    );
}

fn render_rest(frame: &mut Frame, area: Rect, tracker: &Tracker, remaining: u32) {
    let after = tracker
        .rest()
        .map(|r| r.display_name().to_string())
        .unwrap_or_default();
    let lines = vec![
        Line::from(format_clock(u64::from(remaining)))
            .bold()
            .green()
            .alignment(Alignment::Center),
        Line::from(format!("Resting after {after}")).alignment(Alignment::Center),
        Line::from(format!("Next: {}", tracker.current_exercise_name()))
            .dim()
            .alignment(Alignment::Center),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title("Rest")),
        area,
    );
}

fn render_logged(frame: &mut Frame, area: Rect, tracker: &Tracker) {
    let sets = tracker.logged_sets();
    let rows: Vec<Row> = sets
        .iter()
        .rev()
        .take(area.height.saturating_sub(2) as usize)
        .map(|s| {
            let when = s
                .completed_at
                .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
                .unwrap_or_default();
            let kind = if s.planned_set.is_some() { "" } else { "extra" };
            Row::new(vec![
                Cell::from(format!("#{}", s.order)),
                Cell::from(tracker.exercises().name(s.exercise)),
                Cell::from(format!("{} × {} kg", s.actual_reps, s.actual_weight)),
                Cell::from(when),
                Cell::from(kind).style(Style::default().dim()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(40),
            Constraint::Length(16),
            Constraint::Length(9),
            Constraint::Min(0),
        ],
    )
    .block(Block::bordered().title(format!("Logged ({})", sets.len())));
    frame.render_widget(table, area);
}

fn render_custom(
    frame: &mut Frame,
    area: Rect,
    page: &TrackerPage,
    custom: &CustomForm,
) {
    let popup = centered(area, 60, 70);
    frame.render_widget(Clear, popup);

    let mut lines = vec![
        field_line(
            "Search",
            &custom.query,
            custom.field == CustomField::Exercise,
            false,
        ),
        field_line("Reps", &custom.reps, custom.field == CustomField::Reps, false),
        field_line(
            "Weight (kg)",
            &custom.weight,
            custom.field == CustomField::Weight,
            false,
        ),
        Line::from(""),
    ];

    let matches = page.custom_matches();
    if matches.is_empty() {
        lines.push(Line::from("No matching exercises").dim());
    }
    let visible = popup.height.saturating_sub(7) as usize;
    let start = custom.selected.saturating_sub(visible.saturating_sub(1));
    for (i, (_, name)) in matches.iter().enumerate().skip(start).take(visible) {
        let line = if i == custom.selected {
            Line::from(format!("> {name}")).yellow().bold()
        } else {
            Line::from(format!("  {name}"))
        };
        lines.push(line);
    }

    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title("Extra set")),
        popup,
    );
}

fn render_notice(frame: &mut Frame, notice: &str) {
    let popup = centered(frame.area(), 50, 20);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(notice.to_string()).bold(),
            Line::from(""),
            Line::from("Press any key").dim(),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::bordered().title("Rest timer")),
        popup,
    );
}

fn centered(area: Rect, width_pct: u16, height_pct: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_pct) / 2),
        Constraint::Percentage(height_pct),
        Constraint::Percentage((100 - height_pct) / 2),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_pct) / 2),
        Constraint::Percentage(width_pct),
        Constraint::Percentage((100 - width_pct) / 2),
    ])
    .areas(mid);
    center
}

fn render_status(frame: &mut Frame, area: Rect, message: &str, hints: &str) {
    let lines = vec![Line::from(message.to_string()), Line::from(hints.to_string()).dim()];

    let status = Paragraph::new(lines)
        .block(Block::bordered().title("Status"))
        .alignment(Alignment::Left);

    frame.render_widget(status, area);
}
