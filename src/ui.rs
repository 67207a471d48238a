//! `ratatui` front-end: the slot editor, the wheel canvas, and the event
//! loop that drives spin animation frames.

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Context, Line as CanvasLine},
        Block, BorderType, Borders, Paragraph,
    },
    Terminal,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::logging::log_debug;
use crate::terminal_restore::TerminalRestoreGuard;
use crate::wheel::SLOT_COUNT;

/// Frame cadence while the wheel animates; relaxed poll when idle.
const SPIN_FRAME_MS: u64 = 33;
const IDLE_POLL_MS: u64 = 100;

const WHEEL_RADIUS: f64 = 1.0;
const LABEL_RADIUS: f64 = 0.62;

/// Segment palette, one color per slot (pink, purple, blue, green, yellow).
const SEGMENT_COLORS: [Color; SLOT_COUNT] = [
    Color::Rgb(236, 72, 153),
    Color::Rgb(168, 85, 247),
    Color::Rgb(59, 130, 246),
    Color::Rgb(34, 197, 94),
    Color::Rgb(234, 179, 8),
];

/// Configure the terminal, run the drawing loop, and tear everything down.
pub fn run_app(app: &mut App) -> Result<()> {
    let terminal_guard = TerminalRestoreGuard::new();
    terminal_guard.enable_raw_mode()?;
    let mut stdout = io::stdout();
    terminal_guard.enter_alt_screen(&mut stdout)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app_loop(&mut terminal, app);

    drop(terminal);
    terminal_guard.restore();

    result
}

fn app_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    terminal.draw(|frame| draw(frame, app))?;

    loop {
        let animating = app.tick(Instant::now());

        let poll_duration = if animating {
            Duration::from_millis(SPIN_FRAME_MS)
        } else {
            Duration::from_millis(IDLE_POLL_MS)
        };

        // Keep drawing frames while the wheel animates.
        let mut should_draw = app.take_redraw_request() || animating;
        let mut should_quit = false;

        if event::poll(poll_duration)? {
            match event::read()? {
                Event::Key(key) => {
                    should_quit = handle_key_event(app, key);
                    should_draw = true;
                }
                Event::Resize(_, _) => {
                    should_draw = true;
                }
                _ => {}
            }
        }

        if should_draw {
            terminal.draw(|frame| draw(frame, app))?;
        }

        if should_quit {
            break;
        }
    }
    Ok(())
}

/// Interpret keystrokes into modifications to the shared `App` state.
/// Returns true when the app should exit.
fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => return true,
            KeyCode::Char('r') => {
                log_debug("Ctrl+R pressed, resetting wheel");
                app.reset();
                return false;
            }
            _ => return false,
        }
    }

    match key.code {
        KeyCode::Enter => app.spin(Instant::now()),
        KeyCode::Up | KeyCode::BackTab => app.select_previous_slot(),
        KeyCode::Down | KeyCode::Tab => app.select_next_slot(),
        KeyCode::Backspace => app.backspace_slot(),
        KeyCode::Esc => app.clear_slot(),
        KeyCode::Char(c) => app.push_slot_char(c),
        _ => {}
    }
    false
}

/// Render the slot editor, the wheel, and the status bar.
pub fn draw(frame: &mut ratatui::Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(SLOT_COUNT as u16 + 2),
            Constraint::Min(9),
            Constraint::Length(3),
        ])
        .split(frame.size());

    draw_slots(frame, app, chunks[0]);
    draw_wheel_panel(frame, app, chunks[1]);
    draw_status(frame, app, chunks[2]);
}

fn draw_slots(frame: &mut ratatui::Frame<'_>, app: &App, area: ratatui::layout::Rect) {
    let slots = app.wheel().slots();
    let lines: Vec<Line> = slots
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let marker = if i == app.active_slot() { '›' } else { ' ' };
            let number_style = Style::default().fg(SEGMENT_COLORS[i]);
            let label_style = if i == app.active_slot() {
                Style::default()
                    .fg(Color::Rgb(255, 220, 100))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(210, 205, 200))
            };
            Line::from(vec![
                Span::styled(format!("{} ", i + 1), number_style),
                Span::raw(format!("{marker} ")),
                Span::styled(label.clone(), label_style),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(130, 90, 160)))
        .title(Span::styled(
            " Options ",
            Style::default()
                .fg(Color::Rgb(190, 140, 230))
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Rgb(255, 220, 100))),
            Span::raw("spin  "),
            Span::styled("Ctrl+R ", Style::default().fg(Color::Rgb(255, 220, 100))),
            Span::raw("reset  "),
            Span::styled("Ctrl+C ", Style::default().fg(Color::Rgb(255, 220, 100))),
            Span::raw("quit "),
        ]));
    frame.render_widget(Paragraph::new(lines).block(block), area);

    // Cursor at the end of the active label.
    if !app.is_spinning() {
        let label = &slots[app.active_slot()];
        let prefix_width = 4u16; // "N › "
        let label_width = UnicodeWidthStr::width(label.as_str()).min(u16::MAX as usize) as u16;
        let inner_width = area.width.saturating_sub(2);
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add((prefix_width + label_width).min(inner_width));
        let cursor_y = area
            .y
            .saturating_add(1)
            .saturating_add(app.active_slot() as u16);
        frame.set_cursor(cursor_x, cursor_y);
    }
}

fn draw_wheel_panel(frame: &mut ratatui::Frame<'_>, app: &App, area: ratatui::layout::Rect) {
    let title = match app.greeting() {
        Some(name) => format!(" Decision Roulette — {name} "),
        None => " Decision Roulette ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(255, 90, 120)))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Rgb(255, 110, 140))
                .add_modifier(Modifier::BOLD),
        ));

    if app.wheel().filled_count() == 0 {
        let empty = Paragraph::new("\nAdd options to create the wheel")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Rgb(160, 150, 150)))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let rotation = app.display_rotation(Instant::now());
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([-1.6, 1.6])
        .y_bounds([-1.15, 1.3])
        .paint(move |ctx| paint_wheel(ctx, app, rotation));
    frame.render_widget(canvas, area);
}

/// Paint the segmented circle under the given applied rotation. Segment 0
/// starts at the top pointer and segments run clockwise, matching the
/// selection math in `wheel`.
fn paint_wheel(ctx: &mut Context<'_>, app: &App, rotation: f64) {
    let filled = app.wheel().filled_options();
    let k = filled.len();
    let segment_angle = 360.0 / k as f64;

    ctx.draw(&Circle {
        x: 0.0,
        y: 0.0,
        radius: WHEEL_RADIUS,
        color: Color::White,
    });

    // Segment boundaries as spokes from hub to rim.
    for i in 0..k {
        let boundary = i as f64 * segment_angle;
        let (x, y) = wheel_point(boundary, rotation, WHEEL_RADIUS);
        ctx.draw(&CanvasLine {
            x1: 0.0,
            y1: 0.0,
            x2: x,
            y2: y,
            color: Color::White,
        });
    }

    // Segment numbers at each segment's center.
    for i in 0..k {
        let center = i as f64 * segment_angle + segment_angle / 2.0;
        let (x, y) = wheel_point(center, rotation, LABEL_RADIUS);
        let won = app.wheel().selected() == Some(i);
        let mut style = Style::default().fg(SEGMENT_COLORS[i]);
        if won {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        ctx.print(x, y, Line::from(Span::styled(format!("{}", i + 1), style)));
    }

    // Fixed reference pointer above the rim.
    ctx.print(
        0.0,
        WHEEL_RADIUS + 0.18,
        Line::from(Span::styled(
            "▼",
            Style::default()
                .fg(Color::Rgb(250, 204, 21))
                .add_modifier(Modifier::BOLD),
        )),
    );
}

/// Canvas coordinates of the point at `wheel_angle` degrees clockwise from
/// the top, after applying the wheel's rotation.
fn wheel_point(wheel_angle: f64, rotation: f64, radius: f64) -> (f64, f64) {
    let theta = (90.0 - (wheel_angle + rotation)).to_radians();
    (radius * theta.cos(), radius * theta.sin())
}

fn draw_status(frame: &mut ratatui::Frame<'_>, app: &App, area: ratatui::layout::Rect) {
    let style = if app.last_result().is_some() {
        Style::default()
            .fg(Color::Rgb(74, 222, 128))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Rgb(160, 150, 150))
    };
    let status = Paragraph::new(app.status_text())
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Rgb(110, 100, 100)))
                .title(Span::styled(
                    " Status ",
                    Style::default().fg(Color::Rgb(160, 150, 150)),
                )),
        );
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use clap::Parser;

    fn test_app() -> App {
        let config = AppConfig::parse_from(["test-app"]);
        App::new(&config, None)
    }

    #[test]
    fn handle_key_event_appends_and_backspaces() {
        let mut app = test_app();
        assert!(!handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty())
        ));
        assert_eq!(app.wheel().slots()[0], "a");
        assert!(!handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Backspace, KeyModifiers::empty())
        ));
        assert_eq!(app.wheel().slots()[0], "");
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = test_app();
        assert!(handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
    }

    #[test]
    fn tab_cycles_slots() {
        let mut app = test_app();
        for _ in 0..SLOT_COUNT {
            handle_key_event(&mut app, KeyEvent::new(KeyCode::Tab, KeyModifiers::empty()));
        }
        assert_eq!(app.active_slot(), 0);
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::BackTab, KeyModifiers::empty()),
        );
        assert_eq!(app.active_slot(), SLOT_COUNT - 1);
    }

    #[test]
    fn wheel_point_tracks_the_pointer() {
        // With no rotation, wheel angle 0 sits at the top of the circle.
        let (x, y) = wheel_point(0.0, 0.0, 1.0);
        assert!(x.abs() < 1e-9);
        assert!((y - 1.0).abs() < 1e-9);
        // Rotating by -90 moves wheel angle 90 up to the top.
        let (x, y) = wheel_point(90.0, -90.0, 1.0);
        assert!(x.abs() < 1e-9);
        assert!((y - 1.0).abs() < 1e-9);
    }
}
