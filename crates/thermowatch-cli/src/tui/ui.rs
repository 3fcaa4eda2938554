//! TUI rendering.
//!
//! ┌──────────────────────────────────────────────┐
//! │  🌡 Thermowatch   AUTO  every 3s   42 records │
//! ├───────────────────┬──────────────────────────┤
//! │      ╭─────╮      │  °C                      │
//! │    ╭─  21.0 ─╮    │   ⠤⠒⠉⠒⠤⣀                  │
//! │   -10   /   40    │                          │
//! ├───────────────────┤                          │
//! │  ██████████░░ 62% │  12:00:00  ...  12:02:03 │
//! ├───────────────────┴──────────────────────────┤
//! │  Recorded 21°C.                              │
//! ├──────────────────────────────────────────────┤
//! │  a: auto   i: add   c: clear   e/j/t: export │
//! └──────────────────────────────────────────────┘

use std::time::Instant;

use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Points};
use ratatui::{prelude::*, widgets::*};

use super::app::{App, InputMode};
use thermowatch_core::ArcGeometry;

const ARC_RADIUS: f64 = 1.0;
const ARC_STEPS: usize = 90;

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(10),   // main
            Constraint::Length(3), // input / status
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);
    draw_main(f, rows[1], app);
    draw_status(f, rows[2], app);
    draw_keys(f, rows[3], app);
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    let (mode_label, mode_style) = if app.is_auto() {
        ("AUTO", Style::default().bold().fg(Color::Green))
    } else {
        ("MANUAL", Style::default().bold().fg(Color::Yellow))
    };
    let next = app
        .next_sample_in(Instant::now())
        .map(|d| format!("  next in {:.1}s", d.as_secs_f64()))
        .unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" 🌡 Thermowatch ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled(mode_label, mode_style),
            Span::styled(
                format!(
                    "  every {}s{next}  {} records ",
                    app.period().as_secs_f64(),
                    app.records().len()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

    f.render_widget(block, area);
}

fn draw_main(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(cols[0]);

    draw_dial(f, left[0], app);
    draw_fill_bar(f, left[1], app);
    draw_chart(f, cols[1], app);
}

/// Colour along the gauge: blue when cold, green mid-band, red when hot.
fn fill_color(fill: f64) -> Color {
    if fill < 1.0 / 3.0 {
        Color::Blue
    } else if fill < 2.0 / 3.0 {
        Color::Green
    } else {
        Color::Red
    }
}

fn draw_dial(f: &mut Frame, area: Rect, app: &App) {
    let gauge = app.gauge();
    let arc = gauge.arc();
    let color = fill_color(gauge.fill);
    let band = app.gauge_band();

    let background = ArcGeometry::from_fill(1.0).active_arc_points(ARC_RADIUS, ARC_STEPS);
    let active = arc.active_arc_points(ARC_RADIUS, ARC_STEPS);
    let (tip_x, tip_y) = arc.needle_tip(ARC_RADIUS * 0.8);
    let value_label = format!("{:.1}°C", gauge.value);
    let min_label = format!("{}", band.min());
    let max_label = format!("{}", band.max());

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(" Current "))
        .marker(symbols::Marker::Braille)
        .x_bounds([-1.3, 1.3])
        .y_bounds([-0.4, 1.2])
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &background,
                color: Color::DarkGray,
            });
            ctx.draw(&Points {
                coords: &active,
                color,
            });
            ctx.draw(&CanvasLine {
                x1: 0.0,
                y1: 0.0,
                x2: tip_x,
                y2: tip_y,
                color: Color::White,
            });
            let muted = Style::default().fg(Color::DarkGray);
            ctx.print(-1.25, -0.25, Span::styled(min_label.clone(), muted));
            ctx.print(1.0, -0.25, Span::styled(max_label.clone(), muted));
            ctx.print(
                -0.2,
                -0.3,
                Span::styled(value_label.clone(), Style::default().bold().fg(color)),
            );
        });

    f.render_widget(canvas, area);
}

fn draw_fill_bar(f: &mut Frame, area: Rect, app: &App) {
    let gauge = app.gauge();
    let bar = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(fill_color(gauge.fill)))
        .ratio(gauge.fill)
        .label(format!("{:.1}°C  {:.0}%", gauge.value, gauge.fill * 100.0));
    f.render_widget(bar, area);
}

fn draw_chart(f: &mut Frame, area: Rect, app: &App) {
    let series = app.series();

    let Some((min_val, max_val)) = series.value_bounds() else {
        let block = Block::default().borders(Borders::ALL).title(" History ");
        let p = Paragraph::new("No temperatures recorded yet. Press i to add one or a for auto mode.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(p, area);
        return;
    };

    let points = series.points();
    let data: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect();
    let latest = points.last().map_or(0.0, |p| p.value);

    let datasets = vec![
        Dataset::default()
            .name(format!("{latest:.1}°C"))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&data),
    ];

    let x_max = ((points.len() - 1) as f64).max(1.0);
    let y_min = (min_val - 1.0).floor();
    let y_max = (max_val + 1.0).ceil();

    let first_label = points.first().map_or("", |p| p.label.as_str());
    let last_label = points.last().map_or("", |p| p.label.as_str());

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" History  {} samples ", points.len())),
        )
        .x_axis(Axis::default().bounds([0.0, x_max]).labels(vec![
            Line::from(first_label.to_string()),
            Line::from(last_label.to_string()),
        ]))
        .y_axis(Axis::default().title("°C").bounds([y_min, y_max]).labels(vec![
            Line::from(format!("{y_min:.0}")),
            Line::from(format!("{:.0}", (y_min + y_max) / 2.0)),
            Line::from(format!("{y_max:.0}")),
        ]));

    f.render_widget(chart, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let (title, text, style) = match app.mode() {
        InputMode::Editing(buffer) => (
            " Temperature (°C), Enter to save, Esc to cancel ",
            format!("{buffer}▏"),
            Style::default().fg(Color::Yellow),
        ),
        InputMode::ConfirmClear => (
            " Confirm ",
            format!(
                "Delete all {} recorded temperatures? (y/n)",
                app.records().len()
            ),
            Style::default().fg(Color::Red).bold(),
        ),
        InputMode::Normal => match app.status() {
            Some(status) if status.is_error => (
                " Status ",
                status.text.clone(),
                Style::default().fg(Color::Red),
            ),
            Some(status) => (" Status ", status.text.clone(), Style::default()),
            None => (" Status ", String::new(), Style::default()),
        },
    };

    let mut text = text;
    if let (InputMode::Editing(_), Some(status)) = (app.mode(), app.status())
        && status.is_error
    {
        text = format!("{text}   {}", status.text);
    }

    let block = Block::default().borders(Borders::ALL).title(title);
    let p = Paragraph::new(text).style(style).block(block);
    f.render_widget(p, area);
}

fn draw_keys(f: &mut Frame, area: Rect, app: &App) {
    let auto = if app.is_auto() { "stop auto" } else { "start auto" };
    let bar = Paragraph::new(format!(
        " a: {auto}   i: add reading   c: clear   e/j/t: export csv/json/txt   q: quit"
    ))
    .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}
