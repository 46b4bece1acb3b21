use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Paragraph,
        canvas::{Canvas, Context, Line as CanvasLine},
    },
};
use skybars_core::{
    Bar, BarKind, ClockLabels, Daylight, Label, Scene, Status, Surface, layout::Rect as BarRect,
};

use crate::app::App;

const INPUT_HEIGHT: u16 = 3;

pub fn draw(frame: &mut Frame, app: &App, clock: &ClockLabels) {
    let [chart_area, input_area, help_area] = Layout::vertical([
        Constraint::Min(8),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let scene = Scene::compose(app.model(), clock, app.surface());
    draw_scene(frame, chart_area, &scene, app, clock.daylight);
    draw_city_field(frame, input_area, app.city_field());
    draw_help(frame, help_area);
}

fn draw_scene(frame: &mut Frame, area: Rect, scene: &Scene, app: &App, daylight: Daylight) {
    let surface = scene.surface;
    let background = match daylight {
        Daylight::Day => Color::Rgb(30, 90, 200),
        Daylight::Night => Color::Rgb(20, 20, 40),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" skybars · °{} ", app.model().scale().symbol()),
            Style::default().fg(Color::Yellow),
        ));

    // One vertical stroke per half cell is enough to fill a bar.
    let columns = f64::from(block.inner(area).width.max(1));
    let stroke = surface.width / (columns * 2.0);

    let canvas = Canvas::default()
        .block(block)
        .background_color(background)
        .marker(Marker::HalfBlock)
        .x_bounds([0.0, surface.width])
        .y_bounds([0.0, surface.height])
        .paint(move |ctx| {
            for bar in &scene.bars {
                fill(ctx, surface, &bar.rect, bar_color(bar.kind), stroke);
            }
            ctx.layer();

            for bar in &scene.bars {
                print_bar_labels(ctx, surface, bar);
            }
            for label in &scene.header {
                print(ctx, surface, label, Style::default().fg(Color::White));
            }
            if let Some(status) = &scene.status {
                let color = match app.model().status() {
                    Status::Failed(_) => Color::LightRed,
                    _ => Color::Yellow,
                };
                print(ctx, surface, status, Style::default().fg(color).bold());
            }
        });

    frame.render_widget(canvas, area);
}

/// Canvas y grows upwards; scene y grows downwards.
fn flip(surface: Surface, y: f64) -> f64 {
    surface.height - y
}

fn fill(ctx: &mut Context, surface: Surface, rect: &BarRect, color: Color, stroke: f64) {
    if rect.height <= 0.0 {
        return;
    }

    let y1 = flip(surface, rect.y + rect.height);
    let y2 = flip(surface, rect.y);
    let mut x = rect.x;
    while x <= rect.x + rect.width {
        ctx.draw(&CanvasLine {
            x1: x,
            y1,
            x2: x,
            y2,
            color,
        });
        x += stroke;
    }
}

fn print_bar_labels(ctx: &mut Context, surface: Surface, bar: &Bar) {
    print(ctx, surface, &bar.value, Style::default().fg(Color::Black).bold());
    print(ctx, surface, &bar.name, Style::default().fg(Color::White));
}

fn print(ctx: &mut Context, surface: Surface, label: &Label, style: Style) {
    let text = truncate(&label.text, label.max_width, surface.width);
    ctx.print(label.x, flip(surface, label.y), Line::from(Span::styled(text, style)));
}

/// Canvas text cannot be squeezed, so clip it to roughly `max_width` pixels
/// assuming a monospace cell of `surface.width / 80` pixels.
fn truncate(text: &str, max_width: f64, surface_width: f64) -> String {
    let cell = surface_width / 80.0;
    let max_chars = (max_width / cell).floor().max(2.0) as usize;
    text.chars().take(max_chars).collect()
}

fn bar_color(kind: BarKind) -> Color {
    match kind {
        BarKind::High => Color::Rgb(220, 40, 40),
        BarKind::Current => Color::Rgb(255, 165, 0),
        BarKind::Low => Color::Rgb(0, 200, 220),
        BarKind::Humidity => Color::Rgb(40, 170, 60),
    }
}

fn draw_city_field(frame: &mut Frame, area: Rect, value: &str) {
    let line = if value.is_empty() {
        Line::from(Span::styled("Type a city...", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(vec![
            Span::raw(value.to_string()),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
        ])
    };

    let input = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" City "),
    );
    frame.render_widget(input, area);
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan).bold());
    let text = |t: &'static str| Span::styled(t, Style::default().fg(Color::DarkGray));

    let help = Line::from(vec![
        key("Enter"),
        text(" fetch  "),
        key("Tab"),
        text(" °C/°F  "),
        key("Esc"),
        text(" quit"),
    ])
    .centered();
    frame.render_widget(Paragraph::new(help), area);
}
