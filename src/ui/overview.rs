//! Overview view rendering.
//!
//! Displays a table of all sensors with their latest value, position within
//! the operating range, status and recent trend, followed by the maintenance
//! prediction banner.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::{SensorKey, Snapshot};

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const SPARKLINE_WIDTH: usize = 12;
const GAUGE_WIDTH: usize = 10;

/// Render the Overview view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let [table_area, bottom] =
        Layout::vertical([Constraint::Length(8), Constraint::Min(5)]).areas(area);
    let [banner_area, detail_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(bottom);

    render_sensor_table(frame, app, data, table_area);
    render_prediction(frame, app, data, banner_area);
    render_sensor_detail(frame, app, data, detail_area);
}

fn render_sensor_table(frame: &mut Frame, app: &App, data: &Snapshot, area: Rect) {
    let header = Row::new(vec![
        Cell::from("Sensor"),
        Cell::from("Value"),
        Cell::from("Position"),
        Cell::from("Range"),
        Cell::from("Trend"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = app
        .sensors
        .iter()
        .map(|(key, config)| {
            let status = data.status_of(key);
            let status_style = app.theme.status_style(status);
            let sparkline = render_sparkline(&app.history.sparkline(
                key,
                config.min,
                config.max,
                SPARKLINE_WIDTH,
            ));

            Row::new(vec![
                Cell::from(Span::styled(
                    config.label,
                    Style::default().fg(app.theme.sensor_color(config)),
                )),
                Cell::from(format!("{:.1} {}", data.value(key), config.unit)),
                Cell::from(render_gauge(data.normalized[key])).style(status_style),
                Cell::from(format!("{}-{}", config.min, config.max)),
                Cell::from(sparkline),
                Cell::from(status.symbol()).style(status_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Min(GAUGE_WIDTH as u16 + 2),
        Constraint::Fill(2),
        Constraint::Min(SPARKLINE_WIDTH as u16),
        Constraint::Min(6),
    ];

    let title = format!(
        " Sensors [{}/{}] ",
        app.selected_sensor.index() + 1,
        SensorKey::ALL.len()
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected_sensor.index()));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_prediction(frame: &mut Frame, app: &App, data: &Snapshot, area: Rect) {
    let severity = data.prediction.severity();
    let style = app.theme.status_style(severity);

    let text = vec![
        Line::from(Span::styled(
            data.prediction.message(),
            style.add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(data.prediction.explanation()),
    ];

    let paragraph = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" Maintenance Prediction ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.status_color(severity))),
    );

    frame.render_widget(paragraph, area);
}

fn render_sensor_detail(frame: &mut Frame, app: &App, data: &Snapshot, area: Rect) {
    let key = app.selected_sensor;
    let config = app.sensors.get(key);
    let status = data.status_of(key);

    let text = vec![
        Line::from(vec![
            Span::styled(
                config.label,
                Style::default()
                    .fg(app.theme.sensor_color(config))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(status.symbol(), app.theme.status_style(status)),
        ]),
        Line::from(Span::styled(
            config.description,
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(format!(
            "{:.1} {} ({:.0}% of range), {} points stored",
            data.value(key),
            config.unit,
            data.normalized[key] * 100.0,
            app.history.get(key).len()
        )),
    ];

    let paragraph = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" Selected Sensor ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(paragraph, area);
}

/// Horizontal marker showing where a value sits in its range.
fn render_gauge(normalized: f64) -> String {
    let clamped = normalized.clamp(0.0, 1.0);
    let pos = ((clamped * (GAUGE_WIDTH - 1) as f64).round() as usize).min(GAUGE_WIDTH - 1);
    (0..GAUGE_WIDTH)
        .map(|i| match i.cmp(&pos) {
            std::cmp::Ordering::Less => '━',
            std::cmp::Ordering::Equal => '●',
            std::cmp::Ordering::Greater => '─',
        })
        .collect()
}

fn render_sparkline(data: &[u8]) -> String {
    if data.is_empty() {
        return " ".repeat(SPARKLINE_WIDTH);
    }
    data.iter().map(|&v| SPARKLINE_CHARS[v.min(7) as usize]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_marks_position() {
        assert_eq!(render_gauge(0.0), "●─────────");
        assert_eq!(render_gauge(1.0), "━━━━━━━━━●");
        assert_eq!(render_gauge(-3.0), render_gauge(0.0));
        assert_eq!(render_gauge(0.5).chars().count(), GAUGE_WIDTH);
    }

    #[test]
    fn sparkline_maps_levels() {
        assert_eq!(render_sparkline(&[0, 3, 7, 9]), "▁▄██");
        assert_eq!(render_sparkline(&[]).len(), SPARKLINE_WIDTH);
    }
}
