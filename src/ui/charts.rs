//! Charts view: history plots with optional comparison overlays.
//!
//! Which charts are shown is view state only; it lives in [`ChartBoard`]
//! and never feeds back into the telemetry pipeline.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{normalize, SensorKey};

/// How history series are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartStyle {
    #[default]
    Line,
    /// Filled columns down to the range floor.
    Area,
    Bar,
}

impl ChartStyle {
    /// Cycle to the next chart style.
    pub fn next(self) -> Self {
        match self {
            ChartStyle::Line => ChartStyle::Area,
            ChartStyle::Area => ChartStyle::Bar,
            ChartStyle::Bar => ChartStyle::Line,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartStyle::Line => "line",
            ChartStyle::Area => "area",
            ChartStyle::Bar => "bar",
        }
    }

    fn marker(&self) -> Marker {
        match self {
            ChartStyle::Line | ChartStyle::Area => Marker::Braille,
            ChartStyle::Bar => Marker::HalfBlock,
        }
    }

    fn graph_type(&self) -> GraphType {
        match self {
            ChartStyle::Line => GraphType::Line,
            ChartStyle::Area | ChartStyle::Bar => GraphType::Bar,
        }
    }
}

/// One chart on the board: a primary sensor and an optional overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSelection {
    pub primary: SensorKey,
    pub compare: Option<SensorKey>,
}

impl ChartSelection {
    fn shows(&self, key: SensorKey) -> bool {
        self.primary == key || self.compare == Some(key)
    }
}

/// The set of charts the user has opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartBoard {
    charts: Vec<ChartSelection>,
    pub style: ChartStyle,
}

impl Default for ChartBoard {
    fn default() -> Self {
        Self {
            charts: vec![ChartSelection {
                primary: SensorKey::HydraulicPressure,
                compare: None,
            }],
            style: ChartStyle::default(),
        }
    }
}

impl ChartBoard {
    pub fn charts(&self) -> &[ChartSelection] {
        &self.charts
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Open a chart for `key` unless the sensor is already on screen,
    /// either as a primary or as a comparison.
    pub fn add(&mut self, key: SensorKey) -> bool {
        if self.charts.iter().any(|chart| chart.shows(key)) {
            return false;
        }
        self.charts.push(ChartSelection {
            primary: key,
            compare: None,
        });
        true
    }

    /// Close the chart at `index`.
    pub fn remove(&mut self, index: usize) -> bool {
        if index < self.charts.len() {
            self.charts.remove(index);
            true
        } else {
            false
        }
    }

    /// Overlay `key` on the chart at `index`, or remove the overlay if it is
    /// already `key`. Comparing a sensor with itself is ignored.
    pub fn toggle_compare(&mut self, index: usize, key: SensorKey) -> bool {
        let Some(chart) = self.charts.get_mut(index) else {
            return false;
        };
        if chart.compare == Some(key) {
            chart.compare = None;
            true
        } else if chart.primary != key {
            chart.compare = Some(key);
            true
        } else {
            false
        }
    }

    pub fn cycle_style(&mut self) {
        self.style = self.style.next();
    }
}

/// Render the Charts view, one panel per open chart.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.charts.is_empty() {
        let hint = Paragraph::new(" No charts open. Press a to add one for the selected sensor.")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(app.theme.border_type)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        frame.render_widget(hint, area);
        return;
    }

    let constraints = vec![Constraint::Fill(1); app.charts.len()];
    let panels = Layout::vertical(constraints).split(area);

    for (index, (chart, panel)) in app.charts.charts().iter().zip(panels.iter()).enumerate() {
        render_chart(frame, app, *chart, index == app.selected_chart, *panel);
    }
}

fn render_chart(frame: &mut Frame, app: &App, chart: ChartSelection, selected: bool, area: Rect) {
    let primary = app.sensors.get(chart.primary);
    let primary_color = app.theme.sensor_color(primary);

    // With an overlay both series share a percent-of-range axis.
    let scale = |key: SensorKey, points: Vec<(f64, f64)>| -> Vec<(f64, f64)> {
        if chart.compare.is_some() {
            let config = app.sensors.get(key);
            points.into_iter().map(|(x, y)| (x, normalize(config, y) * 100.0)).collect()
        } else {
            points
        }
    };

    let primary_points = scale(chart.primary, app.history.chart_points(chart.primary));
    let compare_points = chart
        .compare
        .map(|key| scale(key, app.history.chart_points(key)))
        .unwrap_or_default();

    let mut datasets = vec![Dataset::default()
        .name(primary.label)
        .marker(app.charts.style.marker())
        .graph_type(app.charts.style.graph_type())
        .style(Style::default().fg(primary_color))
        .data(&primary_points)];

    if let Some(key) = chart.compare {
        let config = app.sensors.get(key);
        datasets.push(
            Dataset::default()
                .name(config.label)
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(app.theme.sensor_color(config)))
                .data(&compare_points),
        );
    }

    let (y_bounds, y_labels) = match chart.compare {
        Some(_) => (
            [0.0, 100.0],
            vec!["0%".to_string(), "50%".to_string(), "100%".to_string()],
        ),
        None => (
            [primary.min, primary.max],
            vec![
                format!("{:.0}", primary.min),
                format!("{:.0}", (primary.min + primary.max) / 2.0),
                format!("{:.0}", primary.max),
            ],
        ),
    };

    let x_max = app.history.capacity().saturating_sub(1).max(1) as f64;
    let (first, last) = history_span(app, chart.primary);

    let status_span = match app.data {
        Some(ref data) => {
            let status = data.status_of(chart.primary);
            Span::styled(format!(" {} ", status.symbol()), app.theme.status_style(status))
        }
        None => Span::raw(""),
    };

    let mut title = vec![
        Span::styled(
            format!(" {} ({}) ", primary.label, primary.unit),
            Style::default().fg(primary_color).add_modifier(Modifier::BOLD),
        ),
        status_span,
    ];
    if let Some(key) = chart.compare {
        title.push(Span::raw(format!("vs {} ", app.sensors.get(key).label)));
    }
    title.push(Span::styled(
        format!("[{}] ", app.charts.style.label()),
        Style::default().add_modifier(Modifier::DIM),
    ));

    let border_color = if selected { app.theme.highlight } else { app.theme.border };

    let widget = Chart::new(datasets)
        .block(
            Block::default()
                .title(Line::from(title))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(border_color)),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![first, last])
                .style(Style::default().fg(app.theme.border)),
        )
        .y_axis(
            Axis::default()
                .bounds(y_bounds)
                .labels(y_labels)
                .style(Style::default().fg(app.theme.border)),
        );

    frame.render_widget(widget, area);
}

/// Oldest and newest timestamps stored for a sensor.
fn history_span(app: &App, key: SensorKey) -> (String, String) {
    let series = app.history.get(key);
    let first = series.front().map(|p| p.timestamp.clone()).unwrap_or_default();
    let last = series.back().map(|p| p.timestamp.clone()).unwrap_or_default();
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_starts_with_pressure_chart() {
        let board = ChartBoard::default();
        assert_eq!(board.len(), 1);
        assert_eq!(board.charts()[0].primary, SensorKey::HydraulicPressure);
        assert_eq!(board.style, ChartStyle::Line);
    }

    #[test]
    fn add_rejects_sensors_already_shown() {
        let mut board = ChartBoard::default();
        assert!(!board.add(SensorKey::HydraulicPressure));
        assert!(board.add(SensorKey::SawBladeRpm));

        board.toggle_compare(0, SensorKey::FuelConsumption);
        assert!(!board.add(SensorKey::FuelConsumption));
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn remove_by_index() {
        let mut board = ChartBoard::default();
        board.add(SensorKey::SawBladeRpm);
        assert!(board.remove(0));
        assert_eq!(board.charts()[0].primary, SensorKey::SawBladeRpm);
        assert!(!board.remove(5));
    }

    #[test]
    fn toggle_compare_sets_and_clears() {
        let mut board = ChartBoard::default();
        assert!(board.toggle_compare(0, SensorKey::HydraulicOilTemperature));
        assert_eq!(board.charts()[0].compare, Some(SensorKey::HydraulicOilTemperature));

        // Switching to another sensor replaces the overlay.
        assert!(board.toggle_compare(0, SensorKey::SawBladeRpm));
        assert_eq!(board.charts()[0].compare, Some(SensorKey::SawBladeRpm));

        assert!(board.toggle_compare(0, SensorKey::SawBladeRpm));
        assert_eq!(board.charts()[0].compare, None);
    }

    #[test]
    fn cannot_compare_with_itself() {
        let mut board = ChartBoard::default();
        assert!(!board.toggle_compare(0, SensorKey::HydraulicPressure));
        assert_eq!(board.charts()[0].compare, None);
        assert!(!board.toggle_compare(3, SensorKey::SawBladeRpm));
    }

    #[test]
    fn style_cycles() {
        let mut board = ChartBoard::default();
        board.cycle_style();
        assert_eq!(board.style, ChartStyle::Area);
        board.cycle_style();
        board.cycle_style();
        assert_eq!(board.style, ChartStyle::Line);
    }
}
