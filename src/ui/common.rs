//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, help overlay
//! and the fetch error screen.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, View};
use crate::data::duration::format_elapsed;

/// Render the header bar with the overall prediction.
///
/// Displays: prediction indicator, sensor counts by status, sample number.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let line = Line::from(vec![
            Span::styled(
                " HARVESTER WATCH ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let counts = data.status_counts();
    let severity = data.prediction.severity();

    let count_span = |count: usize, color| {
        if count > 0 {
            Span::styled(count.to_string(), Style::default().fg(color))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        }
    };

    let line = Line::from(vec![
        Span::styled(" ● ", app.theme.status_style(severity)),
        Span::styled("HARVESTER ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            data.prediction.message(),
            app.theme.status_style(severity),
        ),
        Span::raw(" │ "),
        Span::styled(
            counts.green.to_string(),
            Style::default().fg(app.theme.healthy),
        ),
        Span::raw(" ok "),
        count_span(counts.yellow, app.theme.warning),
        Span::raw(" warn "),
        count_span(counts.red, app.theme.critical),
        Span::raw(" crit │ "),
        Span::raw(format!("#{} at {}", data.sequence, data.time_label())),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Overview "), Line::from(" 2:Charts ")];

    let selected = match app.current_view {
        View::Overview => 0,
        View::Charts => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, time since last update, available controls.
/// Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if app.load_error.is_some() {
        " r:retry q:quit".to_string()
    } else if let Some(updated) = app.last_updated {
        let controls = match app.current_view {
            View::Overview => "↑↓:select a:chart Tab:switch r:refresh e:export ?:help q:quit",
            View::Charts => "↑↓:chart s:sensor a:add x:remove c:compare t:style ?:help q:quit",
        };
        format!(
            " {} | Updated {} ago | {}",
            app.source_description(),
            format_elapsed(updated.elapsed()),
            controls,
        )
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the fetch error screen in place of the dashboard.
pub fn render_error(frame: &mut Frame, app: &App, message: &str, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(app.theme.critical)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Readings are paused until the next successful fetch.",
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(""),
        Line::from("Press r to retry"),
    ];

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.critical));

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ Tab     Switch views"),
        Line::from("  1/2         Jump to view"),
        Line::from("  ↑/↓ j/k     Select sensor or chart"),
        Line::from(""),
        section(" Charts"),
        Line::from("  s         Cycle target sensor"),
        Line::from("  a         Add chart for sensor"),
        Line::from("  x         Remove selected chart"),
        Line::from("  c         Toggle comparison"),
        Line::from("  t         Cycle chart style"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Refresh now, or retry after an error"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 24u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
