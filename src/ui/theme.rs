//! Dashboard colors, picked from the terminal background at startup.

use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{SensorConfig, StatusColor};

/// Palette shared by every view.
///
/// [`Theme::auto_detect()`] picks [`Theme::light()`] on bright terminals.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent for the active tab, chart titles and status messages.
    pub highlight: Color,
    /// Yellow band.
    pub warning: Color,
    /// Red band.
    pub critical: Color,
    /// Green band.
    pub healthy: Color,
    pub border: Color,
    /// Sensor table column headers.
    pub header: Style,
    /// Row under the sensor cursor.
    pub selected: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub border_type: BorderType,
}

impl Theme {
    /// Palette for dark backgrounds; also the fallback when detection fails.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Palette for bright backgrounds, with darker greens and oranges for contrast.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Rgb(0xE6, 0x51, 0x00),
            critical: Color::Red,
            healthy: Color::Rgb(0x1B, 0x5E, 0x20),
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Luma above 0.5 selects the light palette.
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn status_color(&self, status: StatusColor) -> Color {
        match status {
            StatusColor::Green => self.healthy,
            StatusColor::Yellow => self.warning,
            StatusColor::Red => self.critical,
        }
    }

    /// Red readings are also bolded.
    pub fn status_style(&self, status: StatusColor) -> Style {
        let style = Style::default().fg(self.status_color(status));
        match status {
            StatusColor::Red => style.add_modifier(Modifier::BOLD),
            _ => style,
        }
    }

    /// The sensor's own display color, falling back to the accent color.
    pub fn sensor_color(&self, config: &SensorConfig) -> Color {
        Color::from_str(config.color).unwrap_or(self.highlight)
    }
}
