//! Color palettes.
//!
//! Threat levels reported by the server map onto three severity colors. The
//! palette is picked from the terminal background at startup.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

/// Palette used by every panel.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Titles, status messages, the help frame.
    pub accent: Color,
    /// `high`/`critical` threats, attack bars, the live indicator.
    pub severe: Color,
    /// `medium` threats.
    pub elevated: Color,
    /// `low` threats and the idle indicator.
    pub calm: Color,
    pub frame: Color,
    pub column_header: Style,
    pub row_selected: Style,
    /// Count badges next to attack types.
    pub badge: Style,
    /// The `ip_address` input while typing.
    pub input_active: Style,
    pub border_type: BorderType,
}

impl Theme {
    pub fn dark() -> Self {
        let accent = Color::Cyan;
        Self {
            accent,
            severe: Color::LightRed,
            elevated: Color::Yellow,
            calm: Color::Green,
            frame: Color::Gray,
            column_header: Style::new().fg(accent).add_modifier(Modifier::BOLD),
            row_selected: Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            badge: Style::new().fg(Color::Black).bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            input_active: Style::new().fg(accent).add_modifier(Modifier::UNDERLINED),
            border_type: BorderType::Rounded,
        }
    }

    pub fn light() -> Self {
        let accent = Color::Blue;
        Self {
            accent,
            severe: Color::Red,
            elevated: Color::Magenta,
            calm: Color::Green,
            frame: Color::DarkGray,
            column_header: Style::new().fg(accent).add_modifier(Modifier::BOLD),
            row_selected: Style::new().bg(Color::Gray).add_modifier(Modifier::BOLD),
            badge: Style::new().fg(Color::White).bg(Color::Blue).add_modifier(Modifier::BOLD),
            input_active: Style::new().fg(accent).add_modifier(Modifier::UNDERLINED),
            border_type: BorderType::Plain,
        }
    }

    /// Light palette on bright backgrounds, dark otherwise or when the
    /// terminal does not answer.
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a threat level as reported by the server ("high", ...).
    pub fn threat_style(&self, level: &str) -> Style {
        match level.to_ascii_lowercase().as_str() {
            "high" | "critical" => Style::new().fg(self.severe).add_modifier(Modifier::BOLD),
            "medium" => Style::new().fg(self.elevated),
            "low" => Style::new().fg(self.calm),
            _ => Style::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threat_style() {
        let theme = Theme::dark();
        assert_eq!(theme.threat_style("HIGH").fg, Some(Color::LightRed));
        assert_eq!(theme.threat_style("critical").fg, Some(Color::LightRed));
        assert_eq!(theme.threat_style("medium").fg, Some(Color::Yellow));
        assert_eq!(theme.threat_style("low").fg, Some(Color::Green));
        assert_eq!(theme.threat_style("unknown"), Style::new());
    }
}
