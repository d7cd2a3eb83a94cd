//! Header, status bar and help overlay.

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::duration::format_elapsed;

const KEY_HINTS: &str = "↑↓:select Enter:copy IP i:edit r:refresh R:reload ?:help q:quit";
const INPUT_HINTS: &str = "Type address | Enter/Esc:done Ctrl-u:clear";

/// One-line overview: total attacks, attack types, flagged addresses, source.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (types, total, flagged) = {
        let page = app.page();
        let (types, total) = page
            .counters
            .as_ref()
            .map(|c| (c.len(), c.total()))
            .unwrap_or_default();
        (types, total, page.table.len())
    };

    let bold = Style::new().add_modifier(Modifier::BOLD);
    let indicator = if total > 0 {
        Style::new().fg(app.theme.severe).add_modifier(Modifier::BOLD)
    } else {
        Style::new().fg(app.theme.calm)
    };

    let line = Line::from(vec![
        Span::styled(" ● ", indicator),
        Span::styled("ATTACKWATCH", bold),
        Span::raw("  "),
        Span::styled(format_count(total), bold),
        Span::raw(format!(" attacks / {} types  ", types)),
        Span::styled(flagged.to_string(), Style::new().fg(app.theme.severe)),
        Span::raw(" flagged  "),
        Span::styled(
            app.source_description().to_string(),
            Style::new().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Compact count: 950, 1.2K, 3.4M.
pub fn format_count(n: u64) -> String {
    match n {
        1_000_000.. => format!("{:.1}M", n as f64 / 1e6),
        1_000.. => format!("{:.1}K", n as f64 / 1e3),
        _ => n.to_string(),
    }
}

/// Bottom line. A fresh status message wins; otherwise data age and key hints.
///
/// Poll failures never appear here. They only go to the log.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let message = Paragraph::new(format!(" {}", msg)).style(Style::new().fg(app.theme.accent));
        frame.render_widget(message, area);
        return;
    }

    let hints = if app.editing_input { INPUT_HINTS } else { KEY_HINTS };
    let age = match app.last_updated() {
        Some(at) => format!(
            "Updated {} ago, every {}",
            format_elapsed(at.elapsed()),
            format_elapsed(app.refresh_period())
        ),
        None => "Waiting for data...".to_string(),
    };

    let status = Paragraph::new(format!(" {} | {}", age, hints))
        .style(Style::new().add_modifier(Modifier::DIM));
    frame.render_widget(status, area);
}

fn help_section(title: &'static str, keys: &[(&'static str, &'static str)]) -> Vec<Line<'static>> {
    let mut lines = vec![Line::styled(
        format!(" {}", title),
        Style::new().add_modifier(Modifier::BOLD),
    )];
    lines.extend(
        keys.iter()
            .map(|(key, action)| Line::from(format!("  {:<12}{}", key, action))),
    );
    lines.push(Line::default());
    lines
}

/// Key reference drawn over the middle of the screen.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::styled("Keys", app.theme.column_header),
        Line::default(),
    ];
    lines.extend(help_section(
        "Malicious IPs",
        &[
            ("↑/↓ j/k", "Move selection"),
            ("PgUp/PgDn", "Move 10 rows"),
            ("Home/End", "First/last row"),
            ("Enter/click", "Copy IP to input"),
        ],
    ));
    lines.extend(help_section(
        "Mitigate",
        &[("i", "Edit ip_address"), ("Ctrl-u", "Clear while editing")],
    ));
    lines.extend(help_section(
        "Dashboard",
        &[
            ("r", "Poll now"),
            ("R", "Reload page"),
            ("e", "Export JSON"),
            ("q", "Quit"),
        ],
    ));
    lines.push(Line::styled(
        "Any key closes this",
        Style::new().add_modifier(Modifier::DIM),
    ));

    let height = lines.len() as u16 + 2;
    let [popup] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(40)])
        .flex(Flex::Center)
        .areas(popup);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::new().fg(app.theme.accent));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
