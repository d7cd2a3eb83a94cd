//! Dashboard view rendering.
//!
//! Lays out the page regions: attack counters and chart on the left, the
//! flagged IP table on the right, the mitigation input underneath.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::page::{ChartImage, CounterList};

/// Render every page region into `area`.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Min(6),    // Counters/chart + table
        Constraint::Length(3), // Mitigation input
    ])
    .split(area);

    let columns =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).split(rows[0]);

    let left = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[0]);

    render_counters(frame, app, left[0]);
    render_chart(frame, app, left[1]);
    render_table(frame, app, columns[1]);
    render_input(frame, app, rows[1]);
}

fn panel<'a>(title: &'a str, app: &App) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.frame))
}

/// The `.list-group` counter list: one row per attack type with a badge.
fn render_counters(frame: &mut Frame, app: &App, area: Rect) {
    let page = app.page();
    let Some(ref counters) = page.counters else {
        return;
    };

    let rows: Vec<Row> = counters
        .items()
        .iter()
        .map(|item| {
            Row::new(vec![
                Cell::from(item.label.clone()),
                Cell::from(Span::styled(format!(" {} ", item.badge()), app.theme.badge)),
            ])
        })
        .collect();

    let badge_width = counters
        .items()
        .iter()
        .map(|i| i.badge().len() as u16 + 2)
        .max()
        .unwrap_or(3);

    let title = format!(" Attack Types ({}) ", counters.len());
    let table = Table::new(rows, [Constraint::Fill(1), Constraint::Length(badge_width)])
        .block(panel(&title, app));

    frame.render_widget(table, area);
}

/// The chart region: bars drawn from the counters plus details of the
/// chart image the server sent.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let page = app.page();
    let Some(ref chart) = page.chart else {
        return;
    };

    let block = panel(" Attack Chart ", app);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

    if let Some(ref counters) = page.counters {
        frame.render_widget(bar_chart(counters, app), parts[0]);
    }

    let info = Paragraph::new(image_summary(chart))
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(info, parts[1]);
}

fn bar_chart<'a>(counters: &'a CounterList, app: &App) -> BarChart<'a> {
    let bars: Vec<Bar> = counters
        .items()
        .iter()
        .map(|item| {
            Bar::default()
                .label(Line::from(item.label.as_str()))
                .value(item.count)
                .style(Style::default().fg(app.theme.severe))
        })
        .collect();

    BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(3)
        .bar_gap(1)
        .max(counters.max_count().max(1))
}

/// One-line description of the chart image source.
pub fn image_summary(chart: &ChartImage) -> String {
    match (chart.payload(), chart.info()) {
        (_, Some(info)) => format!(
            "image: PNG {}x{}, {:.1} KB",
            info.width,
            info.height,
            info.bytes as f64 / 1024.0
        ),
        (Some(""), None) | (None, None) => "image: none".to_string(),
        (Some(payload), None) => format!("image: undecodable payload ({} chars)", payload.len()),
    }
}

/// The flagged IP table. Click handlers were bound at page load.
fn render_table(frame: &mut Frame, app: &mut App, area: Rect) {
    app.table_area = area;

    let (rows, count) = {
        let page = app.page();
        let rows: Vec<Row> = page
            .table
            .rows()
            .iter()
            .map(|row| {
                let cell = |i: usize| row.cells.get(i).cloned().unwrap_or_default();
                let threat = cell(1);
                let threat_style = app.theme.threat_style(&threat);
                Row::new(vec![
                    Cell::from(cell(0)),
                    Cell::from(threat).style(threat_style),
                    Cell::from(cell(2)),
                    Cell::from(cell(3)),
                ])
            })
            .collect();
        (rows, page.table.len())
    };

    let header = Row::new(vec!["IP Address", "Threat", "First Detected", "Attack Type"])
        .height(1)
        .style(app.theme.column_header);

    let widths = [
        Constraint::Fill(2),
        Constraint::Length(8),
        Constraint::Fill(2),
        Constraint::Fill(2),
    ];

    let selected = app.selected_row.min(count.saturating_sub(1));
    let position_info = if count > 0 {
        format!(" [{}/{}]", selected + 1, count)
    } else {
        String::new()
    };
    let title = format!(" Malicious IPs ({}){} ", count, position_info);

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(&title, app))
        .row_highlight_style(app.theme.row_selected)
        .highlight_symbol("▶ ");

    app.table_state.select(if count > 0 { Some(selected) } else { None });
    frame.render_stateful_widget(table, area, &mut app.table_state);
}

/// The `ip_address` input field.
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let page = app.page();
    let Some(ref input) = page.ip_input else {
        return;
    };

    let (text, style) = if app.editing_input {
        (format!("{}_", input.value), app.theme.input_active)
    } else if input.value.is_empty() {
        (
            "Select a row and press Enter to copy its IP".to_string(),
            Style::default().add_modifier(Modifier::DIM),
        )
    } else {
        (input.value.clone(), Style::default())
    };

    let title = format!(" Mitigate: {} ", input.id);
    let paragraph = Paragraph::new(text).style(style).block(panel(&title, app));
    frame.render_widget(paragraph, area);
}
