use enertrack_core::{
    format_quantity, month_name, ChartData, EditorMode, ELECTRICITY_UNIT, GAS_UNIT,
    MONTH_ABBREVIATIONS,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};

use crate::tui::app::{App, InputMode};

const ELECTRICITY_COLOR: Color = Color::Rgb(0x42, 0x85, 0xf4);
const GAS_COLOR: Color = Color::Rgb(0x34, 0xa8, 0x53);

/// `#rrggbb` to a terminal color.
fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Color::Reset;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Reset,
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Content
            Constraint::Length(3), // Input / status
            Constraint::Length(1), // Help
        ])
        .split(size);

    let chart = app.tracker.chart();
    let border = Style::default().fg(hex_color(chart.colors.border));

    draw_header(f, app, main_chunks[0], border);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main_chunks[1]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(8)])
        .split(content_chunks[1]);

    draw_entries(f, app, content_chunks[0], border);
    draw_stats(f, app, right_chunks[0], border);
    draw_chart(f, &chart, right_chunks[1], border);
    draw_prompt(f, app, main_chunks[2], border);

    let help = match app.input_mode {
        InputMode::Normal => "←/→: Year | j/k: Select | a: Add | e: Edit | d: Delete | y: Add year | t: Theme | x: Export | i: Import | c: Clear | q: Quit",
        InputMode::Confirming(_) => "y: Confirm | any other key: Cancel",
        _ => "Enter: Submit | Esc: Cancel",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect, border: Style) {
    let mode = match app.tracker.editor_mode() {
        EditorMode::Create => String::new(),
        EditorMode::Edit { month } => format!("  editing {}", month_name(month)),
    };
    let title = Line::from(vec![
        Span::styled("ENERTRACK  ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(" < ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.tracker.current_year().to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(" > ", Style::default().fg(Color::DarkGray)),
        Span::styled(mode, Style::default().fg(Color::Yellow)),
    ]);

    let header = Paragraph::new(title)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border)
                .title_bottom(Line::from(format!(" {} ", app.tracker.theme())).right_aligned()),
        );
    f.render_widget(header, area);
}

fn draw_entries(f: &mut Frame, app: &mut App, area: Rect, border: Style) {
    let block = Block::default()
        .title(" Readings ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);

    let rows: Vec<Row> = app
        .entries()
        .iter()
        .map(|(month, reading)| {
            Row::new(vec![
                Span::styled(month_name(*month), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("{} kWh", reading.electricity), Style::default().fg(ELECTRICITY_COLOR)),
                Span::styled(format!("{} m³", reading.gas), Style::default().fg(GAS_COLOR)),
            ])
        })
        .collect();

    if rows.is_empty() {
        let empty = Paragraph::new("No entries for this year yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(10), // Month
            Constraint::Min(12),    // Electricity
            Constraint::Min(10),    // Gas
        ],
    )
    .header(Row::new(vec!["Month", "Electricity", "Gas"]).style(Style::default().fg(Color::Yellow)))
    .block(block)
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_stats(f: &mut Frame, app: &App, area: Rect, border: Style) {
    let stats = app.tracker.stats();
    let empty = stats.is_empty();
    let label = Style::default().fg(Color::DarkGray);

    let lines = vec![
        Line::from(vec![
            Span::styled("Total        ", label),
            Span::styled(
                format!("{:<18}", format_quantity(stats.total_electricity, ELECTRICITY_UNIT, empty)),
                Style::default().fg(ELECTRICITY_COLOR).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format_quantity(stats.total_gas, GAS_UNIT, empty),
                Style::default().fg(GAS_COLOR).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Avg / month  ", label),
            Span::styled(
                format!("{:<18}", format_quantity(stats.avg_electricity, ELECTRICITY_UNIT, empty)),
                Style::default().fg(ELECTRICITY_COLOR),
            ),
            Span::styled(format_quantity(stats.avg_gas, GAS_UNIT, empty), Style::default().fg(GAS_COLOR)),
        ]),
        Line::from(vec![
            Span::styled("Months       ", label),
            Span::raw(stats.months_recorded.to_string()),
        ]),
    ];

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(" Summary ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border),
    );
    f.render_widget(panel, area);
}

fn series_points(series: &[Option<f64>; 12]) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .filter_map(|(month, value)| value.map(|v| (month as f64, v)))
        .collect()
}

/// Y range with 10% headroom on both sides; zero always stays in view.
fn y_bounds(chart: &ChartData) -> [f64; 2] {
    let bottom = (chart.min_value() * 1.1).min(0.0);
    let top = (chart.max_value() * 1.1).max(bottom + 1.0);
    [bottom, top]
}

/// Rebuilt from scratch every frame.
fn draw_chart(f: &mut Frame, chart: &ChartData, area: Rect, border: Style) {
    let block = Block::default()
        .title(" Usage ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);

    if chart.is_empty() {
        f.render_widget(block, area);
        return;
    }

    let text = Style::default().fg(hex_color(chart.colors.text));
    let electricity = series_points(&chart.electricity);
    let gas = series_points(&chart.gas);

    let datasets = vec![
        Dataset::default()
            .name("Electricity (kWh)")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(ELECTRICITY_COLOR))
            .data(&electricity),
        Dataset::default()
            .name("Gas (m³)")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(GAS_COLOR))
            .data(&gas),
    ];

    let [bottom, top] = y_bounds(chart);
    let y_labels = vec![
        Span::styled(format!("{:.0}", bottom), text),
        Span::styled(format!("{:.0}", (bottom + top) / 2.0), text),
        Span::styled(format!("{:.0}", top), text),
    ];

    let widget = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(border)
                .bounds([0.0, 11.0])
                .labels(MONTH_ABBREVIATIONS.iter().map(|m| Span::styled(*m, text))),
        )
        .y_axis(Axis::default().style(border).bounds([bottom, top]).labels(y_labels));

    f.render_widget(widget, area);
}

fn draw_prompt(f: &mut Frame, app: &App, area: Rect, border: Style) {
    let (title, content, style) = if let Some(prompt) = app.confirm_prompt() {
        (" Confirm ", prompt, Style::default().fg(Color::Yellow))
    } else {
        match app.input_mode {
            InputMode::AddingEntry => (" Add reading: <month> <electricity> <gas> ", app.input.clone(), Style::default()),
            InputMode::EditingEntry => (" Update reading: <electricity> <gas> ", app.input.clone(), Style::default()),
            InputMode::AddingYear => (" Enter the year to add ", app.input.clone(), Style::default()),
            InputMode::ImportPath => (" Import file path ", app.input.clone(), Style::default()),
            _ => match &app.status {
                Some(status) if status.is_error => (" Error ", status.text.clone(), Style::default().fg(Color::Red)),
                Some(status) => (" Status ", status.text.clone(), Style::default().fg(Color::Green)),
                None => (" Status ", String::new(), Style::default()),
            },
        }
    };

    let editing = matches!(
        app.input_mode,
        InputMode::AddingEntry | InputMode::EditingEntry | InputMode::AddingYear | InputMode::ImportPath
    );

    let mut lines = vec![Line::from(Span::styled(content, style))];
    // Errors from a rejected submission are shown under the still-open input.
    if editing {
        if let Some(status) = app.status.as_ref().filter(|s| s.is_error) {
            lines = vec![Line::from(vec![
                Span::raw(app.input.clone()),
                Span::styled(format!("   {}", status.text), Style::default().fg(Color::Red)),
            ])];
        }
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border),
    );
    f.render_widget(widget, area);

    if editing {
        f.set_cursor_position((area.x + 1 + app.cursor_position as u16, area.y + 1));
    }
}
