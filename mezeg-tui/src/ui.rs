//! Rendering for the interactive lookup screen.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::{App, CatalogPhase, WeatherPhase};

const DROPDOWN_ROWS: u16 = 10;

pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // search input
            Constraint::Min(0),    // weather panel
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    render_header(f, chunks[0]);
    render_search(f, app, chunks[1]);
    render_weather(f, app, chunks[2]);
    render_status(f, app, chunks[3]);

    // The dropdown overlays the weather panel, so it is drawn last.
    render_dropdown(f, app, chunks[1]);
}

fn render_header(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled("mezeg", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" — current weather for Israeli localities"),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, area);
}

fn render_search(f: &mut Frame, app: &mut App, area: Rect) {
    app.search_area = area;

    let block = Block::default().borders(Borders::ALL).title(" Locality ");

    let content: Line = match (&app.catalog, &app.search) {
        (CatalogPhase::Loading, _) => Line::from(Span::styled(
            "Loading localities...",
            Style::default().fg(Color::DarkGray),
        )),
        (CatalogPhase::Failed(msg), _) => Line::from(Span::styled(
            format!("Error: {msg}"),
            Style::default().fg(Color::Red),
        )),
        (CatalogPhase::Ready, Some(search)) if search.query().is_empty() => Line::from(
            Span::styled("Search locality...", Style::default().fg(Color::DarkGray)),
        ),
        (CatalogPhase::Ready, Some(search)) => Line::from(Span::raw(search.query().to_string())),
        (CatalogPhase::Ready, None) => Line::default(),
    };

    let inner = block.inner(area);
    f.render_widget(Paragraph::new(content).block(block), area);

    if let (CatalogPhase::Ready, Some(search)) = (&app.catalog, &app.search) {
        let cursor_x = inner.x + search.query().chars().count() as u16;
        if cursor_x < inner.x + inner.width {
            f.set_cursor_position(Position::new(cursor_x, inner.y));
        }
    }
}

fn render_dropdown(f: &mut Frame, app: &mut App, search_area: Rect) {
    app.dropdown_area = None;

    let Some(search) = &app.search else { return };
    if !search.is_open() {
        return;
    }

    // Keep one line for the status bar.
    let below = f.area().height.saturating_sub(search_area.y + search_area.height + 1);
    if below < 3 {
        return;
    }

    if search.match_count() == 0 {
        if search.query().is_empty() {
            return;
        }
        let area = Rect {
            x: search_area.x,
            y: search_area.y + search_area.height,
            width: search_area.width,
            height: 3,
        }
        .intersection(f.area());

        f.render_widget(Clear, area);
        let notice = Paragraph::new(Span::styled(
            format!("No localities match \"{}\"", search.query()),
            Style::default().fg(Color::DarkGray),
        ))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(notice, area);
        app.dropdown_area = Some(area);
        return;
    }

    let rows = (search.match_count() as u16).min(DROPDOWN_ROWS);
    let area = Rect {
        x: search_area.x,
        y: search_area.y + search_area.height,
        width: search_area.width,
        height: (rows + 2).min(below),
    }
    .intersection(f.area());

    let items = search
        .matches()
        .map(|locality| ListItem::new(locality.native_name.clone()));

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    app.dropdown_list.select(search.highlight());

    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut app.dropdown_list);
    app.dropdown_area = Some(area);
}

fn render_weather(f: &mut Frame, app: &App, area: Rect) {
    match &app.weather {
        WeatherPhase::Idle => {
            let hint = Paragraph::new(Span::styled(
                "Select a locality above to get started",
                Style::default().fg(Color::DarkGray),
            ));
            f.render_widget(hint, area);
        }
        WeatherPhase::Loading { name } => {
            let notice = Paragraph::new(format!("Fetching weather for {name}..."));
            f.render_widget(notice, area);
        }
        WeatherPhase::Failed(msg) => {
            let error = Paragraph::new(Span::styled(
                format!("Error: {msg}"),
                Style::default().fg(Color::Red),
            ))
            .block(Block::default().borders(Borders::ALL).title(" Weather "));
            f.render_widget(error, area);
        }
        WeatherPhase::Ready(reading) => {
            let lines = vec![
                Line::from(Span::styled(
                    format!("{}, {}", reading.location_name, reading.country),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(reading.condition_text.clone()),
                Line::from(Span::styled(
                    format!("{:.1} °C", reading.temperature_c),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("Wind {:.1} kph", reading.wind_kph)),
                Line::from(Span::styled(
                    reading.condition_icon_url.clone(),
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let card = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title(" Weather "));
            f.render_widget(card, area);
        }
    }
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let mut text = String::from(" ↑/↓ navigate · Enter select · Esc close/quit");

    if let Some(search) = &app.search {
        if search.is_open() {
            let shown = search.match_count();
            let total = search.total_match_count();
            if total > shown {
                text.push_str(&format!(" · {shown} of {total} matches"));
            } else {
                text.push_str(&format!(" · {total} matches"));
            }
        } else if let Some(selection) = search.selection() {
            text.push_str(&format!(" · {selection}"));
        }
    }

    let bar = Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray)));
    f.render_widget(bar, area);
}
