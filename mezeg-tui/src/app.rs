//! Application state and event loop: catalog load at startup, combobox
//! input, and generation-counted weather lookups with last-selection-wins.

use std::{
    io,
    sync::{
        Arc,
        mpsc::{Receiver, Sender, channel},
    },
    time::Duration,
};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Position, Rect},
    widgets::ListState,
};

use mezeg_core::{
    CityCatalog, Config, Error, HistoryRecord, HistoryStore, WeatherClient, WeatherReading,
    WeatherSource,
};

use crate::combobox::{CitySearch, SelectionChange};
use crate::ui;

/// Completed fetches, reported back to the UI loop over a channel.
#[derive(Debug)]
pub(crate) enum FetchEvent {
    Catalog(Result<Vec<mezeg_core::Locality>, Error>),
    Weather { generation: u64, result: Result<WeatherReading, Error> },
}

#[derive(Debug)]
pub(crate) enum CatalogPhase {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
pub(crate) enum WeatherPhase {
    Idle,
    Loading { name: String },
    Ready(WeatherReading),
    Failed(String),
}

pub(crate) struct App {
    pub(crate) catalog: CatalogPhase,
    pub(crate) weather: WeatherPhase,
    pub(crate) search: Option<CitySearch>,
    pub(crate) dropdown_list: ListState,

    // Hit-test areas recorded at render time.
    pub(crate) search_area: Rect,
    pub(crate) dropdown_area: Option<Rect>,

    pub(crate) should_quit: bool,

    history: HistoryStore,
    source: Arc<dyn WeatherSource>,
    runtime: tokio::runtime::Handle,
    events_tx: Sender<FetchEvent>,

    /// Bumped on every selection change; a lookup result is applied only if
    /// it carries the current value, so a slow earlier request can never
    /// overwrite a newer selection's result.
    generation: u64,
    inflight: Option<tokio::task::JoinHandle<()>>,
}

impl App {
    pub(crate) fn new(
        history: HistoryStore,
        source: Arc<dyn WeatherSource>,
        runtime: tokio::runtime::Handle,
        events_tx: Sender<FetchEvent>,
    ) -> Self {
        Self {
            catalog: CatalogPhase::Loading,
            weather: WeatherPhase::Idle,
            search: None,
            dropdown_list: ListState::default(),
            search_area: Rect::default(),
            dropdown_area: None,
            should_quit: false,
            history,
            source,
            runtime,
            events_tx,
            generation: 0,
            inflight: None,
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return;
        }

        // Esc closes an open dropdown; when nothing is open it exits.
        let dropdown_open = self.search.as_ref().is_some_and(CitySearch::is_open);
        if key.code == KeyCode::Esc && !dropdown_open {
            self.should_quit = true;
            return;
        }

        // Control/alt chords are not query input.
        if matches!(key.code, KeyCode::Char(_))
            && key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return;
        }

        let change = match self.search.as_mut() {
            Some(search) => search.handle_key(key.code),
            None => None,
        };
        if let Some(change) = change {
            self.on_selection_change(change);
        }
    }

    pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return;
        }

        let pos = Position::new(mouse.column, mouse.row);
        let dropdown = self.dropdown_area;
        let search_box = self.search_area;
        let offset = self.dropdown_list.offset();

        let mut change = None;
        if let Some(search) = self.search.as_mut() {
            if let Some(area) = dropdown.filter(|a| a.contains(pos)) {
                // Rows start one line below the top border.
                let top = area.y + 1;
                let bottom = (area.y + area.height).saturating_sub(1);
                if mouse.row >= top && mouse.row < bottom {
                    let row = offset + usize::from(mouse.row - top);
                    change = search.click_row(row);
                }
            } else if search_box.contains(pos) {
                search.open_dropdown();
            } else {
                search.click_outside();
            }
        }

        if let Some(change) = change {
            self.on_selection_change(change);
        }
    }

    pub(crate) fn apply_fetch_event(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::Catalog(Ok(localities)) => {
                self.catalog = CatalogPhase::Ready;
                self.search = Some(CitySearch::new(localities));
            }
            FetchEvent::Catalog(Err(err)) if err.is_cancelled() => {}
            FetchEvent::Catalog(Err(err)) => {
                tracing::warn!(%err, "locality catalog load failed");
                self.catalog = CatalogPhase::Failed(err.to_string());
            }
            FetchEvent::Weather { generation, result } => {
                self.apply_lookup_result(generation, result);
            }
        }
    }

    fn on_selection_change(&mut self, change: SelectionChange) {
        match change {
            SelectionChange::Cleared => {
                self.abort_inflight();
                self.generation += 1;
                self.weather = WeatherPhase::Idle;
            }
            SelectionChange::Selected(name) => self.start_lookup(name),
        }
    }

    fn start_lookup(&mut self, canonical_name: String) {
        self.abort_inflight();
        self.generation += 1;
        let generation = self.generation;

        self.weather = WeatherPhase::Loading { name: canonical_name.clone() };

        let source = Arc::clone(&self.source);
        let tx = self.events_tx.clone();
        self.inflight = Some(self.runtime.spawn(async move {
            let result = source.current(&canonical_name).await;
            let _ = tx.send(FetchEvent::Weather { generation, result });
        }));
    }

    fn apply_lookup_result(&mut self, generation: u64, result: Result<WeatherReading, Error>) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "dropping stale lookup result");
            return;
        }
        self.inflight = None;

        match result {
            Ok(reading) => {
                let record = HistoryRecord {
                    timestamp: Local::now().to_rfc3339(),
                    city_name: reading.location_name.clone(),
                    country: reading.country.clone(),
                };
                if let Err(err) = self.history.append(record) {
                    tracing::warn!(%err, "failed to record lookup in history");
                }
                self.weather = WeatherPhase::Ready(reading);
            }
            Err(err) if err.is_cancelled() => {}
            Err(err) => {
                self.weather = WeatherPhase::Failed(err.to_string());
            }
        }
    }

    pub(crate) fn abort_inflight(&mut self) {
        if let Some(task) = self.inflight.take() {
            task.abort();
        }
    }
}

/// Entry point for the default (no subcommand) invocation.
pub(crate) async fn run_interactive() -> Result<()> {
    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "could not load config, continuing with defaults");
        Config::default()
    });
    let api_key = config.resolve_api_key();

    let source: Arc<dyn WeatherSource> = Arc::new(WeatherClient::new(api_key));
    let history = HistoryStore::open_default()?;
    let catalog = CityCatalog::new();

    let (tx, rx) = channel();
    let runtime = tokio::runtime::Handle::current();

    let catalog_tx = tx.clone();
    let catalog_task = runtime.spawn(async move {
        let result = catalog.load().await;
        let _ = catalog_tx.send(FetchEvent::Catalog(result));
    });

    let mut app = App::new(history, source, runtime, tx);
    let result = tokio::task::block_in_place(|| run_tui(&mut app, &rx));

    // Leaving the view cancels whatever is still in flight.
    catalog_task.abort();
    app.abort_inflight();

    result
}

fn run_tui(app: &mut App, events: &Receiver<FetchEvent>) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, app, events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &Receiver<FetchEvent>,
) -> Result<()> {
    loop {
        while let Ok(event) = events.try_recv() {
            app.apply_fetch_event(event);
        }

        terminal.draw(|f| ui::draw(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }
}
