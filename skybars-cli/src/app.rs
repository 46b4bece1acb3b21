use std::{
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use skybars_core::{
    ClockLabels, DisplayModel, Observation, RequestTicket, Surface, TemperatureScale,
    WeatherError, WeatherProvider,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::ui;

/// A finished fetch, tagged with the ticket it was issued under.
#[derive(Debug)]
struct Fetched {
    ticket: RequestTicket,
    result: Result<Observation, WeatherError>,
}

/// Owner of all widget state. Fetch tasks only talk back through the channel.
pub struct App {
    model: DisplayModel,
    city_field: String,
    running: bool,
    surface: Surface,
    last_request: Instant,
    provider: Arc<dyn WeatherProvider>,
    tx: mpsc::UnboundedSender<Fetched>,
    rx: mpsc::UnboundedReceiver<Fetched>,
}

impl App {
    pub fn new(provider: Arc<dyn WeatherProvider>, scale: TemperatureScale) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            model: DisplayModel::new(scale),
            city_field: String::new(),
            running: false,
            surface: Surface::default(),
            last_request: Instant::now(),
            provider,
            tx,
            rx,
        }
    }

    pub fn model(&self) -> &DisplayModel {
        &self.model
    }

    pub fn city_field(&self) -> &str {
        &self.city_field
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Issue a fetch for `city`. Earlier in-flight fetches keep running but
    /// their results will be dropped as stale.
    pub fn request(&mut self, city: &str) -> RequestTicket {
        let ticket = self.model.begin_request(city);
        self.last_request = Instant::now();
        debug!(city, ticket = ticket.seq(), "Issuing weather request");

        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let city = city.to_string();
        tokio::spawn(async move {
            let result = provider.fetch_observation(&city).await;
            // Receiver gone means the loop has exited.
            let _ = tx.send(Fetched { ticket, result });
        });

        ticket
    }

    /// Re-request the current city once `every` has passed since the last
    /// request. Any request, typed or automatic, restarts the interval.
    pub fn tick(&mut self, now: Instant, every: Option<Duration>) -> Option<RequestTicket> {
        let every = every?;
        if now.saturating_duration_since(self.last_request) < every {
            return None;
        }

        let city = self.model.city()?.to_owned();
        info!(city, "Refreshing");
        Some(self.request(&city))
    }

    /// Apply every result that has arrived since the last frame.
    pub fn drain_results(&mut self) {
        while let Ok(fetched) = self.rx.try_recv() {
            self.model.apply(fetched.ticket, fetched.result);
        }
    }

    /// Wait for the next result and apply it.
    #[cfg(test)]
    pub async fn next_result(&mut self) -> Option<skybars_core::Applied> {
        let fetched = self.rx.recv().await?;
        Some(self.model.apply(fetched.ticket, fetched.result))
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Esc => self.stop(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.stop(),
            KeyCode::Tab => {
                let scale = self.model.toggle_scale();
                info!(%scale, "Scale changed");
            }
            KeyCode::Enter => {
                let city = self.city_field.trim().to_string();
                self.city_field.clear();
                if !city.is_empty() {
                    self.request(&city);
                }
            }
            KeyCode::Backspace => {
                self.city_field.pop();
            }
            KeyCode::Char(c) => self.city_field.push(c),
            _ => {}
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}

/// Loop timing.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub frame: Duration,
    pub refresh: Option<Duration>,
}

/// Where the loop reads key presses from.
pub trait KeySource {
    /// Next pending key press, without blocking.
    fn next_key(&mut self) -> io::Result<Option<KeyEvent>>;
}

/// Keys typed into the real terminal.
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> io::Result<Option<KeyEvent>> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }
}

/// Raw mode and the alternate screen, undone on drop.
struct RawScreen;

impl RawScreen {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let screen = RawScreen;
        execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
        Ok(screen)
    }
}

impl Drop for RawScreen {
    fn drop(&mut self) {
        // Each step runs even if an earlier one failed.
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

/// Take over the terminal, run the loop, and restore the terminal on every
/// exit path.
pub async fn run_in_terminal(mut app: App, city: &str, pacing: Pacing) -> Result<()> {
    let _screen = RawScreen::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    run(&mut terminal, &mut app, &mut TerminalKeys, city, pacing).await
}

/// One repaint per frame while running; fetch results are folded in at
/// the start of each frame.
pub async fn run<B: Backend, K: KeySource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    keys: &mut K,
    city: &str,
    pacing: Pacing,
) -> Result<()> {
    app.running = true;
    app.request(city);

    let mut ticker = tokio::time::interval(pacing.frame);

    while app.is_running() {
        ticker.tick().await;

        app.drain_results();

        let clock = ClockLabels::at(Utc::now(), *Local::now().offset(), app.model.zone());
        terminal.draw(|frame| ui::draw(frame, app, &clock))?;

        while let Some(key) = keys.next_key()? {
            app.handle_key(key);
        }

        app.tick(Instant::now(), pacing.refresh);
    }

    info!("Stopped");
    Ok(())
}
