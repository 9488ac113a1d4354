mod events;
mod pump;
mod ui;

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};

use lapwatch_core::TimerSession;

use crate::events::AppEvent;
use crate::pump::Pump;

/// Update period for the live display while running.
const TICK_INTERVAL_MS: u64 = 10;
/// How long the startup shortcut hint stays up before auto-dismissing.
const HINT_TIMEOUT: Duration = Duration::from_secs(10);

struct App {
    session: TimerSession,
    pump: Pump,
    started_at: Instant,
    hint_visible: bool,
    hint_deadline: Option<Instant>,
    running: bool,
}

impl App {
    fn new(pump: Pump) -> Self {
        Self {
            session: TimerSession::new(),
            pump,
            started_at: Instant::now(),
            hint_visible: true,
            hint_deadline: Some(Instant::now() + HINT_TIMEOUT),
            running: true,
        }
    }

    fn now_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => {
                let now = self.now_ms();
                self.session.tick(now);
            }
            AppEvent::Input(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                self.handle_key(key);
            }
            AppEvent::Input(_) => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        // If the shortcut hint is showing, any key dismisses it
        if self.hint_visible {
            self.dismiss_hint();
            return;
        }

        match key.code {
            KeyCode::Char(' ') => self.toggle(),
            KeyCode::Char('l') => self.lap(),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('?') => {
                self.hint_visible = true;
                self.hint_deadline = None;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            _ => {}
        }
    }

    fn toggle(&mut self) {
        if self.session.is_running() {
            self.session.stop();
            self.pump.stop();
            log::debug!("stopped at {} ms", self.session.elapsed_ms());
        } else {
            let now = self.now_ms();
            self.session.start(now);
            self.pump.start(TICK_INTERVAL_MS);
            log::debug!("started (elapsed {} ms)", self.session.elapsed_ms());
        }
    }

    fn lap(&mut self) {
        if let Some(lap) = self.session.record_lap() {
            log::debug!(
                "lap #{}: total {} ms, split {} ms",
                lap.number,
                lap.total_ms,
                lap.split_ms
            );
        }
    }

    fn reset(&mut self) {
        self.session.reset();
        self.pump.stop();
        log::debug!("reset");
    }

    fn dismiss_hint(&mut self) {
        self.hint_visible = false;
        self.hint_deadline = None;
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &Receiver<AppEvent>,
) -> io::Result<()> {
    while app.running {
        terminal.draw(|frame| ui::draw(frame, &app.session, app.hint_visible))?;

        // While the startup hint is up, wake at its deadline so it
        // auto-dismisses without any tick traffic; otherwise block until
        // the next tick or key.
        let event = match app.hint_deadline {
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match event_rx.recv_timeout(wait) {
                    Ok(ev) => Some(ev),
                    Err(RecvTimeoutError::Timeout) => {
                        app.dismiss_hint();
                        None
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match event_rx.recv() {
                Ok(ev) => Some(ev),
                Err(_) => break,
            },
        };

        if let Some(event) = event {
            app.handle_event(event);
        }
    }
    Ok(())
}

fn input_thread(event_tx: Sender<AppEvent>) {
    loop {
        match event::read() {
            Ok(ev) => {
                if event_tx.send(AppEvent::Input(ev)).is_err() {
                    break;
                }
            }
            Err(e) => {
                log::error!("input read failed: {}", e);
                break;
            }
        }
    }
}

/// Optional capability registration: ask the terminal for disambiguated
/// key codes where supported. Fire-and-forget; failure is logged and the
/// stopwatch carries on without it.
fn register_keyboard_enhancement(stdout: &mut io::Stdout) -> bool {
    match terminal::supports_keyboard_enhancement() {
        Ok(true) => match execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        ) {
            Ok(()) => {
                log::info!("keyboard enhancement registered");
                true
            }
            Err(e) => {
                log::warn!("keyboard enhancement registration failed: {}", e);
                false
            }
        },
        Ok(false) => {
            log::info!("keyboard enhancement not supported");
            false
        }
        Err(e) => {
            log::warn!("keyboard enhancement query failed: {}", e);
            false
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("lapwatch starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let enhanced = register_keyboard_enhancement(&mut stdout);
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (event_tx, event_rx) = unbounded();
    let pump = Pump::spawn(event_tx.clone());
    thread::spawn(move || input_thread(event_tx));

    let mut app = App::new(pump);
    let result = run_app(&mut terminal, &mut app, &event_rx);

    // Clean up
    app.pump.quit();
    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags).ok();
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}
