/// Events flowing through the main event loop. Ticks and input land on
/// one channel, so the session is only ever mutated one event at a time.
#[derive(Debug)]
pub enum AppEvent {
    /// Periodic tick from the pump while the stopwatch runs.
    Tick,
    /// Raw terminal input (keyboard/resize).
    Input(crossterm::event::Event),
}
