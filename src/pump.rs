//! Periodic tick source: a worker thread that emits a tick at a fixed
//! interval while started, and blocks idle while stopped. The main loop
//! controls it over a command channel and owns cancellation.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::events::AppEvent;

enum PumpCommand {
    Start(u64),
    Stop,
    Quit,
}

/// Handle to the pump thread. `start`/`stop` are idempotent; `quit`
/// shuts the thread down and joins it.
pub struct Pump {
    cmd_tx: Sender<PumpCommand>,
    running: bool,
    handle: Option<JoinHandle<()>>,
}

impl Pump {
    pub fn spawn(event_tx: Sender<AppEvent>) -> Self {
        let (cmd_tx, cmd_rx) = unbounded();
        let handle = thread::spawn(move || pump_thread(cmd_rx, event_tx));
        Self {
            cmd_tx,
            running: false,
            handle: Some(handle),
        }
    }

    pub fn start(&mut self, interval_ms: u64) {
        if !self.running {
            self.running = true;
            self.cmd_tx.send(PumpCommand::Start(interval_ms)).ok();
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.cmd_tx.send(PumpCommand::Stop).ok();
        }
    }

    pub fn quit(&mut self) {
        self.cmd_tx.send(PumpCommand::Quit).ok();
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }
}

fn pump_thread(cmd_rx: Receiver<PumpCommand>, event_tx: Sender<AppEvent>) {
    let mut interval_ms = 10u64;
    let mut running = false;

    loop {
        // Sleep one interval when running, emitting a tick on timeout;
        // block-wait for the next command when stopped.
        let cmd = if running {
            match cmd_rx.recv_timeout(Duration::from_millis(interval_ms)) {
                Ok(cmd) => Some(cmd),
                Err(RecvTimeoutError::Timeout) => {
                    if event_tx.send(AppEvent::Tick).is_err() {
                        break;
                    }
                    None
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        } else {
            match cmd_rx.recv() {
                Ok(cmd) => Some(cmd),
                Err(_) => break,
            }
        };

        if let Some(cmd) = cmd {
            match cmd {
                PumpCommand::Start(ms) => {
                    interval_ms = if ms == 0 { 10 } else { ms };
                    running = true;
                }
                PumpCommand::Stop => running = false,
                PumpCommand::Quit => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pump_ticks_while_started() {
        let (tx, rx) = unbounded();
        let mut pump = Pump::spawn(tx);
        pump.start(5);
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(2)),
            Ok(AppEvent::Tick)
        ));
        pump.quit();
    }

    #[test]
    fn test_pump_silent_after_stop() {
        let (tx, rx) = unbounded();
        let mut pump = Pump::spawn(tx);
        pump.start(5);
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
        pump.stop();
        // Let the stop command land, then drain ticks that were already
        // in flight before asserting silence.
        thread::sleep(Duration::from_millis(100));
        while rx.try_recv().is_ok() {}
        thread::sleep(Duration::from_millis(100));
        assert!(rx.try_recv().is_err());
        pump.quit();
    }

    #[test]
    fn test_pump_quit_joins() {
        let (tx, _rx) = unbounded();
        let mut pump = Pump::spawn(tx);
        pump.start(5);
        pump.quit();
        assert!(pump.handle.is_none());
    }
}
