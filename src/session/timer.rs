use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{log::EntryLog, utils::clock::Clock};

use super::{elapsed_display, IDLE_DISPLAY};

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

struct Ticker {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

/// Keeps the elapsed-time display of the open session current. At most one ticker task runs at
/// a time; subscribers read the display through a watch channel.
pub struct SessionTimer {
    clock: Arc<dyn Clock>,
    display: Arc<watch::Sender<String>>,
    ticker: Option<Ticker>,
}

impl SessionTimer {
    pub fn new(clock: impl Clock) -> Self {
        let (display, _) = watch::channel(IDLE_DISPLAY.to_string());
        Self {
            clock: Arc::new(clock),
            display: Arc::new(display),
            ticker: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display.subscribe()
    }

    pub fn display(&self) -> String {
        self.display.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.ticker
            .as_ref()
            .is_some_and(|v| !v.handle.is_finished())
    }

    /// Starts ticking for the open session of `log`, cancelling any previous ticker first.
    /// Returns false, leaving the display at zero, when no session is open. Must be called from
    /// within a tokio runtime.
    pub fn start(&mut self, log: &EntryLog) -> bool {
        self.reset();
        let Some(open) = log.open_session() else {
            debug!("No session in progress, timer stays idle");
            return false;
        };

        let start = open.start();
        self.display
            .send_replace(elapsed_display(start, self.clock.time()));

        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(tick(
            start,
            self.clock.clone(),
            self.display.clone(),
            shutdown.clone(),
        ));
        info!("Started session timer for session begun at {start}");
        self.ticker = Some(Ticker { shutdown, handle });
        true
    }

    /// Stops the ticker, if any, and shows zero.
    pub fn reset(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.shutdown.cancel();
            debug!("Cancelled session timer");
        }
        self.display.send_replace(IDLE_DISPLAY.to_string());
    }

    /// Same as [SessionTimer::start]; used after the log was replaced or re-read.
    pub fn reload(&mut self, log: &EntryLog) -> bool {
        self.start(log)
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.shutdown.cancel();
        }
    }
}

async fn tick(
    start: DateTime<Utc>,
    clock: Arc<dyn Clock>,
    display: Arc<watch::Sender<String>>,
    shutdown: CancellationToken,
) {
    let mut tick_point = clock.instant();
    loop {
        tick_point += TICK_INTERVAL;
        tokio::select! {
            _ = shutdown.cancelled() => {
                return
            }
            _ = clock.sleep_until(tick_point) => ()
        }
        display.send_replace(elapsed_display(start, clock.time()));
    }
}
