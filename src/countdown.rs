//! Auto-advance countdown shown after a verse finishes playing.
//!
//! The timer runs as a spawned task that reports ticks over a channel. Each
//! countdown carries an id and a cancellation token; only events for the
//! active id are honoured, so a replaced or cancelled timer never advances.

use log::{debug, info};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Tick { id: u64, remaining: u32 },
    Elapsed { id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    /// Remaining seconds changed
    Remaining(u32),
    /// Time is up: move to the next verse
    Advance,
}

struct Active {
    id: u64,
    remaining: u32,
    token: CancellationToken,
}

const MIN_TICK: Duration = Duration::from_millis(1);

pub struct AutoAdvance {
    seconds: u32,
    tick: Duration,
    next_id: u64,
    active: Option<Active>,
}

impl AutoAdvance {
    pub fn new(seconds: u32) -> Self {
        Self::with_tick(seconds, Duration::from_secs(1))
    }

    /// `tick` is floored at 1 ms; `tokio::time::interval` rejects zero.
    pub fn with_tick(seconds: u32, tick: Duration) -> Self {
        Self {
            seconds: seconds.max(1),
            tick: tick.max(MIN_TICK),
            next_id: 0,
            active: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn remaining(&self) -> Option<u32> {
        self.active.as_ref().map(|a| a.remaining)
    }

    /// Arms a new countdown, superseding any running one. Must be called
    /// from within a tokio runtime.
    pub fn start<E>(&mut self, events: UnboundedSender<E>) -> u64
    where
        E: From<CountdownEvent> + Send + 'static,
    {
        self.stop();
        self.next_id += 1;
        let id = self.next_id;
        let token = CancellationToken::new();
        let seconds = self.seconds;
        let tick = self.tick;

        let child = token.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.tick().await;
            let mut remaining = seconds;
            loop {
                tokio::select! {
                    _ = child.cancelled() => {
                        debug!("Countdown {} cancelled", id);
                        return;
                    }
                    _ = interval.tick() => {
                        remaining -= 1;
                        let event = if remaining == 0 {
                            CountdownEvent::Elapsed { id }
                        } else {
                            CountdownEvent::Tick { id, remaining }
                        };
                        if events.send(event.into()).is_err() || remaining == 0 {
                            return;
                        }
                    }
                }
            }
        });

        info!("Next verse in {} seconds", seconds);
        self.active = Some(Active {
            id,
            remaining: seconds,
            token,
        });
        id
    }

    /// Dismisses the prompt; returns whether a countdown was running.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.stop();
        if was_active {
            info!("Auto-advance cancelled");
        }
        was_active
    }

    /// Skips the wait; returns `true` if the caller should advance now.
    pub fn confirm(&mut self) -> bool {
        self.stop()
    }

    /// Applies a timer event, ignoring those from superseded countdowns.
    pub fn accept(&mut self, event: CountdownEvent) -> Option<CountdownOutcome> {
        let active_id = self.active.as_ref()?.id;
        match event {
            CountdownEvent::Tick { id, remaining } if id == active_id => {
                if let Some(active) = self.active.as_mut() {
                    active.remaining = remaining;
                }
                Some(CountdownOutcome::Remaining(remaining))
            }
            CountdownEvent::Elapsed { id } if id == active_id => {
                self.active = None;
                Some(CountdownOutcome::Advance)
            }
            stale => {
                debug!("Ignoring stale countdown event {:?}", stale);
                None
            }
        }
    }

    fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                active.token.cancel();
                true
            }
            None => false,
        }
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn counts_down_to_advance() {
        let (tx, mut rx) = mpsc::unbounded_channel::<CountdownEvent>();
        let mut countdown = AutoAdvance::new(3);
        let id = countdown.start(tx);
        assert_eq!(countdown.remaining(), Some(3));

        let mut outcomes = Vec::new();
        while let Some(event) = rx.recv().await {
            if let Some(outcome) = countdown.accept(event) {
                outcomes.push(outcome);
            }
            if !countdown.is_active() {
                break;
            }
        }

        assert_eq!(
            outcomes,
            vec![
                CountdownOutcome::Remaining(2),
                CountdownOutcome::Remaining(1),
                CountdownOutcome::Advance
            ]
        );
        assert_eq!(id, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_tick_still_counts_down() {
        let (tx, mut rx) = mpsc::unbounded_channel::<CountdownEvent>();
        let mut countdown = AutoAdvance::with_tick(2, Duration::ZERO);
        countdown.start(tx);

        let mut advanced = false;
        while let Some(event) = rx.recv().await {
            if countdown.accept(event) == Some(CountdownOutcome::Advance) {
                advanced = true;
                break;
            }
        }
        assert!(advanced);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_countdown_never_advances() {
        let (tx, mut rx) = mpsc::unbounded_channel::<CountdownEvent>();
        let mut countdown = AutoAdvance::new(3);
        countdown.start(tx);
        assert!(countdown.cancel());
        assert!(!countdown.cancel());

        tokio::time::sleep(Duration::from_secs(5)).await;
        // The task exits on cancellation and drops its sender.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_supersedes_previous_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel::<CountdownEvent>();
        let mut countdown = AutoAdvance::new(2);
        let first = countdown.start(tx.clone());
        let second = countdown.start(tx);
        assert_ne!(first, second);

        // A late event from the first timer must not count.
        assert_eq!(countdown.accept(CountdownEvent::Elapsed { id: first }), None);
        assert!(countdown.is_active());

        let mut advances = 0;
        while let Some(event) = rx.recv().await {
            if countdown.accept(event) == Some(CountdownOutcome::Advance) {
                advances += 1;
            }
            if !countdown.is_active() {
                break;
            }
        }
        assert_eq!(advances, 1);
    }

    #[tokio::test]
    async fn confirm_advances_immediately() {
        let (tx, _rx) = mpsc::unbounded_channel::<CountdownEvent>();
        let mut countdown = AutoAdvance::new(3);
        assert!(!countdown.confirm());
        countdown.start(tx);
        assert!(countdown.confirm());
        assert!(!countdown.is_active());
    }
}
