use std::{
    sync::{
        Arc, RwLock,
        mpsc::{self, Sender},
    },
    thread,
    time::Duration,
};

use crate::State;

/// Smallest interval the clock will accept, and the step size used when
/// adjusting it from the keyboard.
pub const INTERVAL_FLOOR_MS: u64 = 10;
pub const INTERVAL_STEP_MS: u64 = 10;

/// Background thread driving the simulation clock.
///
/// The interval and the pause flag live in the shared state so event
/// handlers can change them without talking to the thread; the thread
/// re-reads both every cycle. Exclusive access to the grid is guaranteed by
/// holding the write lock across the whole generation step.
pub struct TickerHost {
    stop_sender: Sender<()>,
}

impl TickerHost {
    pub fn start(state_arc: Arc<RwLock<State>>) -> Self {
        let (stop_sender, stop_receiver) = mpsc::channel();

        thread::spawn(move || {
            while stop_receiver.try_recv().is_err() {
                let interval = {
                    let mut state = state_arc.write().unwrap();
                    if !state.paused {
                        state.life.next_generation();
                    }
                    state.interval_ms
                };

                spin_sleep::sleep(Duration::from_millis(interval));
            }
        });

        Self { stop_sender }
    }

    pub fn stop(self) {
        self.stop_sender.send(()).ok();
    }
}

/// Step the interval by `step` milliseconds, rejecting anything that would
/// drop it within [`INTERVAL_STEP_MS`] of the floor. Returns the effective
/// interval.
pub fn adjust_interval(interval_ms: u64, step: i64) -> u64 {
    let next = interval_ms.saturating_add_signed(step);

    if next < INTERVAL_FLOOR_MS + INTERVAL_STEP_MS {
        interval_ms
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_steps_both_ways() {
        assert_eq!(adjust_interval(40, 10), 50);
        assert_eq!(adjust_interval(40, -10), 30);
    }

    #[test]
    fn interval_never_drops_below_the_floor() {
        assert_eq!(adjust_interval(20, -10), 20);
        assert_eq!(adjust_interval(25, -10), 25);
        assert_eq!(adjust_interval(30, -10), 20);
    }
}
