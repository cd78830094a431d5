use std::time::{Duration, Instant};

/// Frame pacer: sleeps away whatever remains of the frame budget.
pub struct Sleeper {
    target_delta_time: Duration,
    last_instant: Option<Instant>,
}

impl Sleeper {
    pub fn new(target_delta_time: Duration) -> Self {
        Self {
            target_delta_time,
            last_instant: None,
        }
    }

    /// Returns whether any sleeping was actually done.
    pub fn sleep(&mut self) -> bool {
        let slept = match self.last_instant {
            Some(last_instant) => {
                let delta_time = last_instant.elapsed();

                if delta_time < self.target_delta_time {
                    spin_sleep::sleep(self.target_delta_time - delta_time);
                    true
                } else {
                    false
                }
            }
            // Never slept yet, assume we're late.
            None => false,
        };

        self.last_instant = Some(Instant::now());
        slept
    }
}
