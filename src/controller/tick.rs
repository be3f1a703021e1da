/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::debug;
use std::time::Instant;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::Status;

// Tick delays relative to the configured precision: idle loops can wake
// half as often as the minimum, disabled loops far less.
const IDLE_DELAY_DIV: u64 = 2;
const DISABLED_DELAY_MUL: u64 = 5;
const HEARTBEAT_EVERY_UNITS: u64 = 10;

/**
 * Per-elevator time-stepping primitive.
 *
 * Tracks the wall-clock timestamp of the previous tick so each state
 * handler gets the real elapsed time since it last ran, independent of how long
 * the loop actually slept. The sleep itself is the control loop's select
 * timeout; the clock only decides how long that timeout should be and
 * keeps the elapsed-time accounting honest.
 */
pub struct TickClock {
    name: String,
    /// Minimum tick delay in milliseconds (one abstract time unit).
    precision: u64,
    last_tick: Option<Instant>,
    heartbeat_buffer: u64,
}

impl TickClock {
    pub fn new(name: &str, precision: u64) -> TickClock {
        TickClock {
            name: name.to_string(),
            precision: precision.max(1),
            last_tick: None,
            heartbeat_buffer: 0,
        }
    }

    /// Delay to sleep before the next tick, resolved from the per-status
    /// delay table. Throttles CPU in low-activity states without affecting
    /// the elapsed-time accounting.
    pub fn delay_for(&self, status: Status) -> u64 {
        match status {
            Status::Idle => (self.precision / IDLE_DELAY_DIV).max(1),
            Status::Disabled => self.precision * DISABLED_DELAY_MUL,
            _ => self.precision,
        }
    }

    /// Records one tick: returns the milliseconds elapsed since the
    /// previous tick (0 on the first call) and advances the heartbeat
    /// buffer by the time just slept.
    pub fn tick(&mut self, slept: u64) -> u64 {
        let now = Instant::now();
        let elapsed = match self.last_tick {
            Some(last) => now.duration_since(last).as_millis() as u64,
            None => 0,
        };
        self.last_tick = Some(now);

        self.heartbeat_buffer += slept;
        if self.heartbeat_buffer >= HEARTBEAT_EVERY_UNITS * self.precision {
            debug!("[{}] ticking...", self.name);
            self.heartbeat_buffer = 0;
        }

        elapsed
    }
}
