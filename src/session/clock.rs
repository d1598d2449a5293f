use chess::Color;

/// What a single one-second tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No side was running; nothing changed.
    Idle,
    /// The running side lost a second and still has time.
    Counted { side: Color, remaining: u64 },
    /// The running side just reached zero. The clock is now stopped.
    Expired(Color),
}

/// Per-side countdown in whole seconds.
///
/// The clock only keeps state; the one-second cadence is driven by whoever
/// owns it calling [`Clock::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    white_secs: u64,
    black_secs: u64,
    running: Option<Color>,
}

impl Clock {
    pub fn new(start_secs: u64) -> Self {
        Clock {
            white_secs: start_secs,
            black_secs: start_secs,
            running: None,
        }
    }

    /// Run `side`'s clock. Any other running side is stopped first.
    pub fn start(&mut self, side: Color) {
        self.stop();
        self.running = Some(side);
    }

    pub fn stop(&mut self) {
        self.running = None;
    }

    pub fn remaining(&self, side: Color) -> u64 {
        match side {
            Color::White => self.white_secs,
            Color::Black => self.black_secs,
        }
    }

    pub fn running(&self) -> Option<Color> {
        self.running
    }

    /// Restore both sides to `start_secs` and stop.
    pub fn reset(&mut self, start_secs: u64) {
        *self = Clock::new(start_secs);
    }

    /// Count down one second for the running side.
    ///
    /// Decrement and expiry check happen together: the tick that reaches zero
    /// reports `Expired` and stops the clock so no later tick decrements again.
    pub fn tick(&mut self) -> Tick {
        let side = match self.running {
            Some(side) => side,
            None => return Tick::Idle,
        };
        let secs = match side {
            Color::White => &mut self.white_secs,
            Color::Black => &mut self.black_secs,
        };
        *secs = secs.saturating_sub(1);
        let remaining = *secs;
        if remaining == 0 {
            self.running = None;
            Tick::Expired(side)
        } else {
            Tick::Counted { side, remaining }
        }
    }
}
