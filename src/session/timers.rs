//! Tick-driven session timers. Every timer is advanced by the main loop's
//! delta time and reports expiry as a typed event consumed at a single
//! dispatch point in `session::game`. Expiry events carry the session
//! generation they were armed under so stale callbacks become no-ops, and
//! every stop is idempotent.

pub const ANSWER_WINDOW_SECS: f64 = 5.0;
pub const PRACTICE_MEMORIZE_SECS: f64 = 2.0;

const EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimerEvent {
    AnswerTimeUp { generation: u64 },
    MemorizeDone { generation: u64 },
    ClockExpired,
}

/// Countdown over the per-word answer window (Echo / Memory / Meaning
/// Match, Challenge style).
#[derive(Clone, Debug)]
pub struct AnswerTimer {
    remaining: f64,
    running: bool,
    generation: u64,
}

impl AnswerTimer {
    pub fn new() -> Self {
        Self {
            remaining: ANSWER_WINDOW_SECS,
            running: false,
            generation: 0,
        }
    }

    pub fn start(&mut self, secs: f64, generation: u64) {
        self.remaining = secs;
        self.running = true;
        self.generation = generation;
    }

    /// Safe to call any number of times, armed or not.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> f64 {
        self.remaining.max(0.0)
    }

    pub fn tick(&mut self, dt: f64) -> Option<TimerEvent> {
        if !self.running {
            return None;
        }
        self.remaining -= dt;
        if self.remaining <= EPSILON {
            self.remaining = 0.0;
            self.running = false;
            return Some(TimerEvent::AnswerTimeUp {
                generation: self.generation,
            });
        }
        None
    }
}

impl Default for AnswerTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Memory mode's display timer. Not user-cancelable; it is only cleared
/// when the word list itself is replaced or the session resets.
#[derive(Clone, Debug)]
pub struct MemorizeTimer {
    remaining: f64,
    running: bool,
    generation: u64,
}

impl MemorizeTimer {
    pub fn new() -> Self {
        Self {
            remaining: 0.0,
            running: false,
            generation: 0,
        }
    }

    pub fn start(&mut self, secs: f64, generation: u64) {
        self.remaining = secs;
        self.running = true;
        self.generation = generation;
    }

    pub fn clear(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick(&mut self, dt: f64) -> Option<TimerEvent> {
        if !self.running {
            return None;
        }
        self.remaining -= dt;
        if self.remaining <= EPSILON {
            self.remaining = 0.0;
            self.running = false;
            return Some(TimerEvent::MemorizeDone {
                generation: self.generation,
            });
        }
        None
    }
}

impl Default for MemorizeTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Typing mode's global countdown. `None` duration means unlimited.
#[derive(Clone, Debug)]
pub struct GameClock {
    remaining: Option<f64>,
    fired: bool,
}

impl GameClock {
    pub fn new(duration_secs: Option<f64>) -> Self {
        Self {
            remaining: duration_secs,
            fired: false,
        }
    }

    #[allow(dead_code)] // Used by tests
    pub fn unlimited() -> Self {
        Self::new(None)
    }

    pub fn remaining(&self) -> Option<f64> {
        self.remaining.map(|r| r.max(0.0))
    }

    pub fn tick(&mut self, dt: f64) -> Option<TimerEvent> {
        let remaining = self.remaining.as_mut()?;
        if self.fired {
            return None;
        }
        *remaining -= dt;
        if *remaining <= EPSILON {
            *remaining = 0.0;
            self.fired = true;
            return Some(TimerEvent::ClockExpired);
        }
        None
    }
}

/// Wall-clock time spent in `Playing`, accumulated from ticks so the
/// game-over snapshot reads a frozen value instead of racing a reset.
#[derive(Clone, Debug, Default)]
pub struct ElapsedClock {
    secs: f64,
}

impl ElapsedClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, dt: f64) {
        self.secs += dt;
    }

    pub fn secs(&self) -> f64 {
        self.secs
    }

    pub fn reset(&mut self) {
        self.secs = 0.0;
    }
}

/// The full timer set for one session.
#[derive(Clone, Debug)]
pub struct SessionTimers {
    pub answer: AnswerTimer,
    pub memorize: MemorizeTimer,
    pub clock: GameClock,
    pub elapsed: ElapsedClock,
}

impl SessionTimers {
    pub fn new(clock_duration_secs: Option<f64>) -> Self {
        Self {
            answer: AnswerTimer::new(),
            memorize: MemorizeTimer::new(),
            clock: GameClock::new(clock_duration_secs),
            elapsed: ElapsedClock::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timer: &mut AnswerTimer, secs: f64) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        let steps = (secs / 0.1).round() as usize;
        for _ in 0..steps {
            if let Some(event) = timer.tick(0.1) {
                events.push(event);
            }
        }
        events
    }

    #[test]
    fn answer_timer_fires_once_at_zero() {
        let mut timer = AnswerTimer::new();
        timer.start(0.5, 3);
        let events = drain(&mut timer, 2.0);
        assert_eq!(events, vec![TimerEvent::AnswerTimeUp { generation: 3 }]);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), 0.0);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut timer = AnswerTimer::new();
        timer.start(1.0, 0);
        timer.stop();
        let before = timer.remaining();
        timer.stop();
        timer.stop();
        assert_eq!(timer.remaining(), before);
        assert!(drain(&mut timer, 5.0).is_empty());
    }

    #[test]
    fn stopped_timer_does_not_fire() {
        let mut timer = AnswerTimer::new();
        timer.start(0.3, 0);
        timer.tick(0.1);
        timer.stop();
        assert!(drain(&mut timer, 1.0).is_empty());
    }

    #[test]
    fn restart_rearms_with_new_generation() {
        let mut timer = AnswerTimer::new();
        timer.start(0.2, 1);
        timer.stop();
        timer.start(0.2, 2);
        let events = drain(&mut timer, 1.0);
        assert_eq!(events, vec![TimerEvent::AnswerTimeUp { generation: 2 }]);
    }

    #[test]
    fn memorize_timer_reports_its_generation() {
        let mut timer = MemorizeTimer::new();
        timer.start(0.2, 7);
        let mut fired = None;
        for _ in 0..5 {
            if let Some(event) = timer.tick(0.1) {
                fired = Some(event);
            }
        }
        assert_eq!(fired, Some(TimerEvent::MemorizeDone { generation: 7 }));
    }

    #[test]
    fn game_clock_counts_down_and_fires_once() {
        let mut clock = GameClock::new(Some(1.0));
        let mut fired = 0;
        for _ in 0..30 {
            if clock.tick(0.1).is_some() {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert_eq!(clock.remaining(), Some(0.0));
    }

    #[test]
    fn unlimited_clock_never_fires() {
        let mut clock = GameClock::unlimited();
        for _ in 0..100 {
            assert!(clock.tick(0.1).is_none());
        }
        assert_eq!(clock.remaining(), None);
    }

    #[test]
    fn elapsed_clock_accumulates() {
        let mut clock = ElapsedClock::new();
        for _ in 0..25 {
            clock.tick(0.1);
        }
        assert!((clock.secs() - 2.5).abs() < 1e-6);
        clock.reset();
        assert_eq!(clock.secs(), 0.0);
    }
}
