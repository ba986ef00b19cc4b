//! Heat classification for Typing Challenge. The consecutive-correct streak
//! selects a tier; each tier sets how fast the nitro pool drains. Tier
//! changes are debounced briefly so the banner and decay rate do not thrash
//! at a boundary.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatLevel {
    pub tier: u8,
    pub name: &'static str,
    pub min_streak: u32,
    pub max_streak: u32,
    pub decay_interval: f64,
}

pub const HEAT_LEVELS: [HeatLevel; 4] = [
    HeatLevel {
        tier: 1,
        name: "Normal",
        min_streak: 0,
        max_streak: 5,
        decay_interval: 1.0,
    },
    HeatLevel {
        tier: 2,
        name: "Heating Up",
        min_streak: 6,
        max_streak: 12,
        decay_interval: 0.8,
    },
    HeatLevel {
        tier: 3,
        name: "Danger Zone",
        min_streak: 13,
        max_streak: 25,
        decay_interval: 0.65,
    },
    HeatLevel {
        tier: 4,
        name: "OVERDRIVE!",
        min_streak: 26,
        max_streak: u32::MAX,
        decay_interval: 0.6,
    },
];

pub const HEAT_DEBOUNCE_SECS: f64 = 0.15;

pub fn heat_for_streak(streak: u32) -> &'static HeatLevel {
    HEAT_LEVELS
        .iter()
        .find(|level| streak >= level.min_streak && streak <= level.max_streak)
        .unwrap_or(&HEAT_LEVELS[0])
}

#[derive(Clone, Debug)]
pub struct OverdriveState {
    current: &'static HeatLevel,
    pending: Option<&'static HeatLevel>,
    debounce_left: f64,
}

impl OverdriveState {
    pub fn new() -> Self {
        Self {
            current: &HEAT_LEVELS[0],
            pending: None,
            debounce_left: 0.0,
        }
    }

    pub fn current(&self) -> &'static HeatLevel {
        self.current
    }

    /// Decay interval of the settled tier; pending transitions only take
    /// effect once their debounce window elapses.
    pub fn decay_interval(&self) -> f64 {
        self.current.decay_interval
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn update_streak(&mut self, streak: u32) {
        let target = heat_for_streak(streak);
        if target.tier == self.current.tier {
            self.pending = None;
            self.debounce_left = 0.0;
            return;
        }
        match self.pending {
            Some(pending) if pending.tier == target.tier => {}
            _ => {
                self.pending = Some(target);
                self.debounce_left = HEAT_DEBOUNCE_SECS;
            }
        }
    }

    pub fn tick(&mut self, dt: f64) {
        if let Some(target) = self.pending {
            self.debounce_left -= dt;
            if self.debounce_left <= 1e-9 {
                self.current = target;
                self.pending = None;
                self.debounce_left = 0.0;
            }
        }
    }

    pub fn reset(&mut self) {
        self.current = &HEAT_LEVELS[0];
        self.pending = None;
        self.debounce_left = 0.0;
    }
}

impl Default for OverdriveState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_partition_the_streak_range() {
        assert_eq!(heat_for_streak(0).name, "Normal");
        assert_eq!(heat_for_streak(5).name, "Normal");
        assert_eq!(heat_for_streak(6).name, "Heating Up");
        assert_eq!(heat_for_streak(12).name, "Heating Up");
        assert_eq!(heat_for_streak(13).name, "Danger Zone");
        assert_eq!(heat_for_streak(25).name, "Danger Zone");
        assert_eq!(heat_for_streak(26).name, "OVERDRIVE!");
        assert_eq!(heat_for_streak(u32::MAX).name, "OVERDRIVE!");
    }

    #[test]
    fn decay_speeds_up_with_heat() {
        let mut prev = f64::MAX;
        for level in &HEAT_LEVELS {
            assert!(level.decay_interval < prev);
            prev = level.decay_interval;
        }
    }

    #[test]
    fn transition_is_debounced() {
        let mut state = OverdriveState::new();
        state.update_streak(8);
        assert!(state.is_transitioning());
        // Interval unchanged until the debounce elapses.
        assert_eq!(state.decay_interval(), 1.0);

        state.tick(0.1);
        assert!(state.is_transitioning());
        state.tick(0.1);
        assert!(!state.is_transitioning());
        assert_eq!(state.current().name, "Heating Up");
        assert_eq!(state.decay_interval(), 0.8);
    }

    #[test]
    fn dropping_back_to_current_cancels_pending() {
        let mut state = OverdriveState::new();
        state.update_streak(8);
        // Streak broken before the debounce settles.
        state.update_streak(0);
        assert!(!state.is_transitioning());
        state.tick(1.0);
        assert_eq!(state.current().name, "Normal");
    }

    #[test]
    fn retarget_during_debounce_switches_goal() {
        let mut state = OverdriveState::new();
        state.update_streak(8);
        state.tick(0.1);
        state.update_streak(30);
        state.tick(0.2);
        assert_eq!(state.current().name, "OVERDRIVE!");
    }

    #[test]
    fn reset_returns_to_normal() {
        let mut state = OverdriveState::new();
        state.update_streak(30);
        state.tick(1.0);
        assert_eq!(state.current().tier, 4);
        state.reset();
        assert_eq!(state.current().tier, 1);
        assert!(!state.is_transitioning());
    }
}
