//! # Sleep Timer
//!
//! One-shot countdown that pauses playback when it reaches zero.
//!
//! The timer holds no clock of its own. Whoever drives it calls
//! [`SleepTimer::tick`] once per second with the [`TimerGeneration`] that
//! [`SleepTimer::start`] handed out. Starting again bumps the generation, so
//! ticks from an earlier countdown are ignored and at most one countdown is
//! ever live.

use crate::error::{PlaybackError, Result};

const TIMES_UP_LABEL: &str = "Time's up!";

/// Identifies one countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimerGeneration(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Inactive,
    Running {
        remaining: u32,
    },
    Expired,
}

/// Outcome of a live tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    Running { remaining: u32 },
    /// Remaining time just reached zero. Reported once per countdown.
    Expired,
}

/// Parses sleep-timer input as a positive whole number of minutes.
pub fn parse_minutes(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    match trimmed.parse::<u32>() {
        Ok(minutes) if minutes > 0 && minutes.checked_mul(60).is_some() => Ok(minutes),
        _ => Err(PlaybackError::InvalidTimerInput(input.to_string())),
    }
}

#[derive(Debug, Default)]
pub struct SleepTimer {
    state: TimerState,
    generation: TimerGeneration,
}

impl SleepTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Seconds left, or `None` unless a countdown is running.
    pub fn remaining(&self) -> Option<u32> {
        match self.state {
            TimerState::Running { remaining } => Some(remaining),
            _ => None,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    /// Starts a countdown of `minutes`, cancelling any earlier one.
    pub fn start(&mut self, minutes: u32) -> Result<TimerGeneration> {
        let seconds = match minutes.checked_mul(60) {
            Some(seconds) if seconds > 0 => seconds,
            _ => return Err(PlaybackError::InvalidTimerInput(minutes.to_string())),
        };
        self.generation = TimerGeneration(self.generation.0.wrapping_add(1));
        self.state = TimerState::Running { remaining: seconds };
        Ok(self.generation)
    }

    /// Stops any countdown without expiring it.
    pub fn cancel(&mut self) {
        self.generation = TimerGeneration(self.generation.0.wrapping_add(1));
        self.state = TimerState::Inactive;
    }

    /// Advances the countdown by one second.
    ///
    /// Returns `None` when `generation` is stale or nothing is running.
    pub fn tick(&mut self, generation: TimerGeneration) -> Option<TimerTick> {
        if generation != self.generation {
            return None;
        }
        let TimerState::Running { remaining } = self.state else {
            return None;
        };
        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            self.state = TimerState::Expired;
            Some(TimerTick::Expired)
        } else {
            self.state = TimerState::Running { remaining };
            Some(TimerTick::Running { remaining })
        }
    }

    /// Countdown text, always `MM:SS`.
    pub fn display(&self) -> String {
        crate::view::format_countdown(self.remaining().unwrap_or(0))
    }

    /// Terminal label shown once the countdown has expired.
    pub fn label(&self) -> Option<&'static str> {
        self.is_expired().then_some(TIMES_UP_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_positive_integers() {
        assert_eq!(parse_minutes("5").unwrap(), 5);
        assert_eq!(parse_minutes(" 30 ").unwrap(), 30);
    }

    #[test]
    fn parse_rejects_everything_else() {
        for input in ["", "0", "-3", "2.5", "abc", "99999999999"] {
            assert!(
                matches!(parse_minutes(input), Err(PlaybackError::InvalidTimerInput(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn start_sets_full_duration() {
        let mut timer = SleepTimer::new();
        timer.start(5).unwrap();
        assert_eq!(timer.remaining(), Some(300));
        assert_eq!(timer.display(), "05:00");
        assert_eq!(timer.label(), None);
    }

    #[test]
    fn countdown_expires_exactly_once() {
        let mut timer = SleepTimer::new();
        let generation = timer.start(1).unwrap();

        for expected in (1..60).rev() {
            assert_eq!(
                timer.tick(generation),
                Some(TimerTick::Running { remaining: expected })
            );
        }
        assert_eq!(timer.tick(generation), Some(TimerTick::Expired));
        assert_eq!(timer.tick(generation), None);
        assert_eq!(timer.display(), "00:00");
        assert_eq!(timer.label(), Some("Time's up!"));
    }

    #[test]
    fn restart_invalidates_previous_generation() {
        let mut timer = SleepTimer::new();
        let first = timer.start(10).unwrap();
        let second = timer.start(2).unwrap();

        assert_ne!(first, second);
        assert_eq!(timer.tick(first), None);
        assert_eq!(timer.remaining(), Some(120));
        assert_eq!(
            timer.tick(second),
            Some(TimerTick::Running { remaining: 119 })
        );
    }

    #[test]
    fn restart_after_expiry_clears_label() {
        let mut timer = SleepTimer::new();
        let generation = timer.start(1).unwrap();
        for _ in 0..60 {
            timer.tick(generation);
        }
        assert!(timer.is_expired());
        timer.start(1).unwrap();
        assert!(!timer.is_expired());
        assert_eq!(timer.label(), None);
    }

    #[test]
    fn cancel_stops_ticks() {
        let mut timer = SleepTimer::new();
        let generation = timer.start(1).unwrap();
        timer.cancel();
        assert_eq!(timer.tick(generation), None);
        assert_eq!(timer.state(), TimerState::Inactive);
        assert_eq!(timer.display(), "00:00");
    }

    #[test]
    fn zero_minutes_is_rejected() {
        let mut timer = SleepTimer::new();
        assert!(timer.start(0).is_err());
        assert_eq!(timer.state(), TimerState::Inactive);
    }
}
