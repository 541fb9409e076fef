//! Two-color flash driven purely by elapsed time.

use std::time::{Duration, Instant};

use anyhow::bail;

use crate::config::FlashConfig;

/// Which of the two flash colors is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    A,
    B,
}

/// Phase at `elapsed`: `A` when `floor(elapsed / half_period)` is even.
///
/// Exact multiples of `half_period` start the next phase.
pub fn phase_at(elapsed: Duration, half_period: Duration) -> Phase {
    let half = half_period.as_nanos().max(1);
    if (elapsed.as_nanos() / half) % 2 == 0 {
        Phase::A
    } else {
        Phase::B
    }
}

/// Monotonic time source used by the frame loops.
pub trait Clock {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
    fn sleep(&mut self, duration: Duration);
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Sleeps out whatever is left of a frame that started at `frame_start`.
pub fn pace<C: Clock + ?Sized>(clock: &mut C, frame_start: Duration, interval: Duration) {
    let spent = clock.now().saturating_sub(frame_start);
    if spent < interval {
        clock.sleep(interval - spent);
    }
}

pub fn frame_interval(rate: u32) -> Duration {
    Duration::from_secs_f64(1.0 / rate.max(1) as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashOutcome {
    /// The full duration elapsed.
    Completed,
    /// `on_tick` asked to stop early.
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
pub struct FlashTimer {
    duration: Duration,
    half_period: Duration,
    frame_interval: Duration,
}

impl FlashTimer {
    pub fn new(duration: Duration, half_period: Duration, poll_rate: u32) -> anyhow::Result<Self> {
        if duration.is_zero() {
            bail!("flash duration must be positive");
        }
        if half_period.is_zero() {
            bail!("flash half period must be positive");
        }
        if poll_rate == 0 {
            bail!("flash poll rate must be positive");
        }
        Ok(Self {
            duration,
            half_period,
            frame_interval: frame_interval(poll_rate),
        })
    }

    pub fn from_config(config: &FlashConfig) -> anyhow::Result<Self> {
        Self::new(config.duration, config.half_period, config.poll_rate)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Runs the flash until the duration elapses or `on_tick` returns `false`.
    ///
    /// `on_tick` is called once per frame with the current phase and is never
    /// called once the deadline has been observed. Errors from `on_tick` end
    /// the loop and are returned as-is.
    pub fn run<C, F>(&self, clock: &mut C, mut on_tick: F) -> anyhow::Result<FlashOutcome>
    where
        C: Clock + ?Sized,
        F: FnMut(Phase) -> anyhow::Result<bool>,
    {
        let start = clock.now();
        loop {
            let frame_start = clock.now();
            let elapsed = frame_start.saturating_sub(start);
            if elapsed >= self.duration {
                return Ok(FlashOutcome::Completed);
            }

            if !on_tick(phase_at(elapsed, self.half_period))? {
                return Ok(FlashOutcome::Cancelled);
            }

            pace(clock, frame_start, self.frame_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Time only moves when something sleeps.
    struct ManualClock {
        now: Duration,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Duration::ZERO,
            }
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Duration {
            self.now
        }

        fn sleep(&mut self, duration: Duration) {
            self.now += duration;
        }
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_phase_sampling() {
        let half = secs(0.5);
        let phases: Vec<Phase> = [0.0, 0.4, 0.6, 1.0]
            .into_iter()
            .map(|t| phase_at(secs(t), half))
            .collect();
        assert_eq!(phases, vec![Phase::A, Phase::A, Phase::B, Phase::A]);
    }

    #[test]
    fn test_phase_boundary_starts_next_phase() {
        let half = Duration::from_millis(500);
        assert_eq!(phase_at(Duration::from_millis(499), half), Phase::A);
        assert_eq!(phase_at(Duration::from_millis(500), half), Phase::B);
        assert_eq!(phase_at(Duration::from_millis(999), half), Phase::B);
        assert_eq!(phase_at(Duration::from_millis(1000), half), Phase::A);
    }

    #[test]
    fn test_cancel_on_first_tick() {
        let timer = FlashTimer::new(Duration::from_secs(3600), secs(0.5), 60).unwrap();
        let mut clock = ManualClock::new();
        let mut calls = 0;
        let outcome = timer
            .run(&mut clock, |_| {
                calls += 1;
                Ok(false)
            })
            .unwrap();
        assert_eq!(outcome, FlashOutcome::Cancelled);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_runs_until_duration() {
        let timer = FlashTimer::new(Duration::from_secs(5), secs(0.5), 60).unwrap();
        let mut clock = ManualClock::new();
        let mut calls = 0u32;
        let outcome = timer
            .run(&mut clock, |_| {
                calls += 1;
                Ok(true)
            })
            .unwrap();
        assert_eq!(outcome, FlashOutcome::Completed);
        assert!(clock.now >= Duration::from_secs(5));
        assert!(clock.now <= Duration::from_secs(5) + timer.frame_interval());
        // One tick per frame, none after the deadline.
        assert!((299..=301).contains(&calls), "calls = {calls}");
    }

    #[test]
    fn test_phases_alternate_at_half_period() {
        // Two frames per second lands exactly on every phase boundary.
        let timer = FlashTimer::new(Duration::from_secs(5), secs(0.5), 2).unwrap();
        let mut clock = ManualClock::new();
        let mut seen = Vec::new();
        timer
            .run(&mut clock, |phase| {
                seen.push(phase);
                Ok(true)
            })
            .unwrap();
        assert_eq!(seen.len(), 10);
        for (i, phase) in seen.iter().enumerate() {
            let expected = if i % 2 == 0 { Phase::A } else { Phase::B };
            assert_eq!(*phase, expected, "tick {i}");
        }
    }

    #[test]
    fn test_tick_error_propagates() {
        let timer = FlashTimer::new(Duration::from_secs(1), secs(0.5), 60).unwrap();
        let mut clock = ManualClock::new();
        let result = timer.run(&mut clock, |_| Err(anyhow::anyhow!("surface gone")));
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(FlashTimer::new(Duration::ZERO, secs(0.5), 60).is_err());
        assert!(FlashTimer::new(secs(1.0), Duration::ZERO, 60).is_err());
        assert!(FlashTimer::new(secs(1.0), secs(0.5), 0).is_err());
    }

    #[test]
    fn test_from_config_keeps_duration() {
        let timer = FlashTimer::from_config(&FlashConfig::default()).unwrap();
        assert_eq!(timer.duration(), Duration::from_secs(5));
        assert_eq!(timer.frame_interval(), frame_interval(60));
    }

    #[test]
    fn test_pace_sleeps_remaining_interval() {
        let mut clock = ManualClock::new();
        clock.now = Duration::from_millis(4);
        pace(&mut clock, Duration::ZERO, Duration::from_millis(10));
        assert_eq!(clock.now, Duration::from_millis(10));

        // Overrun frames do not sleep.
        pace(&mut clock, Duration::ZERO, Duration::from_millis(5));
        assert_eq!(clock.now, Duration::from_millis(10));
    }
}
