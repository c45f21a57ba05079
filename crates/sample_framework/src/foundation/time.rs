//! Frame timing

use std::time::Instant;

/// Wall-clock frame timer
///
/// The first call to [`Timer::tick`] returns `0.0`; every later call returns
/// the seconds elapsed since the previous tick. `Instant` is monotonic, so
/// the delta is never negative.
#[derive(Debug, Default)]
pub struct Timer {
    last_frame: Option<Instant>,
    total_time: f32,
    frame_count: u64,
}

impl Timer {
    /// Create a new timer
    pub const fn new() -> Self {
        Self {
            last_frame: None,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance one frame and return the delta in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta_time = self
            .last_frame
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        self.total_time += delta_time;
        self.last_frame = Some(now);
        self.frame_count += 1;
        delta_time
    }

    /// Sum of all deltas so far
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of ticks so far
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average FPS since the first tick
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_first_tick_is_zero() {
        let mut timer = Timer::new();
        assert_eq!(timer.tick(), 0.0);
        assert_eq!(timer.frame_count(), 1);
    }

    #[test]
    fn test_ticks_are_non_negative_and_accumulate() {
        let mut timer = Timer::new();
        timer.tick();
        thread::sleep(Duration::from_millis(2));
        let dt = timer.tick();
        assert!(dt > 0.0);
        for _ in 0..10 {
            assert!(timer.tick() >= 0.0);
        }
        assert_eq!(timer.frame_count(), 12);
        assert!(timer.total_time() >= dt);
    }

    #[test]
    fn test_average_fps_without_elapsed_time() {
        let timer = Timer::new();
        assert_eq!(timer.average_fps(), 0.0);
    }
}
