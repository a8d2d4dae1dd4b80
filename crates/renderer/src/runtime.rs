use std::time::Instant;

/// Where the animation clock takes its readings from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RenderPolicy {
    /// Free-running wall clock measured from setup.
    #[default]
    Animate,
    /// Elapsed time pinned to a fixed number of seconds.
    Still {
        /// Elapsed seconds reported on every frame.
        time: f32,
    },
}

/// Snapshot of the clock for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed wall-clock or simulated time in seconds.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

impl TimeSample {
    /// Creates a new time sample.
    pub fn new(seconds: f32, frame_index: u64) -> Self {
        Self {
            seconds,
            frame_index,
        }
    }
}

/// Abstraction over where time values originate from.
pub trait TimeSource {
    /// Resets the source to its initial state.
    fn reset(&mut self);
    /// Produces a time sample for the next frame.
    fn sample(&mut self) -> TimeSample;
}

/// Time source backed by the system monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    /// Creates a system time source initialised to `Instant::now()`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn reset(&mut self) {
        self.origin = Instant::now();
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let elapsed = self.origin.elapsed();
        let sample = TimeSample::new(elapsed.as_secs_f32(), self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Time source that always reports a fixed timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
    time: f32,
    frame: u64,
}

impl FixedTimeSource {
    /// Constructs a fixed time source that always returns the provided time.
    pub fn new(time: f32) -> Self {
        Self { time, frame: 0 }
    }
}

impl TimeSource for FixedTimeSource {
    fn reset(&mut self) {
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.time, self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Convenient alias for owning time sources behind trait objects.
pub type BoxedTimeSource = Box<dyn TimeSource>;

/// Builds a time source suited to the requested render policy.
pub fn time_source_for_policy(policy: &RenderPolicy) -> BoxedTimeSource {
    match policy {
        RenderPolicy::Animate => Box::new(SystemTimeSource::new()),
        RenderPolicy::Still { time } => Box::new(FixedTimeSource::new(*time)),
    }
}

/// Elapsed-time tracker that honours the pause flag.
///
/// While paused the source is not consulted at all, so the last reading is
/// reused. The source itself keeps running: un-pausing jumps straight to the
/// live elapsed time rather than resuming where the animation stopped.
pub struct FrameClock<S = BoxedTimeSource> {
    source: S,
    last: TimeSample,
}

impl<S: TimeSource> FrameClock<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            last: TimeSample::new(0.0, 0),
        }
    }

    /// Rewinds the source so elapsed time counts from now.
    pub fn restart(&mut self) {
        self.source.reset();
        self.last = TimeSample::new(0.0, 0);
    }

    /// Returns the elapsed seconds to render with.
    pub fn sample(&mut self, paused: bool) -> f32 {
        if !paused {
            self.last = self.source.sample();
        }
        self.last.seconds
    }

    /// The most recent reading taken from the source.
    pub fn last_sample(&self) -> TimeSample {
        self.last
    }
}

impl<S: TimeSource + ?Sized> TimeSource for Box<S> {
    fn reset(&mut self) {
        (**self).reset();
    }

    fn sample(&mut self) -> TimeSample {
        (**self).sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source whose readings are scripted by the test.
    struct ScriptedSource {
        readings: Vec<f32>,
        next: usize,
    }

    impl ScriptedSource {
        fn new(readings: &[f32]) -> Self {
            Self {
                readings: readings.to_vec(),
                next: 0,
            }
        }
    }

    impl TimeSource for ScriptedSource {
        fn reset(&mut self) {
            self.next = 0;
        }

        fn sample(&mut self) -> TimeSample {
            let index = self.next.min(self.readings.len() - 1);
            self.next += 1;
            TimeSample::new(self.readings[index], index as u64)
        }
    }

    #[test]
    fn running_clock_follows_source() {
        let mut clock = FrameClock::new(ScriptedSource::new(&[0.0, 0.5, 1.0]));
        assert_eq!(clock.sample(false), 0.0);
        assert_eq!(clock.sample(false), 0.5);
        assert_eq!(clock.sample(false), 1.0);
    }

    #[test]
    fn paused_clock_holds_last_reading_then_jumps() {
        let mut clock = FrameClock::new(ScriptedSource::new(&[1.0, 2.0, 7.0]));
        assert_eq!(clock.sample(false), 1.0);
        assert_eq!(clock.sample(true), 1.0);
        assert_eq!(clock.sample(true), 1.0);
        // The source was never consulted while paused, so it yields its next reading.
        assert_eq!(clock.sample(false), 2.0);
        assert_eq!(clock.last_sample().frame_index, 1);
    }

    #[test]
    fn paused_before_first_frame_reports_zero() {
        let mut clock = FrameClock::new(ScriptedSource::new(&[3.0]));
        assert_eq!(clock.sample(true), 0.0);
    }

    #[test]
    fn still_policy_pins_time() {
        let mut clock = FrameClock::new(time_source_for_policy(&RenderPolicy::Still { time: 4.25 }));
        assert_eq!(clock.sample(false), 4.25);
        assert_eq!(clock.sample(false), 4.25);
        assert_eq!(clock.last_sample().frame_index, 1);
    }

    #[test]
    fn system_source_is_monotonic() {
        let mut source = SystemTimeSource::new();
        let first = source.sample();
        let second = source.sample();
        assert!(second.seconds >= first.seconds);
        assert_eq!(second.frame_index, first.frame_index + 1);
    }

    #[test]
    fn reset_restarts_frame_counter() {
        let mut source = FixedTimeSource::new(1.0);
        source.sample();
        source.sample();
        source.reset();
        let sample = source.sample();
        assert_eq!(sample.frame_index, 0);
        assert_eq!(sample.seconds, 1.0);
    }

    #[test]
    fn restart_rewinds_the_source() {
        let mut clock = FrameClock::new(ScriptedSource::new(&[0.5, 1.5, 2.5]));
        clock.sample(false);
        clock.sample(false);
        clock.restart();
        assert_eq!(clock.last_sample(), TimeSample::new(0.0, 0));
        assert_eq!(clock.sample(true), 0.0);
        assert_eq!(clock.sample(false), 0.5);
    }
}
