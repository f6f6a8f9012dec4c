/// Time primitives.
///
/// The story is driven by host timestamps (`performance.now()` in the
/// browser), so time is milliseconds on an arbitrary monotonic origin.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64); // milliseconds

impl Time {
    pub fn ms(self) -> f64 {
        self.0
    }

    pub fn after(self, delay_ms: f64) -> Time {
        Time(self.0 + delay_ms.max(0.0))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    pub fn new(start: Time, duration_ms: f64) -> Self {
        Self {
            start,
            end: start.after(duration_ms),
        }
    }

    pub fn instant(t: Time) -> Self {
        Self { start: t, end: t }
    }

    pub fn duration(&self) -> f64 {
        (self.end.0 - self.start.0).max(0.0)
    }

    /// Linear progress of `t` through the span, clamped to `[0, 1]`.
    /// Zero-length spans are complete as soon as they start.
    pub fn progress(&self, t: Time) -> f64 {
        let d = self.duration();
        if d <= 0.0 {
            return if t.0 >= self.start.0 { 1.0 } else { 0.0 };
        }
        ((t.0 - self.start.0) / d).clamp(0.0, 1.0)
    }
}
