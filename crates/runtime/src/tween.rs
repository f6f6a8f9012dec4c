use foundation::math::Vec2;
use foundation::{Time, TimeSpan};

/// Values that can be interpolated by a `Tween`.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(self, to: Self, t: f64) -> Self {
        Vec2::lerp(self, to, t)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 * 0.5
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) * 0.5
                }
            }
        }
    }
}

/// An eased transition between two values over a time span.
///
/// Retargeting never jumps: the new transition starts from the value sampled
/// at the retarget instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    span: TimeSpan,
    easing: Easing,
}

impl<T: Lerp> Tween<T> {
    /// A settled tween resting at `value`.
    pub fn settled(value: T) -> Self {
        Self {
            from: value,
            to: value,
            span: TimeSpan::instant(Time(f64::NEG_INFINITY)),
            easing: Easing::default(),
        }
    }

    pub fn retarget(&mut self, now: Time, to: T, duration_ms: f64) {
        let from = self.sample(now);
        self.from = from;
        self.to = to;
        self.span = TimeSpan::new(now, duration_ms);
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn sample(&self, now: Time) -> T {
        let t = self.easing.apply(self.span.progress(now));
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, t)
    }

    pub fn target(&self) -> T {
        self.to
    }

    pub fn is_done(&self, now: Time) -> bool {
        self.span.progress(now) >= 1.0
    }

    pub fn span(&self) -> TimeSpan {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::{Easing, Tween};
    use foundation::Time;

    #[test]
    fn cubic_in_out_is_symmetric() {
        let e = Easing::CubicInOut;
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(0.5), 0.5);
        assert_eq!(e.apply(1.0), 1.0);
        assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn settled_tween_is_done() {
        let t = Tween::settled(3.0_f64);
        assert!(t.is_done(Time(0.0)));
        assert_eq!(t.sample(Time(0.0)), 3.0);
    }

    #[test]
    fn linear_tween_interpolates() {
        let mut t = Tween::settled(0.0_f64).with_easing(Easing::Linear);
        t.retarget(Time(100.0), 10.0, 100.0);
        assert_eq!(t.sample(Time(150.0)), 5.0);
        assert!(!t.is_done(Time(150.0)));
        assert_eq!(t.sample(Time(250.0)), 10.0);
        assert!(t.is_done(Time(200.0)));
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let mut t = Tween::settled(0.0_f64).with_easing(Easing::Linear);
        t.retarget(Time(0.0), 10.0, 100.0);
        t.retarget(Time(50.0), 0.0, 100.0);
        // Continues from 5.0, not from the old origin or target.
        assert_eq!(t.sample(Time(50.0)), 5.0);
        assert_eq!(t.sample(Time(100.0)), 2.5);
        assert_eq!(t.target(), 0.0);
    }

    #[test]
    fn zero_duration_snaps() {
        let mut t = Tween::settled(1.0_f64);
        t.retarget(Time(5.0), 2.0, 0.0);
        assert!(t.is_done(Time(5.0)));
        assert_eq!(t.sample(Time(5.0)), 2.0);
    }
}
