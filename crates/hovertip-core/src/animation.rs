#![forbid(unsafe_code)]

//! Time-based transition primitives.
//!
//! Animations produce normalized `f32` values (0.0–1.0) and never allocate
//! during tick. [`Fade`] is a one-shot 0 → 1 progression; [`Ramp`] is a
//! retargetable value that eases from wherever it currently is toward a new
//! target, which is what an opacity transition needs when hover flips
//! halfway through a fade.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Reset the animation to its initial state.
    fn reset(&mut self);
}

fn non_zero(duration: Duration) -> Duration {
    if duration.is_zero() {
        Duration::from_nanos(1)
    } else {
        duration
    }
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Progression from 0.0 to 1.0 over a duration, with configurable easing.
///
/// Tracks elapsed time as [`Duration`] internally for precise accumulation.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Create a fade with the given duration and default linear easing.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: non_zero(duration),
            easing: linear,
        }
    }

    /// Set the easing function.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Raw linear progress (before easing), in [0.0, 1.0].
    pub fn raw_progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

// ---------------------------------------------------------------------------
// Ramp
// ---------------------------------------------------------------------------

/// A value in [0.0, 1.0] that eases toward a target.
///
/// Retargeting restarts the underlying [`Fade`] from the current value, so a
/// reversal mid-flight never jumps.
#[derive(Debug, Clone, Copy)]
pub struct Ramp {
    from: f32,
    to: f32,
    fade: Fade,
}

impl Ramp {
    /// Create a settled ramp at `value`.
    pub fn new(value: f32, duration: Duration) -> Self {
        let value = value.clamp(0.0, 1.0);
        let mut fade = Fade::new(duration);
        fade.tick(non_zero(duration));
        Self {
            from: value,
            to: value,
            fade,
        }
    }

    /// Set the easing function.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.fade = self.fade.easing(easing);
        self
    }

    /// Begin easing toward `target` from the current value.
    ///
    /// Retargeting to the current target is a no-op.
    pub fn set_target(&mut self, target: f32) {
        let target = target.clamp(0.0, 1.0);
        if (target - self.to).abs() <= f32::EPSILON {
            return;
        }
        self.from = self.value();
        self.to = target;
        self.fade.reset();
    }

    /// Snap to `value` with no transition.
    pub fn jump_to(&mut self, value: f32) {
        let value = value.clamp(0.0, 1.0);
        self.from = value;
        self.to = value;
        self.fade.tick(Duration::MAX);
    }

    /// The value this ramp is heading toward.
    pub fn target(&self) -> f32 {
        self.to
    }
}

impl Animation for Ramp {
    fn tick(&mut self, dt: Duration) {
        self.fade.tick(dt);
    }

    fn is_complete(&self) -> bool {
        self.fade.is_complete()
    }

    fn value(&self) -> f32 {
        if self.fade.is_complete() {
            return self.to;
        }
        let t = self.fade.value();
        (self.from + (self.to - self.from) * t).clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        self.jump_to(self.from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_200: Duration = Duration::from_millis(200);

    #[test]
    fn easing_endpoints() {
        for f in [linear as EasingFn, ease_in_out] {
            assert!((f(0.0)).abs() < 1e-6);
            assert!((f(1.0) - 1.0).abs() < 1e-6);
        }
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn easing_clamps_input() {
        assert_eq!(linear(-1.0), 0.0);
        assert_eq!(linear(2.0), 1.0);
    }

    #[test]
    fn fade_progresses_and_completes() {
        let mut fade = Fade::new(MS_200);
        assert_eq!(fade.value(), 0.0);
        fade.tick(MS_100);
        assert!((fade.value() - 0.5).abs() < 1e-3);
        assert!(!fade.is_complete());
        fade.tick(MS_100);
        assert!(fade.is_complete());
        assert_eq!(fade.value(), 1.0);
        fade.reset();
        assert_eq!(fade.value(), 0.0);
    }

    #[test]
    fn fade_zero_duration_completes_on_first_tick() {
        let mut fade = Fade::new(Duration::ZERO);
        fade.tick(Duration::from_nanos(1));
        assert!(fade.is_complete());
        assert_eq!(fade.value(), 1.0);
    }

    #[test]
    fn ramp_starts_settled() {
        let ramp = Ramp::new(0.0, MS_200);
        assert!(ramp.is_complete());
        assert_eq!(ramp.value(), 0.0);
        assert_eq!(ramp.target(), 0.0);
    }

    #[test]
    fn ramp_eases_to_target() {
        let mut ramp = Ramp::new(0.0, MS_200);
        ramp.set_target(1.0);
        assert_eq!(ramp.value(), 0.0);
        ramp.tick(MS_100);
        assert!((ramp.value() - 0.5).abs() < 1e-3);
        ramp.tick(MS_100);
        assert!(ramp.is_complete());
        assert_eq!(ramp.value(), 1.0);
    }

    #[test]
    fn ramp_reversal_starts_from_current_value() {
        let mut ramp = Ramp::new(0.0, MS_200);
        ramp.set_target(1.0);
        ramp.tick(MS_100);
        let midway = ramp.value();

        ramp.set_target(0.0);
        assert!((ramp.value() - midway).abs() < 1e-6, "no jump on reversal");
        ramp.tick(MS_200);
        assert_eq!(ramp.value(), 0.0);
    }

    #[test]
    fn ramp_same_target_does_not_restart() {
        let mut ramp = Ramp::new(0.0, MS_200);
        ramp.set_target(1.0);
        ramp.tick(MS_100);
        ramp.set_target(1.0);
        ramp.tick(MS_100);
        assert!(ramp.is_complete());
    }

    #[test]
    fn ramp_jump_to_skips_transition() {
        let mut ramp = Ramp::new(0.0, MS_200);
        ramp.jump_to(1.0);
        assert!(ramp.is_complete());
        assert_eq!(ramp.value(), 1.0);
    }

    #[test]
    fn ramp_clamps_values() {
        let mut ramp = Ramp::new(3.0, MS_200);
        assert_eq!(ramp.value(), 1.0);
        ramp.set_target(-2.0);
        ramp.tick(MS_200);
        assert_eq!(ramp.value(), 0.0);
    }
}
