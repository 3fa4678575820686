//! Reveal configuration.

use std::time::Duration;

/// How revealed text catches up with the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PacingMode {
    /// Snap to the full target on every update.
    #[default]
    Realtime,
    /// Dose characters out per frame at a fractional rate.
    BurstSmoothed,
}

/// Timing hints for fade-style consumers.
///
/// The engine only supplies segment boundaries; these values are carried
/// through for the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FadeConfig {
    /// Duration of one segment's fade-in.
    pub duration: Duration,
    /// Delay between consecutive segments starting their fade.
    pub stagger: Duration,
    /// Locale hint for word segmentation (e.g. `"en"`).
    pub locale: Option<String>,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(280),
            stagger: Duration::from_millis(24),
            locale: None,
        }
    }
}

/// Configuration for a [`TypewriterStream`](super::TypewriterStream).
///
/// Every value is accepted as-is and clamped where it is consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealConfig {
    /// Reveal speed, effective range 1–100.
    pub speed: f64,
    /// Pacing strategy.
    pub mode: PacingMode,
    /// Largest backlog, in chars, applied instantly under burst smoothing.
    pub burst_threshold: usize,
    /// Smoothing window; shorter windows reveal faster.
    pub smoothing_window: Duration,
    /// Upper bound on chars revealed by one frame.
    pub max_chars_per_frame: usize,
    /// Settle delay before completion under realtime pacing.
    pub settle_realtime: Duration,
    /// Settle delay before completion under burst smoothing.
    pub settle_smoothed: Duration,
    /// Fade mode; `Some` enables segment output.
    pub fade: Option<FadeConfig>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            speed: 20.0,
            mode: PacingMode::Realtime,
            burst_threshold: 24,
            smoothing_window: Duration::from_millis(120),
            max_chars_per_frame: 12,
            settle_realtime: Duration::from_millis(140),
            settle_smoothed: Duration::from_millis(320),
            fade: None,
        }
    }
}

impl RevealConfig {
    /// Default configuration with burst-smoothed pacing.
    pub fn smoothed() -> Self {
        Self::default().with_mode(PacingMode::BurstSmoothed)
    }

    /// Set the reveal speed.
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Set the pacing mode.
    #[must_use]
    pub fn with_mode(mut self, mode: PacingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the small-delta bypass threshold.
    #[must_use]
    pub fn with_burst_threshold(mut self, chars: usize) -> Self {
        self.burst_threshold = chars;
        self
    }

    /// Set the smoothing window.
    #[must_use]
    pub fn with_smoothing_window(mut self, window: Duration) -> Self {
        self.smoothing_window = window;
        self
    }

    /// Set the per-frame reveal cap.
    #[must_use]
    pub fn with_max_chars_per_frame(mut self, chars: usize) -> Self {
        self.max_chars_per_frame = chars;
        self
    }

    /// Set both settle delays.
    #[must_use]
    pub fn with_settle(mut self, realtime: Duration, smoothed: Duration) -> Self {
        self.settle_realtime = realtime;
        self.settle_smoothed = smoothed;
        self
    }

    /// Enable fade mode.
    #[must_use]
    pub fn with_fade(mut self, fade: FadeConfig) -> Self {
        self.fade = Some(fade);
        self
    }

    /// Settle delay for the configured pacing mode.
    pub const fn settle_delay(&self) -> Duration {
        match self.mode {
            PacingMode::Realtime => self.settle_realtime,
            PacingMode::BurstSmoothed => self.settle_smoothed,
        }
    }

    /// Per-frame cap, never below one char.
    pub fn frame_cap(&self) -> usize {
        self.max_chars_per_frame.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RevealConfig::default();
        assert_eq!(config.mode, PacingMode::Realtime);
        assert!((config.speed - 20.0).abs() < f64::EPSILON);
        assert_eq!(config.burst_threshold, 24);
        assert_eq!(config.smoothing_window, Duration::from_millis(120));
        assert_eq!(config.max_chars_per_frame, 12);
        assert!(config.fade.is_none());
    }

    #[test]
    fn test_settle_delay_follows_mode() {
        let realtime = RevealConfig::default();
        assert_eq!(realtime.settle_delay(), Duration::from_millis(140));
        let smoothed = RevealConfig::smoothed();
        assert_eq!(smoothed.settle_delay(), Duration::from_millis(320));
    }

    #[test]
    fn test_frame_cap_floor() {
        let config = RevealConfig::default().with_max_chars_per_frame(0);
        assert_eq!(config.frame_cap(), 1);
    }
}
