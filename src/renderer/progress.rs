//! Progressive ambient-occlusion bookkeeping.
//!
//! A structure load starts with one color frame; every later frame adds up
//! to `spf` occlusion samples until [`MAX_SAMPLES`] is reached. The
//! accumulator is a pair of textures that swap roles after every sample.

/// Samples after which accumulation stops.
pub const MAX_SAMPLES: u32 = 1024;

/// Samples stored in each accumulator channel before moving to the next.
pub const SAMPLES_PER_CHANNEL: u32 = 256;

/// One of the two accumulator textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    /// First accumulator.
    #[default]
    A,
    /// Second accumulator.
    B,
}

impl Slot {
    /// The other accumulator.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Array index of this slot.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

/// What a frame should do before compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePlan {
    /// Draw the color/normal/depth pass.
    Color,
    /// Run this many occlusion samples (zero once saturated).
    Samples(u32),
}

/// A single occlusion sample to encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleStep {
    /// Zero-based index of this sample.
    pub index: u32,
    /// Accumulator channel (0..4) the sample is added to.
    pub channel: u32,
    /// Accumulator holding the running total.
    pub read: Slot,
    /// Accumulator receiving the new total.
    pub write: Slot,
}

/// Sample counter, color flag and current accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    sample_count: u32,
    color_rendered: bool,
    current: Slot,
}

impl Progress {
    /// Decide the work for this frame. The first call after a reset
    /// returns [`FramePlan::Color`] and marks color as rendered.
    pub fn begin_frame(&mut self, spf: u32) -> FramePlan {
        if !self.color_rendered {
            self.color_rendered = true;
            return FramePlan::Color;
        }
        FramePlan::Samples(spf.min(MAX_SAMPLES.saturating_sub(self.sample_count)))
    }

    /// Claim the next sample and swap accumulators. `None` once saturated.
    pub fn advance(&mut self) -> Option<SampleStep> {
        if self.is_saturated() {
            return None;
        }
        let step = SampleStep {
            index: self.sample_count,
            channel: self.sample_count / SAMPLES_PER_CHANNEL,
            read: self.current,
            write: self.current.other(),
        };
        self.sample_count += 1;
        self.current = step.write;
        Some(step)
    }

    /// Forget all accumulated work; the next frame redraws color.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Samples accumulated since the last reset.
    #[must_use]
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Whether the color pass has run since the last reset.
    #[must_use]
    pub fn color_rendered(&self) -> bool {
        self.color_rendered
    }

    /// Accumulator holding the latest total.
    #[must_use]
    pub fn current(&self) -> Slot {
        self.current
    }

    /// `true` once [`MAX_SAMPLES`] samples have been taken.
    #[must_use]
    pub fn is_saturated(&self) -> bool {
        self.sample_count >= MAX_SAMPLES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_color() {
        let mut progress = Progress::default();
        assert_eq!(progress.begin_frame(4), FramePlan::Color);
        assert!(progress.color_rendered());
        assert_eq!(progress.begin_frame(4), FramePlan::Samples(4));
    }

    #[test]
    fn samples_alternate_accumulators() {
        let mut progress = Progress::default();
        let _ = progress.begin_frame(1);
        assert_eq!(progress.begin_frame(1), FramePlan::Samples(1));

        let first = progress.advance().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!((first.read, first.write), (Slot::A, Slot::B));
        assert_eq!(progress.sample_count(), 1);
        assert_eq!(progress.current(), Slot::B);

        let second = progress.advance().unwrap();
        assert_eq!((second.read, second.write), (Slot::B, Slot::A));
        assert_eq!(progress.sample_count(), 2);
        assert_eq!(progress.current(), Slot::A);
    }

    #[test]
    fn reset_returns_to_color() {
        let mut progress = Progress::default();
        let _ = progress.begin_frame(1);
        let _ = progress.advance();
        progress.reset();
        assert_eq!(progress.sample_count(), 0);
        assert!(!progress.color_rendered());
        assert_eq!(progress.current(), Slot::A);
        assert_eq!(progress.begin_frame(8), FramePlan::Color);
    }

    #[test]
    fn channels_fill_in_quarters() {
        let mut progress = Progress::default();
        let channels: Vec<u32> =
            std::iter::from_fn(|| progress.advance()).map(|s| s.channel).collect();
        assert_eq!(channels.len(), MAX_SAMPLES as usize);
        assert_eq!(channels[0], 0);
        assert_eq!(channels[255], 0);
        assert_eq!(channels[256], 1);
        assert_eq!(channels[767], 2);
        assert_eq!(channels[1023], 3);
    }

    #[test]
    fn sampling_stops_at_cap() {
        let mut progress = Progress::default();
        let _ = progress.begin_frame(1);
        for _ in 0..MAX_SAMPLES - 3 {
            let _ = progress.advance();
        }
        assert_eq!(progress.begin_frame(100), FramePlan::Samples(3));
        for _ in 0..3 {
            assert!(progress.advance().is_some());
        }
        assert!(progress.is_saturated());
        assert!(progress.advance().is_none());
        assert_eq!(progress.begin_frame(100), FramePlan::Samples(0));
    }
}
