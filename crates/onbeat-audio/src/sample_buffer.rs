/// Decoded audio with one sample vector per channel, samples in [-1.0, 1.0].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleBuffer {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Planar sample data, one `Vec` per channel.
    pub channels: Vec<Vec<f32>>,
}

impl SampleBuffer {
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Mono buffer from a single channel.
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self::new(sample_rate, vec![samples])
    }

    /// De-interleaves `[L, R, L, R, ...]` data.
    pub fn from_interleaved(samples: &[f32], channel_count: usize, sample_rate: u32) -> Self {
        if channel_count == 0 {
            return Self::new(sample_rate, Vec::new());
        }
        let frames = samples.len() / channel_count;
        let channels = (0..channel_count)
            .map(|c| {
                samples[c..]
                    .iter()
                    .step_by(channel_count)
                    .take(frames)
                    .copied()
                    .collect()
            })
            .collect();
        Self::new(sample_rate, channels)
    }

    /// The channel used for analysis. Empty when the buffer has no channels.
    pub fn first_channel(&self) -> &[f32] {
        self.channels.first().map_or(&[], Vec::as_slice)
    }

    /// Number of frames (samples per channel).
    pub fn num_frames(&self) -> usize {
        self.first_channel().len()
    }

    /// Duration in seconds, or `None` when the sample rate is unknown.
    pub fn duration(&self) -> Option<f64> {
        if self.sample_rate == 0 {
            return None;
        }
        Some(self.num_frames() as f64 / self.sample_rate as f64)
    }

    /// Returns true if the buffer has samples and valid parameters.
    pub fn validate(&self) -> bool {
        self.sample_rate > 0 && !self.channels.is_empty() && self.num_frames() > 0
    }
}
