// Audio side of chart preparation: decoded sample buffers, decoding, onset detection

pub mod decode;
pub mod onset;
pub mod sample_buffer;
pub mod source;

pub use decode::{DecodeError, decode_file, decode_reader};
pub use onset::{
    Detection, OnsetConfig, OnsetDetector, TempoEstimate, energy_envelope, estimate_tempo,
    pick_peaks,
};
pub use sample_buffer::SampleBuffer;
pub use source::{AudioSource, FileAudioSource};
