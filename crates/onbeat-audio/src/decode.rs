//! Audio file decoding into a planar [`SampleBuffer`].
//!
//! Any container/codec enabled in symphonia's features (wav, flac, mp3) is accepted.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Channels, SampleBuffer as InterleavedBuffer, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::sample_buffer::SampleBuffer;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Symphonia(#[from] SymphoniaError),
    #[error("no supported audio tracks found in source")]
    NoSupportedTracks,
    #[error("decoded audio contains no samples")]
    Empty,
    #[error("audio source unavailable: {0}")]
    Unavailable(String),
    #[error("decode worker failed: {0}")]
    Worker(String),
}

/// Decodes the audio file at `path`.
pub fn decode_file(path: &Path) -> Result<SampleBuffer, DecodeError> {
    let file = File::open(path)?;
    decode_reader(file, path.extension().and_then(|e| e.to_str()))
}

/// Decodes audio from any media source. `extension` is a probe hint.
pub fn decode_reader<R>(reader: R, extension: Option<&str>) -> Result<SampleBuffer, DecodeError>
where
    R: MediaSource + 'static,
{
    let mss = MediaSourceStream::new(Box::new(reader), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut format = probed.format;
    let (codec_params, track_id) = {
        let track = format
            .default_track()
            .ok_or(DecodeError::NoSupportedTracks)?;
        (track.codec_params.clone(), track.id)
    };

    let mut decoder =
        symphonia::default::get_codecs().make(&codec_params, &DecoderOptions::default())?;

    let channel_count = codec_params
        .channels
        .unwrap_or(Channels::FRONT_LEFT)
        .count();
    let mut sample_rate = codec_params.sample_rate.unwrap_or(0);
    let mut channel_data = vec![Vec::new(); channel_count];
    let mut interleaved: Option<InterleavedBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                log::debug!("skipping undecodable packet: {e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if sample_rate == 0 {
            sample_rate = decoded.spec().rate;
        }

        match decoded {
            AudioBufferRef::F32(buffer) => {
                for (c, data) in channel_data.iter_mut().enumerate() {
                    data.extend_from_slice(buffer.chan(c));
                }
            }
            other => {
                let buf = interleaved.get_or_insert_with(|| {
                    InterleavedBuffer::<f32>::new(other.capacity() as u64, *other.spec())
                });
                buf.copy_interleaved_ref(other);
                let samples = buf.samples();
                let frames = samples.len() / channel_count;
                for (c, data) in channel_data.iter_mut().enumerate() {
                    data.extend(
                        samples[c..]
                            .iter()
                            .step_by(channel_count)
                            .take(frames)
                            .copied(),
                    );
                }
            }
        }
    }

    let buffer = SampleBuffer::new(sample_rate, channel_data);
    if !buffer.validate() {
        return Err(DecodeError::Empty);
    }
    log::debug!(
        "decoded {} frames x {} channels at {} Hz",
        buffer.num_frames(),
        buffer.channels.len(),
        buffer.sample_rate
    );
    Ok(buffer)
}
