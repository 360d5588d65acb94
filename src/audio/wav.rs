//! WAV assembly and decoding

use crate::speech::AudioResult;
use crate::{Result, StenoError};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, warn};
use std::borrow::Cow;
use std::io::Cursor;

/// Header used when synthesis fails before any audio arrives
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;
pub const DEFAULT_SAMPLE_WIDTH: u16 = 2;
pub const DEFAULT_CHANNELS: u16 = 1;

fn spec_for(sample_rate: u32, sample_width: u16, channels: u16) -> Result<WavSpec> {
    if !(1..=4).contains(&sample_width) {
        return Err(StenoError::Speech(format!(
            "Unsupported sample width: {} bytes",
            sample_width
        )));
    }
    Ok(WavSpec {
        channels,
        sample_rate,
        bits_per_sample: sample_width * 8,
        sample_format: SampleFormat::Int,
    })
}

/// Incrementally builds a WAV file from audio chunks
///
/// The format is fixed by the first chunk. `finish` always leaves a valid
/// header in the target buffer, falling back to 22050 Hz / 16-bit / mono when
/// no chunk was pushed.
pub struct WavAssembler<'a> {
    target: Option<&'a mut Vec<u8>>,
    writer: Option<WavWriter<Cursor<&'a mut Vec<u8>>>>,
    sample_width: usize,
}

impl<'a> WavAssembler<'a> {
    pub fn new(target: &'a mut Vec<u8>) -> Self {
        Self {
            target: Some(target),
            writer: None,
            sample_width: 0,
        }
    }

    /// Has the header been written?
    pub fn has_header(&self) -> bool {
        self.writer.is_some()
    }

    fn open(&mut self, spec: WavSpec) -> Result<()> {
        let target = self
            .target
            .take()
            .ok_or_else(|| StenoError::Other("WAV target already in use".into()))?;
        target.clear();
        debug!(
            "WAV format: {} Hz, {} bits, {} channel(s)",
            spec.sample_rate, spec.bits_per_sample, spec.channels
        );
        self.sample_width = (spec.bits_per_sample / 8) as usize;
        self.writer = Some(WavWriter::new(Cursor::new(target), spec)?);
        Ok(())
    }

    /// Append a chunk's frames
    pub fn push(&mut self, chunk: &AudioResult) -> Result<()> {
        if self.writer.is_none() {
            self.open(spec_for(
                chunk.sample_rate_hz,
                chunk.sample_width_bytes,
                chunk.num_channels,
            )?)?;
        } else if chunk.sample_width_bytes as usize != self.sample_width {
            warn!(
                "Chunk declares {}-byte samples, WAV is {}-byte; writing as-is",
                chunk.sample_width_bytes, self.sample_width
            );
        }

        let width = self.sample_width;
        let writer = match self.writer.as_mut() {
            Some(writer) => writer,
            None => return Ok(()),
        };

        let frames = chunk.audio_bytes.chunks_exact(width);
        if !frames.remainder().is_empty() {
            warn!("Dropping {} trailing bytes", frames.remainder().len());
        }
        for sample in frames {
            match sample {
                [b] => writer.write_sample(b.wrapping_sub(128) as i8)?,
                [a, b] => writer.write_sample(i16::from_le_bytes([*a, *b]))?,
                [a, b, c] => {
                    let sign = if c & 0x80 != 0 { 0xFF } else { 0x00 };
                    writer.write_sample(i32::from_le_bytes([*a, *b, *c, sign]))?
                }
                [a, b, c, d] => writer.write_sample(i32::from_le_bytes([*a, *b, *c, *d]))?,
                _ => unreachable!("sample width is checked when the header is written"),
            }
        }
        Ok(())
    }

    /// Finalize the header, writing defaults if no chunk arrived
    pub fn finish(mut self) -> Result<()> {
        if self.writer.is_none() {
            self.open(spec_for(
                DEFAULT_SAMPLE_RATE,
                DEFAULT_SAMPLE_WIDTH,
                DEFAULT_CHANNELS,
            )?)?;
        }
        if let Some(writer) = self.writer.take() {
            writer.finalize()?;
        }
        Ok(())
    }
}

/// Clamp the RIFF and `data` sizes to the bytes actually present
///
/// A WAV written to a pipe cannot have its header patched afterwards, so the
/// sizes are placeholders (espeak-ng writes `0x7ffff000` for `data`). A
/// trailing partial frame is dropped.
fn clamp_stream_sizes(bytes: &[u8]) -> Cow<'_, [u8]> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Cow::Borrowed(bytes);
    }

    let mut block_align = 1;
    let mut pos = 12;
    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let size = u32::from_le_bytes([
            bytes[pos + 4],
            bytes[pos + 5],
            bytes[pos + 6],
            bytes[pos + 7],
        ]) as usize;
        let body = pos + 8;

        if id == b"fmt " && body + 14 <= bytes.len() {
            let align = u16::from_le_bytes([bytes[body + 12], bytes[body + 13]]);
            block_align = usize::from(align).max(1);
        } else if id == b"data" {
            let available = bytes.len() - body;
            if size <= available {
                return Cow::Borrowed(bytes);
            }
            let actual = available - available % block_align;
            debug!(
                "WAV data chunk claims {} bytes, {} present; clamping",
                size, actual
            );
            let mut patched = bytes[..body + actual].to_vec();
            patched[pos + 4..pos + 8].copy_from_slice(&(actual as u32).to_le_bytes());
            let riff_len = (patched.len() - 8) as u32;
            patched[4..8].copy_from_slice(&riff_len.to_le_bytes());
            return Cow::Owned(patched);
        }

        pos = body.saturating_add(size).saturating_add(size % 2);
    }
    Cow::Borrowed(bytes)
}

/// Decode a WAV file into a single chunk
///
/// Streamed WAVs whose header sizes were never filled in are accepted; the
/// samples present are decoded.
pub fn decode_wav(bytes: &[u8]) -> Result<AudioResult> {
    let bytes = clamp_stream_sizes(bytes);
    let mut reader = WavReader::new(Cursor::new(bytes.as_ref()))?;
    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int {
        return Err(StenoError::Speech("Float WAV output is not supported".into()));
    }

    let width = (spec.bits_per_sample + 7) / 8;
    let capacity = (reader.len() as usize)
        .saturating_mul(width as usize)
        .min(bytes.len());
    let mut audio_bytes = Vec::with_capacity(capacity);
    match width {
        1 => {
            for s in reader.samples::<i8>() {
                audio_bytes.push((s? as u8).wrapping_add(128));
            }
        }
        2 => {
            for s in reader.samples::<i16>() {
                audio_bytes.extend_from_slice(&s?.to_le_bytes());
            }
        }
        3 | 4 => {
            for s in reader.samples::<i32>() {
                audio_bytes.extend_from_slice(&s?.to_le_bytes()[..width as usize]);
            }
        }
        other => {
            return Err(StenoError::Speech(format!(
                "Unsupported sample width: {} bytes",
                other
            )))
        }
    }

    Ok(AudioResult {
        sample_rate_hz: spec.sample_rate,
        sample_width_bytes: width,
        num_channels: spec.channels,
        audio_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(rate: u32, width: u16, bytes: &[u8]) -> AudioResult {
        AudioResult {
            sample_rate_hz: rate,
            sample_width_bytes: width,
            num_channels: 1,
            audio_bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_default_header_without_chunks() {
        let mut wav = Vec::new();
        WavAssembler::new(&mut wav).finish().unwrap();

        let reader = WavReader::new(Cursor::new(&wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, 22050);
        assert_eq!(reader.spec().bits_per_sample, 16);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 0);
    }

    #[test]
    fn test_first_chunk_fixes_format() {
        let mut wav = Vec::new();
        let mut assembler = WavAssembler::new(&mut wav);
        assembler.push(&chunk(16000, 2, &[1, 0, 2, 0])).unwrap();
        assert!(assembler.has_header());
        assembler.push(&chunk(44100, 2, &[3, 0])).unwrap();
        assembler.finish().unwrap();

        let mut reader = WavReader::new(Cursor::new(&wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_keeps_pcm_bytes() {
        let mut wav = Vec::new();
        let mut assembler = WavAssembler::new(&mut wav);
        assembler.push(&chunk(22050, 2, &[0x10, 0xFF, 0x00, 0x01])).unwrap();
        assembler.finish().unwrap();

        let decoded = decode_wav(&wav).unwrap();
        assert_eq!(decoded, chunk(22050, 2, &[0x10, 0xFF, 0x00, 0x01]));
    }

    #[test]
    fn test_eight_bit_is_unsigned() {
        let mut wav = Vec::new();
        let mut assembler = WavAssembler::new(&mut wav);
        assembler.push(&chunk(8000, 1, &[0, 128, 255])).unwrap();
        assembler.finish().unwrap();

        assert_eq!(decode_wav(&wav).unwrap().audio_bytes, vec![0, 128, 255]);
    }

    #[test]
    fn test_bad_width_rejected() {
        let mut wav = Vec::new();
        let mut assembler = WavAssembler::new(&mut wav);
        assert!(assembler.push(&chunk(8000, 5, &[0; 5])).is_err());
        assert!(!assembler.has_header());
    }

    /// Header as espeak-ng writes it to stdout, sizes left as placeholders
    fn streamed_wav(pcm: &[u8]) -> Vec<u8> {
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&0x7fff_f024u32.to_le_bytes());
        wav.extend_from_slice(b"WAVEfmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&22050u32.to_le_bytes());
        wav.extend_from_slice(&44100u32.to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&0x7fff_f000u32.to_le_bytes());
        wav.extend_from_slice(pcm);
        wav
    }

    #[test]
    fn test_decode_streamed_header() {
        let pcm = [0x01, 0x00, 0xFF, 0xFF, 0x00, 0x10, 0x34, 0x12];
        let decoded = decode_wav(&streamed_wav(&pcm)).unwrap();
        assert_eq!(decoded, chunk(22050, 2, &pcm));
        assert!(decoded.audio_bytes.capacity() < 1024);
    }

    #[test]
    fn test_decode_streamed_partial_frame() {
        let decoded = decode_wav(&streamed_wav(&[0x01, 0x00, 0x02])).unwrap();
        assert_eq!(decoded.audio_bytes, vec![0x01, 0x00]);
    }

    #[test]
    fn test_decode_streamed_no_samples() {
        let decoded = decode_wav(&streamed_wav(&[])).unwrap();
        assert_eq!(decoded.sample_rate_hz, 22050);
        assert!(decoded.audio_bytes.is_empty());
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(decode_wav(b"not a wav"), Err(StenoError::Wav(_))));
    }
}
