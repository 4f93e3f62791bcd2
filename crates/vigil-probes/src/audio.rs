//! Synthetic PCM16 audio for the streaming probes.
//!
//! A sine tone will not transcribe to anything meaningful; it exists to
//! exercise the audio path and the event callback flow of the streaming
//! services. Frames are 16-bit signed little-endian mono.

/// Generate a sine tone as PCM16 bytes.
#[must_use]
pub fn tone(frequency_hz: f32, duration_secs: f32, sample_rate: u32, volume: f32) -> Vec<u8> {
    let total_samples = (sample_rate as f32 * duration_secs) as usize;
    let mut pcm = Vec::with_capacity(total_samples * 2);
    for i in 0..total_samples {
        let t = i as f32 / sample_rate as f32;
        let sample = (volume * 32767.0 * (std::f32::consts::TAU * frequency_hz * t).sin()) as i16;
        pcm.extend_from_slice(&sample.to_le_bytes());
    }
    pcm
}

/// Generate silent PCM16 bytes (2 bytes per sample).
#[must_use]
pub fn silence(duration_secs: f32, sample_rate: u32) -> Vec<u8> {
    let total_samples = (sample_rate as f32 * duration_secs) as usize;
    vec![0; total_samples * 2]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{silence, tone};

    #[test]
    fn tone_length_matches_duration() {
        let pcm = tone(440.0, 0.5, 16000, 0.3);
        assert_eq!(pcm.len(), 16000 / 2 * 2);
    }

    #[test]
    fn tone_starts_at_zero_crossing() {
        let pcm = tone(440.0, 0.1, 16000, 0.3);
        let first = i16::from_le_bytes([pcm[0], pcm[1]]);
        assert_eq!(first, 0);
    }

    #[test]
    fn tone_respects_volume_ceiling() {
        let pcm = tone(440.0, 0.2, 16000, 0.3);
        let ceiling = (0.3 * 32767.0) as i16 + 1;
        for chunk in pcm.chunks_exact(2) {
            let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
            assert!(sample.abs() <= ceiling, "sample {sample} above ceiling");
        }
    }

    #[test]
    fn silence_is_all_zero() {
        let pcm = silence(1.0, 16000);
        assert_eq!(pcm.len(), 32000);
        assert!(pcm.iter().all(|&b| b == 0));
    }
}
