use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use rodio::{Decoder, Source};

use crate::error::AppError;
use crate::task::BackgroundTask;

/// Encoded audio held in memory for playback and download.
#[derive(Clone, Debug)]
pub struct AudioClip {
    bytes: Arc<Vec<u8>>,
    duration: Option<Duration>,
}

impl AudioClip {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let duration = measure_duration(&bytes);
        Self {
            bytes: Arc::new(bytes),
            duration,
        }
    }

    /// Decodes a `data:<mime>;base64,<payload>` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self, AppError> {
        let payload = uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, payload)| payload.trim())
            .ok_or_else(|| AppError::Audio("Not a base64 data URI".to_string()))?;
        let bytes = BASE64_STANDARD
            .decode(payload)
            .context("Failed decoding base64 audio")
            .map_err(AppError::from)?;
        Ok(Self::from_bytes(bytes))
    }

    /// Same as [`AudioClip::from_data_uri`], on a worker thread. Measuring the
    /// duration of an MP3 decodes the whole stream.
    pub fn spawn_from_data_uri(uri: String) -> BackgroundTask<AudioClip> {
        BackgroundTask::spawn(move || Self::from_data_uri(&uri))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Playback length, when the stream could be decoded.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub(super) fn decoder(&self) -> Result<Decoder<Cursor<Vec<u8>>>, AppError> {
        Decoder::new(Cursor::new(self.bytes.to_vec()))
            .map_err(|err| AppError::Audio(format!("Failed to decode audio stream: {err}")))
    }
}

fn measure_duration(bytes: &[u8]) -> Option<Duration> {
    let decoder = Decoder::new(Cursor::new(bytes.to_vec())).ok()?;
    if let Some(total) = decoder.total_duration() {
        return Some(total);
    }
    let sample_rate = decoder.sample_rate();
    let channels = decoder.channels();
    if sample_rate == 0 || channels == 0 {
        return None;
    }
    let samples = decoder.count();
    let frames = samples as f64 / channels as f64;
    Some(Duration::from_secs_f64(frames / sample_rate as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_payload() {
        let clip = AudioClip::from_data_uri("data:audio/mp3;base64,QUJD").unwrap();
        assert_eq!(clip.bytes(), b"ABC");
    }

    #[test]
    fn garbage_audio_has_no_duration() {
        let clip = AudioClip::from_data_uri("data:audio/mp3;base64,QUJD").unwrap();
        assert_eq!(clip.duration(), None);
        assert!(matches!(clip.decoder(), Err(AppError::Audio(_))));
    }

    #[test]
    fn rejects_non_data_uri() {
        assert!(matches!(
            AudioClip::from_data_uri("https://example.com/speech.mp3"),
            Err(AppError::Audio(_))
        ));
        assert!(AudioClip::from_data_uri("data:audio/mp3,QUJD").is_err());
    }

    #[test]
    fn builds_clip_on_worker_thread() {
        let mut task = AudioClip::spawn_from_data_uri("data:audio/mp3;base64,QUJD".to_string());
        let clip = task.take_blocking().unwrap();
        assert_eq!(clip.bytes(), b"ABC");

        let mut task = AudioClip::spawn_from_data_uri("not a uri".to_string());
        assert!(matches!(task.take_blocking(), Err(AppError::Audio(_))));
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = AudioClip::from_data_uri("data:audio/mp3;base64,@@@").unwrap_err();
        assert!(err.to_string().contains("base64"));
    }
}
