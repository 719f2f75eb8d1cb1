use std::sync::Arc;

use crate::error::AppError;
use crate::task::BackgroundTask;

/// Backend able to turn text into an audio data URI.
pub trait Synthesizer: Send + Sync {
    fn synthesize(
        &self,
        text: &str,
        language_code: &str,
        voice_code: &str,
    ) -> Result<String, AppError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestOutcome {
    #[default]
    Idle,
    Loading,
    Success(String),
    Failure(String),
}

impl RequestOutcome {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Owns the outcome slot and at most one outstanding synthesis call.
pub struct Dispatcher {
    synthesizer: Arc<dyn Synthesizer>,
    task: Option<BackgroundTask<String>>,
    outcome: RequestOutcome,
}

impl Dispatcher {
    pub fn new(synthesizer: Arc<dyn Synthesizer>) -> Self {
        Self {
            synthesizer,
            task: None,
            outcome: RequestOutcome::Idle,
        }
    }

    pub fn outcome(&self) -> &RequestOutcome {
        &self.outcome
    }

    pub fn in_flight(&self) -> bool {
        self.task.is_some()
    }

    /// Starts a synthesis call. The outcome becomes `Loading` before this
    /// returns. A second call while one is outstanding is refused and leaves
    /// the outcome alone.
    pub fn submit(
        &mut self,
        text: &str,
        language_code: &str,
        voice_code: &str,
    ) -> Result<(), AppError> {
        if self.task.is_some() {
            return Err(AppError::Busy);
        }
        self.outcome = RequestOutcome::Loading;

        let synthesizer = Arc::clone(&self.synthesizer);
        let text = text.to_string();
        let language_code = language_code.to_string();
        let voice_code = voice_code.to_string();
        self.task = Some(BackgroundTask::spawn(move || {
            synthesizer.synthesize(&text, &language_code, &voice_code)
        }));
        Ok(())
    }

    /// Folds a finished call into the outcome. Returns `true` when the outcome
    /// changed.
    pub fn poll(&mut self) -> bool {
        let Some(task) = &mut self.task else {
            return false;
        };
        let Some(result) = task.try_take() else {
            return false;
        };
        self.finish(result);
        true
    }

    #[cfg(test)]
    pub(crate) fn wait(&mut self) {
        if let Some(mut task) = self.task.take() {
            let result = task.take_blocking();
            self.finish(result);
        }
    }

    fn finish(&mut self, result: Result<String, AppError>) {
        self.task = None;
        self.outcome = match result {
            Ok(audio_uri) => {
                log::debug!("Synthesis finished ({} bytes of data URI)", audio_uri.len());
                RequestOutcome::Success(audio_uri)
            }
            Err(err) => {
                log::debug!("Synthesis failed: {err}");
                RequestOutcome::Failure(err.to_string())
            }
        };
    }
}
