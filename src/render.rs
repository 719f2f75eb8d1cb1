use crate::dispatch::RequestOutcome;

pub const DOWNLOAD_FILE_NAME: &str = "speech.mp3";

/// What the result area shows for a given outcome.
#[derive(Debug, PartialEq, Eq)]
pub enum ResultView<'a> {
    Empty,
    Error(&'a str),
    Audio {
        source: &'a str,
        download_name: &'static str,
    },
}

impl<'a> From<&'a RequestOutcome> for ResultView<'a> {
    fn from(outcome: &'a RequestOutcome) -> Self {
        match outcome {
            RequestOutcome::Idle | RequestOutcome::Loading => Self::Empty,
            RequestOutcome::Failure(message) => Self::Error(message),
            RequestOutcome::Success(uri) => Self::Audio {
                source: uri,
                download_name: DOWNLOAD_FILE_NAME,
            },
        }
    }
}

pub fn submit_label(outcome: &RequestOutcome) -> &'static str {
    if outcome.is_loading() {
        "Generating..."
    } else {
        "Generate Speech"
    }
}
