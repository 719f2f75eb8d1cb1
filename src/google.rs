use std::env;

use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::dispatch::Synthesizer;
use crate::error::AppError;

pub const DEFAULT_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
const AUDIO_ENCODING: &str = "MP3";
const DATA_URI_PREFIX: &str = "data:audio/mp3;base64,";

#[derive(Clone)]
pub struct GoogleTtsClient {
    http: Client,
    api_key: String,
    endpoint: String,
}

impl GoogleTtsClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = env::var(API_KEY_VAR).map_err(|_| AppError::MissingApiKey)?;
        Self::with_api_key(api_key)
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, AppError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AppError::MissingApiKey);
        }
        // Transport defaults apply; no explicit timeout.
        let http = Client::builder()
            .build()
            .context("Failed to initialise HTTP client")
            .map_err(AppError::from)?;
        Ok(Self {
            http,
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs one synthesis round trip and returns the audio as an MP3 data URI.
    pub fn synthesize(
        &self,
        text: &str,
        language_code: &str,
        voice_code: &str,
    ) -> Result<String, AppError> {
        let payload = SynthesizeRequest::new(text, language_code, voice_code);
        log::debug!(
            "Synthesizing {} chars with {voice_code} ({language_code})",
            text.chars().count()
        );

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .header(CONTENT_TYPE, "application/json")
            .json(&payload)
            .send()
            .map_err(|err| AppError::Http(err.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("Synthesis endpoint answered {status}");
            return Err(AppError::Synthesis);
        }

        let body = response
            .text()
            .map_err(|err| AppError::Http(err.without_url()))?;
        let parsed: SynthesizeResponse = serde_json::from_str(&body)
            .map_err(|err| AppError::Decode(err.to_string()))?;
        Ok(audio_data_uri(&parsed.audio_content))
    }
}

impl Synthesizer for GoogleTtsClient {
    fn synthesize(
        &self,
        text: &str,
        language_code: &str,
        voice_code: &str,
    ) -> Result<String, AppError> {
        GoogleTtsClient::synthesize(self, text, language_code, voice_code)
    }
}

pub fn audio_data_uri(base64_audio: &str) -> String {
    format!("{DATA_URI_PREFIX}{base64_audio}")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

impl<'a> SynthesizeRequest<'a> {
    pub fn new(text: &'a str, language_code: &'a str, voice_code: &'a str) -> Self {
        Self {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code,
                name: voice_code,
            },
            audio_config: AudioConfig {
                audio_encoding: AUDIO_ENCODING,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::Server) -> GoogleTtsClient {
        GoogleTtsClient::with_api_key("test-key")
            .unwrap()
            .with_endpoint(format!("{}/v1/text:synthesize", server.url()))
    }

    #[test]
    fn request_body_matches_wire_format() {
        let body = serde_json::to_string(&SynthesizeRequest::new(
            "Hello world",
            "en-US",
            "en-US-Neural2-D",
        ))
        .unwrap();
        assert_eq!(
            body,
            r#"{"input":{"text":"Hello world"},"voice":{"languageCode":"en-US","name":"en-US-Neural2-D"},"audioConfig":{"audioEncoding":"MP3"}}"#
        );
    }

    #[test]
    fn blank_api_key_is_rejected() {
        assert!(matches!(
            GoogleTtsClient::with_api_key("   "),
            Err(AppError::MissingApiKey)
        ));
    }

    #[test]
    fn default_endpoint_is_google() {
        let client = GoogleTtsClient::with_api_key("k").unwrap();
        assert_eq!(
            client.endpoint(),
            "https://texttospeech.googleapis.com/v1/text:synthesize"
        );
    }

    #[test]
    fn success_yields_mp3_data_uri() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/text:synthesize")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "input": {"text": "Hello world"},
                "voice": {"languageCode": "en-US", "name": "en-US-Neural2-D"},
                "audioConfig": {"audioEncoding": "MP3"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"audioContent":"QUJD"}"#)
            .create();

        let uri = client_for(&server)
            .synthesize("Hello world", "en-US", "en-US-Neural2-D")
            .unwrap();
        assert_eq!(uri, "data:audio/mp3;base64,QUJD");
        mock.assert();
    }

    #[test]
    fn non_success_status_collapses_to_generic_message() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/v1/text:synthesize")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error":{"message":"API key not valid"}}"#)
            .create();

        let err = client_for(&server)
            .synthesize("Hello", "en-US", "en-US-Neural2-D")
            .unwrap_err();
        assert!(matches!(err, AppError::Synthesis));
        assert_eq!(err.to_string(), "Failed to synthesize speech");
    }

    #[test]
    fn missing_audio_content_is_an_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/v1/text:synthesize")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"timepoints":[]}"#)
            .create();

        let err = client_for(&server)
            .synthesize("Hello", "en-US", "en-US-Neural2-D")
            .unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
        assert!(err.to_string().starts_with("missing field `audioContent`"));
    }

    #[test]
    fn malformed_body_is_an_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/v1/text:synthesize")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>oops</html>")
            .create();

        let err = client_for(&server)
            .synthesize("Hello", "en-US", "en-US-Neural2-D")
            .unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[test]
    fn connection_failure_carries_transport_message() {
        // Port 1 on localhost refuses connections.
        let client = GoogleTtsClient::with_api_key("SECRET-KEY-123")
            .unwrap()
            .with_endpoint("http://127.0.0.1:1/v1/text:synthesize");
        let err = client
            .synthesize("Hello", "en-US", "en-US-Neural2-D")
            .unwrap_err();
        let AppError::Http(inner) = &err else {
            panic!("expected transport error, got {err:?}");
        };
        assert!(inner.is_connect() || inner.is_request());
        assert!(inner.url().is_none());
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn transport_failure_message_hides_api_key() {
        let client = GoogleTtsClient::with_api_key("SECRET-KEY-123")
            .unwrap()
            .with_endpoint("http://127.0.0.1:1/v1/text:synthesize");
        let message = client
            .synthesize("Hello", "en-US", "en-US-Neural2-D")
            .unwrap_err()
            .to_string();
        assert!(!message.is_empty());
        assert!(!message.contains("SECRET-KEY-123"), "key leaked: {message}");
        assert!(!message.contains("key="), "query leaked: {message}");
    }

    #[test]
    fn converted_transport_errors_hide_api_key() {
        let err = AppError::from(
            reqwest::blocking::Client::new()
                .get("http://127.0.0.1:1/?key=SECRET-KEY-123")
                .send()
                .unwrap_err(),
        );
        assert!(!err.to_string().contains("SECRET-KEY-123"));
    }
}
