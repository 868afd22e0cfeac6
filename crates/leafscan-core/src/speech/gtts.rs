//! Google Translate text-to-speech backend.

use async_trait::async_trait;
use futures::future::try_join_all;

use leafscan_types::models::config::SpeechConfig;
use leafscan_types::{DiagnosisError, Result};

use super::SpeechBackend;
use crate::upstream::{build_http_client, ensure_success, malformed_body, transport_error};

const SERVICE: &str = "speech";

/// Longest text the endpoint accepts per request.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Fetches MP3 audio for each chunk of text from `translate_tts`
/// concurrently and concatenates the results in chunk order.
pub struct GoogleTranslateTts {
    client: reqwest::Client,
    endpoint: String,
    language: String,
}

impl GoogleTranslateTts {
    pub fn new(client: reqwest::Client, config: &SpeechConfig) -> Self {
        Self {
            client,
            endpoint: format!("{}/translate_tts", config.base_url.trim_end_matches('/')),
            language: config.language.clone(),
        }
    }

    pub fn from_config(config: &SpeechConfig) -> std::result::Result<Self, String> {
        Ok(Self::new(build_http_client(config.timeout_secs)?, config))
    }

    async fn fetch_chunk(&self, chunk: &str, idx: usize, total: usize) -> Result<bytes::Bytes> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", self.language.as_str()),
                ("client", "tw-ob"),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;
        let resp = ensure_success(SERVICE, resp).await?;
        let body = resp.bytes().await.map_err(|e| transport_error(SERVICE, &e))?;
        if body.is_empty() {
            return Err(malformed_body(SERVICE, "empty audio body"));
        }
        Ok(body)
    }
}

#[async_trait]
impl SpeechBackend for GoogleTranslateTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(DiagnosisError::UpstreamStatus {
                service: SERVICE.to_string(),
                status: 400,
                message: "nothing to synthesize".to_string(),
            });
        }

        let total = chunks.len();
        let parts = try_join_all(
            chunks.iter().enumerate().map(|(idx, chunk)| self.fetch_chunk(chunk, idx, total)),
        )
        .await?;
        Ok(parts.iter().flat_map(|part| part.iter().copied()).collect())
    }
}

/// Split on word boundaries into chunks of at most `max_chars` characters.
/// Words longer than `max_chars` are cut.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed <= max_chars {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_len = needed;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if word_len <= max_chars {
            current.push_str(word);
            current_len = word_len;
        } else {
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars.max(1)) {
                chunks.push(piece.iter().collect());
            }
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_split_respects_limit_and_words() {
        let text = "For tomato plant, the detected disease is Leaf Mold. The recommended treatment is: \
                    remove infected leaves, improve air circulation and apply a copper based fungicide.";
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= MAX_CHUNK_CHARS);
            assert!(!chunk.starts_with(' ') && !chunk.ends_with(' '));
        }
        assert_eq!(chunks.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_split_cuts_oversized_words() {
        let chunks = split_text(&"a".repeat(250), 100);
        assert_eq!(chunks.iter().map(String::len).collect::<Vec<_>>(), vec![100, 100, 50]);
        assert!(split_text("   ", 100).is_empty());
    }

    #[tokio::test]
    async fn test_synthesize_concatenates_chunks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("client", "tw-ob"))
            .and(query_param("tl", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"MP3".to_vec()))
            .expect(2)
            .mount(&server)
            .await;

        let config = SpeechConfig { base_url: server.uri(), ..SpeechConfig::default() };
        let tts = GoogleTranslateTts::from_config(&config).unwrap();
        let text = format!("{} {}", "word ".repeat(20).trim(), "tail ".repeat(10).trim());
        let audio = tts.synthesize(&text).await.unwrap();
        assert_eq!(audio, b"MP3MP3");
    }

    #[tokio::test]
    async fn test_chunks_are_joined_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("idx", "0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"first".to_vec())
                    .set_delay(std::time::Duration::from_millis(200)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("idx", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"second".to_vec()))
            .mount(&server)
            .await;

        let config = SpeechConfig { base_url: server.uri(), ..SpeechConfig::default() };
        let tts = GoogleTranslateTts::from_config(&config).unwrap();
        let text = format!("{} {}", "word ".repeat(20).trim(), "tail");
        assert_eq!(tts.synthesize(&text).await.unwrap(), b"firstsecond");
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let config = SpeechConfig { base_url: server.uri(), ..SpeechConfig::default() };
        let tts = GoogleTranslateTts::from_config(&config).unwrap();
        let err = tts.synthesize("The potato plant, is detected healthy.").await.unwrap_err();
        assert!(matches!(err, DiagnosisError::UpstreamStatus { status: 503, .. }));
    }
}
