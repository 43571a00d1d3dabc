use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use regex::Regex;
use reqwest::Client;
use serde_json::{Value, json};

use crate::application::ports::{SpeechSpeed, SpeechSynthesizer, SynthesisError};

/// Longest text Google Translate will speak in one request.
pub const MAX_CHUNK_CHARS: usize = 100;

const RPC_ID: &str = "jQ1olc";
const RPC_PATH: &str = "/_/TranslateWebserverUi/data/batchexecute";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

static AUDIO_PAYLOAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"jQ1olc","\[\\"(.*)\\"]"#).unwrap());

/// Sentence boundaries, including the Devanagari danda used by hi/mr/bn.
const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', ';', ':', '।', '॥', '？', '！', '。'];

/// Speech through the Google Translate web TTS endpoint, the same one the
/// `gTTS` library drives.
pub struct GoogleTranslateTts {
    client: Client,
    base_url: String,
}

impl GoogleTranslateTts {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SynthesisError::ApiRequestFailed(format!("client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Public endpoint for a Google top-level domain such as `com` or `co.in`.
    pub fn for_tld(tld: &str, timeout: Duration) -> Result<Self, SynthesisError> {
        Self::new(&format!("https://translate.google.{tld}"), timeout)
    }

    async fn speak_chunk(
        &self,
        chunk: &str,
        locale: &str,
        speed: SpeechSpeed,
    ) -> Result<Vec<u8>, SynthesisError> {
        let url = format!("{}{}", self.base_url, RPC_PATH);
        let rpc = package_rpc(chunk, locale, speed)?;

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::REFERER, format!("{}/", self.base_url))
            .form(&[("f.req", rpc)])
            .send()
            .await
            .map_err(|e| SynthesisError::ApiRequestFailed(format!("request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::ApiRequestFailed(format!(
                "status {status}: {body}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SynthesisError::ApiRequestFailed(format!("body: {e}")))?;

        extract_audio(&body)
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(
        &self,
        text: &str,
        locale: &str,
        speed: SpeechSpeed,
    ) -> Result<Vec<u8>, SynthesisError> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SynthesisError::NoText);
        }

        tracing::debug!(locale, chunks = chunks.len(), ?speed, "Requesting speech");

        let mut audio = Vec::new();
        for chunk in &chunks {
            let part = self.speak_chunk(chunk, locale, speed).await?;
            audio.extend_from_slice(&part);
        }

        tracing::info!(locale, bytes = audio.len(), "Speech synthesis completed");

        Ok(audio)
    }
}

/// Builds the `f.req` form value for one chunk.
pub fn package_rpc(
    text: &str,
    locale: &str,
    speed: SpeechSpeed,
) -> Result<String, SynthesisError> {
    let speed = match speed {
        SpeechSpeed::Normal => Value::Null,
        SpeechSpeed::Slow => Value::Bool(true),
    };
    let parameter = serde_json::to_string(&json!([text, locale, speed, "null"]))
        .map_err(|e| SynthesisError::InvalidResponse(format!("encode: {e}")))?;
    serde_json::to_string(&json!([[[RPC_ID, parameter, Value::Null, "generic"]]]))
        .map_err(|e| SynthesisError::InvalidResponse(format!("encode: {e}")))
}

/// Pulls the base64 MP3 payload out of a batchexecute response.
pub fn extract_audio(body: &str) -> Result<Vec<u8>, SynthesisError> {
    let line = body
        .lines()
        .find(|line| line.contains(RPC_ID))
        .ok_or_else(|| SynthesisError::InvalidResponse("no audio in response".to_string()))?;

    let encoded = AUDIO_PAYLOAD
        .captures(line)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| SynthesisError::InvalidResponse("unrecognized audio payload".to_string()))?;

    general_purpose::STANDARD
        .decode(encoded.as_str())
        .map_err(|e| SynthesisError::InvalidResponse(format!("audio payload: {e}")))
}

/// Splits text into speakable chunks of at most `max_chars` characters.
///
/// Sentences are kept whole where they fit; longer ones are packed word by
/// word, and a single word longer than the limit is cut. Chunks with nothing
/// to pronounce are dropped.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();

    for sentence in sentences(text) {
        let sentence = sentence.split_whitespace().collect::<Vec<_>>().join(" ");
        if sentence.chars().count() <= max_chars {
            chunks.push(sentence);
        } else {
            pack_words(&sentence, max_chars, &mut chunks);
        }
    }

    chunks.retain(|chunk| chunk.chars().any(char::is_alphanumeric));
    chunks
}

// A terminator only ends a sentence when followed by whitespace or the end of
// the text, so "42.50" stays in one piece.
fn sentences(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !SENTENCE_TERMINATORS.contains(&c) {
            continue;
        }
        if chars.peek().is_none_or(|(_, next)| next.is_whitespace()) {
            let end = i + c.len_utf8();
            pieces.push(&text[start..end]);
            start = end;
        }
    }

    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn pack_words(sentence: &str, max_chars: usize, chunks: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0;

    for word in sentence.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            chunks.extend(chars.chunks(max_chars).map(|c| c.iter().collect::<String>()));
            continue;
        }

        let needed = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
}
