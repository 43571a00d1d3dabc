use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use vaani::application::ports::{SpeechSpeed, SpeechSynthesizer, SynthesisError};
use vaani::infrastructure::speech::{
    GoogleTranslateTts, MAX_CHUNK_CHARS, extract_audio, package_rpc, split_text,
};

const RPC_PATH: &str = "/_/TranslateWebserverUi/data/batchexecute";

fn batchexecute_body(audio: &[u8]) -> String {
    format!(
        ")]}}'\n\n123\n[[\"wrb.fr\",\"jQ1olc\",\"[\\\"{}\\\"]\",null,null,null,\"generic\"]]\n",
        STANDARD.encode(audio)
    )
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    requests: Arc<Mutex<Vec<String>>>,
}

async fn mock_batchexecute(
    State(state): State<MockState>,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let request = form.get("f.req").cloned().unwrap_or_default();
    let index = {
        let mut requests = state.requests.lock().unwrap();
        requests.push(request);
        requests.len()
    };
    if !state.status.is_success() {
        return (state.status, "quota exceeded".to_string()).into_response();
    }
    (StatusCode::OK, batchexecute_body(format!("mp3-{index};").as_bytes())).into_response()
}

async fn start_mock_tts_server(
    status: StatusCode,
) -> (String, Arc<Mutex<Vec<String>>>, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route(RPC_PATH, post(mock_batchexecute))
        .with_state(MockState {
            status,
            requests: requests.clone(),
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, requests, shutdown_tx)
}

#[tokio::test]
async fn given_short_text_when_synthesizing_then_returns_decoded_audio() {
    let (base_url, requests, shutdown_tx) = start_mock_tts_server(StatusCode::OK).await;
    let tts = GoogleTranslateTts::new(&base_url, Duration::from_secs(5)).unwrap();

    let audio = tts.synthesize("TOTAL 42", "en", SpeechSpeed::Normal).await.unwrap();

    assert_eq!(audio, b"mp3-1;");
    let requests = requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].contains("jQ1olc"));
    assert!(requests[0].contains("TOTAL 42"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_long_text_when_synthesizing_then_concatenates_chunk_audio() {
    let (base_url, requests, shutdown_tx) = start_mock_tts_server(StatusCode::OK).await;
    let tts = GoogleTranslateTts::new(&base_url, Duration::from_secs(5)).unwrap();
    let text = "word ".repeat(50);

    let audio = tts.synthesize(&text, "en", SpeechSpeed::Normal).await.unwrap();

    assert_eq!(requests.lock().unwrap().len(), 3);
    assert_eq!(audio, b"mp3-1;mp3-2;mp3-3;");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_error_status_when_synthesizing_then_returns_api_request_failed() {
    let (base_url, _requests, shutdown_tx) =
        start_mock_tts_server(StatusCode::TOO_MANY_REQUESTS).await;
    let tts = GoogleTranslateTts::new(&base_url, Duration::from_secs(5)).unwrap();

    let result = tts.synthesize("hello", "hi", SpeechSpeed::Normal).await;

    assert!(matches!(result, Err(SynthesisError::ApiRequestFailed(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_blank_text_when_synthesizing_then_returns_no_text_without_calling_api() {
    let (base_url, requests, shutdown_tx) = start_mock_tts_server(StatusCode::OK).await;
    let tts = GoogleTranslateTts::new(&base_url, Duration::from_secs(5)).unwrap();

    let result = tts.synthesize("  ... ", "en", SpeechSpeed::Normal).await;

    assert!(matches!(result, Err(SynthesisError::NoText)));
    assert!(requests.lock().unwrap().is_empty());
    shutdown_tx.send(()).ok();
}

#[test]
fn given_normal_speed_when_packaging_rpc_then_speed_is_null() {
    let rpc = package_rpc("hello", "en", SpeechSpeed::Normal).unwrap();

    assert_eq!(
        rpc,
        r#"[[["jQ1olc","[\"hello\",\"en\",null,\"null\"]",null,"generic"]]]"#
    );
}

#[test]
fn given_slow_speed_when_packaging_rpc_then_speed_is_true() {
    let rpc = package_rpc("hello", "ta", SpeechSpeed::Slow).unwrap();

    assert!(rpc.contains(r#"\"ta\",true,"#));
}

#[test]
fn given_batchexecute_response_when_extracting_then_decodes_payload() {
    let body = batchexecute_body(b"\xff\xfbaudio");

    assert_eq!(extract_audio(&body).unwrap(), b"\xff\xfbaudio");
}

#[test]
fn given_response_without_audio_when_extracting_then_returns_invalid_response() {
    let result = extract_audio(")]}'\n\n[[\"wrb.fr\",\"other\",null]]");

    assert!(matches!(result, Err(SynthesisError::InvalidResponse(_))));
}

#[test]
fn given_short_sentences_when_splitting_then_keeps_each_sentence() {
    let chunks = split_text("Hello there. How are you?", MAX_CHUNK_CHARS);

    assert_eq!(chunks, vec!["Hello there.", "How are you?"]);
}

#[test]
fn given_decimal_number_when_splitting_then_keeps_number_intact() {
    let chunks = split_text("Total 42.50 due", MAX_CHUNK_CHARS);

    assert_eq!(chunks, vec!["Total 42.50 due"]);
}

#[test]
fn given_devanagari_danda_when_splitting_then_breaks_sentences() {
    let chunks = split_text("नमस्ते। आप कैसे हैं", MAX_CHUNK_CHARS);

    assert_eq!(chunks, vec!["नमस्ते।", "आप कैसे हैं"]);
}

#[test]
fn given_long_sentence_when_splitting_then_every_chunk_fits() {
    let text = "alpha beta gamma delta ".repeat(20);

    let chunks = split_text(&text, 30);

    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|c| c.chars().count() <= 30));
    assert_eq!(chunks.join(" "), text.trim());
}

#[test]
fn given_word_longer_than_limit_when_splitting_then_word_is_cut() {
    let chunks = split_text("abcdefghij", 4);

    assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
}

#[test]
fn given_only_punctuation_when_splitting_then_returns_nothing() {
    assert!(split_text(" .. !! ", MAX_CHUNK_CHARS).is_empty());
}
