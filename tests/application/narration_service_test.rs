use std::time::Duration;

use vaani::application::services::NarrationError;
use vaani::domain::UploadedImage;

use crate::support::{CountingRecognizerFactory, FAKE_AUDIO, TestApp};

#[tokio::test]
async fn given_supported_language_when_narrating_then_returns_text_and_audio_name() {
    let app = TestApp::new(CountingRecognizerFactory::new(&["नमस्ते", "दुनिया"]));

    let narration = app
        .state
        .narration
        .narrate(UploadedImage::new("poster.jpeg", b"img".to_vec()), "hi")
        .await
        .unwrap();

    assert_eq!(narration.text.as_str(), "नमस्ते दुनिया");
    assert_eq!(narration.audio.as_str(), "poster_hi.mp3");
    let written = std::fs::read(app.audio_dir.path().join("poster_hi.mp3")).unwrap();
    assert_eq!(written, FAKE_AUDIO);
}

#[tokio::test]
async fn given_successful_narration_when_finished_then_upload_is_removed() {
    let app = TestApp::new(CountingRecognizerFactory::new(&["text"]));

    app.state
        .narration
        .narrate(UploadedImage::new("a.png", b"img".to_vec()), "en")
        .await
        .unwrap();

    assert_eq!(app.uploads_on_disk(), 0);
}

#[tokio::test]
async fn given_unsupported_language_when_narrating_then_nothing_is_written() {
    let app = TestApp::new(CountingRecognizerFactory::new(&["text"]));

    let result = app
        .state
        .narration
        .narrate(UploadedImage::new("a.png", b"img".to_vec()), "fr")
        .await;

    assert!(matches!(result, Err(NarrationError::InvalidLanguage(_))));
    assert!(result.unwrap_err().is_invalid_language());
    assert_eq!(app.uploads_on_disk(), 0);
    assert_eq!(app.audio_on_disk(), 0);
}

#[tokio::test]
async fn given_blank_recognition_when_narrating_then_fails_with_synthesis_error() {
    let app = TestApp::new(CountingRecognizerFactory::new(&[]));

    let result = app
        .state
        .narration
        .narrate(UploadedImage::new("blank.png", b"img".to_vec()), "en")
        .await;

    assert!(matches!(result, Err(NarrationError::Synthesis(_))));
    assert_eq!(app.uploads_on_disk(), 0);
}

#[tokio::test]
async fn given_bengali_request_when_narrating_then_synthesizes_with_bengali_locale() {
    let app = TestApp::new(CountingRecognizerFactory::new(&["আমি"]));

    app.state
        .narration
        .narrate(UploadedImage::new("page.png", b"img".to_vec()), "bn")
        .await
        .unwrap();

    let calls = app.synthesizer.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![("আমি".to_string(), "bn".to_string())]);
}

#[tokio::test]
async fn given_request_dropped_during_recognizer_load_when_waiting_then_upload_is_removed() {
    let app = TestApp::new(
        CountingRecognizerFactory::new(&["text"]).with_delay(Duration::from_millis(500)),
    );

    let result = tokio::time::timeout(
        Duration::from_millis(100),
        app.state
            .narration
            .narrate(UploadedImage::new("slow.png", b"img".to_vec()), "ta"),
    )
    .await;
    assert!(result.is_err());

    tokio::time::sleep(Duration::from_millis(700)).await;

    assert_eq!(app.uploads_on_disk(), 0);
    assert_eq!(app.audio_on_disk(), 0);
}
