//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycles against a fake language model.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arabic_tutor::{
    api::create_router,
    cache::{derive_key, CacheStore},
    gemini::{GenerateContentRequest, GenerateContentResponse, LanguageModel, ModelError},
    services::{CHAT_ERROR_MESSAGE, CHAT_HISTORY_KEY, SAVED_KEYWORDS_KEY},
    storage::{FileStorage, KeyValueStorage, MemoryStorage, SharedStorage},
    AppState, Config,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tokio_test::assert_ok;
use tower::ServiceExt;

// == Fake Model ==

const TRANSLATION: &str = r#"{"arabic": "أَكَلْتُ", "translit": "akaltu", "explanation": [{"arabic": "أَكَلْتُ", "translit": "akaltu", "indonesian": "saya makan"}]}"#;

const KEYWORDS: &str = r#"{"keywords": [{"indonesian": "Makan", "translation": {"arabic": "أَكَلَ", "translit": "akala"}, "type": "fi'il", "root": {"arabic": "أ ك ل", "translit": "a-k-l"}, "verbForms": {"madhi": {"arabic": "أَكَلَ", "translit": "akala"}, "mudhari": {"arabic": "يَأْكُلُ", "translit": "ya'kulu"}, "amr": {"arabic": "كُلْ", "translit": "kul"}}}]}"#;

/// Answers by request shape: speech, keyword schema, translation schema or plain text.
#[derive(Default)]
struct FakeModel {
    speech_calls: AtomicUsize,
    fail_text: bool,
}

impl FakeModel {
    fn failing() -> Self {
        Self {
            fail_text: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn generate_content(
        &self,
        _model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ModelError> {
        let text = request
            .contents
            .last()
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.clone())
            .unwrap_or_default();
        let config = request.generation_config.as_ref();

        if config.and_then(|c| c.speech_config.as_ref()).is_some() {
            self.speech_calls.fetch_add(1, Ordering::SeqCst);
            return Ok(GenerateContentResponse::from_audio(
                "audio/L16;codec=pcm;rate=24000",
                format!("audio-for-{}", text.chars().count()),
            ));
        }

        if self.fail_text {
            return Err(ModelError::Api {
                status: 503,
                message: "model overloaded".to_string(),
            });
        }

        match config.and_then(|c| c.response_schema.as_ref()) {
            Some(schema) if schema["properties"].get("keywords").is_some() => {
                Ok(GenerateContentResponse::from_text(KEYWORDS))
            }
            Some(_) => Ok(GenerateContentResponse::from_text(TRANSLATION)),
            None => Ok(GenerateContentResponse::from_text(
                "Akhiran **تُ** berarti *saya*.",
            )),
        }
    }
}

// == Helper Functions ==

fn create_app(storage: SharedStorage, model: Arc<FakeModel>) -> Router {
    create_router(AppState::new(storage, model, &Config::default()))
}

fn create_test_app() -> (Router, SharedStorage, Arc<FakeModel>) {
    let storage = SharedStorage::new(MemoryStorage::new());
    let model = Arc::new(FakeModel::default());
    (create_app(storage.clone(), model.clone()), storage, model)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = assert_ok!(app.clone().oneshot(request).await);
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

// == Health ==

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

// == Speech and Cache ==

#[tokio::test]
async fn test_speech_is_cached_on_second_request() {
    let (app, _, model) = create_test_app();

    let (status, first) = send(&app, "POST", "/speech", Some(r#"{"text":"مرحبا"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["cached"], false);
    assert_eq!(first["text"], "مرحبا");

    let (status, second) = send(&app, "POST", "/speech", Some(r#"{"text":"مرحبا"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["cached"], true);
    assert_eq!(second["audio"], first["audio"]);

    assert_eq!(model.speech_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_speech_empty_text_rejected() {
    let (app, _, model) = create_test_app();

    let (status, json) = send(&app, "POST", "/speech", Some(r#"{"text":"   "}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("empty"));
    assert_eq!(model.speech_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_json_request() {
    let (app, _, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/speech")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_cache_stats_and_clear() {
    let (app, storage, _) = create_test_app();

    send(&app, "POST", "/speech", Some(r#"{"text":"Hello"}"#)).await;
    send(&app, "POST", "/speech", Some(r#"{"text":"Goodbye"}"#)).await;
    send(&app, "POST", "/sessions", None).await;

    let (status, stats) = send(&app, "GET", "/cache/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["count"], 2);
    let keys: Vec<&str> = stats["keys"]
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k.as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["audio_cache_v1_15fz5e", "audio_cache_v1_uyci5t"]);
    assert_eq!(derive_key("Hello"), "audio_cache_v1_15fz5e");

    let (status, cleared) = send(&app, "DELETE", "/cache", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["removed"], 2);

    let (_, stats) = send(&app, "GET", "/cache/stats", None).await;
    assert_eq!(stats["count"], 0);

    // Chat history lives outside the cache namespace
    assert!(storage.get(CHAT_HISTORY_KEY).unwrap().is_some());
}

#[tokio::test]
async fn test_cache_capacity_through_api() {
    let storage = SharedStorage::new(MemoryStorage::new());
    let model = Arc::new(FakeModel::default());
    let config = Config {
        cache_max_entries: 3,
        ..Config::default()
    };
    let app = create_router(AppState::new(storage, model.clone(), &config));

    for text in ["satu", "dua", "tiga", "empat", "lima"] {
        let body = format!(r#"{{"text":"{}"}}"#, text);
        let (status, _) = send(&app, "POST", "/speech", Some(&body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, stats) = send(&app, "GET", "/cache/stats", None).await;
    assert_eq!(stats["count"], 3);
}

#[tokio::test]
async fn test_cache_survives_restart_with_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    {
        let storage = SharedStorage::new(FileStorage::open(&path, None).unwrap());
        let app = create_app(storage, Arc::new(FakeModel::default()));
        let (_, json) = send(&app, "POST", "/speech", Some(r#"{"text":"شُكْرًا"}"#)).await;
        assert_eq!(json["cached"], false);
    }

    let storage = SharedStorage::new(FileStorage::open(&path, None).unwrap());
    let mut cache = CacheStore::new(storage.clone());
    assert!(cache.get("شُكْرًا").is_some());

    let model = Arc::new(FakeModel::default());
    let app = create_app(storage, model.clone());
    let (_, json) = send(&app, "POST", "/speech", Some(r#"{"text":"شُكْرًا"}"#)).await;
    assert_eq!(json["cached"], true);
    assert_eq!(model.speech_calls.load(Ordering::SeqCst), 0);
}

// == Sessions ==

#[tokio::test]
async fn test_session_lifecycle() {
    let (app, _, _) = create_test_app();

    let (status, session) = send(&app, "POST", "/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["title"], "Percakapan Baru");
    assert_eq!(session["messages"].as_array().unwrap().len(), 0);
    let id = session["id"].as_str().unwrap().to_string();

    let (status, reply) = send(
        &app,
        "POST",
        &format!("/sessions/{}/messages", id),
        Some(r#"{"text":"Saya makan","mode":"translate"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["author"], "ai");
    assert_eq!(reply["content"]["translit"], "akaltu");
    assert_eq!(reply["content"]["keywords"][0]["type"], "fi'il");

    let (status, reply) = send(
        &app,
        "POST",
        &format!("/sessions/{}/messages", id),
        Some(r#"{"text":"Kenapa ada tu?","mode":"ask"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["content"], "Akhiran **تُ** berarti *saya*.");

    let (status, fetched) = send(&app, "GET", &format!("/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Saya makan");
    assert_eq!(fetched["messages"].as_array().unwrap().len(), 4);
    assert_eq!(fetched["messages"][0]["author"], "user");
    assert_eq!(fetched["messages"][0]["content"], "Saya makan");

    let (status, _) = send(&app, "DELETE", &format!("/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sessions_listed_newest_first() {
    let (app, _, _) = create_test_app();

    let (_, first) = send(&app, "POST", "/sessions", None).await;
    let (_, second) = send(&app, "POST", "/sessions", None).await;

    let (status, list) = send(&app, "GET", "/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], second["id"]);
    assert_eq!(list[1]["id"], first["id"]);
}

#[tokio::test]
async fn test_message_to_unknown_session() {
    let (app, _, _) = create_test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/sessions/missing/messages",
        Some(r#"{"text":"Halo"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_model_failure_yields_apology_message() {
    let storage = SharedStorage::new(MemoryStorage::new());
    let app = create_app(storage, Arc::new(FakeModel::failing()));

    let (_, session) = send(&app, "POST", "/sessions", None).await;
    let id = session["id"].as_str().unwrap();

    let (status, reply) = send(
        &app,
        "POST",
        &format!("/sessions/{}/messages", id),
        Some(r#"{"text":"Halo","mode":"ask"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["content"], CHAT_ERROR_MESSAGE);
}

// == Keywords and Grammar ==

#[tokio::test]
async fn test_keyword_extract_search_and_clear() {
    let (app, storage, _) = create_test_app();

    let (status, extracted) = send(
        &app,
        "POST",
        "/keywords/extract",
        Some(r#"{"text":"Saya makan nasi"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(extracted["saved"], 1);
    assert_eq!(extracted["keywords"][0]["verbForms"]["amr"]["translit"], "kul");

    // Same word again is not saved twice
    let (_, extracted) = send(
        &app,
        "POST",
        "/keywords/extract",
        Some(r#"{"text":"Kami makan"}"#),
    )
    .await;
    assert_eq!(extracted["saved"], 0);

    let (_, list) = send(&app, "GET", "/keywords?q=MAK", None).await;
    assert_eq!(list["total"], 1);
    assert_eq!(list["keywords"][0]["arabic"], "أَكَلَ");

    let (_, list) = send(&app, "GET", "/keywords?q=masjid", None).await;
    assert_eq!(list["total"], 0);

    let (status, cleared) = send(&app, "DELETE", "/keywords", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["removed"], 1);
    assert!(storage.get(SAVED_KEYWORDS_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_grammar_explain() {
    let (app, _, _) = create_test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/grammar/explain",
        Some(r#"{"concept":"dhamir muttashil","arabic":"أَكَلْتُ","translit":"akaltu"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["explanation"].as_str().unwrap().contains("تُ"));

    let (status, _) = send(
        &app,
        "POST",
        "/grammar/explain",
        Some(r#"{"concept":"","arabic":"أَكَلْتُ"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
