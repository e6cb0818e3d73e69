pub mod health;
pub mod history;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::coaching::handlers as coaching;
use crate::state::AppState;
use crate::venture::handlers as venture;

/// Headroom for multipart boundaries and the text fields next to the file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/history/:category", get(history::handle_history))
        // Venture
        .route("/idea-check", post(venture::handle_idea_check))
        .route("/swot", post(venture::handle_swot))
        .route("/analyze", post(venture::handle_market_analysis))
        .route("/competitors", post(venture::handle_competitors))
        .route("/strategy", post(venture::handle_strategy))
        .route("/guidance", post(venture::handle_guidance))
        .route("/investor-match", post(venture::handle_investor_match))
        .route("/readiness", post(venture::handle_readiness))
        .route("/generate-deck", post(venture::handle_generate_deck))
        // Coaching
        .route("/mentor-qa", post(coaching::handle_mentor_qa))
        .route("/practice-feedback", post(coaching::handle_practice_feedback))
        .route(
            "/analyze-resume",
            post(coaching::handle_analyze_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/track-progress", post(coaching::handle_track_progress))
        .route("/get-recommendations", post(coaching::handle_get_recommendations))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::json;

    use crate::models::record::Category;
    use crate::models::signal::{Entity, EntityType, Sentiment, TextSignal};
    use crate::store::ResultStore;
    use crate::testing::{authed_json, FakeLlm, FakeNlp, TestApp, TEST_TOKEN, TEST_USER};

    fn ent(name: &str, salience: f64, sentiment: f64) -> Entity {
        Entity {
            name: name.into(),
            entity_type: EntityType::Other,
            salience,
            sentiment: Sentiment {
                score: sentiment,
                magnitude: sentiment.abs(),
            },
        }
    }

    fn signal(doc: f64, entities: Vec<Entity>) -> TextSignal {
        TextSignal {
            sentiment: Sentiment {
                score: doc,
                magnitude: doc.abs(),
            },
            entities,
            ..Default::default()
        }
    }

    fn multipart_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        let boundary = "pitchcraft-test-boundary";
        let mut body = Vec::new();
        for (name, file_name, content) in parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            match file_name {
                Some(f) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                         Content-Type: text/plain\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/analyze-resume")
            .header(header::AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    // ── Health and auth ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "pitchcraft-api");
    }

    #[tokio::test]
    async fn test_missing_token_is_401_and_skips_backend() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let request = Request::post("/swot")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"business_description": "x"}).to_string()))
            .unwrap();
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert_eq!(app.nlp.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_token_is_401() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let request = Request::post("/swot")
            .header(header::AUTHORIZATION, "Bearer forged")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"business_description": "x"}).to_string()))
            .unwrap();
        let (status, _) = app.send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_empty_field_is_400_without_backend_call() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let (status, body) = app.post_json("/idea-check", json!({"idea": "  "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(app.nlp.calls(), 0);
        assert!(app.llm.prompts().is_empty());
        assert!(app.store.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_field_is_400() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let (status, body) = app.post_json("/readiness", json!({"business_plan": "x"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    // ── Venture ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_idea_check_persists_and_publishes() {
        let idea = "An AI tutor for students.";
        let nlp = FakeNlp::default().with_signal(
            idea,
            signal(
                0.5,
                vec![
                    ent("AI tutor", 0.5, 0.4),
                    ent("students", 0.25, 0.1),
                    ent("Tuesday", 0.05, 0.0),
                ],
            ),
        );
        let app = TestApp::new(nlp, FakeLlm::replying("Promising idea."));

        let (status, body) = app.post_json("/idea-check", json!({"idea": idea})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["key_factors"], json!(["AI tutor", "students"]));
        assert_eq!(body["unique_value"], json!(["AI tutor"]));
        assert_eq!(body["funding_stage"], "institutional_ready");
        assert_eq!(body["feedback"], "Promising idea.");

        let rows = app.store.all().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, TEST_USER);
        assert_eq!(rows[0].category, "idea_check");
        assert_eq!(body["record_id"], json!(rows[0].id));

        let events = app.events.published();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].category, Category::IdeaCheck);

        let prompts = app.llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("AI tutor, students"));
    }

    #[tokio::test]
    async fn test_llm_failure_is_500_and_nothing_persisted() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::failing());
        let (status, body) = app.post_json("/idea-check", json!({"idea": "An idea."})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
        assert!(app.store.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_swot_with_no_entities_returns_empty_lists() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let (status, body) = app
            .post_json("/swot", json!({"business_description": "We sell shoes."}))
            .await;
        assert_eq!(status, StatusCode::OK);
        for key in ["strengths", "weaknesses", "opportunities", "threats"] {
            assert_eq!(body[key], json!([]));
        }
    }

    #[tokio::test]
    async fn test_market_analysis_fails_whole_request_when_one_field_fails() {
        let nlp = FakeNlp::default().failing_on("trend text");
        let app = TestApp::new(nlp, FakeLlm::default());
        let (status, body) = app
            .post_json(
                "/analyze",
                json!({"market": "market text", "industry": "industry text", "trends": "trend text"}),
            )
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
        assert_eq!(body["error"]["message"], "A text analysis error occurred");
        assert!(app.store.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_market_analysis_runs_one_call_per_field() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let (status, body) = app
            .post_json(
                "/analyze",
                json!({"market": "m", "industry": "i", "trends": "t"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.nlp.calls(), 3);
        assert_eq!(body["outlook"], "neutral");
    }

    #[tokio::test]
    async fn test_readiness_negative_financials() {
        let nlp = FakeNlp::default()
            .with_document_sentiment("plan", 0.0)
            .with_document_sentiment("money", -1.0)
            .with_document_sentiment("people", 0.0);
        let app = TestApp::new(nlp, FakeLlm::default());
        let (status, body) = app
            .post_json(
                "/readiness",
                json!({"business_plan": "plan", "financials": "money", "team": "people"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["breakdown"]["financial"], 0.0);
        assert_eq!(body["score"], 30);
    }

    #[tokio::test]
    async fn test_investor_match_ranks_by_overlap() {
        let nlp = FakeNlp::default()
            .with_signal("our pitch", signal(0.0, vec![ent("fintech", 0.6, 0.3)]))
            .with_signal("health only", signal(0.0, vec![ent("biotech", 0.6, 0.0)]))
            .with_signal("we back FinTech", signal(0.0, vec![ent("FinTech", 0.6, 0.0)]));
        let app = TestApp::new(nlp, FakeLlm::default());
        let (status, body) = app
            .post_json(
                "/investor-match",
                json!({
                    "pitch": "our pitch",
                    "investors": [
                        {"name": "Health Fund", "thesis": "health only"},
                        {"name": "Fin VC", "thesis": "we back FinTech"}
                    ]
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matches"][0]["name"], "Fin VC");
        assert_eq!(body["matches"][0]["score"], 60);
        assert_eq!(body["matches"][1]["score"], 50);
        assert_eq!(app.nlp.calls(), 3);
    }

    #[tokio::test]
    async fn test_investor_match_rejects_too_many_investors() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let investors: Vec<_> = (0..26)
            .map(|i| json!({"name": format!("I{i}"), "thesis": "t"}))
            .collect();
        let (status, _) = app
            .post_json("/investor-match", json!({"pitch": "p", "investors": investors}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(app.nlp.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_deck_parses_fenced_json() {
        let reply = "```json\n{\"slides\":[{\"title\":\"Problem\",\"bullets\":[\"Slow checkout\"]}]}\n```";
        let app = TestApp::new(FakeNlp::default(), FakeLlm::replying(reply));
        let (status, body) = app
            .post_json(
                "/generate-deck",
                json!({"startup_name": "PayFast", "description": "One-tap checkout."}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slides"][0]["title"], "Problem");
        assert_eq!(body["audience"], "early-stage investors");
        assert_eq!(app.store.all().await[0].category, "pitch_deck");
    }

    #[tokio::test]
    async fn test_generate_deck_unparseable_reply_is_500() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::replying("Here is your deck!"));
        let (status, _) = app
            .post_json(
                "/generate-deck",
                json!({"startup_name": "PayFast", "description": "One-tap checkout."}),
            )
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(app.store.all().await.is_empty());
    }

    // ── Coaching ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_practice_feedback_counts_sentences() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let (status, body) = app
            .post_json(
                "/practice-feedback",
                json!({"transcript": "We help shops. They sell more. Join us."}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sentence_count"], 3);
    }

    #[tokio::test]
    async fn test_resume_upload_archives_and_records() {
        let nlp = FakeNlp::default()
            .with_signal("Rust engineer", signal(0.2, vec![ent("Rust", 0.7, 0.0)]))
            .with_signal("Need Rust and Kafka", signal(0.0, vec![
                ent("rust", 0.5, 0.0),
                ent("Kafka", 0.4, 0.0),
            ]));
        let app = TestApp::new(nlp, FakeLlm::default());

        let request = multipart_request(&[
            ("file", Some("cv.txt"), &b"Rust engineer"[..]),
            ("job_description", None, &b"Need Rust and Kafka"[..]),
        ]);
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["skills"], json!(["Rust"]));
        assert_eq!(body["job_match"]["missing_keywords"], json!(["Kafka"]));

        let objects = app.archive.objects();
        assert_eq!(objects.len(), 1);
        assert!(objects[0].key.starts_with(&format!("resumes/{TEST_USER}/")));
        assert_eq!(body["archive_key"], json!(objects[0].key));
        assert_eq!(&objects[0].body[..], b"Rust engineer");
    }

    #[tokio::test]
    async fn test_resume_analysis_failure_archives_nothing() {
        let nlp = FakeNlp::default()
            .failing_on("Rust engineer")
            .with_delay(Duration::from_millis(50));
        let app = TestApp::new(nlp, FakeLlm::default());

        let request = multipart_request(&[("file", Some("cv.txt"), &b"Rust engineer"[..])]);
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
        assert!(app.archive.objects().is_empty());
        assert!(app.store.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_resume_upload_with_json_body_is_400_envelope() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let (status, body) = app
            .post_json("/analyze-resume", json!({"file": "cv"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_resume_upload_without_file_is_400() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let request = multipart_request(&[("job_description", None, &b"Need Rust"[..])]);
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(app.archive.objects().is_empty());
    }

    #[tokio::test]
    async fn test_resume_upload_over_limit_is_400() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let big = vec![b'a'; 2048];
        let request = multipart_request(&[("file", Some("cv.txt"), big.as_slice())]);
        let (status, _) = app.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(app.nlp.calls(), 0);
    }

    #[tokio::test]
    async fn test_track_progress_compares_with_previous_updates() {
        let nlp = FakeNlp::default()
            .with_document_sentiment("slow week", -0.2)
            .with_document_sentiment("shipped the beta", 0.6);
        let app = TestApp::new(nlp, FakeLlm::default());

        let (_, first) = app
            .post_json("/track-progress", json!({"update": "slow week"}))
            .await;
        assert_eq!(first["momentum"], "first_update");

        let (status, second) = app
            .post_json(
                "/track-progress",
                json!({"update": "shipped the beta", "milestone": "Beta"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["momentum"], "accelerating");
        assert_eq!(second["compared_with"], 1);
        assert_eq!(second["milestone"], "Beta");
    }

    #[tokio::test]
    async fn test_recommendations_draw_on_stored_verdicts() {
        let nlp = FakeNlp::default()
            .with_document_sentiment("plan", 0.5)
            .with_document_sentiment("money", -0.5)
            .with_document_sentiment("people", 0.5);
        let app = TestApp::new(nlp, FakeLlm::default());
        app.post_json(
            "/readiness",
            json!({"business_plan": "plan", "financials": "money", "team": "people"}),
        )
        .await;

        let request = Request::post("/get-recommendations")
            .header(header::AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::OK);
        let recs = body["recommendations"].as_array().unwrap();
        assert!(!recs.is_empty());
        assert!(recs.iter().all(|r| r["source"] == "readiness"));
        assert_eq!(body["focus"], json!(null));
    }

    #[tokio::test]
    async fn test_recommendations_without_history() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let (status, body) = app
            .post_json("/get-recommendations", json!({}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommendations"][0]["source"], json!(null));
        assert_eq!(app.nlp.calls(), 0);
    }

    // ── History ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_history_newest_first_and_scoped_to_user() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        app.store
            .append(TEST_USER, Category::Swot, json!({"n": 1}))
            .await
            .unwrap();
        app.store
            .append("someone-else", Category::Swot, json!({"n": 99}))
            .await
            .unwrap();
        app.store
            .append(TEST_USER, Category::Swot, json!({"n": 2}))
            .await
            .unwrap();

        let request = Request::get("/history/swot?limit=5")
            .header(header::AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "swot");
        let records = body["records"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["verdict"]["n"], 2);
        assert_eq!(records[1]["verdict"]["n"], 1);
    }

    #[tokio::test]
    async fn test_history_bad_limit_is_400_envelope() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let request = Request::get("/history/swot?limit=abc")
            .header(header::AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_history_unknown_category_is_400() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let request = Request::get("/history/horoscope")
            .header(header::AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = app.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_resubmission_appends_second_record() {
        let app = TestApp::new(FakeNlp::default(), FakeLlm::default());
        let body = json!({"business_description": "Same text."});
        app.send(authed_json("/swot", body.clone())).await;
        app.send(authed_json("/swot", body)).await;
        assert_eq!(app.store.all().await.len(), 2);
        assert_eq!(app.nlp.calls(), 2);
    }
}
