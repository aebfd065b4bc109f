pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

/// Room for two maximum-size files plus form overhead.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_file_size_bytes()
        .saturating_mul(2)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/health/llm", get(health::llm_health_handler))
        // Session API
        .route("/api/v1/upload-and-process", post(handlers::handle_upload))
        .route("/api/v1/status/:session_id", get(handlers::handle_status))
        .route(
            "/api/v1/sessions/:session_id/suggestions",
            get(handlers::handle_suggestions),
        )
        .route("/api/v1/interact", post(handlers::handle_interact))
        .route(
            "/api/v1/finalize/:session_id",
            post(handlers::handle_finalize),
        )
        // Downloads
        .route(
            "/api/v1/download/:session_id/motivation-letter",
            get(handlers::handle_download_letter),
        )
        .route(
            "/api/v1/download/:session_id/cv-suggestions",
            get(handlers::handle_download_suggestions),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use httpmock::prelude::*;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::test_support::{client_for, completion_body};
    use crate::models::application::ApplicationResult;
    use crate::models::profile::UserProfile;
    use crate::session::interaction::InteractionResponse;
    use crate::session::{SessionStatus, SessionStatusResponse};

    const BOUNDARY: &str = "lettersmith-test-boundary";

    const CV: &str = "Sam Doe\n\nProfessional Profile\nDelivery lead moving into product.\n\n\
        Experience\nQA Lead, Acme GmbH\nCut regression time by 60%\n\n\
        Skills\nPython, Jira, roadmap planning";

    const JOB_PROFILE: &str = "Product Manager - Digital Innovation at Acme Corp. \
        You own the roadmap, work with stakeholders and ship digital products.";

    fn test_app(server: &MockServer, data_dir: &Path) -> Router {
        let config = Config::for_tests(&server.base_url(), data_dir);
        build_router(AppState::new(config, client_for(server), UserProfile::default()))
    }

    enum Part<'a> {
        File { name: &'a str, filename: &'a str, content: &'a str },
        Text { name: &'a str, value: &'a str },
    }

    fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
        let mut body = String::new();
        for part in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match part {
                Part::File { name, filename, content } => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n{content}\r\n"
                )),
                Part::Text { name, value } => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )),
            }
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri("/api/v1/upload-and-process")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn wait_for_status(app: &Router, session_id: Uuid, wanted: SessionStatus) -> SessionStatusResponse {
        for _ in 0..500 {
            let (_, body) = send(app, get(&format!("/api/v1/status/{session_id}"))).await;
            let status: SessionStatusResponse = serde_json::from_slice(&body).unwrap();
            if status.status == wanted {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("session {session_id} never reached {wanted:?}");
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    async fn mock_llm(server: &MockServer) {
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .body_contains("Extract the name of the hiring company");
                then.status(200)
                    .json_body(completion_body(r#"{"company_name": "Acme Corp"}"#));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(completion_body(&words(420)));
            })
            .await;
    }

    async fn upload(app: &Router) -> SessionStatusResponse {
        let (status, body) = send(
            app,
            multipart_request(&[
                Part::File { name: "cv_file", filename: "cv.txt", content: CV },
                Part::Text { name: "job_profile_text", value: JOB_PROFILE },
                Part::Text { name: "cv_language", value: "english" },
            ]),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(&test_app(&server, dir.path()), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "lettersmith");
    }

    #[tokio::test]
    async fn test_llm_health_reports_connected_and_error() {
        let server = MockServer::start_async().await;
        let models = server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/models");
                then.status(200)
                    .json_body(json!({"data": [{"id": "gpt-oss-20b"}]}));
            })
            .await;
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&server, dir.path());

        let (status, body) = send(&app, get("/health/llm")).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "connected");
        assert_eq!(body["models_available"], 1);

        models.delete_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/models");
                then.status(500).body("down");
            })
            .await;
        let (status, body) = send(&app, get("/health/llm")).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_full_application_flow() {
        let server = MockServer::start_async().await;
        mock_llm(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&server, dir.path());

        let created = upload(&app).await;
        assert_eq!(created.status, SessionStatus::Processing);
        assert_eq!(created.progress_percentage, 30);
        let id = created.session_id;

        let ready = wait_for_status(&app, id, SessionStatus::WaitingApproval).await;
        assert_eq!(ready.progress_percentage, 80);

        let (status, body) = send(&app, get(&format!("/api/v1/sessions/{id}/suggestions"))).await;
        assert_eq!(status, StatusCode::OK);
        let suggestions: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(suggestions["company_name"], "Acme Corp");
        assert_eq!(suggestions["suggestions"].as_array().unwrap().len(), 6);
        assert!(suggestions["ats_report"]["coverage_percent"].as_u64().is_some());

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/interact",
                json!({"session_id": id, "section_name": "professional profile", "action": "approve"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let response: InteractionResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.result, "Section 'Professional Profile' approved");
        assert_eq!(response.next_section.map(|s| s.name()), Some("Experience"));
        assert!(!response.is_complete);

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/interact",
                json!({"session_id": id, "section_name": "Projects", "action": "skip"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, json_request("POST", &format!("/api/v1/finalize/{id}"), json!({}))).await;
        assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));
        let result: ApplicationResult = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.status, SessionStatus::Completed);
        let letter = result.motivation_letter.unwrap();
        assert_eq!(letter.word_count, 420);
        assert!(letter.within_target);
        assert_eq!(result.files_generated.len(), 3);

        let done = wait_for_status(&app, id, SessionStatus::Completed).await;
        assert_eq!(done.progress_percentage, 100);

        let response = app
            .clone()
            .oneshot(get(&format!("/api/v1/download/{id}/motivation-letter")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.contains(&format!("motivation_letter_{id}.txt")));

        let (status, body) = send(&app, get(&format!("/api/v1/download/{id}/cv-suggestions"))).await;
        assert_eq!(status, StatusCode::OK);
        let saved: Value = serde_json::from_slice(&body).unwrap();
        assert!(saved.get("Projects").is_none());
        assert!(saved.get("Professional Profile").is_some());

        let (status, _) = send(&app, json_request("POST", &format!("/api/v1/finalize/{id}"), json!({}))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/interact",
                json!({"session_id": id, "section_name": "Skills", "action": "approve"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_saved_letter_is_served_after_restart() {
        let server = MockServer::start_async().await;
        mock_llm(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&server, dir.path());

        let id = upload(&app).await.session_id;
        wait_for_status(&app, id, SessionStatus::WaitingApproval).await;
        let (status, _) = send(&app, json_request("POST", &format!("/api/v1/finalize/{id}"), json!({}))).await;
        assert_eq!(status, StatusCode::OK);

        let restarted = test_app(&server, dir.path());
        let (status, body) = send(&restarted, get(&format!("/api/v1/download/{id}/motivation-letter"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(String::from_utf8(body).unwrap(), words(420));
    }

    #[tokio::test]
    async fn test_llm_failure_marks_session_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(400).json_body(json!({"error": "model not loaded"}));
            })
            .await;
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&server, dir.path());

        let id = upload(&app).await.session_id;
        let failed = wait_for_status(&app, id, SessionStatus::Error).await;
        assert!(failed.message.contains("Processing failed"));

        let (status, _) = send(&app, json_request("POST", &format!("/api/v1/finalize/{id}"), json!({}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_upload_validation() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&server, dir.path());

        let short_profile = multipart_request(&[
            Part::File { name: "cv_file", filename: "cv.txt", content: CV },
            Part::Text { name: "job_profile_text", value: "Too short" },
        ]);
        assert_eq!(send(&app, short_profile).await.0, StatusCode::BAD_REQUEST);

        let missing_cv = multipart_request(&[Part::Text { name: "job_profile_text", value: JOB_PROFILE }]);
        assert_eq!(send(&app, missing_cv).await.0, StatusCode::BAD_REQUEST);

        let bad_type = multipart_request(&[
            Part::File { name: "cv_file", filename: "cv.exe", content: "MZ" },
            Part::Text { name: "job_profile_text", value: JOB_PROFILE },
        ]);
        assert_eq!(send(&app, bad_type).await.0, StatusCode::BAD_REQUEST);

        // Both files unsupported: the CV is reported first.
        let both_bad = multipart_request(&[
            Part::File { name: "cv_file", filename: "cv.exe", content: "MZ" },
            Part::File { name: "job_profile", filename: "job.odt", content: JOB_PROFILE },
        ]);
        let (status, body) = send(&app, both_bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains(".exe"), "{message}");
        assert!(!message.contains(".odt"), "{message}");

        let bad_language = multipart_request(&[
            Part::File { name: "cv_file", filename: "cv.txt", content: CV },
            Part::Text { name: "job_profile_text", value: JOB_PROFILE },
            Part::Text { name: "cv_language", value: "Klingon" },
        ]);
        assert_eq!(send(&app, bad_language).await.0, StatusCode::BAD_REQUEST);

        let job_profile_file = multipart_request(&[
            Part::File { name: "cv_file", filename: "cv.txt", content: CV },
            Part::File { name: "job_profile", filename: "job.txt", content: JOB_PROFILE },
        ]);
        assert_eq!(send(&app, job_profile_file).await.0, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_sessions_are_not_found() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&server, dir.path());
        let id = Uuid::new_v4();

        assert_eq!(send(&app, get(&format!("/api/v1/status/{id}"))).await.0, StatusCode::NOT_FOUND);
        assert_eq!(send(&app, get("/api/v1/status/not-a-uuid")).await.0, StatusCode::NOT_FOUND);
        assert_eq!(
            send(&app, get(&format!("/api/v1/download/{id}/motivation-letter"))).await.0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            send(&app, get(&format!("/api/v1/download/{id}/cv-suggestions"))).await.0,
            StatusCode::NOT_FOUND
        );

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/interact",
                json!({"session_id": id, "section_name": "Skills", "action": "approve"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
