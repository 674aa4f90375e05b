pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes() + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Résumés
        .route(
            "/api/v1/resumes",
            get(handlers::handle_list_resumes).post(handlers::handle_upload_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(handlers::handle_get_resume).delete(handlers::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/analyze",
            post(handlers::handle_analyze_resume),
        )
        // Jobs
        .route(
            "/api/v1/jobs",
            get(handlers::handle_list_jobs).post(handlers::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(handlers::handle_get_job).delete(handlers::handle_delete_job),
        )
        .route(
            "/api/v1/jobs/:id/rankings",
            get(handlers::handle_job_rankings),
        )
        // Matching and skills
        .route("/api/v1/match", post(handlers::handle_match))
        .route(
            "/api/v1/skills/normalize",
            post(handlers::handle_normalize_skill),
        )
        .route("/api/v1/skills", get(handlers::handle_list_skills))
        .route(
            "/api/v1/skills/categories",
            get(handlers::handle_list_categories),
        )
        // Dashboard and admin
        .route("/api/v1/dashboard", get(handlers::handle_dashboard))
        .route(
            "/api/v1/admin/settings",
            get(handlers::handle_get_settings).put(handlers::handle_put_settings),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::skill::Skill;
    use crate::state::test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    const BOUNDARY: &str = "screener-test-boundary";

    fn upload_req(filename: &str, contents: &str, job_id: Option<&str>) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n{contents}\r\n"
        );
        if let Some(id) = job_id {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"job_id\"\r\n\r\n{id}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::post("/api/v1/resumes")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state());
        let (status, body) = send(&app, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "screener");
    }

    #[tokio::test]
    async fn test_match_endpoint_worked_example() {
        let app = build_router(test_state());
        let (status, body) = send(
            &app,
            json_req(
                "POST",
                "/api/v1/match",
                json!({
                    "resume_skills": [
                        {"name": "React", "category": "Frontend", "weight": 5},
                        {"name": "JS", "category": "Frontend", "weight": 4},
                        {"name": "Python", "category": "Backend", "weight": 5}
                    ],
                    "job_skills": [
                        {"name": "react", "category": "Frontend", "weight": 5},
                        {"name": "TypeScript", "category": "Frontend", "weight": 4},
                        {"name": "JavaScript", "category": "Frontend", "weight": 4},
                        {"name": "Jest", "category": "Testing", "weight": 3}
                    ]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 56.0);
        assert_eq!(body["matched_weight"], 9);
        assert_eq!(body["total_weight"], 16);
    }

    #[tokio::test]
    async fn test_match_endpoint_rejects_empty_resume() {
        let app = build_router(test_state());
        let (status, body) = send(
            &app,
            json_req(
                "POST",
                "/api/v1/match",
                json!({
                    "resume_skills": [],
                    "job_skills": [{"name": "react", "category": "Frontend", "weight": 5}]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_normalize_endpoint() {
        let app = build_router(test_state());
        let (status, body) = send(
            &app,
            json_req("POST", "/api/v1/skills/normalize", json!({"name": "  K8S "})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["canonical"], "kubernetes");

        let (status, body) = send(
            &app,
            json_req("POST", "/api/v1/skills/normalize", json!({"name": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_SKILL_NAME");
    }

    #[tokio::test]
    async fn test_skill_catalog_filter() {
        let app = build_router(test_state());
        let (_, body) = send(&app, get_req("/api/v1/skills?category=devops")).await;
        let skills: Vec<Skill> = serde_json::from_value(body).unwrap();
        assert!(!skills.is_empty());
        assert!(skills.iter().all(|s| s.category == "DevOps"));

        let (_, body) = send(&app, get_req("/api/v1/skills/categories")).await;
        assert!(body.as_array().unwrap().contains(&json!("Frontend")));
    }

    #[tokio::test]
    async fn test_upload_analyze_rank_dashboard_flow() {
        let app = build_router(test_state());

        let (status, job) = send(
            &app,
            json_req(
                "POST",
                "/api/v1/jobs",
                json!({
                    "title": "Backend Developer",
                    "required_skills": [
                        {"name": "Python", "category": "Backend", "weight": 5},
                        {"name": "Postgres", "category": "Database", "weight": 5}
                    ]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(job["required_skills"][1]["name"], "postgresql");
        let job_id = job["id"].as_str().unwrap().to_string();

        let (status, resume) = send(
            &app,
            upload_req("jane.txt", "Jane Smith\nPython and PostgreSQL", None),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(resume["score"], Value::Null);
        let resume_id = resume["id"].as_str().unwrap().to_string();

        let (status, _) = send(&app, upload_req("sam.txt", "Sam Roe\nPython", Some(&job_id))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, outcome) = send(
            &app,
            json_req(
                "POST",
                &format!("/api/v1/resumes/{resume_id}/analyze"),
                json!({"job_id": job_id}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["score"], 100.0);

        let (_, ranked) = send(&app, get_req(&format!("/api/v1/jobs/{job_id}/rankings"))).await;
        let names: Vec<_> = ranked
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Jane Smith", "Sam Roe"]);

        let (_, dashboard) = send(&app, get_req("/api/v1/dashboard")).await;
        assert_eq!(dashboard["total_resumes"], 2);
        assert_eq!(dashboard["analyzed_resumes"], 2);
        assert_eq!(dashboard["average_score"], 75.0);
        assert_eq!(dashboard["top_resumes"][0]["name"], "Jane Smith");
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_extension() {
        let app = build_router(test_state());
        let (status, body) = send(&app, upload_req("cv.exe", "Python", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_without_skills_is_unprocessable() {
        let app = build_router(test_state());
        let (status, _) = send(&app, upload_req("chef.txt", "Pastry chef", None)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_missing_resources_are_404() {
        let app = build_router(test_state());
        let id = uuid::Uuid::new_v4();
        let (status, _) = send(&app, get_req(&format!("/api/v1/resumes/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, get_req(&format!("/api/v1/jobs/{id}/rankings"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let delete = Request::delete(format!("/api/v1/jobs/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, delete).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_settings_round_trip_and_validation() {
        let app = build_router(test_state());
        let (status, body) = send(
            &app,
            json_req(
                "PUT",
                "/api/v1/admin/settings",
                json!({
                    "auto_analyze_on_upload": true,
                    "bonus_per_skill": 2.0,
                    "bonus_cap": 4.0,
                    "category_weights": {"Frontend": 5}
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bonus_cap"], 4.0);

        let (_, body) = send(&app, get_req("/api/v1/admin/settings")).await;
        assert_eq!(body["auto_analyze_on_upload"], true);

        let (status, _) = send(
            &app,
            json_req(
                "PUT",
                "/api/v1/admin/settings",
                json!({
                    "auto_analyze_on_upload": false,
                    "bonus_per_skill": 1.0,
                    "bonus_cap": 10.0,
                    "category_weights": {"Frontend": 9}
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
