use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use studio_timetable::catalog::Catalog;
use studio_timetable::settings::Settings;
use studio_timetable::{AppState, build_router};
use tower::Service;
use url::Url;

/// Helper function to create test app state over the embedded catalog
fn create_test_state() -> AppState {
    let settings = Settings {
        debug: true,
        enable_swagger: true,
        port: 8080,
        catalog_path: None,
        timezone: "Asia/Jerusalem".to_string(),
        lead_submit_delay_ms: 0,
        booking_url: Url::parse("https://app.arboxapp.com/").unwrap(),
        cors_origin: None,
    };
    let catalog = Catalog::load(None).unwrap();

    AppState::new(settings, catalog).unwrap()
}

/// Helper to extract response body as string
async fn response_body_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn get(uri: &str) -> (StatusCode, String) {
    let mut app = build_router(create_test_state());
    let response = app
        .call(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, response_body_string(response.into_body()).await)
}

async fn post_lead(payload: &str) -> (StatusCode, String) {
    let mut app = build_router(create_test_state());
    let response = app
        .call(
            Request::builder()
                .method("POST")
                .uri("/leads")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, response_body_string(response.into_body()).await)
}

fn class_ids(view: &Value) -> Vec<String> {
    view["classes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_root_endpoint() {
    // Act
    let (status, body) = get("/").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Studio Timetable API"));
    assert!(body.contains("/schedule"));
    assert!(body.contains("/leads"));
}

#[tokio::test]
async fn test_healthz_endpoints() {
    for uri in ["/healthz/live", "/healthz/ready"] {
        let (status, body) = get(uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#""status":"ok"#));
    }
}

#[tokio::test]
async fn test_schedule_defaults_to_sunday_tel_aviv_all() {
    // Act
    let (status, body) = get("/schedule").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let view: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(view["selection"]["day"], "sunday");
    assert_eq!(view["selection"]["branch"], "tel-aviv");
    assert_eq!(view["selection"]["filter"], "all");
    assert_eq!(view["day_label"], "ראשון");
    assert_eq!(view["branch_label"], "תל אביב");
    assert_eq!(class_ids(&view), vec!["1", "2", "3", "4", "5", "6"]);
    assert!(view.get("empty_message").is_none());
}

#[tokio::test]
async fn test_schedule_ashdod_sorted_by_start() {
    // Act
    let (status, body) = get("/schedule?day=sunday&branch=ashdod").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let view: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(class_ids(&view), vec!["7", "8", "9"]);
    let starts: Vec<&str> = view["classes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["start_time"].as_str().unwrap())
        .collect();
    assert!(starts.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_schedule_type_filter() {
    // Act
    let (status, body) = get("/schedule?day=monday&branch=tel-aviv&type=pilates").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let view: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(view["selection"]["filter"], "pilates");
    assert_eq!(class_ids(&view), vec!["10", "12", "14"]);
    for class in view["classes"].as_array().unwrap() {
        assert_eq!(class["training_type"], "pilates");
    }
}

#[tokio::test]
async fn test_schedule_capacity_status() {
    // Act
    let (_, body) = get("/schedule").await;

    // Assert - class 5 is 8/8, class 3 is 10/12, class 1 is 5/8
    let view: Value = serde_json::from_str(&body).unwrap();
    let classes = view["classes"].as_array().unwrap();
    let by_id = |id: &str| classes.iter().find(|c| c["id"] == id).unwrap().clone();

    let full = by_id("5");
    assert_eq!(full["status"], "full");
    assert_eq!(full["status_label"], "מלא");
    assert_eq!(full["bookable"], false);
    assert_eq!(full["occupancy_percent"], 100);

    assert_eq!(by_id("3")["status"], "almost-full");
    let open = by_id("1");
    assert_eq!(open["status"], "open");
    assert_eq!(open["bookable"], true);
    assert_eq!(open["booking_url"], "https://app.arboxapp.com/");
}

#[tokio::test]
async fn test_schedule_empty_day_is_not_an_error() {
    // Act
    let (status, body) = get("/schedule?day=saturday&branch=ashdod").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let view: Value = serde_json::from_str(&body).unwrap();
    assert!(view["classes"].as_array().unwrap().is_empty());
    assert!(view["empty_message"].as_str().is_some());
}

#[tokio::test]
async fn test_schedule_unknown_values_rejected() {
    for uri in [
        "/schedule?day=someday",
        "/schedule?branch=haifa",
        "/schedule?type=boxing",
    ] {
        let (status, _) = get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn test_branches() {
    // Act
    let (status, body) = get("/branches").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let branches: Value = serde_json::from_str(&body).unwrap();
    let ids: Vec<&str> = branches
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["tel-aviv", "ashdod"]);
}

#[tokio::test]
async fn test_single_branch() {
    let (status, body) = get("/branches/ashdod").await;
    assert_eq!(status, StatusCode::OK);
    let branch: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(branch["phone"], "08-9876543");
    assert_eq!(branch["opening_hours"].as_array().unwrap().len(), 3);

    let (status, _) = get("/branches/haifa").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_training_types() {
    let (status, body) = get("/training-types").await;
    assert_eq!(status, StatusCode::OK);
    let types: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(types.as_array().unwrap().len(), 3);
    assert_eq!(types[0]["id"], "pilates");
    assert_eq!(types[0]["benefits"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_ical_endpoint_with_classes() {
    // Arrange
    let mut app = build_router(create_test_state());

    // Act
    let response = app
        .call(
            Request::builder()
                .uri("/schedule.ical?branch=ashdod&type=yoga")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert_eq!(content_type, "text/calendar");

    let content_disposition = response.headers().get(header::CONTENT_DISPOSITION).unwrap();
    assert!(
        content_disposition
            .to_str()
            .unwrap()
            .contains("studio_timetable_ashdod.ics")
    );

    // Ashdod yoga: class 8 on Sunday, class 16 on Monday
    let body = response_body_string(response.into_body()).await;
    assert!(body.contains("BEGIN:VCALENDAR"));
    assert_eq!(body.matches("BEGIN:VEVENT").count(), 2);
}

#[tokio::test]
async fn test_ical_endpoint_whole_branch_week() {
    let (status, body) = get("/schedule.ical?branch=tel-aviv").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("BEGIN:VEVENT").count(), 11);
}

#[tokio::test]
async fn test_lead_submission_accepted() {
    // Act
    let (status, body) = post_lead(
        r#"{"name":"Dana Levi","phone":"050-1234567","email":"","branch":"ashdod","training_type":"","message":"Evenings"}"#,
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::ACCEPTED);
    let receipt: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(receipt["state"], "submitted");
    assert!(!receipt["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_ical_endpoint_rejects_day() {
    let (status, _) = get("/schedule.ical?branch=ashdod&day=monday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_lead_submission_missing_required_fields() {
    // Act - name left out entirely
    let (status, body) = post_lead(r#"{"phone":"050-1234567"}"#).await;

    // Assert - reaches form validation instead of failing JSON extraction
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "name is required");

    let (status, body) = post_lead(r#"{"name":"Dana","phone":null}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "phone is required");
}

#[tokio::test]
async fn test_lead_submission_validation() {
    let (status, body) = post_lead(r#"{"name":"  ","phone":"050-1234567"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("name"));

    let (status, body) = post_lead(r#"{"name":"Dana","phone":"call me"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("phone"));

    let (status, body) =
        post_lead(r#"{"name":"Dana","phone":"050-1234567","email":"nope"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("email"));
}

#[tokio::test]
async fn test_swagger_document_served() {
    let (status, body) = get("/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/schedule.ical"));
}
