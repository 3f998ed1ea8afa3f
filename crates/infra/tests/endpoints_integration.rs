//! Domain endpoint contracts against a mock backend

mod support;

use serde_json::json;
use support::{login_json, profile_json, TestBackend};
use wastewise_domain::{
    BookingFilter, BookingStatus, CreateBooking, ImageUpload, LeaderboardPeriod, RegisterRequest,
    ServiceSearch, VerifyPayment, WasteType,
};
use wastewise_infra::ApiError;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn login_caches_profile_for_offline_reads() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({
            "email": "asha@wastewise.in",
            "password": "compost-123",
            "remember_me": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_json("at-1", "rt-1")))
        .expect(1)
        .mount(&backend.server)
        .await;

    let user = backend.client.login("asha@wastewise.in", "compost-123", true).await.unwrap();
    assert_eq!(user.full_name.as_deref(), Some("Asha Rao"));
    assert!(backend.client.is_authenticated().await);

    let cached = backend.client.current_user().await.expect("cached profile");
    assert_eq!(cached.id, "user_42");
    assert_eq!(backend.server.received_requests().await.unwrap().len(), 1);
    assert_eq!(backend.storage.peek("access_token").as_deref(), Some("at-1"));
    assert!(backend.storage.peek("user_data").unwrap().contains("user_42"));
}

#[tokio::test]
async fn login_rejection_surfaces_backend_message() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Invalid credentials",
            "message": "Email or password is incorrect"
        })))
        .mount(&backend.server)
        .await;

    let err = backend.client.login("asha@wastewise.in", "wrong", false).await.unwrap_err();

    assert_eq!(
        err,
        ApiError::Client { status: 401, message: "Email or password is incorrect".to_string() }
    );
    assert!(!backend.client.is_authenticated().await);
}

#[tokio::test]
async fn login_validation_sends_nothing() {
    let backend = TestBackend::start().await;

    let err = backend.client.login("", "secret", false).await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(message) if message.contains("email")));
    assert!(backend.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn registration_without_tokens_stays_signed_out() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "message": "Registration successful",
            "user_id": 7,
            "next_step": "Please login with your credentials"
        })))
        .mount(&backend.server)
        .await;

    let registration = RegisterRequest {
        full_name: "Asha Rao".to_string(),
        email: "asha@wastewise.in".to_string(),
        phone: "9876543210".to_string(),
        password: "compost-123".to_string(),
        confirm_password: "compost-123".to_string(),
        terms_accepted: true,
        ..RegisterRequest::default()
    };
    let response = backend.client.register(&registration).await.unwrap();

    assert_eq!(response.user_id.as_deref(), Some("7"));
    assert!(!backend.client.is_authenticated().await);
}

#[tokio::test]
async fn login_discards_tokens_when_profile_cannot_be_stored() {
    let backend = TestBackend::start().await;
    backend.storage.fail_writes_to("user_data");
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_json("at-1", "rt-1")))
        .mount(&backend.server)
        .await;

    let err = backend.client.login("asha@wastewise.in", "compost-123", true).await.unwrap_err();

    assert!(matches!(err, ApiError::Storage(_)));
    assert!(!backend.client.is_authenticated().await);
    assert!(backend.client.current_user().await.is_none());
    assert_eq!(backend.storage.peek("access_token"), None);
    assert_eq!(backend.storage.peek("refresh_token"), None);
}

#[tokio::test]
async fn registration_discards_tokens_when_profile_cannot_be_stored() {
    let backend = TestBackend::start().await;
    backend.storage.fail_writes_to("user_data");
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(login_json("at-1", "rt-1")))
        .mount(&backend.server)
        .await;

    let registration = RegisterRequest {
        full_name: "Asha Rao".to_string(),
        email: "asha@wastewise.in".to_string(),
        phone: "9876543210".to_string(),
        password: "compost-123".to_string(),
        confirm_password: "compost-123".to_string(),
        terms_accepted: true,
        ..RegisterRequest::default()
    };
    let err = backend.client.register(&registration).await.unwrap_err();

    assert!(matches!(err, ApiError::Storage(_)));
    assert!(!backend.client.is_authenticated().await);
    assert_eq!(backend.storage.peek("access_token"), None);
}

#[tokio::test]
async fn logout_clears_session_even_when_backend_fails() {
    let backend = TestBackend::start().await;
    backend.sign_in("at-1", Some("rt-1")).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(header("authorization", "Bearer at-1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "Logout failed"})))
        .expect(1)
        .mount(&backend.server)
        .await;

    backend.client.logout().await;

    assert!(!backend.client.is_authenticated().await);
    assert!(backend.storage.is_empty());
}

#[tokio::test]
async fn profile_refresh_updates_cache() {
    let backend = TestBackend::start().await;
    backend.sign_in("at-1", Some("rt-1")).await;
    let mut updated = profile_json();
    updated["city"] = json!("Nagpur");
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "user": updated})),
        )
        .mount(&backend.server)
        .await;

    backend.client.profile().await.unwrap();

    let cached = backend.client.current_user().await.unwrap();
    assert_eq!(cached.city.as_deref(), Some("Nagpur"));
}

#[tokio::test]
async fn classification_uploads_multipart_image() {
    let backend = TestBackend::start().await;
    backend.sign_in("at-1", None).await;
    Mock::given(method("POST"))
        .and(path("/api/classify"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "classification": {
                "waste_type": "plastic",
                "confidence": 0.91,
                "recommendations": ["Rinse before recycling"]
            },
            "classification_id": 31
        })))
        .expect(1)
        .mount(&backend.server)
        .await;

    let image = ImageUpload::new("bottle.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff]);
    let result = backend.client.classify_waste(image).await.unwrap();
    assert_eq!(result.classification.waste_type, "plastic");

    let requests = backend.server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="), "{content_type}");
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="image""#));
    assert!(body.contains(r#"filename="bottle.jpg""#));
}

#[tokio::test]
async fn classification_route_is_configurable() {
    let backend = TestBackend::start_with(|builder| builder.classify_path("/ai/predict")).await;
    Mock::given(method("POST"))
        .and(path("/api/ai/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"predicted_category": "organic", "probability": 0.7})),
        )
        .mount(&backend.server)
        .await;

    let image = ImageUpload::new("peel.png", "image/png", vec![1, 2, 3]);
    let result = backend.client.classify_waste(image).await.unwrap();

    assert_eq!(result.classification.waste_type, "organic");
}

#[tokio::test]
async fn classification_failure_uses_fallback_message() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/classify"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backend.server)
        .await;

    let image = ImageUpload::new("bottle.jpg", "image/jpeg", vec![1]);
    let err = backend.client.classify_waste(image).await.unwrap_err();

    assert_eq!(
        err,
        ApiError::Server { status: 500, message: "Classification failed".to_string() }
    );
}

#[tokio::test]
async fn search_sends_only_set_filters() {
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/services/search"))
        .and(query_param("waste_type", "e-waste"))
        .and(query_param("lat", "18.52"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "providers": [{"id": 3, "business_name": "Green Earth Recyclers", "rating": 4.6}],
            "pagination": {"total": 1, "limit": 20, "offset": 0, "has_more": false}
        })))
        .expect(1)
        .mount(&backend.server)
        .await;

    let search = ServiceSearch::near(18.52, 73.85, 10.0).with_waste_type("e-waste");
    let page = backend.client.search_services(&search).await.unwrap();

    assert_eq!(page.providers[0].name.as_deref(), Some("Green Earth Recyclers"));
    let requests = backend.server.received_requests().await.unwrap();
    assert!(!requests[0].url.query().unwrap_or_default().contains("city"));
}

#[tokio::test]
async fn booking_creation_is_validated_before_sending() {
    let backend = TestBackend::start().await;
    let booking = CreateBooking {
        service_provider_id: "sp_4".to_string(),
        waste_type: WasteType::Paper,
        quantity: "2 kg".to_string(),
        pickup_address: String::new(),
        scheduled_date: "2026-11-02".to_string(),
        scheduled_time_slot: "09:00-12:00".to_string(),
        special_instructions: None,
        contact_person: None,
        contact_phone: None,
    };

    let err = backend.client.create_booking(&booking).await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(message) if message.contains("pickup_address")));
    assert!(backend.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn booking_endpoints_unwrap_their_payloads() {
    let backend = TestBackend::start().await;
    backend.sign_in("at-1", None).await;
    Mock::given(method("GET"))
        .and(path("/api/bookings/my-bookings"))
        .and(query_param("status", "scheduled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "bookings": [{"id": "bk_1", "status": "scheduled", "payment_status": "pending"}],
            "pagination": {"total": 1}
        })))
        .mount(&backend.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/bookings/bk_1/cancel"))
        .and(body_json(json!({"reason": "Moved house"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "booking": {"id": "bk_1", "status": "cancelled"}
        })))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/bookings/bk_1/track"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "tracking": {"current_status": "scheduled", "tracking_steps": [{"step": "Booked"}]}
        })))
        .mount(&backend.server)
        .await;

    let filter = BookingFilter { status: Some(BookingStatus::Scheduled), ..Default::default() };
    let page = backend.client.list_bookings(&filter).await.unwrap();
    assert_eq!(page.bookings[0].id, "bk_1");

    let cancelled = backend.client.cancel_booking("bk_1", "Moved house").await.unwrap();
    assert_eq!(cancelled.status.as_deref(), Some("cancelled"));

    let tracking = backend.client.track_booking("bk_1").await.unwrap();
    assert_eq!(tracking.tracking_steps.len(), 1);
}

#[tokio::test]
async fn missing_booking_reports_not_found() {
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bookings/bk_missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "Booking not found"})),
        )
        .mount(&backend.server)
        .await;

    let err = backend.client.booking_details("bk_missing").await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Booking not found");
}

#[tokio::test]
async fn points_accept_both_response_shapes() {
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rewards/points"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "points": 75})),
        )
        .up_to_n_times(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/rewards/points"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "points": {"current_balance": 340, "total_earned": 400, "total_spent": 60}
        })))
        .mount(&backend.server)
        .await;

    let bare = backend.client.points().await.unwrap();
    assert_eq!(bare.current_balance, 75);

    let detailed = backend.client.points().await.unwrap();
    assert_eq!(detailed.current_balance, 340);
    assert_eq!(detailed.total_spent, 60);
}

#[tokio::test]
async fn leaderboard_and_analytics_send_period() {
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rewards/leaderboard"))
        .and(query_param("period", "all-time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "leaderboard": [{"rank": 1, "user_id": "u9", "points": 900}],
            "current_user_rank": {"rank": 4}
        })))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/analytics/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "total_classifications": 12,
            "recycling_rate": 0.8
        })))
        .mount(&backend.server)
        .await;

    let board = backend.client.leaderboard(LeaderboardPeriod::AllTime).await.unwrap();
    assert_eq!(board.leaderboard[0].rank, Some(1));

    let dashboard = backend.client.dashboard().await.unwrap();
    assert_eq!(dashboard.get("total_classifications"), Some(&json!(12)));
    assert!(dashboard.get("success").is_none());
}

#[tokio::test]
async fn unsuccessful_verification_is_an_error() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payments/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Signature mismatch"
        })))
        .mount(&backend.server)
        .await;

    let verification = VerifyPayment {
        payment_id: "pay_1".to_string(),
        gateway_order_id: "order_1".to_string(),
        gateway_payment_id: "pay_gw_1".to_string(),
        gateway_signature: "bad".to_string(),
    };
    let err = backend.client.verify_payment(&verification).await.unwrap_err();

    assert_eq!(err.to_string(), "Signature mismatch");
}

#[tokio::test]
async fn health_check_reports_reachability() {
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .up_to_n_times(1)
        .mount(&backend.server)
        .await;

    assert!(backend.client.health_check().await);
    // Nothing matches any more: wiremock answers 404.
    assert!(!backend.client.health_check().await);
}

#[tokio::test]
async fn booking_ids_stay_inside_their_path_segment() {
    let backend = TestBackend::start().await;
    backend.sign_in("at-1", None).await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "user": profile_json()})),
        )
        .expect(0)
        .mount(&backend.server)
        .await;

    let _ = backend.client.booking_details("../auth/profile").await;
    let _ = backend.client.booking_details("B1?status=paid").await;

    let requests = backend.server.received_requests().await.unwrap();
    let paths: Vec<&str> = requests.iter().map(|request| request.url.path()).collect();
    assert_eq!(
        paths,
        vec!["/api/bookings/..%2Fauth%2Fprofile", "/api/bookings/B1%3Fstatus%3Dpaid"]
    );
    assert!(requests.iter().all(|request| request.url.query().is_none()));
}

#[tokio::test]
async fn blank_ids_are_rejected_before_sending() {
    let backend = TestBackend::start().await;

    let details = backend.client.booking_details("").await.unwrap_err();
    let reviews = backend.client.service_reviews("  ", 10, 0).await.unwrap_err();
    let refund = backend.client.request_refund("..", "Duplicate charge").await.unwrap_err();

    assert!(matches!(details, ApiError::Validation(_)));
    assert!(matches!(reviews, ApiError::Validation(_)));
    assert!(matches!(refund, ApiError::Validation(_)));
    assert!(backend.server.received_requests().await.unwrap().is_empty());
}
