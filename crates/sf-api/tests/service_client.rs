// service_client.rs - ServiceClient against a fake SmartFood service.
//
// Each test mounts the endpoints it needs on a wiremock server and checks
// the wire shape (method, path, query, body) plus the declared failure
// policy of the operation: propagated errors vs. best-effort None.

use std::fs;
use std::time::{Duration, Instant};

use serde_json::json;
use sf_api::{
    ClientConfig, CreateRecordRequest, ErrorKind, GoalInput, ProgressRange, ServiceClient,
    ServiceError,
};
use tempfile::tempdir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ServiceClient {
    ServiceClient::new(&ClientConfig::with_base_url(format!("{}/api", server.uri()))).unwrap()
}

fn goal_json() -> serde_json::Value {
    json!({
        "id": 4,
        "gender": "f",
        "age": 30,
        "height_cm": 165.0,
        "weight_kg": 60.0,
        "deficit_target": -500,
        "calorie_target": 1335.6,
        "protein_target": 96.0
    })
}

fn goal_input() -> GoalInput {
    GoalInput {
        gender: "f".into(),
        age: 30,
        height_cm: 165.0,
        weight_kg: 60.0,
        deficit_target: -500,
    }
}

fn meal_json() -> serde_json::Value {
    json!({
        "id": 11,
        "image_url": "",
        "food_name": "rice",
        "visual_portion_id": 7,
        "calories": 232.0,
        "protein": 4.3,
        "record_date": "2025-03-01T12:30:05"
    })
}

#[tokio::test]
async fn set_goal_then_get_goal_round_trips_inputs() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/goals"))
        .and(body_json(json!({
            "gender": "f", "age": 30, "height_cm": 165.0, "weight_kg": 60.0, "deficit_target": -500
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(goal_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/goals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(goal_json()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = goal_input();
    let stored = client.set_goal(&input).await.unwrap();
    assert!(stored.matches_input(&input));

    let fetched = client.goal().await.unwrap();
    assert!(fetched.matches_input(&input));
    assert_eq!(fetched, stored);
}

#[tokio::test]
async fn goal_get_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/goals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(goal_json()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.goal().await;
    let second = client.goal().await;
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[tokio::test]
async fn null_goal_body_means_no_goal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/goals"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.try_goal().await.unwrap(), None);
    assert_eq!(client.goal().await, None);
}

#[tokio::test]
async fn goal_lookup_swallows_server_errors_but_try_goal_keeps_them() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/goals"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.goal().await, None);
    let err = client.try_goal().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
}

#[tokio::test]
async fn slow_goal_lookup_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/goals"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(goal_json())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = ClientConfig::with_base_url(format!("{}/api", server.uri()));
    config.request_timeout_ms = 100;
    let client = ServiceClient::new(&config).unwrap();

    let started = Instant::now();
    let err = client.try_goal().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(client.goal().await, None);
}

#[tokio::test]
async fn search_query_is_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/food-search"))
        .and(query_param("q", "鸡 胸&肉"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": "鸡胸肉",
            "category": "meat",
            "aliases": ["chicken breast"],
            "calories_per_100g": 133.0,
            "protein_per_100g": 24.6,
            "portion_count": 3
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let foods = client.search_foods("鸡 胸&肉").await.unwrap();
    assert_eq!(foods.len(), 1);
    assert_eq!(foods[0].aliases, vec!["chicken breast".to_string()]);
}

#[tokio::test]
async fn portions_lookup_escapes_name_and_surfaces_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/portions/chicken%20breast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "food_name": "chicken breast",
            "portion_options": [{
                "id": 21, "food_name": "chicken breast", "portion_name": "palm",
                "weight_grams": 100.0, "calories": 133.0, "protein": 24.6
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/portions/unicorn"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": { "message": "no data for unicorn", "code": "FOOD_NOT_FOUND" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let portions = client.portions_for_food("chicken breast").await.unwrap();
    assert_eq!(portions[0].id, 21);

    match client.portions_for_food("unicorn").await.unwrap_err() {
        ServiceError::Rejected { status, detail } => {
            assert_eq!(status, 404);
            assert_eq!(detail.code.as_deref(), Some("FOOD_NOT_FOUND"));
            assert_eq!(detail.message, "no data for unicorn");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn analyze_failure_carries_recognition_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .and(body_json(json!({ "image_base64": "aGVsbG8=" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": {
                "message": "recognition was difficult, please pick a food type",
                "code": "RECOGNITION_FAILED"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.analyze_image("aGVsbG8=").await.unwrap_err();
    assert!(matches!(err, ServiceError::Rejected { status: 400, .. }));
    assert_eq!(
        err.user_message(),
        "recognition was difficult, please pick a food type"
    );
}

#[tokio::test]
async fn analyze_server_error_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.analyze_image("aGVsbG8=").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Server));
}

#[tokio::test]
async fn create_record_propagates_classified_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/records"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let record = CreateRecordRequest {
        image_url: "".into(),
        food_name: "rice".into(),
        visual_portion_id: 7,
    };
    let err = client.create_record(&record).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Server));
}

#[tokio::test]
async fn invalid_portion_id_never_reaches_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/quick-record"))
        .respond_with(ResponseTemplate::new(200).set_body_json(meal_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.quick_record(0).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    let meal = client.quick_record(7).await.unwrap();
    assert_eq!(meal.visual_portion_id, 7);
}

#[tokio::test]
async fn progress_sends_range_and_parses_points() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/progress"))
        .and(query_param("range", "week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_calorie_deficit": 850.5,
            "estimated_fat_lost": 0.11,
            "days_tracked": 2,
            "data_points": [
                { "date": "2025-03-01", "calorie_deficit": 400.0, "consumed_calories": 1400.0 },
                { "date": "2025-03-02", "calorie_deficit": 450.5, "consumed_calories": 1349.5 }
            ],
            "encouragement": "good start, keep going!"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let progress = client.progress(ProgressRange::Week).await.unwrap();
    assert_eq!(progress.days_tracked, 2);
    assert_eq!(progress.data_points[1].date.to_string(), "2025-03-02");
}

#[tokio::test]
async fn balance_defaults_missing_suggestions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "remaining_calories": 900.0,
            "remaining_protein": 50.0,
            "consumed_calories": 900.0,
            "consumed_protein": 46.0,
            "target_calories": 1800.0,
            "target_protein": 96.0,
            "meals_count": 2
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let balance = client.balance().await.unwrap();
    assert_eq!(balance.meals_count, 2);
    assert!(balance.suggestions.is_empty());
}

#[tokio::test]
async fn categories_and_category_foods() {
    let server = MockServer::start().await;
    let category = json!({ "key": "staple", "name": "Staples", "icon": "rice", "description": "rice, noodles" });
    Mock::given(method("GET"))
        .and(path("/api/food-categories"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "categories": [category.clone()] })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/foods-by-category/staple"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "category": category,
            "foods": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/foods-by-category/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "unknown category" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let categories = client.food_categories().await.unwrap();
    assert_eq!(categories[0].key, "staple");

    let foods = client.foods_by_category("staple").await.unwrap();
    assert!(foods.foods.is_empty());

    let err = client.foods_by_category("nope").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Validation));
}

#[tokio::test]
async fn local_ip_is_best_effort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/system/local-ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ips": ["192.168.1.20"],
            "primary_ip": "192.168.1.20",
            "hostname": "kitchen",
            "count": 1
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ips = client.local_ip().await.unwrap();
    assert_eq!(ips.primary_ip, "192.168.1.20");

    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let offline = ServiceClient::new(&ClientConfig::with_base_url(format!("http://{addr}/api")))
        .unwrap();
    assert!(offline.local_ip().await.is_none());
}

#[tokio::test]
async fn ip_config_reads_static_file_best_effort() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ip-config.json");
    fs::write(
        &path,
        r#"{"ips":["10.0.0.5"],"primary_ip":"10.0.0.5","hostname":"pi","port":5173,"timestamp":1735689600}"#,
    )
    .unwrap();

    let mut config = ClientConfig::default();
    config.ip_config_path = path.clone();
    let client = ServiceClient::new(&config).unwrap();
    let ip_config = client.ip_config().await.unwrap();
    assert_eq!(ip_config.port, 5173);

    fs::write(&path, "{ not json").unwrap();
    assert!(client.ip_config().await.is_none());

    config.ip_config_path = dir.path().join("missing.json");
    let client = ServiceClient::new(&config).unwrap();
    assert!(client.ip_config().await.is_none());
}
