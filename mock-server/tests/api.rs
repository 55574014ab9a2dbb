use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Envelope, WeatherRecord};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

const PARIS: &str = r#"{"location":"Paris","start_date":"2024-01-01","end_date":"2024-01-03"}"#;

// --- root ---

#[tokio::test]
async fn root_reports_running() {
    let resp = app().oneshot(empty_request("GET", "/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "Weather API is running");
}

// --- list ---

#[tokio::test]
async fn list_weather_empty() {
    let resp = app().oneshot(empty_request("GET", "/weather/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list: Envelope<Vec<WeatherRecord>> = body_json(resp).await;
    assert!(list.data.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_weather_returns_201_with_payload() {
    let resp = app()
        .oneshot(json_request("POST", "/create-weather/", PARIS))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Envelope<WeatherRecord> = body_json(resp).await;
    assert_eq!(created.message.as_deref(), Some("Weather data saved successfully"));
    let record = created.data;
    assert_eq!(record.id, 1);
    assert_eq!(record.location, "Paris");
    assert_eq!(record.start_date, "2024-01-01");
    assert_eq!(record.end_date, "2024-01-03");
    assert!(record.weather_data["current"]["main"]["temp"].is_number());
    assert!(record.lat.is_some());
}

#[tokio::test]
async fn create_weather_bad_date_format_returns_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/create-weather/",
            r#"{"location":"Paris","start_date":"01/01/2024","end_date":"2024-01-03"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Invalid date format. Use YYYY-MM-DD");
}

#[tokio::test]
async fn create_weather_reversed_range_returns_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/create-weather/",
            r#"{"location":"Paris","start_date":"2024-02-01","end_date":"2024-01-03"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Start date must be before end date");
}

#[tokio::test]
async fn create_weather_blank_location_returns_404() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/create-weather/",
            r#"{"location":" ","start_date":"2024-01-01","end_date":"2024-01-03"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Location not found or API error");
}

#[tokio::test]
async fn create_weather_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/create-weather/", r#"{"not_location":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get ---

#[tokio::test]
async fn get_weather_not_found() {
    let resp = app().oneshot(empty_request("GET", "/weather/99")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Weather record not found");
}

#[tokio::test]
async fn non_numeric_id_returns_404_with_detail() {
    for method in ["GET", "DELETE"] {
        let resp = app()
            .oneshot(empty_request(method, "/weather/not-a-number"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = body_json(resp).await;
        assert_eq!(body["detail"], "Weather record not found");
    }

    let resp = app()
        .oneshot(json_request("PUT", "/weather/abc-123", r#"{"location":"Oslo"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- update ---

#[tokio::test]
async fn update_weather_not_found() {
    let resp = app()
        .oneshot(json_request("PUT", "/weather/99", r#"{"location":"Nope"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_weather_not_found() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/weather/99"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/create-weather/", PARIS))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Envelope<WeatherRecord> = body_json(resp).await;
    let id = created.data.id;
    let original_weather = created.data.weather_data.clone();

    // list: should contain the one record
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/weather/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let list: Envelope<Vec<WeatherRecord>> = body_json(resp).await;
    assert_eq!(list.data.len(), 1);
    assert_eq!(list.data[0].id, id);

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/weather/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Envelope<WeatherRecord> = body_json(resp).await;
    assert_eq!(fetched.data.location, "Paris");

    // update: dates only, weather payload kept
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/weather/{id}"),
            r#"{"start_date":"2024-01-02","end_date":"2024-01-04"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Envelope<WeatherRecord> = body_json(resp).await;
    assert_eq!(updated.data.location, "Paris"); // unchanged
    assert_eq!(updated.data.start_date, "2024-01-02");
    assert_eq!(updated.data.weather_data, original_weather);

    // update: new location refreshes the weather payload
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/weather/{id}"),
            r#"{"location":"Tokyo","start_date":"2024-01-02","end_date":"2024-01-04"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Envelope<WeatherRecord> = body_json(resp).await;
    assert_eq!(updated.data.location, "Tokyo");
    assert_eq!(updated.data.weather_data["current"]["name"], "Tokyo");

    // update: reversed range is rejected with detail
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/weather/{id}"),
            r#"{"end_date":"2023-12-31"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Start date must be before end date");

    // update: empty body
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", &format!("/weather/{id}"), "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "No valid fields to update");

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/weather/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["message"], "Weather record deleted successfully");

    // get after delete: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/weather/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete: empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/weather/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let list: Envelope<Vec<WeatherRecord>> = body_json(resp).await;
    assert!(list.data.is_empty());
}
