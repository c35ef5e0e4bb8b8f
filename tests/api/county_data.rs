use crate::helpers::{error_message, TestApp};
use serde_json::{json, Value};

const NUMERIC_FIELDS: [&str; 5] = [
    "confidence_interval_lower_bound",
    "confidence_interval_upper_bound",
    "denominator",
    "numerator",
    "raw_value",
];

async fn records(response: reqwest::Response) -> Vec<Value> {
    response.json().await.expect("Failed to parse records")
}

#[tokio::test]
async fn county_data_returns_a_200_with_records_for_a_known_zip_and_measure() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app
        .post_county_data(&json!({"zip": "02138", "measure_name": "Unemployment"}))
        .await;

    // then
    assert_eq!(response.status(), 200);
    let records = records(response).await;
    assert_eq!(records.len(), 2);
    let first = &records[0];
    assert_eq!(first["county"], "Middlesex County");
    assert_eq!(first["state"], "MA");
    assert_eq!(first["county_code"], "17");
    assert_eq!(first["state_code"], "25");
    assert_eq!(first["data_release_year"], "2024");
    assert_eq!(records[1]["data_release_year"], "2023");
}

#[tokio::test]
async fn records_have_exactly_the_documented_fields() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app
        .post_county_data(&json!({"zip": "02138", "measure_name": "Unemployment"}))
        .await;

    // then
    let records = records(response).await;
    let fields: Vec<_> = records[0].as_object().unwrap().keys().cloned().collect();
    assert_eq!(
        fields,
        [
            "confidence_interval_lower_bound",
            "confidence_interval_upper_bound",
            "county",
            "county_code",
            "data_release_year",
            "denominator",
            "fipscode",
            "measure_id",
            "measure_name",
            "numerator",
            "raw_value",
            "state",
            "state_code",
            "year_span",
        ]
    );
}

#[tokio::test]
async fn numeric_fields_are_rendered_with_three_decimals() {
    // given
    let app = TestApp::spawn().await;

    for measure_name in ["Unemployment", "Adult obesity"] {
        // when
        let response = app
            .post_county_data(&json!({"zip": "02138", "measure_name": measure_name}))
            .await;

        // then
        for record in records(response).await {
            for field in NUMERIC_FIELDS {
                let value = record[field].as_str().unwrap();
                let (_, fraction) = value.split_once('.').unwrap();
                assert_eq!(fraction.len(), 3, "{field} = {value} for {measure_name}");
                assert!(value.parse::<f64>().is_ok());
            }
        }
    }
}

#[tokio::test]
async fn missing_numbers_are_rendered_as_zero() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app
        .post_county_data(&json!({"zip": "02138", "measure_name": "Adult obesity"}))
        .await;

    // then
    let records = records(response).await;
    assert_eq!(records[0]["numerator"], "0.000");
    assert_eq!(records[0]["denominator"], "0.000");
    assert_eq!(records[0]["raw_value"], "0.226");
    assert_eq!(records[0]["confidence_interval_upper_bound"], "0.256");
}

#[tokio::test]
async fn fipscode_is_the_state_code_followed_by_the_county_code() {
    // given
    let app = TestApp::spawn().await;

    for zip in ["02138", "02108", "94103"] {
        // when
        let response = app
            .post_county_data(&json!({"zip": zip, "measure_name": "Unemployment"}))
            .await;

        // then
        for record in records(response).await {
            let expected = format!(
                "{}{}",
                record["state_code"].as_str().unwrap(),
                record["county_code"].as_str().unwrap()
            );
            assert_eq!(record["fipscode"], expected.as_str());
        }
    }
}

#[tokio::test]
async fn zero_padded_county_codes_match_unpadded_mappings() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app
        .post_county_data(&json!({"zip": "94103", "measure_name": "Unemployment"}))
        .await;

    // then
    assert_eq!(response.status(), 200);
    let records = records(response).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["county"], "San Francisco County");
    assert_eq!(records[0]["state_code"], "06");
    assert_eq!(records[0]["county_code"], "075");
    assert_eq!(records[0]["fipscode"], "06075");
}

#[tokio::test]
async fn repeated_requests_return_identical_records() {
    // given
    let app = TestApp::spawn().await;
    let body = json!({"zip": "02138", "measure_name": "Unemployment"});

    // when
    let first = records(app.post_county_data(&body).await).await;
    let second = records(app.post_county_data(&body).await).await;

    // then
    assert_eq!(first, second);
}

#[tokio::test]
async fn county_data_returns_a_418_for_a_teapot() {
    // given
    let app = TestApp::spawn().await;
    let test_cases = [
        json!({"coffee": "teapot", "zip": "02138", "measure_name": "Adult obesity"}),
        json!({"coffee": "teapot"}),
        json!({"coffee": "teapot", "zip": "bogus", "measure_name": "NonexistentMeasure"}),
    ];

    for body in test_cases {
        // when
        let response = app.post_county_data(&body).await;

        // then
        assert_eq!(response.status(), 418, "No teapot for {body}");
        assert_eq!(response.text().await.unwrap(), "");
    }
}

#[tokio::test]
async fn county_data_returns_a_400_when_fields_are_missing() {
    // given
    let app = TestApp::spawn().await;
    let test_cases = [
        (json!({"zip": "02138"}), "missing the measure_name"),
        (json!({"measure_name": "Adult obesity"}), "missing the zip"),
        (json!({}), "missing both zip and measure_name"),
        (json!({"zip": "", "measure_name": ""}), "empty zip and measure_name"),
        (json!({"coffee": "latte", "zip": "02138"}), "not a teapot"),
    ];

    for (body, description) in test_cases {
        // when
        let response = app.post_county_data(&body).await;

        // then
        assert_eq!(
            response.status(),
            400,
            "The API did not return a 400 BAD_REQUEST when the payload was {description}"
        );
        assert_eq!(
            error_message(response).await,
            "Both 'zip' and 'measure_name' are required"
        );
    }
}

#[tokio::test]
async fn county_data_returns_a_400_for_malformed_zips() {
    // given
    let app = TestApp::spawn().await;

    for zip in [json!("2138"), json!("021381"), json!("02l38"), json!("02138-1234"), json!(2138)] {
        // when
        let response = app
            .post_county_data(&json!({"zip": zip, "measure_name": "Adult obesity"}))
            .await;

        // then
        assert_eq!(response.status(), 400, "{zip} was accepted");
        assert_eq!(error_message(response).await, "Invalid ZIP code format");
    }
}

#[tokio::test]
async fn county_data_returns_a_400_for_non_json_bodies() {
    // given
    let app = TestApp::spawn().await;
    let test_cases = [
        (None, "zip=02138&measure_name=Unemployment", "no content type"),
        (
            Some("application/x-www-form-urlencoded"),
            "zip=02138&measure_name=Unemployment",
            "a form",
        ),
        (Some("application/json"), "{\"zip\": ", "truncated json"),
        (Some("application/json"), "[\"02138\", \"Unemployment\"]", "a json array"),
    ];

    for (content_type, body, description) in test_cases {
        // when
        let response = app.post_county_data_raw(content_type, body.to_string()).await;

        // then
        assert_eq!(response.status(), 400, "Accepted {description}");
        assert_eq!(
            error_message(response).await,
            "Content-Type must be application/json"
        );
    }
}

#[tokio::test]
async fn county_data_returns_a_404_for_an_unknown_measure() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app
        .post_county_data(&json!({"zip": "02138", "measure_name": "NonexistentMeasure"}))
        .await;

    // then
    assert_eq!(response.status(), 404);
    assert_eq!(error_message(response).await, "Invalid measure_name");
}

#[tokio::test]
async fn county_data_returns_a_404_when_nothing_matches() {
    // given
    let app = TestApp::spawn().await;
    let test_cases = [
        json!({"zip": "00000", "measure_name": "Adult obesity"}),
        json!({"zip": "02108", "measure_name": "Adult obesity"}),
        json!({"zip": "02138", "measure_name": "Violent crime rate"}),
    ];

    for body in test_cases {
        // when
        let response = app.post_county_data(&body).await;

        // then
        assert_eq!(response.status(), 404, "Found data for {body}");
        assert_eq!(error_message(response).await, "No data found");
    }
}

#[tokio::test]
async fn county_data_returns_a_404_when_the_store_is_unavailable() {
    // given
    let app = TestApp::spawn_without_reference_data().await;

    // when
    let response = app
        .post_county_data(&json!({"zip": "02138", "measure_name": "Unemployment"}))
        .await;

    // then
    assert_eq!(response.status(), 404);
    assert_eq!(error_message(response).await, "Database error");
}

#[tokio::test]
async fn county_data_returns_a_500_for_unparseable_stored_numbers() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app
        .post_county_data(&json!({"zip": "02554", "measure_name": "Unemployment"}))
        .await;

    // then
    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn other_methods_on_county_data_return_a_404() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.get("/county_data").await;

    // then
    assert_eq!(response.status(), 404);
}
