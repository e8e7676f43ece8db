//! End-to-end measurement requests.

use patient_measurements::{ComputedMeasurementResource, QueryParams};
use proptest::prelude::*;

#[test]
fn test_bmi_request() {
    let resource = ComputedMeasurementResource::standard();
    let (status, body) = resource.respond(&QueryParams::parse("measurement=bmi&weight=80&height=200"));

    assert_eq!(status, 200);
    assert_eq!(body, serde_json::json!({ "value": 20.0 }));
}

#[test]
fn test_error_envelopes() {
    let resource = ComputedMeasurementResource::standard();

    let (status, body) = resource.respond(&QueryParams::parse("weight=80"));
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Measurement not specified.");

    let (status, body) = resource.respond(&QueryParams::parse("measurement=hc&weight=80"));
    assert_eq!(status, 400);
    assert_eq!(body["message"], "This measurement is not intended to be computed.");

    let (status, body) = resource.respond(&QueryParams::parse("measurement=bmi&weight=-1&height=170"));
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Weight must be positive");
}

#[test]
fn test_percent_encoded_request() {
    let resource = ComputedMeasurementResource::standard();
    let (status, body) =
        resource.respond(&QueryParams::parse("measurement=bmi&weight=80%2E0&height=200&note=a%20b"));

    assert_eq!(status, 200);
    assert_eq!(body, serde_json::json!({ "value": 20.0 }));
}

#[test]
fn test_overflowing_bmi_is_rejected() {
    let resource = ComputedMeasurementResource::standard();
    let (status, body) = resource.respond(&QueryParams::parse("measurement=bmi&weight=1e308&height=1e-300"));

    assert_eq!(status, 400);
    assert_eq!(body["message"], "Computed bmi is not a finite number");
    assert!(body.get("value").is_none());
}

proptest! {
    #[test]
    fn prop_bmi_matches_formula(weight in 1.0f64..300.0, height in 30.0f64..250.0) {
        let resource = ComputedMeasurementResource::standard();
        let params = QueryParams::from_pairs([
            ("measurement".to_string(), "bmi".to_string()),
            ("weight".to_string(), weight.to_string()),
            ("height".to_string(), height.to_string()),
        ]);

        let value = resource.get_computed_measurement(&params).unwrap().value;
        let expected = weight / ((height / 100.0) * (height / 100.0));
        prop_assert!((value - expected).abs() < 1e-9 * expected.max(1.0));
    }
}
