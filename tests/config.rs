use anyhow::Result;
use ironsample::*;
use serde_json::{Value, json};

#[macro_use]
mod macros;

#[test]
fn rejects_malformed_specifications() {
    let cases: [(Value, u32); 8] = [
        (json!(1), 28745),
        (json!("string"), 28745),
        (json!([{"size": 1}]), 28745),
        (json!({}), 28749),
        (json!({"size": "x"}), 28746),
        (json!({"size": null}), 28746),
        (json!({"size": -1}), 28747),
        (json!({"size": 1, "extra": 2}), 28748),
    ];
    for (spec, code) in cases {
        let parsed = SampleSpec::parse(&spec);
        assert_error_code!(parsed, code);
    }
}

#[test]
fn negative_fractional_size_is_rejected() {
    assert!(matches!(
        SampleSpec::parse(&json!({"size": -0.5})),
        Err(SampleError::InvalidOptionValue { option: "size", .. })
    ));
}

#[test]
fn unknown_key_before_size_is_reported() {
    let err = SampleSpec::parse(&json!({"extra": 2, "size": 1})).unwrap_err();
    assert_eq!(
        err,
        SampleError::UnrecognizedOption {
            option: "extra".into()
        }
    );
    assert!(err.is_configuration_error());
    assert_eq!(err.to_string(), "unrecognized option to $sample: extra");
}

#[test]
fn fractional_size_is_truncated_but_serialized_as_given() -> Result<()> {
    let spec = SampleSpec::parse(&json!({"size": 2.9}))?;
    assert_eq!(spec.size(), 2);
    assert_eq!(spec.serialize(), json!({"size": 2.9}));
    Ok(())
}

#[test]
fn serialize_round_trips() -> Result<()> {
    for size in [0, 1, 5, 1_000_000] {
        let spec = SampleSpec::parse(&json!({ "size": size }))?;
        assert_eq!(spec.size(), size);

        let reparsed = SampleSpec::parse_stage(&spec.to_stage())?;
        assert_eq!(reparsed, spec);
        assert_eq!(reparsed.to_stage(), json!({"$sample": {"size": size}}));
    }
    Ok(())
}

#[test]
fn parse_stage_checks_the_wrapper() {
    assert_error_code!(SampleSpec::parse_stage(&json!({"$limit": 3})), 28745);
    assert_error_code!(
        SampleSpec::parse_stage(&json!({"$sample": {"size": 1}, "$limit": 3})),
        28745
    );
    assert_error_code!(SampleSpec::parse_stage(&json!({"$sample": 3})), 28745);
}

#[test]
fn stage_construction_fails_on_bad_spec() {
    let built = SampleStage::from_json(
        &json!({"size": "many"}),
        Box::new(testing::MockSource::new()),
        WeightAssigner::seeded(0),
    );
    assert!(matches!(
        built,
        Err(SampleError::InvalidOptionType { option: "size", .. })
    ));
}

#[test]
fn planner_config_defaults_and_overrides() -> Result<()> {
    let defaults = PlannerConfig::from_json_str("{}")?;
    assert_eq!(defaults, PlannerConfig::default());
    assert_approx_eq!(defaults.max_sample_ratio, 0.05);
    assert_eq!(defaults.id_field, "_id");
    assert_eq!(defaults.max_duplicate_attempts, 1000);

    let custom = PlannerConfig::from_json_str(
        r#"{"max_sample_ratio": 0.1, "id_field": "key", "max_duplicate_attempts": 50}"#,
    )?;
    assert_approx_eq!(custom.max_sample_ratio, 0.1);
    assert_eq!(custom.id_field, "key");
    assert_eq!(custom.max_duplicate_attempts, 50);
    Ok(())
}

#[test]
fn planner_config_rejects_bad_input() {
    assert!(PlannerConfig::from_json_str(r#"{"max_sample_ratio": 1.5}"#).is_err());
    assert!(PlannerConfig::from_json_str(r#"{"max_sample_ratio": "high"}"#).is_err());
    assert!(PlannerConfig::from_json_str("not json").is_err());
}

#[test]
fn random_cursor_options_deserialize_with_defaults() -> Result<()> {
    let options: RandomCursorOptions =
        serde_json::from_value(json!({"size": 3, "population_estimate": 90}))?;
    assert_eq!(options, RandomCursorOptions::new(3, 90));
    options.validate()?;
    Ok(())
}
