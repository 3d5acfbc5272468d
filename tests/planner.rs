use anyhow::Result;
use ironsample::planner::ScanReason;
use ironsample::testing::*;
use ironsample::*;

#[test]
fn small_samples_of_large_collections_use_a_random_cursor() {
    let planner = SamplePlanner::default();
    let plan = planner.plan(&SampleSpec::new(50), &CollectionInfo::new(1000, true));

    assert!(plan.requires_random_cursor());
    assert_eq!(plan.size(), 50);
    let SamplePlan::RandomCursor { options } = plan else {
        panic!("expected a random cursor plan");
    };
    assert_eq!(options.population_estimate, 1000);
    assert_eq!(options.id_field, "_id");
    assert_eq!(options.max_duplicate_attempts, 1000);
}

#[test]
fn falls_back_to_a_full_scan() {
    let planner = SamplePlanner::default();
    let spec = SampleSpec::new(51);

    let cases = [
        (CollectionInfo::new(1000, false), ScanReason::NoRandomCursor),
        (CollectionInfo::new(0, true), ScanReason::EmptyCollection),
    ];
    for (collection, expected) in cases {
        match planner.plan(&spec, &collection) {
            SamplePlan::Reservoir { reason, .. } => assert_eq!(reason, expected),
            other => panic!("expected a full scan for {collection:?}, got {other}"),
        }
    }

    match planner.plan(&spec, &CollectionInfo::new(1000, true)) {
        SamplePlan::Reservoir {
            reason: ScanReason::RatioExceeded { ratio, max_ratio },
            spec: planned,
        } => {
            assert!(ratio > max_ratio);
            assert_eq!(planned, spec);
        }
        other => panic!("expected the ratio to be exceeded, got {other}"),
    }
}

#[test]
fn configured_settings_reach_the_stage() -> Result<()> {
    let config = PlannerConfig::from_json_str(
        r#"{"max_sample_ratio": 0.5, "id_field": "key", "max_duplicate_attempts": 7}"#,
    )?;
    let planner = SamplePlanner::new(config);
    let plan = planner.plan(&SampleSpec::new(4), &CollectionInfo::new(10, true));

    let SamplePlan::RandomCursor { options } = &plan else {
        panic!("expected a random cursor plan, got {plan}");
    };
    assert_eq!(options.id_field, "key");
    assert_eq!(options.max_duplicate_attempts, 7);
    Ok(())
}

#[test]
fn built_stages_sample_the_requested_size() -> Result<()> {
    let planner = SamplePlanner::default();
    for (count, random) in [(10_000u64, true), (10_000, false), (100, true)] {
        let spec = SampleSpec::new(20);
        let plan = planner.plan(&spec, &CollectionInfo::new(count, random));
        let expected_name = if plan.requires_random_cursor() {
            "$sampleFromRandomCursor"
        } else {
            "$sample"
        };

        let source = MockSource::from_docs(numbered_docs(usize::try_from(count)?));
        let mut stage = planner.build(plan, Box::new(source), WeightAssigner::seeded(count))?;
        assert_eq!(stage.name(), expected_name);

        let docs = Runner::new().collect(&mut stage)?;
        assert_collection_size(&docs, 20);
        assert_descending_weights(&docs);
    }
    Ok(())
}

#[test]
fn build_reports_invalid_options() {
    let plan = SamplePlan::RandomCursor {
        options: RandomCursorOptions::new(3, 0),
    };
    let built = SamplePlanner::default().build(
        plan,
        Box::new(MockSource::new()),
        WeightAssigner::seeded(1),
    );
    let Err(err) = built else {
        panic!("expected invalid options to fail");
    };
    assert!(err.to_string().contains("invalid random-cursor sampling options"));
    assert!(matches!(
        err.downcast_ref::<SampleError>(),
        Some(SampleError::InvalidOptionValue { .. })
    ));
}
