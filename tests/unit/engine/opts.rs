use super::*;

#[test]
fn empty_document_yields_defaults() {
    let opts: EngineOpts = serde_json::from_str("{}").unwrap();
    assert_eq!(opts, EngineOpts::default());
    assert_eq!(opts.target_tag, "disrupt");
    assert_eq!(opts.loop_tag, "loop");
    assert_eq!(opts.default_effect, "dsrpt-horizontal");
    assert_eq!(opts.loop_progress, LoopProgress::Unbounded);
    opts.validate().unwrap();
}

#[test]
fn partial_document_overrides_named_fields() {
    let opts: EngineOpts =
        serde_json::from_str(r#"{ "seed": 7, "loop_progress": "wrap" }"#).unwrap();
    assert_eq!(opts.seed, 7);
    assert_eq!(opts.loop_progress, LoopProgress::Wrap);
    assert_eq!(opts.target_tag, "disrupt");
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(serde_json::from_str::<EngineOpts>(r#"{ "sead": 7 }"#).is_err());
}

#[test]
fn validate_rejects_blank_or_clashing_tags() {
    let mut opts = EngineOpts {
        target_tag: " ".to_owned(),
        ..EngineOpts::default()
    };
    assert!(opts.validate().is_err());

    opts.target_tag = "two words".to_owned();
    assert!(opts.validate().is_err());

    opts.target_tag = "loop".to_owned();
    assert!(opts.validate().is_err());
}

#[test]
fn wrap_only_applies_to_looping_instances() {
    assert_eq!(LoopProgress::Wrap.apply(2.25, true), 0.25);
    assert_eq!(LoopProgress::Wrap.apply(2.25, false), 2.25);
    assert_eq!(LoopProgress::Unbounded.apply(2.25, true), 2.25);
    assert_eq!(LoopProgress::Wrap.apply(0.5, true), 0.5);
}

#[test]
fn from_path_reads_and_validates() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("target/unit_opts");
    std::fs::create_dir_all(&dir).unwrap();

    let good = dir.join("good.json");
    std::fs::write(&good, r#"{ "seed": 42, "default_effect": "dsrpt-blocks" }"#).unwrap();
    let opts = EngineOpts::from_path(&good).unwrap();
    assert_eq!(opts.seed, 42);
    assert_eq!(opts.default_effect, "dsrpt-blocks");

    let bad = dir.join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    assert!(matches!(
        EngineOpts::from_path(&bad),
        Err(DisruptError::Serde(_))
    ));

    assert!(matches!(
        EngineOpts::from_path(&dir.join("missing.json")),
        Err(DisruptError::Other(_))
    ));
}
