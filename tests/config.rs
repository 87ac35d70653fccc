use assert_matches::assert_matches;

use gdc_consolidate::config::{Config, ConfigLoader, ConfigOverrides};
use gdc_consolidate::domain::RunMode;
use gdc_consolidate::error::ConsolidateError;

#[test]
fn config_file_values_and_overrides() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("gdc-consolidate.json");
    std::fs::write(
        &path,
        r#"{"input": "/data/gdc", "out": "/data/out.csv", "pattern": "*.txt", "mode": "lenient"}"#,
    )
    .unwrap();
    let path = path.to_str().unwrap();

    let options = ConfigLoader::resolve(Some(path), ConfigOverrides::default()).unwrap();
    assert_eq!(options.input, "/data/gdc");
    assert_eq!(options.output, "/data/out.csv");
    assert_eq!(options.pattern, "*.txt");
    assert_eq!(options.mode, RunMode::Lenient);

    let overrides = ConfigOverrides {
        pattern: Some("*rppa*".to_string()),
        ..ConfigOverrides::default()
    };
    let options = ConfigLoader::resolve(Some(path), overrides).unwrap();
    assert_eq!(options.pattern, "*rppa*");
    assert_eq!(options.input, "/data/gdc");
}

#[test]
fn lenient_flag_wins() {
    let config = Config {
        mode: Some(RunMode::Strict),
        ..Config::default()
    };
    let overrides = ConfigOverrides {
        lenient: true,
        ..ConfigOverrides::default()
    };
    assert_eq!(
        ConfigLoader::resolve_config(config, overrides).mode,
        RunMode::Lenient
    );
}

#[test]
fn explicit_missing_config_fails() {
    let err = ConfigLoader::load(Some("/definitely/not/here.json")).unwrap_err();
    assert_matches!(err, ConsolidateError::ConfigRead(_));
}

#[test]
fn unknown_keys_are_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("bad.json");
    std::fs::write(&path, r#"{"inputs": "x"}"#).unwrap();
    let err = ConfigLoader::load(path.to_str()).unwrap_err();
    assert_matches!(err, ConsolidateError::ConfigParse(_));
}
