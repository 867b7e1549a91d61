//! Tests for dispatch configuration loading.

use std::env;
use std::io::Write;

use serial_test::serial;
use tempfile::NamedTempFile;

use crate::config::DispatchConfig;
use crate::dispatch::Isa;
use crate::error::Error;

fn clear_env() {
    env::remove_var("SIMKERN_FORCE_ISA");
    env::remove_var("SIMKERN_DISABLED_ISAS");
}

#[test]
fn test_default_is_auto_detect() {
    let config = DispatchConfig::default();
    assert_eq!(config.force_isa, None);
    assert!(config.disabled_isas.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_toml_str_parses_fields() {
    let config = DispatchConfig::from_toml_str(
        r#"
force_isa = "avx2"
disabled_isas = ["avx512", "sve"]
"#,
    )
    .unwrap();
    assert_eq!(config.force_isa, Some(Isa::Avx2));
    assert_eq!(config.disabled_isas, vec![Isa::Avx512, Isa::Sve]);
    assert!(config.is_disabled(Isa::Sve));
    assert!(!config.is_disabled(Isa::Neon));
}

#[test]
fn test_partial_toml_uses_defaults() {
    let config = DispatchConfig::from_toml_str(r#"disabled_isas = ["neon"]"#).unwrap();
    assert_eq!(config.force_isa, None);
    assert_eq!(config.disabled_isas, vec![Isa::Neon]);
}

#[test]
fn test_unknown_isa_name_is_config_error() {
    let err = DispatchConfig::from_toml_str(r#"force_isa = "mmx""#).unwrap_err();
    assert!(matches!(err, Error::Config(_)), "got {err:?}");
}

#[test]
fn test_validate_rejects_disabling_serial() {
    let config = DispatchConfig {
        force_isa: None,
        disabled_isas: vec![Isa::Serial],
    };
    assert!(matches!(config.validate(), Err(Error::Config(_))));
}

#[test]
fn test_validate_rejects_forcing_disabled_isa() {
    let config = DispatchConfig {
        force_isa: Some(Isa::Neon),
        disabled_isas: vec![Isa::Neon],
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("neon"), "got {err}");
}

#[test]
fn test_forced_constructor() {
    let config = DispatchConfig::forced(Isa::Serial);
    assert_eq!(config.force_isa, Some(Isa::Serial));
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_load_from_file() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "force_isa = \"serial\"").unwrap();
    writeln!(file, "disabled_isas = [\"avx2\"]").unwrap();

    let config = DispatchConfig::load_from(file.path()).unwrap();
    assert_eq!(config.force_isa, Some(Isa::Serial));
    assert_eq!(config.disabled_isas, vec![Isa::Avx2]);
}

#[test]
fn test_load_from_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = DispatchConfig::load_from(&missing).unwrap_err();
    assert!(err.to_string().contains("not found"), "got {err}");
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "force_isa = \"avx2\"").unwrap();

    env::set_var("SIMKERN_FORCE_ISA", "serial");
    let config = DispatchConfig::load_from(file.path());
    clear_env();

    assert_eq!(config.unwrap().force_isa, Some(Isa::Serial));
}

#[test]
#[serial]
fn test_env_invalid_combination_rejected() {
    clear_env();
    let file = NamedTempFile::new().unwrap();

    env::set_var("SIMKERN_DISABLED_ISAS", "[serial]");
    let result = DispatchConfig::load_from(file.path());
    clear_env();

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_env_disabled_isas_list_syntax() {
    clear_env();
    let file = NamedTempFile::new().unwrap();

    env::set_var("SIMKERN_DISABLED_ISAS", "[avx512]");
    let single = DispatchConfig::load_from(file.path());
    env::set_var("SIMKERN_DISABLED_ISAS", "[avx512,neon]");
    let several = DispatchConfig::load_from(file.path());
    env::set_var("SIMKERN_DISABLED_ISAS", "avx512");
    let bare = DispatchConfig::load_from(file.path());
    clear_env();

    assert_eq!(single.unwrap().disabled_isas, vec![Isa::Avx512]);
    assert_eq!(several.unwrap().disabled_isas, vec![Isa::Avx512, Isa::Neon]);
    assert!(matches!(bare, Err(Error::Config(_))));
}
