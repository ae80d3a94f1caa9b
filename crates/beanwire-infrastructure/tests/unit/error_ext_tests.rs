//! Error Extension Tests

use std::error::Error as _;
use std::io;

use beanwire_domain::error::{Error, Result};
use beanwire_infrastructure::error_ext::ErrorContext;

fn missing_file() -> std::result::Result<(), io::Error> {
    Err(io::Error::new(io::ErrorKind::NotFound, "file not found"))
}

#[test]
fn test_config_context_keeps_source() {
    let result: Result<()> = missing_file().config_context("failed to read beanwire.toml");

    match result {
        Err(err @ Error::Configuration { .. }) => {
            assert!(err.to_string().contains("failed to read beanwire.toml"));
            assert!(err.source().is_some());
        }
        other => panic!("Expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_context_is_internal_and_not_runtime_kind() {
    let err = missing_file().context("loading").unwrap_err();
    match &err {
        Error::Internal { message } => {
            assert!(message.starts_with("loading: "));
            assert!(message.contains("file not found"));
        }
        other => panic!("Expected internal error, got {other:?}"),
    }
    assert!(!err.is_runtime_kind());
}

#[test]
fn test_with_context_is_lazy() {
    let ok: std::result::Result<u8, io::Error> = Ok(1);
    let value = ok
        .with_context(|| -> String { panic!("context built on success") })
        .unwrap();
    assert_eq!(value, 1);
}

#[test]
fn test_binding_and_lifecycle_contexts() {
    assert!(matches!(
        missing_file().binding_context("connect"),
        Err(Error::Binding { .. })
    ));
    assert!(matches!(
        missing_file().lifecycle_context("init"),
        Err(Error::Lifecycle { .. })
    ));
}
