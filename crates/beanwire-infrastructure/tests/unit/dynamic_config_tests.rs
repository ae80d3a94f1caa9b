//! Dynamic Configuration Tests

use std::sync::Arc;

use beanwire_application::ports::ConfigSource;
use beanwire_domain::settings::{FAULT_TOLERANCE_ENABLED, INITIAL_TIMEOUT};
use beanwire_domain::{BeanDefaults, BeanKey};
use beanwire_infrastructure::config::BeanConfigurations;
use beanwire_infrastructure::{DynamicConfig, MapConfigSource};

fn two_sources() -> (Arc<MapConfigSource>, Arc<MapConfigSource>, DynamicConfig) {
    let first = Arc::new(MapConfigSource::new());
    let second = Arc::new(MapConfigSource::new());
    let config = DynamicConfig::new(vec![
        Arc::clone(&first) as Arc<dyn ConfigSource>,
        Arc::clone(&second) as Arc<dyn ConfigSource>,
    ]);
    (first, second, config)
}

#[test]
fn test_first_source_wins_and_reverts_on_removal() {
    let (first, second, config) = two_sources();
    assert_eq!(config.get_string("greeting"), None);

    second.set("greeting", "two");
    assert_eq!(config.get_string("greeting").as_deref(), Some("two"));

    first.set("greeting", "one");
    assert_eq!(config.get_string("greeting").as_deref(), Some("one"));

    first.remove("greeting");
    assert_eq!(config.get_string("greeting").as_deref(), Some("two"));
}

#[test]
fn test_unparsable_boolean_falls_through_to_next_source() {
    let (first, second, config) = two_sources();
    first.set("enabled", "true[L]");
    assert!(config.get_bool("enabled", true));
    assert!(!config.get_bool("enabled", false));

    second.set("enabled", "false");
    assert!(!config.get_bool("enabled", true));
}

#[test]
fn test_boolean_parsing_ignores_case() {
    let config = DynamicConfig::new(vec![Arc::new(
        MapConfigSource::new().with("a", "TRUE").with("b", "False"),
    )]);
    assert!(config.get_bool("a", false));
    assert!(!config.get_bool("b", true));
}

#[test]
fn test_numbers_fall_back_to_default_when_unparsable() {
    let config = DynamicConfig::new(vec![Arc::new(
        MapConfigSource::new()
            .with("timeout", " 250 ")
            .with("retries", "2d")
            .with("budget", "9000000000"),
    )]);
    assert_eq!(config.get_int("timeout", 1), 250);
    assert_eq!(config.get_int("retries", 3), 3);
    assert_eq!(config.get_int("budget", 5), 5);
    assert_eq!(config.get_long("budget", 5), 9_000_000_000);
}

#[test]
fn test_property_reads_live_values() {
    let (first, _second, config) = two_sources();
    let timeout = config.int_property("timeout", 100);
    assert_eq!(timeout.get(), 100);
    assert_eq!(timeout.name(), "timeout");

    first.set("timeout", "250");
    assert_eq!(timeout.get(), 250);

    first.set("timeout", "soon");
    assert_eq!(timeout.get(), 100);
    assert_eq!(*timeout.default_value(), 100);
}

#[test]
fn test_merged_config_consults_first_config_first() {
    let high = DynamicConfig::new(vec![Arc::new(MapConfigSource::new().with("name", "high"))]);
    let low = DynamicConfig::new(vec![Arc::new(
        MapConfigSource::new().with("name", "low").with("only", "low"),
    )]);
    let merged = DynamicConfig::merged(&high, &low);
    assert_eq!(merged.source_count(), 2);
    assert_eq!(merged.get_string("name").as_deref(), Some("high"));
    assert_eq!(merged.get_string("only").as_deref(), Some("low"));
}

trait Inventory {}

#[test]
fn test_bean_setting_resolution_order() {
    let source = Arc::new(MapConfigSource::new());
    let configurations = BeanConfigurations::new(DynamicConfig::new(vec![
        Arc::clone(&source) as Arc<dyn ConfigSource>,
    ]));
    let key = BeanKey::of::<dyn Inventory>();

    let plain = configurations.bean_configuration(&key);
    assert_eq!(plain.get_int(&INITIAL_TIMEOUT).get(), 1000);
    assert!(plain.get_bool(&FAULT_TOLERANCE_ENABLED).get());

    configurations.set_default_bean_config(
        key.clone(),
        BeanDefaults::new()
            .with_int(&INITIAL_TIMEOUT, 2000)
            .with_bool(&FAULT_TOLERANCE_ENABLED, false),
    );
    let tuned = configurations.bean_configuration(&key);
    let timeout = tuned.get_int(&INITIAL_TIMEOUT);
    assert_eq!(timeout.get(), 2000);
    assert!(!tuned.get_bool(&FAULT_TOLERANCE_ENABLED).get());

    source.set(INITIAL_TIMEOUT.resolve_name(&key), "3000");
    assert_eq!(timeout.get(), 3000);
}

#[test]
fn test_bean_setting_names_include_qualifier() {
    let key = BeanKey::qualified::<dyn Inventory>("east");
    let name = INITIAL_TIMEOUT.resolve_name(&key);
    assert!(name.starts_with("beanwire.bean."), "got {name}");
    assert!(name.ends_with("Inventory.east.faultTolerance.timeout"), "got {name}");
}
