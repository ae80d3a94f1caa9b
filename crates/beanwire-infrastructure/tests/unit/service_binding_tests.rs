//! Service Binding Tests

use std::sync::Arc;
use std::time::Duration;

use beanwire_application::ports::ServiceDiscovery;
use beanwire_application::publish::{ApiProvider, LibraryDefinition, ServiceBeanDefinition, ServiceDefinition};
use beanwire_application::registry::ServiceComponentRegistry;
use beanwire_domain::settings::{FAULT_TOLERANCE_ENABLED, INITIAL_TIMEOUT};
use beanwire_domain::{BeanDefaults, BeanKey, Error, ObjectSerializerDefinition, ServiceProperties};
use beanwire_infrastructure::service::ConfigServiceDiscovery;
use beanwire_infrastructure::{BeanContext, ContextConfigurer, DynamicConfig, MapConfigSource};
use beanwire_providers::{DirectComponent, JsonVersioningPlugin};

use crate::support::{
    CountingPolicy, CountingSerializers, DirectFixture, Greeter, english, german,
};

fn greeter_key() -> BeanKey {
    BeanKey::of::<dyn Greeter>()
}

fn context_for(
    fixture: &DirectFixture,
    service: ServiceBeanDefinition,
    policy: &Arc<CountingPolicy>,
) -> BeanContext {
    ContextConfigurer::new()
        .register_component(fixture.direct.clone())
        .register_api_provider(ApiProvider::new("greetings").with_service_bean(service))
        .with_fault_tolerance(policy.clone())
        .configure()
        .unwrap()
}

fn greeter_service(fixture: &DirectFixture) -> ServiceBeanDefinition {
    ServiceBeanDefinition::new(ServiceDefinition::new::<dyn Greeter>(), fixture.registry.clone())
}

#[test]
fn test_fault_tolerance_applies_when_enabled() {
    let fixture = DirectFixture::new();
    fixture.publish(&greeter_key(), english());
    let policy = Arc::new(CountingPolicy::default());
    let context = context_for(&fixture, greeter_service(&fixture), &policy);

    let greeter = context.get_bean::<dyn Greeter>().unwrap();
    assert_eq!(greeter.greet("Ada").unwrap(), "Hello, Ada");
    assert_eq!(policy.executions(), 1);
    assert_eq!(policy.last_timeout(), Some(Duration::from_millis(1000)));
}

#[test]
fn test_disabled_fault_tolerance_bypasses_policy_with_same_result() {
    let fixture = DirectFixture::new();
    fixture.publish(&greeter_key(), english());
    let policy = Arc::new(CountingPolicy::default());
    let service = greeter_service(&fixture)
        .with_defaults(BeanDefaults::new().with_bool(&FAULT_TOLERANCE_ENABLED, false));
    let context = context_for(&fixture, service, &policy);

    let greeter = context.get_bean::<dyn Greeter>().unwrap();
    assert_eq!(greeter.greet("Ada").unwrap(), "Hello, Ada");
    assert_eq!(policy.executions(), 0);
}

#[test]
fn test_configured_setting_overrides_provider_default() {
    let fixture = DirectFixture::new();
    fixture.publish(&greeter_key(), english());
    let policy = Arc::new(CountingPolicy::default());
    let service = greeter_service(&fixture)
        .with_defaults(BeanDefaults::new().with_int(&INITIAL_TIMEOUT, 2000));
    let context = ContextConfigurer::new()
        .register_component(fixture.direct.clone())
        .register_api_provider(ApiProvider::new("greetings").with_service_bean(service))
        .with_fault_tolerance(policy.clone())
        .set_bean_setting_int(&greeter_key(), &INITIAL_TIMEOUT, 250)
        .configure()
        .unwrap();

    context.get_bean::<dyn Greeter>().unwrap().greet("Ada").unwrap();
    assert_eq!(policy.last_timeout(), Some(Duration::from_millis(250)));
}

#[test]
fn test_unknown_component_is_configuration_error() {
    let fixture = DirectFixture::new();
    let mut properties = ServiceProperties::new();
    properties.set_component("carrier-pigeon");
    fixture.registry.register(&greeter_key(), properties);
    let policy = Arc::new(CountingPolicy::default());
    let context = context_for(&fixture, greeter_service(&fixture), &policy);

    let err = context.get_bean::<dyn Greeter>().err().expect("bind failure");
    assert!(err.is_configuration(), "got {err}");
}

#[test]
fn test_undiscovered_service_is_created_unbound_then_bound_by_renewal() {
    let fixture = DirectFixture::new();
    let policy = Arc::new(CountingPolicy::default());
    let context = context_for(&fixture, greeter_service(&fixture), &policy);

    let greeter = context.get_bean::<dyn Greeter>().unwrap();
    let err = greeter.greet("Ada").unwrap_err();
    assert!(matches!(err, Error::ServiceUnavailable { .. }), "got {err}");
    let stateful = context.bean(&greeter_key()).unwrap();
    assert!(!stateful.stateful().unwrap().is_bound());

    fixture.publish(&greeter_key(), english());
    assert_eq!(context.renew_service_leases(), 1);

    assert!(stateful.stateful().unwrap().is_bound());
    assert_eq!(greeter.greet("Ada").unwrap(), "Hello, Ada");
    assert_eq!(context.renew_service_leases(), 0);
}

#[test]
fn test_changed_provider_is_rebound_and_previous_released() {
    let fixture = DirectFixture::new();
    fixture.publish(&greeter_key(), english());
    let policy = Arc::new(CountingPolicy::default());
    let context = context_for(&fixture, greeter_service(&fixture), &policy);
    let greeter = context.get_bean::<dyn Greeter>().unwrap();
    assert_eq!(greeter.greet("Ada").unwrap(), "Hello, Ada");

    fixture.publish(&greeter_key(), german());
    assert_eq!(context.renew_service_leases(), 1);

    assert_eq!(greeter.greet("Ada").unwrap(), "Hallo, Ada");
    assert_eq!(fixture.direct.active_bindings(), 1);
}

#[test]
fn test_destroy_releases_bindings() {
    let fixture = DirectFixture::new();
    fixture.publish(&greeter_key(), english());
    let policy = Arc::new(CountingPolicy::default());
    let context = context_for(&fixture, greeter_service(&fixture), &policy);
    let greeter = context.get_bean::<dyn Greeter>().unwrap();
    assert_eq!(fixture.direct.active_bindings(), 1);

    context.destroy();
    context.destroy();

    assert_eq!(fixture.direct.active_bindings(), 0);
    assert!(matches!(
        greeter.greet("Ada"),
        Err(Error::ServiceUnavailable { .. })
    ));
    assert!(matches!(
        context.get_bean::<dyn Greeter>(),
        Err(Error::IllegalState { .. })
    ));
}

#[test]
fn test_versioned_service_payloads_pass_through_serializer() {
    let fixture = DirectFixture::new();
    fixture.publish(&greeter_key(), english());
    let policy = Arc::new(CountingPolicy::default());
    let serializers = Arc::new(CountingSerializers::new(Arc::new(
        JsonVersioningPlugin::new().with_configurer("greetings", Vec::new()),
    )));
    let definition = ServiceDefinition::new::<dyn Greeter>()
        .versioned(ObjectSerializerDefinition::versioned(2, "greetings"));
    let context = ContextConfigurer::new()
        .register_component(fixture.direct.clone())
        .register_api_provider(
            ApiProvider::new("greetings").with_service(definition, fixture.registry.clone()),
        )
        .with_fault_tolerance(policy.clone())
        .with_versioning(serializers.clone())
        .configure()
        .unwrap();

    let greeter = context.get_bean::<dyn Greeter>().unwrap();
    assert_eq!(greeter.greet("Ada").unwrap(), "Hello, Ada");
    assert_eq!(policy.executions(), 1);
    assert_eq!(serializers.created(), 1);
    // Argument and reply each make one trip to the wire form and back
    assert_eq!(serializers.serialized(), 2);
    assert_eq!(serializers.deserialized(), 2);
}

#[test]
fn test_unknown_serializer_configurer_fails_creation() {
    let fixture = DirectFixture::new();
    fixture.publish(&greeter_key(), english());
    let definition = ServiceDefinition::new::<dyn Greeter>()
        .versioned(ObjectSerializerDefinition::versioned(1, "unregistered"));
    let context = ContextConfigurer::new()
        .register_component(fixture.direct.clone())
        .register_api_provider(
            ApiProvider::new("greetings").with_service(definition, fixture.registry.clone()),
        )
        .configure()
        .unwrap();

    let err = context.get_bean::<dyn Greeter>().err().expect("bind failure");
    assert!(err.is_configuration(), "got {err}");
}

#[test]
fn test_dynamic_qualifier_binds_each_qualifier_separately() {
    let fixture = DirectFixture::new();
    fixture.publish(&BeanKey::qualified::<dyn Greeter>("berlin"), german());
    fixture.publish(&BeanKey::qualified::<dyn Greeter>("london"), english());
    let policy = Arc::new(CountingPolicy::default());
    let service = ServiceBeanDefinition::new(
        ServiceDefinition::new::<dyn Greeter>().with_dynamic_qualifier(),
        fixture.registry.clone(),
    );
    let context = context_for(&fixture, service, &policy);

    let berlin = context.get_qualified::<dyn Greeter>("berlin").unwrap();
    let london = context.get_qualified::<dyn Greeter>("london").unwrap();
    assert_eq!(berlin.greet("Ada").unwrap(), "Hallo, Ada");
    assert_eq!(london.greet("Ada").unwrap(), "Hello, Ada");
    assert!(Arc::ptr_eq(
        &berlin,
        &context.get_qualified::<dyn Greeter>("berlin").unwrap()
    ));
}

#[test]
fn test_fault_tolerant_library_runs_through_policy() {
    let policy = Arc::new(CountingPolicy::default());
    let context = ContextConfigurer::new()
        .register_api_provider(ApiProvider::new("local").with_library(
            LibraryDefinition::fault_tolerant::<dyn Greeter, _>(|_| Ok(english())),
        ))
        .with_fault_tolerance(policy.clone())
        .configure()
        .unwrap();

    let greeter = context.get_bean::<dyn Greeter>().unwrap();
    assert_eq!(greeter.greet("Ada").unwrap(), "Hello, Ada");
    assert_eq!(policy.executions(), 1);
}

#[test]
fn test_plain_library_is_not_guarded() {
    let policy = Arc::new(CountingPolicy::default());
    let context = ContextConfigurer::new()
        .register_api_provider(
            ApiProvider::new("local")
                .with_library(LibraryDefinition::new::<dyn Greeter, _>(|_| Ok(german()))),
        )
        .with_fault_tolerance(policy.clone())
        .configure()
        .unwrap();

    let greeter = context.get_bean::<dyn Greeter>().unwrap();
    assert_eq!(greeter.greet("Ada").unwrap(), "Hallo, Ada");
    assert_eq!(policy.executions(), 0);
}

#[test]
fn test_config_discovery_parses_component_uri() {
    let direct = Arc::new(DirectComponent::new());
    let id = direct.register_provider(english());
    let components = Arc::new(ServiceComponentRegistry::new());
    components.register(direct).unwrap();
    let source = Arc::new(MapConfigSource::new());
    let discovery = ConfigServiceDiscovery::new(
        DynamicConfig::new(vec![source.clone()]),
        components,
    );

    assert!(discovery.discover(&greeter_key()).unwrap().is_none());

    source.set(
        ConfigServiceDiscovery::uri_setting(&greeter_key()),
        DirectComponent::service_uri(&id),
    );
    let properties = discovery.discover(&greeter_key()).unwrap().unwrap();
    assert_eq!(properties, DirectComponent::service_properties(&id));

    source.set(ConfigServiceDiscovery::uri_setting(&greeter_key()), "no-separator");
    assert!(discovery.discover(&greeter_key()).unwrap_err().is_configuration());

    source.set(ConfigServiceDiscovery::uri_setting(&greeter_key()), "smoke:signal");
    assert!(discovery.discover(&greeter_key()).unwrap_err().is_configuration());
}

#[test]
fn test_exported_service_is_bound_by_consumer() {
    let fixture = DirectFixture::new();
    let policy = Arc::new(CountingPolicy::default());
    let server = ContextConfigurer::new()
        .register_component(fixture.direct.clone())
        .configure()
        .unwrap();
    let properties = server
        .exporter(fixture.registry.clone())
        .export(&ServiceDefinition::new::<dyn Greeter>(), "direct", german())
        .unwrap();
    assert_eq!(properties.component_name(), Some("direct"));
    assert!(properties.api().is_some());

    let client = context_for(&fixture, greeter_service(&fixture), &policy);
    let greeter = client.get_bean::<dyn Greeter>().unwrap();
    assert_eq!(greeter.greet("Ada").unwrap(), "Hallo, Ada");
}
