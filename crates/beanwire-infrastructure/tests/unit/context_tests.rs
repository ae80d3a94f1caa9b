//! Bean Context Tests

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use beanwire_application::publish::{ApiProvider, LibraryDefinition, ServiceDefinition};
use beanwire_domain::{BeanKey, Error};
use beanwire_infrastructure::{BeanContext, ConfigLoader, ContextConfigurer, Module, ModuleContext};
use tempfile::TempDir;

use crate::support::{DirectFixture, Greeter, english};

/// Library bean that greets through the remote greeter
struct Lobby {
    greeter: Arc<dyn Greeter>,
}

fn lobby_context(fixture: &DirectFixture) -> BeanContext {
    ContextConfigurer::new()
        .register_component(fixture.direct.clone())
        .register_api_provider(
            ApiProvider::new("greetings")
                .with_service(ServiceDefinition::new::<dyn Greeter>(), fixture.registry.clone())
                .with_library(LibraryDefinition::new::<Lobby, _>(|ctx| {
                    Ok(Arc::new(Lobby {
                        greeter: ctx.bean::<dyn Greeter>()?,
                    }))
                })),
        )
        .configure()
        .unwrap()
}

#[test]
fn test_wait_for_bean_returns_once_bound_elsewhere() {
    let fixture = DirectFixture::new();
    let context = lobby_context(&fixture);

    let greeter = thread::scope(|scope| {
        scope.spawn(|| {
            thread::sleep(Duration::from_millis(50));
            fixture.publish(&BeanKey::of::<dyn Greeter>(), english());
            context.renew_service_leases();
        });
        context
            .wait_for_bean::<dyn Greeter>(None, Duration::from_secs(5))
            .unwrap()
    });

    assert_eq!(greeter.greet("Ada").unwrap(), "Hello, Ada");
}

#[test]
fn test_wait_for_bean_times_out_when_never_bound() {
    let fixture = DirectFixture::new();
    let context = lobby_context(&fixture);

    let started = Instant::now();
    let err = context
        .wait_for_bean::<dyn Greeter>(None, Duration::from_millis(50))
        .err()
        .expect("timeout");

    assert!(matches!(err, Error::Timeout { .. }), "got {err}");
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_wait_for_bean_covers_dependencies() {
    let fixture = DirectFixture::new();
    let context = lobby_context(&fixture);

    // The lobby itself is created immediately; its greeter is still unbound.
    assert!(context.get_bean::<Lobby>().is_ok());
    let err = context
        .wait_for_bean::<Lobby>(None, Duration::from_millis(30))
        .err()
        .expect("timeout");
    assert!(matches!(err, Error::Timeout { .. }), "got {err}");

    fixture.publish(&BeanKey::of::<dyn Greeter>(), english());
    context.renew_service_leases();
    let lobby = context
        .wait_for_bean::<Lobby>(None, Duration::from_millis(30))
        .unwrap();
    assert_eq!(lobby.greeter.greet("Ada").unwrap(), "Hello, Ada");
}

#[test]
fn test_wait_for_plain_bean_returns_immediately() {
    let context = ContextConfigurer::new()
        .register_api_provider(
            ApiProvider::new("local")
                .with_library(LibraryDefinition::new::<String, _>(|_| {
                    Ok(Arc::new(String::from("ready")))
                })),
        )
        .configure()
        .unwrap();
    let value = context
        .wait_for_bean::<String>(None, Duration::ZERO)
        .unwrap();
    assert_eq!(value.as_str(), "ready");
}

#[test]
fn test_wait_for_plain_bean_accepts_unbounded_timeout() {
    let context = ContextConfigurer::new()
        .register_api_provider(
            ApiProvider::new("local")
                .with_library(LibraryDefinition::new::<String, _>(|_| {
                    Ok(Arc::new(String::from("ready")))
                })),
        )
        .configure()
        .unwrap();
    let value = context
        .wait_for_bean::<String>(None, Duration::MAX)
        .unwrap();
    assert_eq!(value.as_str(), "ready");
}

#[test]
fn test_unbounded_wait_returns_once_bound_elsewhere() {
    let fixture = DirectFixture::new();
    let context = lobby_context(&fixture);

    let lobby = thread::scope(|scope| {
        scope.spawn(|| {
            thread::sleep(Duration::from_millis(50));
            fixture.publish(&BeanKey::of::<dyn Greeter>(), english());
            context.renew_service_leases();
        });
        context.wait_for_bean::<Lobby>(None, Duration::MAX).unwrap()
    });

    assert_eq!(lobby.greeter.greet("Ada").unwrap(), "Hello, Ada");
}

#[test]
fn test_destroy_wakes_waiters() {
    let fixture = DirectFixture::new();
    let context = lobby_context(&fixture);
    context.get_bean::<dyn Greeter>().unwrap();

    let err = thread::scope(|scope| {
        let waiter = scope.spawn(|| {
            context.wait_for_bean::<dyn Greeter>(None, Duration::from_secs(10))
        });
        thread::sleep(Duration::from_millis(50));
        context.destroy();
        waiter.join().unwrap().err().expect("waiter failure")
    });

    assert!(
        matches!(err, Error::ServiceUnavailable { .. } | Error::IllegalState { .. }),
        "got {err}"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_lease_renewal_task_binds_late_services() {
    let fixture = DirectFixture::new();
    let context = lobby_context(&fixture);
    let greeter = context.get_bean::<dyn Greeter>().unwrap();
    assert!(greeter.greet("Ada").is_err());

    context.start_lease_renewal(Duration::from_millis(10)).unwrap();
    fixture.publish(&BeanKey::of::<dyn Greeter>(), english());

    let mut bound = false;
    for _ in 0..100 {
        if greeter.greet("Ada").is_ok() {
            bound = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(bound, "lease renewal did not bind the service");
}

fn configured_lobby_context(fixture: &DirectFixture, dir: &TempDir, interval_ms: u64) -> BeanContext {
    let path = dir.path().join("beanwire.toml");
    std::fs::write(
        &path,
        format!("[services]\nlease_renewal_interval_ms = {interval_ms}\n"),
    )
    .unwrap();
    let loaded = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("BEANWIRE_TEST_RENEWAL")
        .load()
        .unwrap();
    ContextConfigurer::from_loaded_config(loaded)
        .unwrap()
        .register_component(fixture.direct.clone())
        .register_api_provider(
            ApiProvider::new("greetings")
                .with_service(ServiceDefinition::new::<dyn Greeter>(), fixture.registry.clone()),
        )
        .configure()
        .unwrap()
}

#[test]
fn test_lease_renewal_interval_comes_from_loaded_config() {
    let fixture = DirectFixture::new();
    let dir = TempDir::new().unwrap();
    let context = configured_lobby_context(&fixture, &dir, 25);
    assert_eq!(context.lease_renewal_interval(), Duration::from_millis(25));

    let defaults = ContextConfigurer::new().configure().unwrap();
    assert_eq!(defaults.lease_renewal_interval(), Duration::from_secs(30));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_configured_lease_renewal_binds_late_services() {
    let fixture = DirectFixture::new();
    let dir = TempDir::new().unwrap();
    let context = configured_lobby_context(&fixture, &dir, 10);
    let greeter = context.get_bean::<dyn Greeter>().unwrap();
    assert!(greeter.greet("Ada").is_err());

    context.start_configured_lease_renewal().unwrap();
    fixture.publish(&BeanKey::of::<dyn Greeter>(), english());

    let mut bound = false;
    for _ in 0..100 {
        if greeter.greet("Ada").is_ok() {
            bound = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(bound, "configured renewal did not bind the service");
}

#[tokio::test]
async fn test_zero_renewal_interval_is_rejected() {
    let fixture = DirectFixture::new();
    let context = lobby_context(&fixture);
    let err = context.start_lease_renewal(Duration::ZERO).unwrap_err();
    assert!(err.is_configuration(), "got {err}");
}

#[test]
fn test_lease_renewal_requires_runtime() {
    let fixture = DirectFixture::new();
    let context = lobby_context(&fixture);
    let err = context
        .start_lease_renewal(Duration::from_millis(10))
        .unwrap_err();
    assert!(err.is_configuration(), "got {err}");
}

trait Catalog: Send + Sync {
    fn size(&self) -> usize;
}

struct FixedCatalog;

impl Catalog for FixedCatalog {
    fn size(&self) -> usize {
        3
    }
}

struct CatalogModule;

impl Module for CatalogModule {
    fn prepare(&self, context: &mut ModuleContext) {
        context
            .bind_instance::<dyn Catalog>(Arc::new(FixedCatalog))
            .export::<dyn Catalog>();
    }
}

struct Shop {
    catalog: Arc<dyn Catalog>,
}

#[test]
fn test_module_exports_are_visible_to_providers() {
    let context = ContextConfigurer::new()
        .register_module(Arc::new(CatalogModule))
        .register_api_provider(ApiProvider::new("shop").with_library(
            LibraryDefinition::new::<Shop, _>(|ctx| {
                Ok(Arc::new(Shop {
                    catalog: ctx.bean::<dyn Catalog>()?,
                }))
            }),
        ))
        .configure()
        .unwrap();

    assert_eq!(context.get_bean::<Shop>().unwrap().catalog.size(), 3);
    assert_eq!(
        context
            .get_qualified::<dyn Catalog>("CatalogModule")
            .unwrap()
            .size(),
        3
    );
    assert_eq!(context.module_instance::<dyn Catalog>().unwrap().size(), 3);
}

#[test]
fn test_published_twice_is_ambiguous() {
    let result = ContextConfigurer::new()
        .register_api_provider(
            ApiProvider::new("a").with_library(LibraryDefinition::new::<String, _>(|_| {
                Ok(Arc::new(String::new()))
            })),
        )
        .register_api_provider(
            ApiProvider::new("b").with_library(LibraryDefinition::new::<String, _>(|_| {
                Ok(Arc::new(String::new()))
            })),
        )
        .configure();
    assert!(matches!(result, Err(Error::AmbiguousProvider { .. })));
}
