//! Bean Factory Tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use beanwire_application::ports::{BeanPostProcessor, FactoryBean};
use beanwire_domain::{Bean, BeanKey, BeanType, CreationContext, Error, Lifecycle, Result};
use beanwire_infrastructure::beans::{FnFactoryBean, InstanceFactoryBean};
use beanwire_infrastructure::{BeanFactory, BeanRegistry};
use parking_lot::Mutex;

struct Alpha;
struct Beta;
struct Gamma;

struct Shared;

struct Left {
    shared: Arc<Shared>,
}

struct Root {
    left: Arc<Left>,
    shared: Arc<Shared>,
}

fn factory_with(factories: Vec<Arc<dyn FactoryBean>>) -> BeanFactory {
    let registry = BeanRegistry::new();
    for factory in factories {
        registry.register(factory).unwrap();
    }
    BeanFactory::new("test", Arc::new(registry))
}

fn needing<T, D>() -> Arc<dyn FactoryBean>
where
    T: Send + Sync + 'static,
    D: Send + Sync + 'static,
{
    Arc::new(FnFactoryBean::new(BeanKey::of::<T>(), |ctx| {
        ctx.bean::<D>()?;
        Err(Error::internal("unreachable"))
    }))
}

fn cyclic_factory() -> BeanFactory {
    factory_with(vec![
        needing::<Alpha, Beta>(),
        needing::<Beta, Gamma>(),
        needing::<Gamma, Alpha>(),
    ])
}

#[test]
fn test_cycle_reported_with_full_path() {
    let factory = cyclic_factory();
    let err = factory.get_bean(&BeanKey::of::<Alpha>()).unwrap_err();
    match err {
        Error::CircularDependency { cycle } => assert_eq!(
            cycle,
            vec![
                BeanKey::of::<Alpha>(),
                BeanKey::of::<Beta>(),
                BeanKey::of::<Gamma>(),
                BeanKey::of::<Alpha>(),
            ]
        ),
        other => panic!("expected circular dependency, got {other}"),
    }
}

#[test]
fn test_cycle_reported_on_every_attempt() {
    let factory = cyclic_factory();
    for _ in 0..3 {
        let err = factory.get_bean(&BeanKey::of::<Beta>()).unwrap_err();
        match err {
            Error::CircularDependency { cycle } => {
                assert_eq!(cycle.first(), Some(&BeanKey::of::<Beta>()));
                assert_eq!(cycle.last(), Some(&BeanKey::of::<Beta>()));
                assert_eq!(cycle.len(), 4);
            }
            other => panic!("expected circular dependency, got {other}"),
        }
    }
    assert!(!factory.is_created(&BeanKey::of::<Beta>()));
}

#[test]
fn test_shared_dependency_created_once() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&created);
    let factory = factory_with(vec![
        Arc::new(FnFactoryBean::of::<Shared, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Shared))
        })),
        Arc::new(FnFactoryBean::of::<Left, _>(|ctx| {
            Ok(Arc::new(Left {
                shared: ctx.bean::<Shared>()?,
            }))
        })),
        Arc::new(FnFactoryBean::of::<Root, _>(|ctx| {
            Ok(Arc::new(Root {
                left: ctx.bean::<Left>()?,
                shared: ctx.bean::<Shared>()?,
            }))
        })),
    ]);

    let root = factory.get::<Root>(&BeanKey::of::<Root>()).unwrap();

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&root.left.shared, &root.shared));
}

#[test]
fn test_dependencies_are_transitive() {
    let factory = factory_with(vec![
        Arc::new(FnFactoryBean::of::<Shared, _>(|_| Ok(Arc::new(Shared)))),
        Arc::new(FnFactoryBean::of::<Left, _>(|ctx| {
            Ok(Arc::new(Left {
                shared: ctx.bean::<Shared>()?,
            }))
        })),
        Arc::new(FnFactoryBean::of::<Root, _>(|ctx| {
            Ok(Arc::new(Root {
                left: ctx.bean::<Left>()?,
                shared: ctx.bean::<Shared>()?,
            }))
        })),
    ]);

    let dependencies = factory.dependencies(&BeanKey::of::<Root>()).unwrap();
    assert_eq!(
        dependencies,
        vec![BeanKey::of::<Left>(), BeanKey::of::<Shared>()]
    );
    assert!(factory.dependencies(&BeanKey::of::<Shared>()).unwrap().is_empty());
}

#[test]
fn test_concurrent_get_bean_creates_once() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&created);
    let factory = factory_with(vec![Arc::new(FnFactoryBean::of::<Shared, _>(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        Ok(Arc::new(Shared))
    }))]);
    let barrier = Barrier::new(8);

    let beans: Vec<Bean> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    factory.get_bean(&BeanKey::of::<Shared>()).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert!(beans.iter().all(|bean| bean.same_instance(&beans[0])));
}

struct Recording {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl BeanPostProcessor for Recording {
    fn post_process(&self, key: &BeanKey, bean: Bean, _ctx: &dyn CreationContext) -> Result<Bean> {
        self.log.lock().push(format!("{}:{key}", self.name));
        Ok(bean)
    }
}

#[test]
fn test_post_processors_run_in_order_once_per_bean() {
    let factory = factory_with(vec![Arc::new(FnFactoryBean::of::<Shared, _>(|_| {
        Ok(Arc::new(Shared))
    }))]);
    let log = Arc::new(Mutex::new(Vec::new()));
    for name in ["first", "second"] {
        factory.register_post_processor(Arc::new(Recording {
            name,
            log: Arc::clone(&log),
        }));
    }

    factory.get_bean(&BeanKey::of::<Shared>()).unwrap();
    factory.get_bean(&BeanKey::of::<Shared>()).unwrap();

    assert_eq!(*log.lock(), vec!["first:Shared", "second:Shared"]);
}

struct Replacing;

impl BeanPostProcessor for Replacing {
    fn post_process(&self, _key: &BeanKey, _bean: Bean, _ctx: &dyn CreationContext) -> Result<Bean> {
        Ok(Bean::new(Arc::new(7_u32)))
    }
}

#[test]
fn test_post_processor_replacement_is_cached() {
    let factory = factory_with(vec![Arc::new(FnFactoryBean::new(
        BeanKey::qualified::<u32>("answer"),
        |_| Ok(Bean::new(Arc::new(42_u32))),
    ))]);
    factory.register_post_processor(Arc::new(Replacing));

    let key = BeanKey::qualified::<u32>("answer");
    assert_eq!(*factory.get::<u32>(&key).unwrap(), 7);
    assert_eq!(*factory.get::<u32>(&key).unwrap(), 7);
}

#[test]
fn test_unknown_key_is_no_such_bean() {
    let factory = factory_with(Vec::new());
    let err = factory.get_bean(&BeanKey::of::<Shared>()).unwrap_err();
    match err {
        Error::NoSuchBean { key } => assert_eq!(key, BeanKey::of::<Shared>()),
        other => panic!("expected no such bean, got {other}"),
    }
}

#[test]
fn test_wrong_type_is_type_mismatch() {
    let factory = factory_with(vec![Arc::new(InstanceFactoryBean::of(Arc::new(Shared)))]);
    let err = factory.get::<Left>(&BeanKey::of::<Shared>()).err().expect("type mismatch");
    assert!(matches!(err, Error::BeanTypeMismatch { .. }), "got {err}");
}

#[test]
fn test_duplicate_registration_is_ambiguous() {
    let registry = BeanRegistry::new();
    registry
        .register(Arc::new(InstanceFactoryBean::of(Arc::new(Shared))))
        .unwrap();
    let err = registry
        .register(Arc::new(InstanceFactoryBean::of(Arc::new(Shared))))
        .unwrap_err();
    assert!(matches!(err, Error::AmbiguousProvider { .. }), "got {err}");
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_beans_of_type_lists_qualified_keys() {
    let factory = factory_with(vec![
        Arc::new(FnFactoryBean::new(BeanKey::qualified::<Shared>("b"), |_| {
            Ok(Bean::new(Arc::new(Shared)))
        })),
        Arc::new(FnFactoryBean::new(BeanKey::qualified::<Shared>("a"), |_| {
            Ok(Bean::new(Arc::new(Shared)))
        })),
    ]);
    assert_eq!(
        factory.beans_of_type(&BeanType::of::<Shared>()),
        vec![
            BeanKey::qualified::<Shared>("a"),
            BeanKey::qualified::<Shared>("b"),
        ]
    );
}

#[derive(Default)]
struct Pool {
    destroyed: AtomicUsize,
}

impl Lifecycle for Pool {
    fn destroy(&self) -> Result<()> {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn test_destroy_runs_hooks_of_owned_beans_only() {
    let owned = Arc::new(Pool::default());
    let borrowed = Arc::new(Pool::default());
    let instance = Arc::clone(&owned);
    let factory = factory_with(vec![
        Arc::new(FnFactoryBean::new(BeanKey::qualified::<Pool>("owned"), move |_| {
            Ok(Bean::managed(Arc::clone(&instance)))
        })),
        Arc::new(InstanceFactoryBean::new(
            BeanKey::qualified::<Pool>("borrowed"),
            Bean::managed(Arc::clone(&borrowed)),
        )),
    ]);
    factory.get_bean(&BeanKey::qualified::<Pool>("owned")).unwrap();
    factory.get_bean(&BeanKey::qualified::<Pool>("borrowed")).unwrap();

    factory.destroy();

    assert_eq!(owned.destroyed.load(Ordering::SeqCst), 1);
    assert_eq!(borrowed.destroyed.load(Ordering::SeqCst), 0);
    assert!(!factory.is_created(&BeanKey::qualified::<Pool>("owned")));
}
