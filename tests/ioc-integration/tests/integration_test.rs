//! 容器集成测试：循环依赖、单例语义、重复定义与后置处理器替换

use framework_common::{Bean, ContainerError, ContainerResult};
use ioc_container::{
    ApplicationContext, BeanPostProcessor, ComponentCandidate, ComponentDescriptor,
};
use std::sync::{Arc, OnceLock};

#[derive(Default)]
struct Cat {
    dog: OnceLock<Arc<Dog>>,
}

impl Cat {
    fn set_dog(&self, dog: Arc<Dog>) {
        let _ = self.dog.set(dog);
    }
}

#[derive(Default)]
struct Dog {
    cat: OnceLock<Arc<Cat>>,
}

impl Dog {
    fn set_cat(&self, cat: Arc<Cat>) {
        let _ = self.cat.set(cat);
    }
}

fn cyclic_candidates() -> Vec<ComponentCandidate> {
    vec![
        ComponentCandidate::of::<Cat>()
            .named("myCat")
            .constructor(Cat::default)
            .inject("dog", Cat::set_dog),
        ComponentCandidate::of::<Dog>()
            .named("myDog")
            .constructor(Dog::default)
            .inject("cat", Dog::set_cat),
    ]
}

#[test]
fn cyclic_dependencies_terminate_and_cross_reference() {
    let context = ApplicationContext::build(cyclic_candidates()).unwrap();

    let cat = context.get_bean::<Cat>().unwrap();
    let dog = context.get_bean::<Dog>().unwrap();

    // 双方的槽位都指向对方的最终单例
    let cats_dog = cat.dog.get().unwrap();
    let dogs_cat = dog.cat.get().unwrap();
    assert!(Arc::ptr_eq(cats_dog, &dog));
    assert!(Arc::ptr_eq(dogs_cat, &cat));
}

#[test]
fn repeated_lookups_return_the_same_singleton() {
    let context = ApplicationContext::build(cyclic_candidates()).unwrap();

    let first = context.get_bean::<Cat>().unwrap();
    let second = context.get_bean::<Cat>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let by_name = context.get_bean_by_name("myCat").unwrap();
    let by_name = by_name.downcast::<Cat>().unwrap();
    assert!(Arc::ptr_eq(&first, &by_name));
}

#[test]
fn duplicate_bean_name_aborts_startup() {
    let candidates = vec![
        ComponentCandidate::of::<Cat>().named("same").constructor(Cat::default),
        ComponentCandidate::of::<Dog>().named("same").constructor(Dog::default),
    ];
    let result = ApplicationContext::build(candidates);
    assert!(matches!(result, Err(ContainerError::Duplicate { .. })));
}

#[test]
fn missing_constructor_aborts_startup() {
    let result = ApplicationContext::build(vec![ComponentCandidate::of::<Cat>()]);
    assert!(matches!(result, Err(ContainerError::Descriptor { .. })));
}

trait Animal: Send + Sync {
    fn species(&self) -> &str;
}

impl Animal for Cat {
    fn species(&self) -> &str {
        "cat"
    }
}

impl Animal for Dog {
    fn species(&self) -> &str {
        "dog"
    }
}

#[test]
fn get_beans_returns_all_assignable_in_discovery_order() {
    let candidates = vec![
        ComponentCandidate::of::<Cat>()
            .named("myCat")
            .constructor(Cat::default)
            .provides::<dyn Animal>(),
        ComponentCandidate::of::<Dog>()
            .named("myDog")
            .constructor(Dog::default)
            .provides::<dyn Animal>(),
    ];
    let context = ApplicationContext::build(candidates).unwrap();

    let animals = context.get_beans_of(std::any::TypeId::of::<dyn Animal>());
    assert_eq!(animals.len(), 2);
    assert_eq!(animals[0].downcast_ref::<Cat>().unwrap().species(), "cat");
    assert_eq!(animals[1].downcast_ref::<Dog>().unwrap().species(), "dog");
}

#[derive(Default)]
struct Plain;

struct Wrapped {
    inner: Arc<Plain>,
}

/// 把 Plain 替换为 Wrapped 的后置处理器
#[derive(Default)]
struct WrappingProcessor;

impl BeanPostProcessor for WrappingProcessor {
    fn after_initialize(&self, bean: Bean, descriptor: &ComponentDescriptor) -> ContainerResult<Bean> {
        if descriptor.name() != "plain" {
            return Ok(bean);
        }
        let inner = bean.downcast::<Plain>().map_err(|_| {
            ContainerError::CreationFailed {
                name: descriptor.name().to_string(),
                source: anyhow::anyhow!("类型不匹配"),
            }
        })?;
        Ok(Arc::new(Wrapped { inner }))
    }
}

#[test]
fn post_processor_substitution_reaches_ready_cache() {
    let candidates = vec![
        ComponentCandidate::of::<WrappingProcessor>()
            .constructor(WrappingProcessor::default)
            .with_capability::<WrappingProcessor, dyn BeanPostProcessor>(|processor| processor),
        ComponentCandidate::of::<Plain>().named("plain").constructor(Plain::default),
    ];
    let context = ApplicationContext::build(candidates).unwrap();

    // 替换后的引用取代原 Bean 进入就绪缓存
    let bean = context.get_bean_by_name("plain").unwrap();
    let wrapped = bean.downcast_ref::<Wrapped>().unwrap();
    let _ = &wrapped.inner;
    assert!(bean.downcast_ref::<Plain>().is_none());
}

#[test]
fn derived_name_uses_short_type_name() {
    let context = ApplicationContext::build(vec![
        ComponentCandidate::of::<Plain>().constructor(Plain::default),
    ])
    .unwrap();
    assert!(context.contains_definition("Plain"));
    assert!(!context.contains_definition("plain"));
    assert_eq!(context.definition_count(), 1);
}

#[test]
fn missing_dependency_is_skipped_not_fatal() {
    // Cat 声明注入 Dog，但 Dog 没有定义
    let context = ApplicationContext::build(vec![
        ComponentCandidate::of::<Cat>()
            .named("myCat")
            .constructor(Cat::default)
            .inject("dog", Cat::set_dog),
    ])
    .unwrap();
    let cat = context.get_bean::<Cat>().unwrap();
    assert!(cat.dog.get().is_none());
}

#[test]
fn failing_lifecycle_hook_aborts_startup() {
    let candidates = vec![ComponentCandidate::of::<Plain>()
        .named("plain")
        .constructor(Plain::default)
        .post_construct(|_: &Plain| Err(anyhow::anyhow!("初始化失败")))];
    let result = ApplicationContext::build(candidates);
    assert!(matches!(result, Err(ContainerError::LifecycleFailed { .. })));
}
