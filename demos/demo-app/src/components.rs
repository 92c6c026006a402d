//! 示例业务组件：互相持有的 Cat 与 Dog 演示循环依赖解析

use ioc_container::ComponentCandidate;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use tracing::info;

/// 持有 Dog 的组件
#[derive(Default)]
pub struct Cat {
    dog: OnceLock<Arc<Dog>>,
}

impl Cat {
    pub fn set_dog(&self, dog: Arc<Dog>) {
        let _ = self.dog.set(dog);
    }

    pub fn dog(&self) -> Option<&Arc<Dog>> {
        self.dog.get()
    }

    fn init(&self) -> anyhow::Result<()> {
        info!("成功创建对象 Cat，伙伴已注入: {}", self.dog().is_some());
        Ok(())
    }
}

/// 持有 Cat 的组件
#[derive(Default)]
pub struct Dog {
    cat: OnceLock<Arc<Cat>>,
}

impl Dog {
    pub fn set_cat(&self, cat: Arc<Cat>) {
        let _ = self.cat.set(cat);
    }

    pub fn cat(&self) -> Option<&Arc<Cat>> {
        self.cat.get()
    }

    fn init(&self) -> anyhow::Result<()> {
        info!("成功创建对象 Dog，伙伴已注入: {}", self.cat().is_some());
        Ok(())
    }
}

/// 示例响应实体
#[derive(Debug, Serialize)]
pub struct User {
    pub name: String,
    pub age: i64,
}

/// 全部业务组件的候选定义
pub fn candidates() -> Vec<ComponentCandidate> {
    vec![
        ComponentCandidate::of::<Cat>()
            .named("myCat")
            .constructor(Cat::default)
            .inject("dog", Cat::set_dog)
            .post_construct(Cat::init),
        ComponentCandidate::of::<Dog>()
            .named("myDog")
            .constructor(Dog::default)
            .inject("cat", Dog::set_cat)
            .post_construct(Dog::init),
    ]
}
