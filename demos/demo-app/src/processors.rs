//! 示例后置处理器：观察每个 Bean 的初始化前后两个时机

use framework_common::{Bean, ContainerResult};
use ioc_container::{BeanPostProcessor, ComponentCandidate, ComponentDescriptor};
use tracing::info;

/// 初始化日志后置处理器
#[derive(Default)]
pub struct InitLogBeanPostProcessor;

impl BeanPostProcessor for InitLogBeanPostProcessor {
    fn before_initialize(&self, bean: Bean, descriptor: &ComponentDescriptor) -> ContainerResult<Bean> {
        info!("初始化前: {}", descriptor.name());
        Ok(bean)
    }

    fn after_initialize(&self, bean: Bean, descriptor: &ComponentDescriptor) -> ContainerResult<Bean> {
        info!("初始化后: {}", descriptor.name());
        Ok(bean)
    }
}

/// 后置处理器的候选定义
pub fn candidate() -> ComponentCandidate {
    ComponentCandidate::of::<InitLogBeanPostProcessor>()
        .named("initLogBeanPostProcessor")
        .constructor(InitLogBeanPostProcessor::default)
        .with_capability::<InitLogBeanPostProcessor, dyn BeanPostProcessor>(|processor| processor)
}
