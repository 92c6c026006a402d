//! 应用上下文：三级缓存容器实现
//!
//! 定义表在构建时一次性固化，此后只读；
//! 就绪缓存与创建中缓存在启动阶段单线程写入，服务阶段只读，
//! 因此细粒度的读写锁即可保证并发读取安全。

use crate::descriptor::{ComponentCandidate, ComponentDescriptor};
use crate::post_processor::BeanPostProcessor;
use framework_common::{Bean, ContainerError, ContainerResult, DuplicateDefinitionError};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// IoC 容器
///
/// 持有三级缓存：`definitions`（名称 → 描述符）、
/// `in_progress`（名称 → 构造中的 Bean，用于终止循环依赖）、
/// `ready`（名称 → 就绪 Bean，对外可见的单例缓存）。
/// 不变式：同一名称最多出现在 `in_progress`/`ready` 之一；
/// 进入 `ready` 后永不移除。
pub struct ApplicationContext {
    definitions: HashMap<String, Arc<ComponentDescriptor>>,
    definition_order: Vec<String>,
    ready: RwLock<HashMap<String, Bean>>,
    in_progress: RwLock<HashMap<String, Bean>>,
    post_processors: RwLock<Vec<Arc<dyn BeanPostProcessor>>>,
}

impl ApplicationContext {
    /// 构建容器并完成全部组件的实例化
    ///
    /// 启动顺序：
    /// 1. 为所有候选定义构建描述符，名称重复立即失败；
    /// 2. 按发现顺序实例化所有具备后置处理器能力的组件并注册进流水线；
    /// 3. 实例化其余全部组件（已就绪或构造中的自动跳过）。
    ///
    /// 任何一步失败都中止整个启动，容器没有部分可用的运行模式。
    pub fn build(candidates: Vec<ComponentCandidate>) -> ContainerResult<Self> {
        let mut definitions = HashMap::new();
        let mut definition_order = Vec::new();
        for candidate in candidates {
            let descriptor = Arc::new(ComponentDescriptor::build(candidate)?);
            let name = descriptor.name().to_string();
            if definitions.contains_key(&name) {
                return Err(DuplicateDefinitionError::BeanName { name }.into());
            }
            debug!("登记组件定义: {} ({})", name, descriptor.type_info().name);
            definition_order.push(name.clone());
            definitions.insert(name, descriptor);
        }

        let context = Self {
            definitions,
            definition_order,
            ready: RwLock::new(HashMap::new()),
            in_progress: RwLock::new(HashMap::new()),
            post_processors: RwLock::new(Vec::new()),
        };
        context.init_post_processors()?;
        context.create_all()?;
        info!("容器启动完成，共 {} 个组件定义", context.definition_order.len());
        Ok(context)
    }

    /// 按名称获取 Bean
    ///
    /// 已就绪直接返回；存在定义则触发创建；否则返回 `None`。
    pub fn get_bean_by_name(&self, name: &str) -> Option<Bean> {
        let existing = self.ready.read().get(name).cloned();
        if existing.is_some() {
            return existing;
        }
        let descriptor = self.definitions.get(name)?;
        match self.create_bean(descriptor) {
            Ok(bean) => Some(bean),
            Err(source) => {
                error!("Bean 创建失败: {}, 原因: {}", name, source);
                None
            }
        }
    }

    /// 按类型获取第一个匹配的 Bean
    ///
    /// 按发现顺序扫描定义表，取第一个可匹配的定义；
    /// 多个匹配不是错误，这是有意的简化。
    pub fn get_bean_of(&self, type_id: TypeId) -> Option<Bean> {
        match self.resolve_of(type_id) {
            Ok(bean) => bean,
            Err(source) => {
                error!("按类型解析 Bean 失败: {:?}, 原因: {}", type_id, source);
                None
            }
        }
    }

    /// 按具体类型获取 Bean 并向下转型
    pub fn get_bean<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.get_bean_of(TypeId::of::<T>())
            .and_then(|bean| bean.downcast::<T>().ok())
    }

    /// 按类型获取所有匹配的 Bean，逐个触发创建
    pub fn get_beans_of(&self, type_id: TypeId) -> Vec<Bean> {
        self.definition_order
            .iter()
            .filter_map(|name| self.definitions.get(name))
            .filter(|descriptor| descriptor.is_assignable_to(type_id))
            .filter_map(|descriptor| match self.create_bean(descriptor) {
                Ok(bean) => Some(bean),
                Err(source) => {
                    error!("Bean 创建失败: {}, 原因: {}", descriptor.name(), source);
                    None
                }
            })
            .collect()
    }

    /// 按具体类型获取所有匹配的 Bean 并向下转型
    pub fn get_beans<T: Any + Send + Sync>(&self) -> Vec<Arc<T>> {
        self.get_beans_of(TypeId::of::<T>())
            .into_iter()
            .filter_map(|bean| bean.downcast::<T>().ok())
            .collect()
    }

    /// 是否存在指定名称的定义
    pub fn contains_definition(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// 已登记的定义数量
    pub fn definition_count(&self) -> usize {
        self.definition_order.len()
    }

    /// 实例化所有后置处理器并按发现顺序注册
    fn init_post_processors(&self) -> ContainerResult<()> {
        for name in &self.definition_order {
            let Some(descriptor) = self.definitions.get(name) else {
                continue;
            };
            if !descriptor.has_capability::<dyn BeanPostProcessor>() {
                continue;
            }
            let bean = self.create_bean(descriptor)?;
            match descriptor.capability::<dyn BeanPostProcessor>(&bean) {
                Some(processor) => {
                    debug!("注册 BeanPostProcessor: {}", descriptor.name());
                    self.post_processors.write().push(processor);
                }
                None => warn!(
                    "组件声明了后置处理器能力但投影失败，跳过注册: {}",
                    descriptor.name()
                ),
            }
        }
        Ok(())
    }

    /// 实例化剩余全部组件
    fn create_all(&self) -> ContainerResult<()> {
        for name in &self.definition_order {
            if let Some(descriptor) = self.definitions.get(name) {
                self.create_bean(descriptor)?;
            }
        }
        Ok(())
    }

    /// 幂等入口：已就绪或构造中的 Bean 直接返回既有引用
    fn create_bean(&self, descriptor: &Arc<ComponentDescriptor>) -> ContainerResult<Bean> {
        let name = descriptor.name();
        let ready = self.ready.read().get(name).cloned();
        if let Some(bean) = ready {
            return Ok(bean);
        }
        let loading = self.in_progress.read().get(name).cloned();
        if let Some(bean) = loading {
            return Ok(bean);
        }
        self.do_create_bean(descriptor)
    }

    /// 真正的 Bean 实例化、注入和初始化流程
    fn do_create_bean(&self, descriptor: &Arc<ComponentDescriptor>) -> ContainerResult<Bean> {
        let name = descriptor.name().to_string();
        debug!("开始创建 Bean: {}", name);
        // 1. 实例化
        let bean = descriptor
            .instantiate()
            .map_err(|source| ContainerError::CreationFailed {
                name: name.clone(),
                source,
            })?;
        // 2. 立刻暴露部分构造的实例，循环依赖由此终止而不是无限递归
        self.in_progress.write().insert(name.clone(), bean.clone());
        // 3. 字段注入
        self.autowire_bean(&bean, descriptor)?;
        // 4-6. 初始化前后钩子及生命周期回调
        let bean = self.initialize_bean(bean, descriptor)?;
        // 7. 迁移到就绪缓存，此后永不移除
        self.in_progress.write().remove(&name);
        self.ready.write().insert(name.clone(), bean.clone());
        info!("Bean 创建完成: {}", name);
        Ok(bean)
    }

    /// 执行字段注入，逐个注入点按类型解析依赖并写入宿主
    fn autowire_bean(
        &self,
        bean: &Bean,
        descriptor: &Arc<ComponentDescriptor>,
    ) -> ContainerResult<()> {
        for point in descriptor.injection_points() {
            match self.resolve_of(point.target().id)? {
                Some(dependency) => {
                    point
                        .assign(bean, dependency)
                        .map_err(|message| ContainerError::InjectionFailed {
                            name: descriptor.name().to_string(),
                            field: point.field().to_string(),
                            message,
                        })?;
                }
                // 无匹配定义时保持槽位为空，与按类型取 Bean 未命中同语义
                None => warn!(
                    "未找到可注入的依赖: {}.{} ({})",
                    descriptor.name(),
                    point.field(),
                    point.target().name
                ),
            }
        }
        Ok(())
    }

    /// 调用后置处理钩子和生命周期回调
    ///
    /// 两轮钩子都按注册顺序执行；任一钩子返回的替代引用
    /// 会取代原 Bean 进入后续流程和就绪缓存。
    fn initialize_bean(
        &self,
        bean: Bean,
        descriptor: &Arc<ComponentDescriptor>,
    ) -> ContainerResult<Bean> {
        // 先快照处理器列表，钩子内部可能再次进入容器解析依赖
        let processors = self.post_processors.read().clone();
        let mut bean = bean;
        for processor in &processors {
            bean = processor.before_initialize(bean, descriptor)?;
        }
        descriptor
            .invoke_post_construct(&bean)
            .map_err(|source| ContainerError::LifecycleFailed {
                name: descriptor.name().to_string(),
                source,
            })?;
        for processor in &processors {
            bean = processor.after_initialize(bean, descriptor)?;
        }
        Ok(bean)
    }

    /// 按类型解析 Bean，构建失败向上传播
    fn resolve_of(&self, type_id: TypeId) -> ContainerResult<Option<Bean>> {
        let descriptor = self
            .definition_order
            .iter()
            .filter_map(|name| self.definitions.get(name))
            .find(|descriptor| descriptor.is_assignable_to(type_id));
        match descriptor {
            Some(descriptor) => self.create_bean(descriptor).map(Some),
            None => Ok(None),
        }
    }
}
