//! 组件描述符定义与构建
//!
//! 描述符是组件的全部静态元数据：如何构造、注入哪些字段、
//! 生命周期回调是什么、可以按哪些类型匹配、能投影为哪些能力接口。
//! 构建过程是纯函数，不做任何实例化。

use framework_common::{Bean, DescriptorError, TypeInfo};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// 无参构造闭包
pub type ConstructorFn = Arc<dyn Fn() -> anyhow::Result<Bean> + Send + Sync>;

/// 生命周期回调闭包，注入完成后调用一次
pub type LifecycleFn = Arc<dyn Fn(&Bean) -> anyhow::Result<()> + Send + Sync>;

/// 字段赋值闭包，负责把已解析的依赖写入宿主实例的内部可变槽位
type AssignFn = Arc<dyn Fn(&Bean, Bean) -> Result<(), String> + Send + Sync>;

/// 能力投影闭包，把类型擦除的 Bean 还原为某个能力接口的 trait 对象
type CapabilityCaster = Arc<dyn Fn(&Bean) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;

/// 注入点
///
/// 每个注入点对应宿主类型的一个字段：字段标签用于错误信息，
/// 目标类型用于按类型解析依赖。
pub struct InjectionPoint {
    field: String,
    target: TypeInfo,
    assign: AssignFn,
}

impl InjectionPoint {
    /// 字段标签
    pub fn field(&self) -> &str {
        &self.field
    }

    /// 依赖的目标类型
    pub fn target(&self) -> &TypeInfo {
        &self.target
    }

    /// 把解析好的依赖写入宿主实例
    pub(crate) fn assign(&self, owner: &Bean, dependency: Bean) -> Result<(), String> {
        (self.assign)(owner, dependency)
    }
}

/// 组件候选定义
///
/// 对应"原始类型 + 标注元数据"：组件作者通过链式 API 静态登记
/// 构造方式、注入字段、生命周期回调与能力表，
/// 再交由 [`ComponentDescriptor::build`] 校验并固化。
pub struct ComponentCandidate {
    type_info: TypeInfo,
    name_override: Option<String>,
    constructor: Option<ConstructorFn>,
    injects: Vec<InjectionPoint>,
    post_construct: Option<LifecycleFn>,
    provides: Vec<TypeId>,
    capabilities: HashMap<TypeId, CapabilityCaster>,
}

impl ComponentCandidate {
    /// 以组件的具体类型创建候选定义，自身类型自动进入可匹配类型表
    pub fn of<T: Any + Send + Sync>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            name_override: None,
            constructor: None,
            injects: Vec::new(),
            post_construct: None,
            provides: vec![TypeId::of::<T>()],
            capabilities: HashMap::new(),
        }
    }

    /// 显式指定 Bean 名称，空字符串视同未指定
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name_override = Some(name.into());
        self
    }

    /// 登记无参构造方式
    pub fn constructor<T, F>(self, ctor: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.try_constructor(move || Ok(ctor()))
    }

    /// 登记可失败的无参构造方式
    pub fn try_constructor<T, F>(mut self, ctor: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(move || Ok(Arc::new(ctor()?) as Bean)));
        self
    }

    /// 登记一个按类型注入的字段
    ///
    /// `assign` 在依赖解析完成后被调用，负责把依赖写入宿主的
    /// 内部可变槽位（如 `OnceLock`），这使得循环依赖下
    /// 部分构造的实例可以先行暴露。
    pub fn inject<T, D, F>(mut self, field: &str, assign: F) -> Self
    where
        T: Any + Send + Sync,
        D: Any + Send + Sync,
        F: Fn(&T, Arc<D>) + Send + Sync + 'static,
    {
        self.injects.push(InjectionPoint {
            field: field.to_string(),
            target: TypeInfo::of::<D>(),
            assign: Arc::new(move |owner: &Bean, dependency: Bean| {
                let owner = owner
                    .downcast_ref::<T>()
                    .ok_or_else(|| format!("宿主类型不匹配: {}", std::any::type_name::<T>()))?;
                let dependency = dependency
                    .downcast::<D>()
                    .map_err(|_| format!("依赖类型不匹配: {}", std::any::type_name::<D>()))?;
                assign(owner, dependency);
                Ok(())
            }),
        });
        self
    }

    /// 登记生命周期回调，注入完成后、标记就绪前调用一次
    pub fn post_construct<T, F>(mut self, hook: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.post_construct = Some(Arc::new(move |bean: &Bean| match bean.downcast_ref::<T>() {
            Some(target) => hook(target),
            None => Err(anyhow::anyhow!(
                "生命周期回调宿主类型不匹配: {}",
                std::any::type_name::<T>()
            )),
        }));
        self
    }

    /// 追加一个可匹配类型，按类型取 Bean 时该组件将命中此类型
    pub fn provides<P: ?Sized + 'static>(mut self) -> Self {
        self.provides.push(TypeId::of::<P>());
        self
    }

    /// 登记能力投影：把具体类型的 Bean 投影为能力接口 trait 对象
    ///
    /// 容器据此判断"是否是后置处理器"，Web 层据此判断
    /// "是否是拦截器/控制器"，替代运行时鸭子类型探测。
    pub fn with_capability<T, C>(mut self, cast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        T: Any + Send + Sync,
        C: ?Sized + Send + Sync + 'static,
    {
        self.capabilities.insert(
            TypeId::of::<Arc<C>>(),
            Arc::new(move |bean: &Bean| {
                let concrete = bean.clone().downcast::<T>().ok()?;
                Some(Box::new(cast(concrete)) as Box<dyn Any + Send + Sync>)
            }),
        );
        self
    }
}

/// 组件描述符
///
/// 由候选定义一次性构建，之后不可变，归容器的定义表所有。
pub struct ComponentDescriptor {
    name: String,
    type_info: TypeInfo,
    constructor: ConstructorFn,
    injects: Vec<InjectionPoint>,
    post_construct: Option<LifecycleFn>,
    provides: Vec<TypeId>,
    capabilities: HashMap<TypeId, CapabilityCaster>,
}

impl ComponentDescriptor {
    /// 校验候选定义并构建不可变描述符
    ///
    /// 名称解析：显式名称非空则采用，否则取类型短名。
    /// 缺少构造方式返回 [`DescriptorError::MissingConstructor`]，
    /// 声明了组件却无法实例化必须在启动期失败。
    pub fn build(candidate: ComponentCandidate) -> Result<Self, DescriptorError> {
        let constructor = candidate
            .constructor
            .ok_or_else(|| DescriptorError::MissingConstructor {
                type_name: candidate.type_info.name.clone(),
            })?;
        let name = match candidate.name_override {
            Some(name) if !name.is_empty() => name,
            _ => candidate.type_info.short_name().to_string(),
        };
        Ok(Self {
            name,
            type_info: candidate.type_info,
            constructor,
            injects: candidate.injects,
            post_construct: candidate.post_construct,
            provides: candidate.provides,
            capabilities: candidate.capabilities,
        })
    }

    /// Bean 在容器中的逻辑名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 组件的类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 全部注入点，保持登记顺序
    pub fn injection_points(&self) -> &[InjectionPoint] {
        &self.injects
    }

    /// 该组件是否可按给定类型匹配
    pub fn is_assignable_to(&self, type_id: TypeId) -> bool {
        self.provides.contains(&type_id)
    }

    /// 是否登记了指定能力接口
    pub fn has_capability<C: ?Sized + 'static>(&self) -> bool {
        self.capabilities.contains_key(&TypeId::of::<Arc<C>>())
    }

    /// 把 Bean 投影为指定能力接口
    ///
    /// Bean 被后置处理器替换为其他类型时投影会失败，返回 `None`。
    pub fn capability<C: ?Sized + 'static>(&self, bean: &Bean) -> Option<Arc<C>> {
        let caster = self.capabilities.get(&TypeId::of::<Arc<C>>())?;
        let boxed = caster(bean)?;
        boxed.downcast::<Arc<C>>().ok().map(|projected| *projected)
    }

    /// 通过登记的构造方式实例化一个新的 Bean
    pub(crate) fn instantiate(&self) -> anyhow::Result<Bean> {
        (self.constructor)()
    }

    /// 调用生命周期回调，未声明时为空操作
    pub(crate) fn invoke_post_construct(&self, bean: &Bean) -> anyhow::Result<()> {
        match &self.post_construct {
            Some(hook) => hook(bean),
            None => Ok(()),
        }
    }
}
