//! 错误类型定义
//!
//! 启动期错误（描述符、重复定义、容器）一律致命并中止启动；
//! 请求期错误（参数转换、分发）隔离到当次请求。

use thiserror::Error;

/// 描述符构建错误类型
///
/// 声明了组件却无法实例化属于配置错误，必须在启动期暴露。
#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("组件缺少可用的无参构造方式: {type_name}")]
    MissingConstructor { type_name: String },
}

/// 重复定义错误类型
#[derive(Error, Debug)]
pub enum DuplicateDefinitionError {
    #[error("Bean 名称已被注册: {name}")]
    BeanName { name: String },

    #[error("路由路径已被其他处理方法注册: {path}")]
    RoutePath { path: String },
}

/// 容器错误类型
///
/// 实例化、注入、生命周期或后置处理过程中的任何失败都会包装为该类型。
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("组件描述符构建失败: {source}")]
    Descriptor {
        #[from]
        source: DescriptorError,
    },

    #[error("重复定义: {source}")]
    Duplicate {
        #[from]
        source: DuplicateDefinitionError,
    },

    #[error("组件实例化失败: {name}, 原因: {source}")]
    CreationFailed {
        name: String,
        source: anyhow::Error,
    },

    #[error("依赖注入失败: {name}.{field}, 原因: {message}")]
    InjectionFailed {
        name: String,
        field: String,
        message: String,
    },

    #[error("生命周期回调失败: {name}, 原因: {source}")]
    LifecycleFailed {
        name: String,
        source: anyhow::Error,
    },
}

/// 请求参数转换错误类型
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("请求参数缺失: {param}")]
    Missing { param: String },

    #[error("请求参数无法转换为整数: {param}={value}")]
    InvalidInteger { param: String, value: String },
}

/// 请求分发错误类型
///
/// 每个请求最多捕获一次，转换为通用错误响应后继续服务后续请求。
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("参数绑定失败: {source}")]
    Conversion {
        #[from]
        source: ConversionError,
    },

    #[error("处理器执行失败: {source}")]
    HandlerFailed { source: anyhow::Error },

    #[error("拦截器执行失败: {source}")]
    InterceptorFailed { source: anyhow::Error },

    #[error("结果序列化失败: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// 结果类型别名
pub type ContainerResult<T> = Result<T, ContainerError>;
pub type DispatchResult<T> = Result<T, DispatchError>;
