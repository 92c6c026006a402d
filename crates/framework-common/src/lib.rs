//! # Framework Common
//!
//! 这个 crate 提供 Summer 框架各层共享的基础设施：
//! 统一的错误分类体系和类型元数据。
//!
//! ## 核心组件
//!
//! - [`TypeInfo`] - 组件类型元数据
//! - [`Bean`] - 类型擦除的组件实例句柄
//! - [`ContainerError`] / [`DispatchError`] - 启动期与请求期错误分类
//!
//! ## 设计原则
//!
//! - 启动期错误一律致命，容器不支持部分启动
//! - 请求期错误隔离到单个请求，不影响后续服务

pub mod errors;
pub mod metadata;

pub use errors::*;
pub use metadata::*;
