//! # IoC Container
//!
//! Summer 框架的控制反转容器：负责根据静态组件描述符实例化组件、
//! 解析字段级依赖（含循环依赖）并驱动生命周期与后置处理钩子。
//!
//! ## 核心组件
//!
//! - [`ComponentCandidate`] / [`ComponentDescriptor`] - 静态描述符模型
//! - [`ApplicationContext`] - 三级缓存容器
//! - [`BeanPostProcessor`] - Bean 初始化前后增强钩子
//!
//! ## 设计原则
//!
//! - 不依赖运行时反射，类型与字段信息在注册时以能力表形式静态给出
//! - 启动是单一阶段，任何失败都中止整个启动，不存在部分可用的容器
//! - 启动完成后所有缓存只读，可安全并发读取

pub mod context;
pub mod descriptor;
pub mod post_processor;

pub use context::*;
pub use descriptor::*;
pub use post_processor::*;
