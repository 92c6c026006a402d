//! 类型元数据定义
//!
//! 静态描述符模型的基础：不依赖运行时反射，
//! 组件的类型信息在注册时一次性采集。

use std::any::{Any, TypeId};
use std::sync::Arc;

/// 类型擦除的组件实例句柄
///
/// 容器中所有 Bean 都以该形式存放，取出时按注册的具体类型向下转型。
pub type Bean = Arc<dyn Any + Send + Sync>;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 完整类型路径
    pub name: String,
    /// 类型ID
    pub id: TypeId,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: 'static>() -> Self {
        Self {
            name: std::any::type_name::<T>().to_string(),
            id: TypeId::of::<T>(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }
}
