//! 模型视图载体
//!
//! 连接处理方法与渲染步骤的统一中间结果：
//! 视图标识 + 字符串键值上下文，被渲染器消费一次后即丢弃。

use std::collections::HashMap;

/// 模型视图载体
///
/// 上下文统一采用字符串键值，保证模板渲染的兼容性。
#[derive(Debug, Clone, Default)]
pub struct ModelAndView {
    view: String,
    context: HashMap<String, String>,
}

impl ModelAndView {
    /// 创建指向指定视图的载体
    pub fn new(view: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            context: HashMap::new(),
        }
    }

    /// 链式添加上下文数据
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// 添加上下文数据
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.context.insert(key.into(), value.into());
    }

    /// 视图标识
    pub fn view(&self) -> &str {
        &self.view
    }

    /// 上下文数据
    pub fn context(&self) -> &HashMap<String, String> {
        &self.context
    }
}
