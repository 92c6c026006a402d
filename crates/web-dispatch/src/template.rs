//! 模板加载与占位符替换
//!
//! 占位符语法为固定前缀接 `{key}`：`summer{key}`。
//! 替换单遍完成且不递归，替换进去的值不会再次被扫描。

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::PathBuf;

/// 模板占位符前缀
pub const TEMPLATE_PLACEHOLDER_PREFIX: &str = "summer";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"summer\{([^}]*)\}").expect("内建占位符正则必然合法"));

/// 模板引擎
///
/// 以配置的模板根目录为基准按视图名加载模板资源。
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    root: PathBuf,
}

impl TemplateEngine {
    /// 创建以指定目录为根的模板引擎
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 按视图名加载模板资源
    ///
    /// 在请求处理路径上调用，读取不阻塞执行器线程。
    pub async fn load(&self, view: &str) -> std::io::Result<String> {
        tokio::fs::read_to_string(self.root.join(view)).await
    }

    /// 单遍替换模板中的全部占位符，缺失的键渲染为空字符串
    pub fn render(template: &str, context: &HashMap<String, String>) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| {
                context.get(&caps[1]).cloned().unwrap_or_default()
            })
            .into_owned()
    }
}
