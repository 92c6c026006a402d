//! 请求与响应的抽象表示
//!
//! 分发流水线不直接面对具体的 HTTP 监听实现，
//! 监听器负责把真实请求适配为 [`HttpRequest`]，再把 [`HttpResponse`] 写回。

use std::collections::HashMap;

/// 分发层视角的请求：精确路径 + 字符串参数表
#[derive(Debug, Clone)]
pub struct HttpRequest {
    path: String,
    params: HashMap<String, String>,
}

impl HttpRequest {
    /// 创建指定路径的请求
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: HashMap::new(),
        }
    }

    /// 追加单个请求参数
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// 批量设置请求参数
    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// 请求路径
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 按名称取请求参数
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// 分发层产出的响应
///
/// 不设置独立的错误状态码：未匹配路径与请求期异常都以默认状态返回。
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    content_type: String,
    body: String,
}

impl HttpResponse {
    /// HTML 响应
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "text/html;charset=UTF-8".to_string(),
            body: body.into(),
        }
    }

    /// JSON 响应
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "application/json;charset=UTF-8".to_string(),
            body: body.into(),
        }
    }

    /// 响应状态码
    pub fn status(&self) -> u16 {
        self.status
    }

    /// 响应内容类型
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// 响应体
    pub fn body(&self) -> &str {
        &self.body
    }

    /// 取出响应体
    pub fn into_body(self) -> String {
        self.body
    }
}
