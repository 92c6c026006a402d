//! 拦截器契约与注册中心
//!
//! 拦截器链在启动期只追加，服务期只读：
//! 前置钩子按注册顺序执行，后置与清理钩子按注册逆序执行。

use crate::handler::WebHandler;
use crate::model_and_view::ModelAndView;
use crate::request::HttpRequest;
use async_trait::async_trait;
use framework_common::DispatchError;
use parking_lot::RwLock;
use std::sync::Arc;

/// 拦截器 trait
///
/// 三个钩子围绕一次请求分发：前置（可中断）、后置（可观察并修改
/// 渲染载体）、清理（无论此前哪个状态失败都会执行）。
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// 前置处理，返回 `false` 中断后续全部分发状态
    async fn pre_handle(&self, _request: &HttpRequest, _handler: &WebHandler) -> anyhow::Result<bool> {
        Ok(true)
    }

    /// 后置处理，处理方法执行后、渲染前调用
    async fn post_handle(
        &self,
        _request: &HttpRequest,
        _handler: &WebHandler,
        _model_and_view: Option<&mut ModelAndView>,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// 完成处理，携带此前状态捕获的异常（如有）
    async fn after_completion(
        &self,
        _request: &HttpRequest,
        _handler: &WebHandler,
        _error: Option<&DispatchError>,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

/// 拦截器注册中心
///
/// 启动期追加、服务期快照迭代，保证注册顺序。
#[derive(Default)]
pub struct InterceptorRegistry {
    interceptors: RwLock<Vec<Arc<dyn Interceptor>>>,
}

impl InterceptorRegistry {
    /// 创建空的注册中心
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加拦截器，保持发现顺序
    pub fn add(&self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.write().push(interceptor);
    }

    /// 当前注册列表的快照
    pub fn snapshot(&self) -> Vec<Arc<dyn Interceptor>> {
        self.interceptors.read().clone()
    }

    /// 已注册的拦截器数量
    pub fn len(&self) -> usize {
        self.interceptors.read().len()
    }

    /// 是否没有注册任何拦截器
    pub fn is_empty(&self) -> bool {
        self.interceptors.read().is_empty()
    }
}
