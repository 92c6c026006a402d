//! 示例拦截器：记录每次分发的前置、后置与完成阶段

use async_trait::async_trait;
use framework_common::DispatchError;
use ioc_container::ComponentCandidate;
use tracing::info;
use web_dispatch::{HttpRequest, Interceptor, ModelAndView, WebHandler};

/// 访问日志拦截器
#[derive(Default)]
pub struct AccessLogInterceptor;

#[async_trait]
impl Interceptor for AccessLogInterceptor {
    async fn pre_handle(&self, request: &HttpRequest, _handler: &WebHandler) -> anyhow::Result<bool> {
        info!("前置拦截: {}", request.path());
        Ok(true)
    }

    async fn post_handle(
        &self,
        request: &HttpRequest,
        _handler: &WebHandler,
        _model_and_view: Option<&mut ModelAndView>,
    ) -> anyhow::Result<()> {
        info!("后置拦截: {}", request.path());
        Ok(())
    }

    async fn after_completion(
        &self,
        request: &HttpRequest,
        _handler: &WebHandler,
        error: Option<&DispatchError>,
    ) -> anyhow::Result<()> {
        match error {
            Some(source) => info!("完成拦截: {}, 捕获异常: {}", request.path(), source),
            None => info!("完成拦截: {}", request.path()),
        }
        Ok(())
    }
}

/// 拦截器的候选定义，带拦截器能力
pub fn candidate() -> ComponentCandidate {
    ComponentCandidate::of::<AccessLogInterceptor>()
        .named("accessLogInterceptor")
        .constructor(AccessLogInterceptor::default)
        .with_capability::<AccessLogInterceptor, dyn Interceptor>(|interceptor| interceptor)
}
