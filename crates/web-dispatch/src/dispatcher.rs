//! 前端控制器：路由注册与请求分发流水线
//!
//! [`RequestDispatcher`] 本身是一个容器组件，同时实现
//! [`BeanPostProcessor`]：路由表和拦截器链在 Bean 构建期间
//! 作为后置处理的副作用建立，启动完成后只读。

use crate::handler::{
    ArgValue, BoundArgs, Controller, HandlerReturn, ParamKind, ResultType, WebHandler,
};
use crate::interceptor::{Interceptor, InterceptorRegistry};
use crate::model_and_view::ModelAndView;
use crate::request::{HttpRequest, HttpResponse};
use crate::template::TemplateEngine;
use framework_common::{
    Bean, ContainerResult, ConversionError, DispatchError, DispatchResult,
    DuplicateDefinitionError,
};
use ioc_container::{BeanPostProcessor, ComponentCandidate, ComponentDescriptor};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 未匹配路径的固定响应体
const NO_HANDLER_BODY: &str = "<h1>Error! 你的请求没有对应的处理器！</h1>";

/// 文本结果在载体上下文中的固定键
const CONTENT_KEY: &str = "content";

/// JSON 负载在载体上下文中的固定键
const DATA_KEY: &str = "data";

/// 前端控制器
///
/// 持有路由表（路径 → [`WebHandler`]，仅精确匹配）、拦截器链与模板引擎。
/// 路由路径必须唯一，重复注册在启动期即失败。
pub struct RequestDispatcher {
    routes: RwLock<HashMap<String, WebHandler>>,
    interceptors: InterceptorRegistry,
    templates: TemplateEngine,
}

impl RequestDispatcher {
    /// 创建使用指定模板引擎的分发器
    pub fn new(templates: TemplateEngine) -> Self {
        Self {
            routes: RwLock::new(HashMap::new()),
            interceptors: InterceptorRegistry::new(),
            templates,
        }
    }

    /// 分发器自身的组件候选定义，带后置处理器能力
    pub fn candidate(templates: TemplateEngine) -> ComponentCandidate {
        ComponentCandidate::of::<RequestDispatcher>()
            .named("requestDispatcher")
            .constructor(move || RequestDispatcher::new(templates.clone()))
            .with_capability::<RequestDispatcher, dyn BeanPostProcessor>(|dispatcher| dispatcher)
    }

    /// 已注册的路由数量
    pub fn route_count(&self) -> usize {
        self.routes.read().len()
    }

    /// 是否存在指定路径的路由
    pub fn contains_route(&self, path: &str) -> bool {
        self.routes.read().contains_key(path)
    }

    /// 已注册的拦截器数量
    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    /// 分发一次请求，状态机单遍推进
    ///
    /// 路由未命中返回固定响应，不触发任何拦截器或处理方法；
    /// 命中后无论哪个状态失败，清理钩子都会对每个已注册拦截器
    /// 按注册逆序执行一次。
    pub async fn dispatch(&self, request: &HttpRequest) -> HttpResponse {
        let handler = self.routes.read().get(request.path()).cloned();
        let Some(handler) = handler else {
            debug!("未找到处理器: {}", request.path());
            return HttpResponse::html(NO_HANDLER_BODY);
        };

        let interceptors = self.interceptors.snapshot();
        let mut response = HttpResponse::html("");
        let mut dispatch_error: Option<DispatchError> = None;

        match self.do_dispatch(request, &handler, &interceptors).await {
            Ok(Some(rendered)) => response = rendered,
            // 前置拦截器中断，或处理方法无返回值跳过渲染
            Ok(None) => {}
            Err(source) => {
                warn!("请求分发失败: {}, 原因: {}", request.path(), source);
                response = HttpResponse::html(format!("<h1>服务器内部错误: {}</h1>", source));
                dispatch_error = Some(source);
            }
        }

        for interceptor in interceptors.iter().rev() {
            if let Err(source) = interceptor
                .after_completion(request, &handler, dispatch_error.as_ref())
                .await
            {
                warn!("拦截器清理钩子失败: {}", source);
            }
        }
        response
    }

    /// 前置拦截 → 调用 → 归一 → 后置拦截 → 渲染
    async fn do_dispatch(
        &self,
        request: &HttpRequest,
        handler: &WebHandler,
        interceptors: &[Arc<dyn Interceptor>],
    ) -> DispatchResult<Option<HttpResponse>> {
        // 前置拦截：注册顺序，首个要求停止的钩子中断后续全部状态
        for interceptor in interceptors {
            let proceed = interceptor
                .pre_handle(request, handler)
                .await
                .map_err(|source| DispatchError::InterceptorFailed { source })?;
            if !proceed {
                debug!("请求被前置拦截器中断: {}", request.path());
                return Ok(None);
            }
        }

        // 调用：绑定参数并执行处理方法
        let args = Self::resolve_args(request, handler)?;
        let result = handler
            .invoke(&args)
            .map_err(|source| DispatchError::HandlerFailed { source })?;

        // 归一：统一为渲染载体
        let mut model_and_view = Self::process_result(result)?;

        // 后置拦截：注册逆序
        for interceptor in interceptors.iter().rev() {
            interceptor
                .post_handle(request, handler, model_and_view.as_mut())
                .await
                .map_err(|source| DispatchError::InterceptorFailed { source })?;
        }

        // 渲染：无载体则跳过
        match model_and_view {
            Some(model_and_view) => self.render(handler, &model_and_view).await.map(Some),
            None => Ok(None),
        }
    }

    /// 按参数声明表绑定请求参数
    fn resolve_args(request: &HttpRequest, handler: &WebHandler) -> Result<BoundArgs, ConversionError> {
        let mut args = Vec::with_capacity(handler.method().params().len());
        for param in handler.method().params() {
            let name = param.binding_name();
            let value = request.param(name);
            let arg = match param.kind() {
                ParamKind::Text => ArgValue::Text(value.map(str::to_string)),
                ParamKind::Integer => {
                    let raw = value.ok_or_else(|| ConversionError::Missing {
                        param: name.to_string(),
                    })?;
                    let parsed = raw.parse::<i64>().map_err(|_| ConversionError::InvalidInteger {
                        param: name.to_string(),
                        value: raw.to_string(),
                    })?;
                    ArgValue::Integer(parsed)
                }
                // 文本与整数之外的声明类型不做任何尝试
                ParamKind::Unsupported => ArgValue::Null,
            };
            args.push(arg);
        }
        Ok(BoundArgs::new(args))
    }

    /// 把处理方法返回值归一为渲染载体
    fn process_result(result: HandlerReturn) -> DispatchResult<Option<ModelAndView>> {
        match result {
            HandlerReturn::None => Ok(None),
            HandlerReturn::View(model_and_view) => Ok(Some(model_and_view)),
            HandlerReturn::Text(text) => Ok(Some(ModelAndView::new("text").with(CONTENT_KEY, text))),
            HandlerReturn::Json(value) => Ok(Some(
                ModelAndView::new("json").with(DATA_KEY, serde_json::to_string(&value)?),
            )),
        }
    }

    /// 按注册时解析好的结果类型渲染载体
    async fn render(
        &self,
        handler: &WebHandler,
        model_and_view: &ModelAndView,
    ) -> DispatchResult<HttpResponse> {
        match handler.result_type() {
            ResultType::Html => Ok(HttpResponse::html(
                model_and_view
                    .context()
                    .get(CONTENT_KEY)
                    .cloned()
                    .unwrap_or_default(),
            )),
            ResultType::Json => Ok(HttpResponse::json(
                model_and_view
                    .context()
                    .get(DATA_KEY)
                    .cloned()
                    .unwrap_or_default(),
            )),
            ResultType::Local => match self.templates.load(model_and_view.view()).await {
                Ok(template) => Ok(HttpResponse::html(TemplateEngine::render(
                    &template,
                    model_and_view.context(),
                ))),
                Err(source) => {
                    warn!(
                        "模板资源不存在，跳过渲染: {}, 原因: {}",
                        model_and_view.view(),
                        source
                    );
                    Ok(HttpResponse::html(""))
                }
            },
        }
    }
}

impl BeanPostProcessor for RequestDispatcher {
    /// 路由注册钩子
    ///
    /// 具备拦截器能力的 Bean 追加进拦截器链后原样返回；
    /// 具备控制器能力的 Bean 按"前缀 + 方法路径"注册全部处理方法，
    /// 路径重复是启动期致命错误；其余 Bean 原样通过。
    fn after_initialize(&self, bean: Bean, descriptor: &ComponentDescriptor) -> ContainerResult<Bean> {
        if let Some(interceptor) = descriptor.capability::<dyn Interceptor>(&bean) {
            info!("注册拦截器: {}", descriptor.name());
            self.interceptors.add(interceptor);
            return Ok(bean);
        }
        let Some(controller) = descriptor.capability::<dyn Controller>(&bean) else {
            return Ok(bean);
        };
        let prefix = controller.route_prefix().to_string();
        for method in controller.handler_methods() {
            let url = format!("{}{}", prefix, method.path());
            let mut routes = self.routes.write();
            if routes.contains_key(&url) {
                return Err(DuplicateDefinitionError::RoutePath { path: url }.into());
            }
            info!("注册路由: {} -> {}", url, descriptor.name());
            routes.insert(url, WebHandler::new(bean.clone(), method));
        }
        Ok(bean)
    }
}
