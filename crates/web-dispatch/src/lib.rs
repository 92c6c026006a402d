//! # Web Dispatch
//!
//! Summer 框架的请求分发层：路由表、拦截器链与按请求推进的分发流水线。
//!
//! ## 核心组件
//!
//! - [`RequestDispatcher`] - 前端控制器，既是路由注册的后置处理器也是分发入口
//! - [`Controller`] / [`HandlerMethod`] - 控制器契约与处理方法表
//! - [`Interceptor`] / [`InterceptorRegistry`] - 分发前后的有序钩子链
//! - [`ModelAndView`] - 处理结果的统一渲染载体
//! - [`TemplateEngine`] - `summer{key}` 占位符模板渲染
//!
//! ## 分发状态机
//!
//! 路由查找 → 前置拦截 → 参数绑定与调用 → 结果归一 → 后置拦截 → 渲染，
//! 清理钩子无论哪个状态失败都会执行。
//! 请求期异常只影响当次请求，转换为通用错误响应后继续服务。

pub mod dispatcher;
pub mod handler;
pub mod interceptor;
pub mod model_and_view;
pub mod request;
pub mod template;

pub use dispatcher::*;
pub use handler::*;
pub use interceptor::*;
pub use model_and_view::*;
pub use request::*;
pub use template::*;
