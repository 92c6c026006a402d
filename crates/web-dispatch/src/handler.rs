//! 控制器契约与处理方法表
//!
//! 反射式的方法发现被静态处理方法表替代：控制器通过 [`Controller::handler_methods`]
//! 一次性给出路径、参数声明与调用闭包，路由注册时据此建立路由表条目。

use crate::model_and_view::ModelAndView;
use framework_common::Bean;
use std::any::Any;
use std::sync::Arc;

/// 结果类型：注册时一次性解析的渲染策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultType {
    /// 载体的序列化负载作为 JSON 响应体
    Json,
    /// 载体的文本内容直接作为 HTML 响应体
    Html,
    /// 按视图名加载本地模板渲染
    Local,
}

/// 参数的声明类型，决定绑定时的转换策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// 文本参数，原样传递
    Text,
    /// 整数参数，数值解析失败产生转换错误
    Integer,
    /// 其余声明类型一律绑定为空值（已知限制）
    Unsupported,
}

/// 处理方法的参数声明
#[derive(Debug, Clone)]
pub struct ParamSpec {
    declared_name: String,
    request_name: Option<String>,
    kind: ParamKind,
}

impl ParamSpec {
    /// 文本参数
    pub fn text(declared_name: impl Into<String>) -> Self {
        Self {
            declared_name: declared_name.into(),
            request_name: None,
            kind: ParamKind::Text,
        }
    }

    /// 整数参数
    pub fn integer(declared_name: impl Into<String>) -> Self {
        Self {
            declared_name: declared_name.into(),
            request_name: None,
            kind: ParamKind::Integer,
        }
    }

    /// 不支持转换的参数
    pub fn unsupported(declared_name: impl Into<String>) -> Self {
        Self {
            declared_name: declared_name.into(),
            request_name: None,
            kind: ParamKind::Unsupported,
        }
    }

    /// 显式指定请求参数名，对应按名绑定标注
    pub fn request_name(mut self, name: impl Into<String>) -> Self {
        self.request_name = Some(name.into());
        self
    }

    /// 绑定时实际使用的参数名：显式标注优先，否则取声明名
    pub fn binding_name(&self) -> &str {
        self.request_name.as_deref().unwrap_or(&self.declared_name)
    }

    /// 参数的声明类型
    pub fn kind(&self) -> ParamKind {
        self.kind
    }
}

/// 绑定完成的单个参数值
#[derive(Debug, Clone)]
pub enum ArgValue {
    /// 文本值，请求中缺失时为 `None`
    Text(Option<String>),
    /// 整数值
    Integer(i64),
    /// 不支持转换的空值
    Null,
}

/// 一次调用的全部绑定参数，顺序与参数声明一致
#[derive(Debug, Clone, Default)]
pub struct BoundArgs(Vec<ArgValue>);

impl BoundArgs {
    pub fn new(args: Vec<ArgValue>) -> Self {
        Self(args)
    }

    /// 按位置取文本参数
    pub fn text(&self, index: usize) -> Option<&str> {
        match self.0.get(index) {
            Some(ArgValue::Text(value)) => value.as_deref(),
            _ => None,
        }
    }

    /// 按位置取整数参数
    pub fn integer(&self, index: usize) -> Option<i64> {
        match self.0.get(index) {
            Some(ArgValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    /// 参数个数
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 是否没有参数
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 处理方法的返回值
pub enum HandlerReturn {
    /// 无返回值，渲染步骤被跳过
    None,
    /// 文本，归一为 HTML 载体
    Text(String),
    /// 模型视图载体，原样进入渲染
    View(ModelAndView),
    /// 其余可序列化值，归一为 JSON 载体
    Json(serde_json::Value),
}

/// 处理方法调用闭包
pub type HandlerFn = Arc<dyn Fn(&Bean, &BoundArgs) -> anyhow::Result<HandlerReturn> + Send + Sync>;

/// 处理方法声明：路径片段、参数表、结果标注与调用闭包
#[derive(Clone)]
pub struct HandlerMethod {
    path: String,
    params: Vec<ParamSpec>,
    response_body: bool,
    returns_view: bool,
    invoke: HandlerFn,
}

impl HandlerMethod {
    /// 声明一个处理方法，调用闭包接收控制器实例与绑定参数
    pub fn of<T, F>(path: impl Into<String>, invoke: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T, &BoundArgs) -> anyhow::Result<HandlerReturn> + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            params: Vec::new(),
            response_body: false,
            returns_view: false,
            invoke: Arc::new(move |bean: &Bean, args: &BoundArgs| {
                let controller = bean.downcast_ref::<T>().ok_or_else(|| {
                    anyhow::anyhow!("控制器类型不匹配: {}", std::any::type_name::<T>())
                })?;
                invoke(controller, args)
            }),
        }
    }

    /// 追加一个参数声明
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// 标注为响应体方法，结果类型解析为 JSON
    pub fn response_body(mut self) -> Self {
        self.response_body = true;
        self
    }

    /// 标注返回模型视图载体，结果类型解析为本地模板
    pub fn returns_view(mut self) -> Self {
        self.returns_view = true;
        self
    }

    /// 方法级路径片段
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 参数声明表
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    fn resolve_result_type(&self) -> ResultType {
        if self.response_body {
            ResultType::Json
        } else if self.returns_view {
            ResultType::Local
        } else {
            ResultType::Html
        }
    }
}

/// 控制器契约
///
/// 类级路径前缀默认为空，处理方法的完整路径 = 前缀 + 方法路径。
pub trait Controller: Send + Sync {
    /// 类级路径前缀
    fn route_prefix(&self) -> &str {
        ""
    }

    /// 静态处理方法表
    fn handler_methods(&self) -> Vec<HandlerMethod>;
}

/// 路由表条目：归属 Bean、处理方法与注册时解析好的结果类型
#[derive(Clone)]
pub struct WebHandler {
    bean: Bean,
    method: HandlerMethod,
    result_type: ResultType,
}

impl WebHandler {
    /// 建立路由条目并一次性解析结果类型
    pub fn new(bean: Bean, method: HandlerMethod) -> Self {
        let result_type = method.resolve_result_type();
        Self {
            bean,
            method,
            result_type,
        }
    }

    /// 归属的控制器 Bean
    pub fn bean(&self) -> &Bean {
        &self.bean
    }

    /// 处理方法声明
    pub fn method(&self) -> &HandlerMethod {
        &self.method
    }

    /// 注册时解析的渲染策略
    pub fn result_type(&self) -> ResultType {
        self.result_type
    }

    /// 以绑定参数调用处理方法
    pub fn invoke(&self, args: &BoundArgs) -> anyhow::Result<HandlerReturn> {
        (self.method.invoke)(&self.bean, args)
    }
}
