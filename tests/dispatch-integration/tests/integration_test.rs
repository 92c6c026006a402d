//! 分发集成测试：路由注册、三种渲染路径、拦截器顺序与请求期异常隔离

use async_trait::async_trait;
use framework_common::{ContainerError, DispatchError};
use ioc_container::{ApplicationContext, ComponentCandidate};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use web_dispatch::{
    BoundArgs, Controller, HandlerMethod, HandlerReturn, HttpRequest, Interceptor, ModelAndView,
    ParamSpec, RequestDispatcher, TemplateEngine, WebHandler,
};

/// 记录钩子调用顺序的拦截器
struct RecordingInterceptor {
    label: &'static str,
    log: Arc<Mutex<Vec<String>>>,
    stop: bool,
}

#[async_trait]
impl Interceptor for RecordingInterceptor {
    async fn pre_handle(&self, _request: &HttpRequest, _handler: &WebHandler) -> anyhow::Result<bool> {
        self.log.lock().push(format!("pre:{}", self.label));
        Ok(!self.stop)
    }

    async fn post_handle(
        &self,
        _request: &HttpRequest,
        _handler: &WebHandler,
        _model_and_view: Option<&mut ModelAndView>,
    ) -> anyhow::Result<()> {
        self.log.lock().push(format!("post:{}", self.label));
        Ok(())
    }

    async fn after_completion(
        &self,
        _request: &HttpRequest,
        _handler: &WebHandler,
        error: Option<&DispatchError>,
    ) -> anyhow::Result<()> {
        let suffix = if error.is_some() { ":err" } else { "" };
        self.log.lock().push(format!("done:{}{}", self.label, suffix));
        Ok(())
    }
}

fn interceptor_candidate(
    name: &str,
    label: &'static str,
    log: Arc<Mutex<Vec<String>>>,
    stop: bool,
) -> ComponentCandidate {
    ComponentCandidate::of::<RecordingInterceptor>()
        .named(name)
        .constructor(move || RecordingInterceptor {
            label,
            log: log.clone(),
            stop,
        })
        .with_capability::<RecordingInterceptor, dyn Interceptor>(|interceptor| interceptor)
}

struct GreetController;

impl Controller for GreetController {
    fn route_prefix(&self) -> &str {
        "/hello"
    }

    fn handler_methods(&self) -> Vec<HandlerMethod> {
        vec![
            HandlerMethod::of("/a", |_: &GreetController, args: &BoundArgs| {
                Ok(HandlerReturn::Text(format!(
                    "hello {}, your age is {}",
                    args.text(0).unwrap_or_default(),
                    args.integer(1).unwrap_or_default()
                )))
            })
            .param(ParamSpec::text("name").request_name("name"))
            .param(ParamSpec::integer("age").request_name("age")),
            HandlerMethod::of("/json", |_: &GreetController, args: &BoundArgs| {
                Ok(HandlerReturn::Json(serde_json::json!({
                    "name": args.text(0).unwrap_or_default(),
                    "age": args.integer(1).unwrap_or_default(),
                })))
            })
            .response_body()
            .param(ParamSpec::text("name").request_name("name"))
            .param(ParamSpec::integer("age").request_name("age")),
            HandlerMethod::of("/html", |_: &GreetController, args: &BoundArgs| {
                Ok(HandlerReturn::View(
                    ModelAndView::new("index.html")
                        .with("name", args.text(0).unwrap_or_default()),
                ))
            })
            .returns_view()
            .param(ParamSpec::text("name").request_name("name")),
            HandlerMethod::of("/boom", |_: &GreetController, _: &BoundArgs| {
                Err(anyhow::anyhow!("处理失败"))
            }),
        ]
    }
}

fn controller_candidate() -> ComponentCandidate {
    ComponentCandidate::of::<GreetController>()
        .named("greetController")
        .constructor(|| GreetController)
        .with_capability::<GreetController, dyn Controller>(|controller| controller)
}

fn build_dispatcher(
    template_root: &Path,
    extra: Vec<ComponentCandidate>,
) -> Arc<RequestDispatcher> {
    let mut candidates = vec![RequestDispatcher::candidate(TemplateEngine::new(
        template_root,
    ))];
    candidates.extend(extra);
    let context = ApplicationContext::build(candidates).unwrap();
    context.get_bean::<RequestDispatcher>().unwrap()
}

#[tokio::test]
async fn text_route_renders_html_body() {
    let dispatcher = build_dispatcher(Path::new("unused"), vec![controller_candidate()]);
    assert!(dispatcher.contains_route("/hello/a"));

    let request = HttpRequest::new("/hello/a")
        .with_param("name", "world")
        .with_param("age", "5");
    let response = dispatcher.dispatch(&request).await;
    assert_eq!(response.body(), "hello world, your age is 5");
    assert_eq!(response.content_type(), "text/html;charset=UTF-8");
}

#[tokio::test]
async fn json_route_serializes_payload() {
    let dispatcher = build_dispatcher(Path::new("unused"), vec![controller_candidate()]);

    let request = HttpRequest::new("/hello/json")
        .with_param("name", "summer")
        .with_param("age", "3");
    let response = dispatcher.dispatch(&request).await;
    assert_eq!(response.content_type(), "application/json;charset=UTF-8");

    let payload: serde_json::Value = serde_json::from_str(response.body()).unwrap();
    assert_eq!(payload["name"], "summer");
    assert_eq!(payload["age"], 3);
}

#[tokio::test]
async fn template_route_substitutes_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("index.html"),
        "hi summer{name}, [summer{missing}]",
    )
    .unwrap();
    let dispatcher = build_dispatcher(dir.path(), vec![controller_candidate()]);

    let request = HttpRequest::new("/hello/html").with_param("name", "world");
    let response = dispatcher.dispatch(&request).await;
    // 未知键渲染为空字符串
    assert_eq!(response.body(), "hi world, []");
}

#[tokio::test]
async fn missing_template_renders_empty_body() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = build_dispatcher(dir.path(), vec![controller_candidate()]);

    let request = HttpRequest::new("/hello/html").with_param("name", "world");
    let response = dispatcher.dispatch(&request).await;
    assert_eq!(response.body(), "");
}

#[tokio::test]
async fn interceptors_run_in_registration_and_reverse_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let dispatcher = build_dispatcher(
        Path::new("unused"),
        vec![
            interceptor_candidate("i1", "I1", log.clone(), false),
            interceptor_candidate("i2", "I2", log.clone(), false),
            controller_candidate(),
        ],
    );
    assert_eq!(dispatcher.interceptor_count(), 2);

    let request = HttpRequest::new("/hello/a")
        .with_param("name", "x")
        .with_param("age", "1");
    dispatcher.dispatch(&request).await;
    assert_eq!(
        *log.lock(),
        vec!["pre:I1", "pre:I2", "post:I2", "post:I1", "done:I2", "done:I1"]
    );
}

#[tokio::test]
async fn pre_handle_stop_skips_rest_but_cleanup_covers_all() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let dispatcher = build_dispatcher(
        Path::new("unused"),
        vec![
            interceptor_candidate("i1", "I1", log.clone(), true),
            interceptor_candidate("i2", "I2", log.clone(), false),
            controller_candidate(),
        ],
    );

    let request = HttpRequest::new("/hello/a")
        .with_param("name", "x")
        .with_param("age", "1");
    let response = dispatcher.dispatch(&request).await;
    // 中断后渲染被跳过，清理钩子仍对全部已注册拦截器执行
    assert_eq!(response.body(), "");
    assert_eq!(*log.lock(), vec!["pre:I1", "done:I2", "done:I1"]);
}

#[tokio::test]
async fn unmatched_path_returns_fixed_body_without_interceptors() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let dispatcher = build_dispatcher(
        Path::new("unused"),
        vec![
            interceptor_candidate("i1", "I1", log.clone(), false),
            controller_candidate(),
        ],
    );

    let response = dispatcher.dispatch(&HttpRequest::new("/nowhere")).await;
    assert_eq!(response.body(), "<h1>Error! 你的请求没有对应的处理器！</h1>");
    assert!(log.lock().is_empty());
}

#[tokio::test]
async fn handler_failure_yields_error_body_and_cleanup_sees_error() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let dispatcher = build_dispatcher(
        Path::new("unused"),
        vec![
            interceptor_candidate("i1", "I1", log.clone(), false),
            controller_candidate(),
        ],
    );

    let response = dispatcher.dispatch(&HttpRequest::new("/hello/boom")).await;
    assert!(response.body().starts_with("<h1>服务器内部错误: "));
    assert_eq!(*log.lock(), vec!["pre:I1", "done:I1:err"]);

    // 异常只影响当次请求，后续请求照常服务
    let request = HttpRequest::new("/hello/a")
        .with_param("name", "x")
        .with_param("age", "2");
    let response = dispatcher.dispatch(&request).await;
    assert_eq!(response.body(), "hello x, your age is 2");
}

#[tokio::test]
async fn malformed_integer_parameter_is_a_request_error() {
    let dispatcher = build_dispatcher(Path::new("unused"), vec![controller_candidate()]);

    let request = HttpRequest::new("/hello/a")
        .with_param("name", "x")
        .with_param("age", "abc");
    let response = dispatcher.dispatch(&request).await;
    assert!(response.body().starts_with("<h1>服务器内部错误: "));

    let request = HttpRequest::new("/hello/a")
        .with_param("name", "x")
        .with_param("age", "7");
    let response = dispatcher.dispatch(&request).await;
    assert_eq!(response.body(), "hello x, your age is 7");
}

struct FirstDup;
struct SecondDup;

impl Controller for FirstDup {
    fn handler_methods(&self) -> Vec<HandlerMethod> {
        vec![HandlerMethod::of("/same", |_: &FirstDup, _: &BoundArgs| {
            Ok(HandlerReturn::None)
        })]
    }
}

impl Controller for SecondDup {
    fn handler_methods(&self) -> Vec<HandlerMethod> {
        vec![HandlerMethod::of("/same", |_: &SecondDup, _: &BoundArgs| {
            Ok(HandlerReturn::None)
        })]
    }
}

#[test]
fn duplicate_route_path_aborts_startup() {
    let candidates = vec![
        RequestDispatcher::candidate(TemplateEngine::new("unused")),
        ComponentCandidate::of::<FirstDup>()
            .constructor(|| FirstDup)
            .with_capability::<FirstDup, dyn Controller>(|controller| controller),
        ComponentCandidate::of::<SecondDup>()
            .constructor(|| SecondDup)
            .with_capability::<SecondDup, dyn Controller>(|controller| controller),
    ];
    let result = ApplicationContext::build(candidates);
    assert!(matches!(result, Err(ContainerError::Duplicate { .. })));
}
