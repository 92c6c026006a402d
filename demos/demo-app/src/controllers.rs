//! 示例控制器：文本、JSON 与模板三种渲染路径各一

use crate::components::User;
use ioc_container::ComponentCandidate;
use web_dispatch::{
    BoundArgs, Controller, HandlerMethod, HandlerReturn, ModelAndView, ParamSpec,
};

/// `/hello` 前缀下的示例控制器
pub struct HelloController;

impl HelloController {
    fn greeting(&self, name: &str, age: i64) -> String {
        format!("hello {}, your age is {}", name, age)
    }
}

impl Controller for HelloController {
    fn route_prefix(&self) -> &str {
        "/hello"
    }

    fn handler_methods(&self) -> Vec<HandlerMethod> {
        vec![
            // 文本返回值 → HTML 响应
            HandlerMethod::of("/a", |controller: &HelloController, args: &BoundArgs| {
                let name = args.text(0).unwrap_or_default();
                let age = args.integer(1).unwrap_or_default();
                Ok(HandlerReturn::Text(controller.greeting(name, age)))
            })
            .param(ParamSpec::text("name").request_name("name"))
            .param(ParamSpec::integer("age").request_name("age")),
            // 响应体标注 → JSON 响应
            HandlerMethod::of("/json", |_: &HelloController, args: &BoundArgs| {
                let user = User {
                    name: args.text(0).unwrap_or_default().to_string(),
                    age: args.integer(1).unwrap_or_default(),
                };
                Ok(HandlerReturn::Json(serde_json::to_value(user)?))
            })
            .response_body()
            .param(ParamSpec::text("name").request_name("name"))
            .param(ParamSpec::integer("age").request_name("age")),
            // 模型视图载体 → 本地模板渲染
            HandlerMethod::of("/html", |_: &HelloController, args: &BoundArgs| {
                let model_and_view = ModelAndView::new("index.html")
                    .with("name", args.text(0).unwrap_or_default())
                    .with("age", args.integer(1).unwrap_or_default().to_string());
                Ok(HandlerReturn::View(model_and_view))
            })
            .returns_view()
            .param(ParamSpec::text("name").request_name("name"))
            .param(ParamSpec::integer("age").request_name("age")),
        ]
    }
}

/// 控制器的候选定义，带控制器能力
pub fn candidate() -> ComponentCandidate {
    ComponentCandidate::of::<HelloController>()
        .named("helloController")
        .constructor(|| HelloController)
        .with_capability::<HelloController, dyn Controller>(|controller| controller)
}
