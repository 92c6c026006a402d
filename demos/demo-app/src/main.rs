//! Summer 示例应用入口
//!
//! 启动流程：加载配置 → 汇集组件候选定义 → 构建容器 →
//! 取出分发器并挂到 axum 监听器上对外服务。

mod components;
mod config;
mod controllers;
mod interceptors;
mod processors;

use anyhow::Context;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use ioc_container::ApplicationContext;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use web_dispatch::{HttpRequest, RequestDispatcher, TemplateEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 配置与模板随 crate 发布，以 crate 目录为锚点而不是工作目录
    let base = Path::new(env!("CARGO_MANIFEST_DIR"));
    let config = config::load(&base.join("application.toml"))?;
    let template_root = config::resolve(base, &config.web.template_root);

    let mut candidates = vec![RequestDispatcher::candidate(TemplateEngine::new(
        template_root,
    ))];
    candidates.push(processors::candidate());
    candidates.push(interceptors::candidate());
    candidates.extend(components::candidates());
    candidates.push(controllers::candidate());

    let context = ApplicationContext::build(candidates)?;
    info!("应用上下文就绪，共 {} 个组件定义", context.definition_count());

    let dispatcher = context
        .get_bean::<RequestDispatcher>()
        .context("容器中没有请求分发器")?;
    info!("共注册 {} 条路由", dispatcher.route_count());

    let app = Router::new().fallback(serve).with_state(dispatcher);
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!("HTTP 服务启动: {}", config.server.bind);
    axum::serve(listener, app).await?;
    Ok(())
}

/// 把真实 HTTP 请求适配为分发层请求，再把分发结果写回
async fn serve(
    State(dispatcher): State<Arc<RequestDispatcher>>,
    Query(params): Query<HashMap<String, String>>,
    uri: Uri,
) -> impl IntoResponse {
    let request = HttpRequest::new(uri.path()).with_params(params);
    let response = dispatcher.dispatch(&request).await;
    let status = StatusCode::from_u16(response.status()).unwrap_or(StatusCode::OK);
    let content_type = response.content_type().to_string();
    (status, [(header::CONTENT_TYPE, content_type)], response.into_body())
}
