//! 应用配置加载
//!
//! 配置来自可选的 TOML 文件，文件缺失时回落到内建默认值。

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub web: WebConfig,
}

/// HTTP 监听配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub bind: String,
}

/// Web 层配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// 模板根目录
    pub template_root: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            web: WebConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            template_root: PathBuf::from("templates"),
        }
    }
}

/// 以基准目录为锚点解析路径，绝对路径原样使用
///
/// 配置文件与模板根目录都随应用一起发布，
/// 解析时不依赖进程的当前工作目录。
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// 加载配置文件，文件不存在时使用默认配置
pub fn load(path: &Path) -> anyhow::Result<AppConfig> {
    if !path.exists() {
        info!("配置文件不存在，使用默认配置: {}", path.display());
        return Ok(AppConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
    let config = toml::from_str(&raw)
        .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
    Ok(config)
}
