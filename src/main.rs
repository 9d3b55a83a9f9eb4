// ==========================================
// 价格数据导入服务 - HTTP 主入口
// ==========================================
// 流程: 解析命令行 → 加载 .env → 日志 → 配置 → 数据库/AppState → 路由 → 服务
// 关闭: Ctrl-C 触发优雅停机，AppState 随之释放（数据库连接关闭）
// ==========================================

use anyhow::Context;
use axum::http::Request;
use clap::Parser;
use prices_ingest::{logging, router, AppConfig, AppState};
use tower_http::trace::TraceLayer;
use tracing::Level;

/// 价格数据导入服务
#[derive(Parser, Debug)]
#[command(name = "prices-ingest")]
#[command(about = "价格归档导入与筛选导出 HTTP 服务", long_about = None)]
struct Args {
    /// .env 文件路径（可选，不存在时忽略）
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 加载 .env（存在时）
    let dotenv_loaded = if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)
            .with_context(|| format!("无法加载 {}", args.dotenv))?;
        true
    } else {
        false
    };

    // 配置先于日志读取，日志格式来自配置
    let config = AppConfig::from_env()?;
    logging::init(config.log_format);

    tracing::info!("==================================================");
    tracing::info!("{}", prices_ingest::APP_NAME);
    tracing::info!("系统版本: {}", prices_ingest::VERSION);
    tracing::info!("==================================================");
    if dotenv_loaded {
        tracing::info!(path = %args.dotenv, "已加载环境变量文件");
    }
    tracing::info!(
        db_path = %config.db_path,
        bind_addr = %config.bind_addr,
        id_mode = %config.id_mode,
        max_upload_bytes = config.max_upload_bytes,
        "配置加载完成"
    );

    let state = AppState::new(config.db_path.clone(), config.id_mode)
        .context("无法初始化AppState")?;

    let app = router(state, config.max_upload_bytes).layer(
        TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            tracing::span!(
                Level::INFO,
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                query = request.uri().query().unwrap_or("")
            )
        }),
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("无法监听 {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "HTTP 服务启动");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP 服务已停止");
    Ok(())
}

/// 等待 Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // 无法监听信号时不主动停机
        tracing::error!(error = %e, "监听停机信号失败");
        std::future::pending::<()>().await;
    }
    tracing::info!("收到停机信号，等待进行中的请求完成");
}
