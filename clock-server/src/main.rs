use anyhow::Context;
use clock_server::{Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 工作目录, 日志) 并加载配置
    let config = setup_environment().context("failed to set up environment")?;

    print_banner();
    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        "Clock server starting..."
    );

    // 2. 初始化服务器状态 (数据库、传感器、协调器)
    let state = ServerState::initialize(&config)
        .await
        .context("failed to initialize server state")?;

    // 3. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    server.run().await.context("server error")?;

    Ok(())
}
