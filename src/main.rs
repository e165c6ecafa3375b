use anyhow::Result;
use clap::Parser;
use quiz_simulator::cli::Cli;
use quiz_simulator::utils::logging;
use quiz_simulator::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config)?.run(cli.command).await?;

    Ok(())
}
