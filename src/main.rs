use std::io::{self, BufWriter};

use anyhow::Context;
use shekar_lib::{normalize_lines, AppConfig};

fn main() -> anyhow::Result<()> {
    // 日志写 stderr，stdout 只输出规范化结果
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let config = AppConfig::load().context("加载配置失败")?;
    let normalizer = config.normalizer.build().context("构建规范化管道失败")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let count = normalize_lines(&normalizer, stdin.lock(), BufWriter::new(stdout.lock()))
        .context("规范化输入失败")?;
    tracing::info!("处理完成: {} 行", count);
    Ok(())
}
