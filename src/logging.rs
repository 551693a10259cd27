//! # 日志初始化模块
//!
//! 基于 `env_logger` 为 `log` 门面安装日志后端，日志输出到标准错误。

use env_logger::Builder;
use log::LevelFilter;

/// 根据 `-v` 出现次数与 `-q` 标志推导日志级别。
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// 初始化全局日志。`RUST_LOG` 环境变量优先于命令行给出的级别。
///
/// 重复初始化 (例如在测试中) 会被静默忽略。
pub fn init_logging(verbose: u8, quiet: bool) {
    let _ = Builder::new()
        .filter_level(level_for(verbose, quiet))
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
