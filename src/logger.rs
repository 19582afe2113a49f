//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// 设置了 `RUST_LOG` 时以其为准，否则默认 `cwv_crawler=info`，
/// `verbose` 时提升为 `debug`。重复调用不会 panic。
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("cwv_crawler=debug,warn")
        } else {
            EnvFilter::new("cwv_crawler=info,warn")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .try_init();
}
