//! 日志初始化
//!
//! 使用 tracing-subscriber 输出到 stderr。`RUST_LOG` 优先，
//! 未设置时使用配置中的 `log_filter`。重复调用只生效一次。

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// 初始化全局日志订阅者
pub fn init(default_filter: &str) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        // 其他组件可能已经安装了订阅者，忽略该错误
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}
