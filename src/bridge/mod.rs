//! 命令桥
//!
//! 前端与后端之间的唯一调用面：命令名 + 扁平的参数对象（snake_case 键），
//! 返回 JSON 值或错误。
//!
//! - `Bridge`: 调用接口
//! - `CommandRouter`: 进程内实现，把命令分发到本地 SQLite 存储
//!
//! 调用是同步的请求 / 响应，没有去重、取消或重试。

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

pub mod router;

pub use router::{COMMANDS, CommandRouter};

/// 命令桥错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid arguments for {command}: {reason}")]
    InvalidArgs { command: String, reason: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: String, id: String },

    #[error("{0}")]
    Backend(String),
}

impl BridgeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BridgeError::NotFound { .. })
    }

    pub(crate) fn invalid_args(command: &str, reason: impl Into<String>) -> Self {
        BridgeError::InvalidArgs {
            command: command.to_string(),
            reason: reason.into(),
        }
    }
}

/// 命令调用接口
pub trait Bridge {
    /// 调用命令；`args` 为 `Value::Null` 时视为空对象
    fn invoke(&self, command: &str, args: Value) -> Result<Value, BridgeError>;
}

impl<B: Bridge + ?Sized> Bridge for Arc<B> {
    fn invoke(&self, command: &str, args: Value) -> Result<Value, BridgeError> {
        (**self).invoke(command, args)
    }
}

impl<B: Bridge + ?Sized> Bridge for &B {
    fn invoke(&self, command: &str, args: Value) -> Result<Value, BridgeError> {
        (**self).invoke(command, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        let not_found = BridgeError::NotFound {
            entity: "file".into(),
            id: "7".into(),
        };
        assert!(not_found.is_not_found());
        assert_eq!(not_found.to_string(), "file 7 not found");

        assert!(!BridgeError::Backend("Failed to open".into()).is_not_found());
        assert!(!BridgeError::invalid_args("get_user", "missing argument `user_id`").is_not_found());
    }
}
