//! 类型化客户端
//!
//! 每个后端命令对应一个方法：把具名参数序列化为参数对象，
//! 调用命令桥，再把返回值反序列化为具体类型。不做校验，不做转换。
//!
//! 方法按领域分布在子模块中：
//! - `files`: 案卷
//! - `people`: 用户、职员、考勤
//! - `cases`: 案件
//! - `notifications`: 通知
//! - `offenders`: 当事人
//! - `registers`: 通讯录、公告、摘要、报表、主题

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::bridge::{Bridge, BridgeError};

mod cases;
mod files;
mod notifications;
mod offenders;
mod people;
mod registers;

/// 客户端错误类型
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("Failed to encode arguments for {command}: {source}")]
    Encode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected response from {command}: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response from {command} has no `{field}`")]
    MissingField { command: String, field: String },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Bridge(e) if e.is_not_found())
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// 类型化客户端
pub struct Client<B> {
    bridge: B,
}

impl<B: Bridge> Client<B> {
    pub fn new(bridge: B) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// 调用命令并反序列化返回值
    fn call<T: DeserializeOwned>(&self, command: &str, args: Value) -> ClientResult<T> {
        let value = self.bridge.invoke(command, args)?;
        serde_json::from_value(value).map_err(|source| ClientError::Decode {
            command: command.to_string(),
            source,
        })
    }

    /// 调用写命令，忽略结果消息
    fn call_unit(&self, command: &str, args: Value) -> ClientResult<()> {
        self.bridge.invoke(command, args)?;
        Ok(())
    }

    /// 调用新建命令，取出返回对象中的 ID 字段
    fn call_created(&self, command: &str, args: Value, id_field: &str) -> ClientResult<i64> {
        let value = self.bridge.invoke(command, args)?;
        value
            .get(id_field)
            .and_then(Value::as_i64)
            .ok_or_else(|| ClientError::MissingField {
                command: command.to_string(),
                field: id_field.to_string(),
            })
    }
}

/// 把参数结构体序列化为参数对象
fn encode<T: Serialize>(command: &str, value: &T) -> ClientResult<Value> {
    serde_json::to_value(value).map_err(|source| ClientError::Encode {
        command: command.to_string(),
        source,
    })
}
