//! # 错误类型模块
//!
//! 隐写核心 (序列器、头部编解码、正文编解码) 返回的所有错误。
//! 应用层 (`handler`) 再用 `anyhow` 为其附加上下文。

use std::string::FromUtf8Error;

/// 隐写核心可能产生的错误。
#[derive(Debug, thiserror::Error)]
pub enum StegoError {
    /// 消息 (连同 32 位长度头部) 超出了图像可用的通道槽位。
    /// 在修改任何像素之前检测。
    #[error("not enough channel slots: {required} required, {available} available")]
    Capacity { required: u64, available: u64 },

    /// 长度头部声称的消息长度超出了图像能够容纳的范围。
    /// 图像很可能没有经过隐写，或者头部已损坏。
    #[error("corrupt length header: claims {claimed_length} bytes but only {available} channel slots exist")]
    CorruptHeader { claimed_length: u32, available: u64 },

    /// 消息长度无法用 32 位无符号整数表示。
    #[error("message of {length} bytes does not fit in a 32-bit length header")]
    MessageTooLong { length: usize },

    /// 恢复出的字节不是合法的 UTF-8 文本。
    #[error("recovered message is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, StegoError>;
