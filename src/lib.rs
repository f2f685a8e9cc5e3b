//! # lsb_hide 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：把 32 位长度头部和消息正文逐 bit
//! 写入像素 RGB 通道的最低有效位，并能将其原样恢复。

// 声明库包含的所有模块。

pub mod body;
pub mod cli;
pub mod constants;
pub mod error;
pub mod grid;
pub mod handler;
pub mod header;
pub mod sequencer;
pub mod steganography;

pub use error::{Result, StegoError};
pub use grid::{Channel, MemoryGrid, PixelGrid};
pub use sequencer::{Layout, Sequencer, Slot};
pub use steganography::{decode, encode};
