//! # 隐写编解码模块
//!
//! 组合长度头部与消息正文：编码时先写头部再写正文，解码时先读出长度，
//! 校验其可信后再读取恰好该长度的正文。两条路径共用同一个 [`Sequencer`]。

use log::debug;

use crate::body::{read_message, write_message};
use crate::constants::{BITS_PER_BYTE, HEADER_BITS};
use crate::error::{Result, StegoError};
use crate::grid::PixelGrid;
use crate::header::{read_length, write_length};
use crate::sequencer::{Layout, Sequencer};

/// 隐藏 `message_len` 字节的消息所需的槽位数。
fn required_slots(message_len: u64) -> u64 {
    HEADER_BITS + message_len * BITS_PER_BYTE
}

/// 以默认布局把 `message` 隐藏到 `grid` 的副本中，原网格保持不变。
pub fn encode<G: PixelGrid + Clone>(grid: &G, message: &[u8]) -> Result<G> {
    encode_with_layout(grid, message, Layout::default())
}

/// 以指定布局把 `message` 隐藏到 `grid` 的副本中。
///
/// # Errors
///
/// * `MessageTooLong` - 消息长度超过 `u32::MAX`。
/// * `Capacity` - 消息连同头部超出网格的槽位总数。
pub fn encode_with_layout<G: PixelGrid + Clone>(
    grid: &G,
    message: &[u8],
    layout: Layout,
) -> Result<G> {
    let sequencer = Sequencer::for_grid(grid, layout);
    let length = check_capacity(&sequencer, message)?;

    let mut encoded = grid.clone();
    write_length(&mut encoded, &sequencer, length)?;
    write_message(&mut encoded, &sequencer, message)?;
    Ok(encoded)
}

/// 直接在 `grid` 上隐藏 `message`。
///
/// 容量在修改任何像素之前校验，失败时 `grid` 保持原样。
pub fn encode_in_place<G: PixelGrid + ?Sized>(
    grid: &mut G,
    message: &[u8],
    layout: Layout,
) -> Result<()> {
    let sequencer = Sequencer::for_grid(grid, layout);
    let length = check_capacity(&sequencer, message)?;

    write_length(grid, &sequencer, length)?;
    write_message(grid, &sequencer, message)
}

fn check_capacity(sequencer: &Sequencer, message: &[u8]) -> Result<u32> {
    let length = u32::try_from(message.len()).map_err(|_| StegoError::MessageTooLong {
        length: message.len(),
    })?;

    let required = required_slots(u64::from(length));
    let available = sequencer.slot_count();
    debug!(
        "embedding {} bytes with {:?} layout: {} of {} slots",
        length,
        sequencer.layout(),
        required,
        available
    );

    if required > available {
        return Err(StegoError::Capacity {
            required,
            available,
        });
    }
    Ok(length)
}

/// 以默认布局从 `grid` 中恢复隐藏的消息。
pub fn decode<G: PixelGrid + ?Sized>(grid: &G) -> Result<Vec<u8>> {
    decode_with_layout(grid, Layout::default())
}

/// 以指定布局从 `grid` 中恢复隐藏的消息。
///
/// # Errors
///
/// * `Capacity` - 网格连 32 位头部都放不下。
/// * `CorruptHeader` - 头部声称的长度超出网格能容纳的范围，不返回任何部分结果。
pub fn decode_with_layout<G: PixelGrid + ?Sized>(grid: &G, layout: Layout) -> Result<Vec<u8>> {
    let sequencer = Sequencer::for_grid(grid, layout);
    let claimed_length = read_length(grid, &sequencer)?;

    let available = sequencer.slot_count();
    if required_slots(u64::from(claimed_length)) > available {
        return Err(StegoError::CorruptHeader {
            claimed_length,
            available,
        });
    }
    debug!(
        "header announces {} bytes with {:?} layout ({} slots available)",
        claimed_length, layout, available
    );

    read_message(grid, &sequencer, claimed_length as usize)
}

/// 隐藏 UTF-8 文本。
pub fn encode_text<G: PixelGrid + Clone>(grid: &G, text: &str, layout: Layout) -> Result<G> {
    encode_with_layout(grid, text.as_bytes(), layout)
}

/// 恢复消息并要求其为合法的 UTF-8 文本。
pub fn decode_text<G: PixelGrid + ?Sized>(grid: &G, layout: Layout) -> Result<String> {
    Ok(String::from_utf8(decode_with_layout(grid, layout)?)?)
}

/// 网格在指定布局下最多能隐藏的消息字节数。
pub fn capacity<G: PixelGrid + ?Sized>(grid: &G, layout: Layout) -> u64 {
    let slots = Sequencer::for_grid(grid, layout).slot_count();
    // 头部放不下时连空消息也无法隐藏。
    if slots < HEADER_BITS {
        return 0;
    }
    ((slots - HEADER_BITS) / BITS_PER_BYTE).min(u64::from(u32::MAX))
}
