//! # 消息正文编解码模块
//!
//! 正文紧接在长度头部之后，从槽位 32 开始，每个字节按最高位在前展开为 8 bit。

use crate::constants::{BITS_PER_BYTE, HEADER_BITS};
use crate::error::Result;
use crate::grid::PixelGrid;
use crate::sequencer::Sequencer;

/// 把 `bytes` 展开为最高位在前的比特流。
fn bits(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    bytes
        .iter()
        .flat_map(|&byte| (0..BITS_PER_BYTE as u32).rev().map(move |shift| (byte >> shift) & 1))
}

/// 将 `bytes` 写入头部之后的槽位。
///
/// 所需区间在写入前整体校验，空间不足时不修改任何像素。
pub fn write_message<G: PixelGrid + ?Sized>(
    grid: &mut G,
    sequencer: &Sequencer,
    bytes: &[u8],
) -> Result<()> {
    let slots = sequencer.range(HEADER_BITS, bytes.len() as u64 * BITS_PER_BYTE)?;
    for (slot, bit) in slots.zip(bits(bytes)) {
        grid.set_lsb(slot, bit);
    }
    Ok(())
}

/// 从头部之后的槽位读出恰好 `byte_length` 个字节。
pub fn read_message<G: PixelGrid + ?Sized>(
    grid: &G,
    sequencer: &Sequencer,
    byte_length: usize,
) -> Result<Vec<u8>> {
    let mut slots = sequencer.range(HEADER_BITS, byte_length as u64 * BITS_PER_BYTE)?;
    let mut message = Vec::with_capacity(byte_length);

    for _ in 0..byte_length {
        let byte = slots
            .by_ref()
            .take(BITS_PER_BYTE as usize)
            .fold(0u8, |byte, slot| (byte << 1) | grid.lsb(slot));
        message.push(byte);
    }

    Ok(message)
}
