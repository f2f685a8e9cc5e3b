//! # 长度头部编解码模块
//!
//! 消息的字节长度以 32 位大端序 (最高位在前) 写入槽位 `0..32`。

use crate::constants::HEADER_BITS;
use crate::error::Result;
use crate::grid::PixelGrid;
use crate::sequencer::Sequencer;

/// 将 `length` 写入前 32 个槽位的最低有效位。
///
/// 槽位不足 32 个时返回容量错误，且不修改任何像素。
pub fn write_length<G: PixelGrid + ?Sized>(
    grid: &mut G,
    sequencer: &Sequencer,
    length: u32,
) -> Result<()> {
    for (i, slot) in sequencer.range(0, HEADER_BITS)?.enumerate() {
        let bit = ((length >> (HEADER_BITS as usize - 1 - i)) & 1) as u8;
        grid.set_lsb(slot, bit);
    }
    Ok(())
}

/// 读取前 32 个槽位的最低有效位，重组出消息长度。
pub fn read_length<G: PixelGrid + ?Sized>(grid: &G, sequencer: &Sequencer) -> Result<u32> {
    Ok(sequencer
        .range(0, HEADER_BITS)?
        .fold(0u32, |length, slot| (length << 1) | u32::from(grid.lsb(slot))))
}
