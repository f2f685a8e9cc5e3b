//! # 比特通道序列器模块
//!
//! 把比特流中的线性位置 `i` 映射到唯一的 (像素, 通道) 槽位。
//! 写入与读取两条路径都只通过这里寻址，因此同一个 `i` 对于同样的尺寸
//! 与布局总是落在同一个槽位上。

use crate::constants::{CHANNELS_PER_PIXEL, HEADER_BITS, LEGACY_HEADER_PIXELS};
use crate::error::{Result, StegoError};
use crate::grid::{Channel, PixelGrid};

/// 槽位在像素网格中的排布方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// 每个像素依次提供 R、G、B 三个槽位，像素按行优先排列。
    /// 槽位 `i` 位于第 `i / 3` 个像素的第 `i % 3` 个通道。
    #[default]
    Packed,
    /// 兼容旧版编码器的布局：前 32 个槽位各占一个像素 (像素 `i`，通道 `i % 3`)，
    /// 其后的槽位从第 32 个像素开始按 R、G、B 紧密排列。
    Legacy,
}

/// 一个可承载 1 bit 的通道槽位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub x: u32,
    pub y: u32,
    pub channel: Channel,
}

/// 对给定尺寸和布局的网格进行槽位寻址。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequencer {
    width: u32,
    height: u32,
    layout: Layout,
}

impl Sequencer {
    pub fn new(width: u32, height: u32, layout: Layout) -> Self {
        Self {
            width,
            height,
            layout,
        }
    }

    pub fn for_grid<G: PixelGrid + ?Sized>(grid: &G, layout: Layout) -> Self {
        Self::new(grid.width(), grid.height(), layout)
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// 网格中可寻址的槽位总数。
    pub fn slot_count(&self) -> u64 {
        let pixels = self.pixel_count();
        match self.layout {
            Layout::Packed => pixels * CHANNELS_PER_PIXEL,
            Layout::Legacy if pixels < LEGACY_HEADER_PIXELS => pixels,
            Layout::Legacy => {
                HEADER_BITS + (pixels - LEGACY_HEADER_PIXELS) * CHANNELS_PER_PIXEL
            }
        }
    }

    /// 返回第 `index` 个槽位；`index` 超出槽位总数时返回容量错误。
    pub fn slot(&self, index: u64) -> Result<Slot> {
        let available = self.slot_count();
        if index >= available {
            return Err(StegoError::Capacity {
                required: index + 1,
                available,
            });
        }
        Ok(self.locate(index))
    }

    /// 返回从 `start` 开始的连续 `count` 个槽位。
    ///
    /// 整个区间在迭代之前一次性校验，失败时不会产生任何槽位。
    pub fn range(&self, start: u64, count: u64) -> Result<impl Iterator<Item = Slot> + use<>> {
        let available = self.slot_count();
        let end = match start.checked_add(count) {
            Some(end) if end <= available => end,
            _ => {
                return Err(StegoError::Capacity {
                    required: start.saturating_add(count),
                    available,
                });
            }
        };

        let sequencer = *self;
        Ok((start..end).map(move |index| sequencer.locate(index)))
    }

    fn locate(&self, index: u64) -> Slot {
        let (pixel, channel) = match self.layout {
            Layout::Packed => (index / CHANNELS_PER_PIXEL, Channel::cycle(index)),
            Layout::Legacy if index < HEADER_BITS => (index, Channel::cycle(index)),
            Layout::Legacy => {
                let body = index - HEADER_BITS;
                (
                    LEGACY_HEADER_PIXELS + body / CHANNELS_PER_PIXEL,
                    Channel::cycle(body),
                )
            }
        };
        let width = u64::from(self.width);

        Slot {
            x: (pixel % width) as u32,
            y: (pixel / width) as u32,
            channel,
        }
    }
}
