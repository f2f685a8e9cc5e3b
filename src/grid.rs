//! # 像素网格模块
//!
//! 隐写核心只依赖 [`PixelGrid`] 这一最小能力接口：尺寸以及按 (x, y, 通道)
//! 读写 8 位通道值。`image` 库的 RGB/RGBA 缓冲区和内存中的 [`MemoryGrid`]
//! 都实现了该接口。

use std::ops::{Deref, DerefMut};

use image::{ImageBuffer, Rgb, Rgba};

use crate::constants::LSB_MASK;
use crate::sequencer::Slot;

/// 像素中可承载隐藏 bit 的颜色通道。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// 按 R → G → B 的循环顺序排列的全部通道。
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// 通道在像素中的下标 (R = 0, G = 1, B = 2)。
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    /// 由槽位序号对 3 取模得到的通道。
    pub fn cycle(position: u64) -> Self {
        Self::ALL[(position % 3) as usize]
    }
}

/// 可被隐写的 RGB 像素网格。
///
/// 坐标满足 `0 <= x < width`、`0 <= y < height`，越界访问由实现者决定是否 panic。
/// 编解码过程从不改变网格尺寸。
pub trait PixelGrid {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn channel(&self, x: u32, y: u32, channel: Channel) -> u8;

    fn set_channel(&mut self, x: u32, y: u32, channel: Channel, value: u8);

    /// 读取槽位对应通道值的最低有效位。
    fn lsb(&self, slot: Slot) -> u8 {
        self.channel(slot.x, slot.y, slot.channel) & 1
    }

    /// 用 `bit` 替换槽位对应通道值的最低有效位，其余 7 位保持不变。
    fn set_lsb(&mut self, slot: Slot, bit: u8) {
        let value = self.channel(slot.x, slot.y, slot.channel);
        self.set_channel(
            slot.x,
            slot.y,
            slot.channel,
            (value & LSB_MASK) | (bit & 1),
        );
    }
}

macro_rules! impl_pixel_grid_for_image {
    ($pixel:ident) => {
        impl<C> PixelGrid for ImageBuffer<$pixel<u8>, C>
        where
            C: Deref<Target = [u8]> + DerefMut,
        {
            fn width(&self) -> u32 {
                self.dimensions().0
            }

            fn height(&self) -> u32 {
                self.dimensions().1
            }

            fn channel(&self, x: u32, y: u32, channel: Channel) -> u8 {
                self.get_pixel(x, y).0[channel.index()]
            }

            fn set_channel(&mut self, x: u32, y: u32, channel: Channel, value: u8) {
                self.get_pixel_mut(x, y).0[channel.index()] = value;
            }
        }
    };
}

impl_pixel_grid_for_image!(Rgb);
// Alpha 通道 (下标 3) 永远不会被访问。
impl_pixel_grid_for_image!(Rgba);

/// 完全位于内存中的 RGB 网格，不依赖任何图像格式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryGrid {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl MemoryGrid {
    /// 创建所有通道均为 0 的网格。
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0])
    }

    /// 创建每个像素都等于 `rgb` 的网格。
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![rgb; count],
        }
    }

    /// 由行优先排列的像素构造网格；像素数量与尺寸不符时返回 `None`。
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[self.offset(x, y)]
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }
}

impl PixelGrid for MemoryGrid {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn channel(&self, x: u32, y: u32, channel: Channel) -> u8 {
        self.pixels[self.offset(x, y)][channel.index()]
    }

    fn set_channel(&mut self, x: u32, y: u32, channel: Channel, value: u8) {
        let offset = self.offset(x, y);
        self.pixels[offset][channel.index()] = value;
    }
}
