/// 清除通道值最低有效位 (LSB) 的掩码。
/// `(value & LSB_MASK) | bit` 保留高 7 位，只替换最低位。
pub const LSB_MASK: u8 = 0xFE;

/// 长度头部占用的通道槽位数。
/// 消息字节长度以 `u32` 大端序存储，每个槽位隐藏 1 bit，因此需要 32 个槽位。
pub const HEADER_BITS: u64 = 32;

/// 每个消息字节需要的通道槽位数 (每个槽位 1 bit)。
pub const BITS_PER_BYTE: u64 = 8;

/// 每个像素可用于隐写的通道数 (R, G, B)。Alpha 通道从不参与。
pub const CHANNELS_PER_PIXEL: u64 = 3;

/// 旧版布局中，长度头部独占的像素个数 (每个像素只使用一个通道)。
pub const LEGACY_HEADER_PIXELS: u64 = 32;

/// 未指定输出路径时，隐写结果图像文件名的前缀。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 未指定输出路径时，恢复出的文本文件名的前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";

/// 恢复出的文本文件的默认扩展名。
pub const RECOVERED_EXTENSION: &str = "txt";
