use image::{ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};
use lsb_hide::{
    Channel, Layout, MemoryGrid, PixelGrid, Sequencer, Slot, StegoError, decode, encode,
    body::{read_message, write_message},
    header::{read_length, write_length},
    steganography::{
        capacity, decode_text, decode_with_layout, encode_in_place, encode_text,
        encode_with_layout,
    },
};
use rand::{Rng, RngCore};

/// 一个辅助函数，用于创建一个带有随机像素的内存网格
fn random_grid(width: u32, height: u32) -> MemoryGrid {
    let mut rng = rand::rng();
    let pixels = (0..width * height)
        .map(|_| [rng.random(), rng.random(), rng.random()])
        .collect();
    MemoryGrid::from_pixels(width, height, pixels).expect("pixel count matches dimensions")
}

/// 按槽位顺序读出所有槽位的最低位
fn lsb_run(grid: &MemoryGrid, layout: Layout, start: u64, count: u64) -> Vec<u8> {
    Sequencer::for_grid(grid, layout)
        .range(start, count)
        .expect("range inside grid")
        .map(|slot| grid.lsb(slot))
        .collect()
}

/// 验证紧密布局按像素行优先、通道 R → G → B 排列
#[test]
fn test_packed_sequencer_order() {
    let sequencer = Sequencer::new(4, 2, Layout::Packed);
    assert_eq!(sequencer.slot_count(), 24);

    let expected = [
        (0, 0, Channel::Red),
        (0, 0, Channel::Green),
        (0, 0, Channel::Blue),
        (1, 0, Channel::Red),
    ];
    for (i, &(x, y, channel)) in expected.iter().enumerate() {
        assert_eq!(
            sequencer.slot(i as u64).unwrap(),
            Slot { x, y, channel }
        );
    }

    // 第 5 个像素位于第二行开头
    assert_eq!(
        sequencer.slot(12).unwrap(),
        Slot {
            x: 0,
            y: 1,
            channel: Channel::Red
        }
    );
    assert_eq!(
        sequencer.slot(23).unwrap(),
        Slot {
            x: 3,
            y: 1,
            channel: Channel::Blue
        }
    );
}

/// 验证每个槽位恰好出现一次
#[test]
fn test_sequencer_is_bijective() {
    for layout in [Layout::Packed, Layout::Legacy] {
        let sequencer = Sequencer::new(7, 9, layout);
        let slots: Vec<Slot> = sequencer
            .range(0, sequencer.slot_count())
            .unwrap()
            .collect();
        let unique: std::collections::HashSet<Slot> = slots.iter().copied().collect();
        assert_eq!(unique.len(), slots.len(), "{layout:?} repeats a slot");
        assert!(slots.iter().all(|slot| slot.x < 7 && slot.y < 9));
    }
}

/// 验证越界的槽位请求返回容量错误
#[test]
fn test_sequencer_out_of_range() {
    let sequencer = Sequencer::new(2, 2, Layout::Packed);
    assert!(matches!(
        sequencer.slot(12),
        Err(StegoError::Capacity {
            required: 13,
            available: 12
        })
    ));
    assert!(sequencer.range(10, 3).is_err());
    assert!(sequencer.range(10, 2).is_ok());
    assert!(sequencer.range(u64::MAX, 2).is_err());
}

/// 验证旧版布局：前 32 个槽位各占一个像素，之后从第 32 个像素开始紧密排列
#[test]
fn test_legacy_sequencer_order() {
    let sequencer = Sequencer::new(10, 10, Layout::Legacy);
    assert_eq!(sequencer.slot_count(), 32 + 68 * 3);

    assert_eq!(
        sequencer.slot(4).unwrap(),
        Slot {
            x: 4,
            y: 0,
            channel: Channel::Green
        }
    );
    assert_eq!(
        sequencer.slot(31).unwrap(),
        Slot {
            x: 1,
            y: 3,
            channel: Channel::Green
        }
    );
    assert_eq!(
        sequencer.slot(32).unwrap(),
        Slot {
            x: 2,
            y: 3,
            channel: Channel::Red
        }
    );
    assert_eq!(
        sequencer.slot(34).unwrap(),
        Slot {
            x: 2,
            y: 3,
            channel: Channel::Blue
        }
    );
    assert_eq!(
        sequencer.slot(35).unwrap(),
        Slot {
            x: 3,
            y: 3,
            channel: Channel::Red
        }
    );

    // 不足 32 个像素时只有头部区域的槽位
    assert_eq!(Sequencer::new(5, 5, Layout::Legacy).slot_count(), 25);
}

/// 验证长度头部为大端序、最高位在前
#[test]
fn test_header_bit_order() {
    let mut grid = MemoryGrid::new(11, 1);
    let sequencer = Sequencer::for_grid(&grid, Layout::Packed);
    write_length(&mut grid, &sequencer, 0x8000_0005).unwrap();

    let bits = lsb_run(&grid, Layout::Packed, 0, 32);
    assert_eq!(bits[0], 1);
    assert!(bits[1..29].iter().all(|&bit| bit == 0));
    assert_eq!(&bits[29..], &[1, 0, 1]);
    assert_eq!(read_length(&grid, &sequencer).unwrap(), 0x8000_0005);

    // 最后一个像素的 B 通道未被使用
    assert_eq!(grid.pixel(10, 0)[2], 0);
}

/// 验证头部在极值处往返一致
#[test]
fn test_header_round_trip_extremes() {
    let mut grid = random_grid(4, 3);
    let sequencer = Sequencer::for_grid(&grid, Layout::Packed);
    for length in [0, 1, 255, 0xDEAD_BEEF, u32::MAX] {
        write_length(&mut grid, &sequencer, length).unwrap();
        assert_eq!(read_length(&grid, &sequencer).unwrap(), length);
    }
}

/// 验证少于 11 个像素的网格无法容纳头部
#[test]
fn test_header_needs_eleven_pixels() {
    let mut grid = MemoryGrid::new(10, 1);
    let before = grid.clone();
    let sequencer = Sequencer::for_grid(&grid, Layout::Packed);

    assert!(matches!(
        write_length(&mut grid, &sequencer, 1),
        Err(StegoError::Capacity {
            required: 32,
            available: 30
        })
    ));
    assert_eq!(grid, before, "A failed write must not touch any pixel.");
    assert!(read_length(&grid, &sequencer).is_err());
}

/// 验证正文从槽位 32 开始，每字节最高位在前
#[test]
fn test_body_layout_and_round_trip() {
    let mut grid = MemoryGrid::new(20, 1);
    let sequencer = Sequencer::for_grid(&grid, Layout::Packed);
    write_message(&mut grid, &sequencer, &[0b1010_0001, 0x0F]).unwrap();

    assert!(lsb_run(&grid, Layout::Packed, 0, 32).iter().all(|&bit| bit == 0));
    assert_eq!(
        lsb_run(&grid, Layout::Packed, 32, 16),
        vec![1, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 1, 1, 1]
    );
    assert_eq!(
        read_message(&grid, &sequencer, 2).unwrap(),
        vec![0b1010_0001, 0x0F]
    );
    assert!(read_message(&grid, &sequencer, 0).unwrap().is_empty());
}

/// 100x100 纯蓝图像隐藏 28 字节文本后可以原样恢复
#[test]
fn test_solid_blue_scenario() {
    let grid = MemoryGrid::filled(100, 100, [0, 0, 255]);
    let message = b"Meet me at the old mill, 9pm";
    assert_eq!(message.len(), 28);

    let encoded = encode(&grid, message).unwrap();
    assert_eq!(decode(&encoded).unwrap(), message);
}

/// 4x4 图像 (48 个槽位) 无法容纳 3 字节消息 (需要 56 个槽位)
#[test]
fn test_small_image_capacity_scenario() {
    let grid = random_grid(4, 4);
    let err = encode(&grid, b"abc").unwrap_err();
    assert!(matches!(
        err,
        StegoError::Capacity {
            required: 56,
            available: 48
        }
    ));
}

/// 槽位恰好足够时成功，少一个槽位时失败
#[test]
fn test_capacity_boundary() {
    // 32 + 8 * 2 = 48 = 4 * 4 * 3
    let exact = random_grid(4, 4);
    let message = [0x5A, 0xC3];
    let encoded = encode(&exact, &message).unwrap();
    assert_eq!(decode(&encoded).unwrap(), message);

    // 32 + 8 * 3 = 56，而 19 个像素只有 57 个槽位，18 个像素只有 54 个
    assert!(encode(&random_grid(19, 1), b"xyz").is_ok());
    assert!(matches!(
        encode(&random_grid(18, 1), b"xyz"),
        Err(StegoError::Capacity {
            required: 56,
            available: 54
        })
    ));

    assert_eq!(capacity(&exact, Layout::Packed), 2);

    // 旧版布局的槽位数不是 3 的倍数，可以构造出恰好少一个槽位的情形：
    // 37 个像素 = 32 + 3 * 5 = 47 个槽位，40 个像素 = 32 + 3 * 8 = 56 个槽位
    assert!(matches!(
        encode_with_layout(&random_grid(37, 1), &message, Layout::Legacy),
        Err(StegoError::Capacity {
            required: 48,
            available: 47
        })
    ));
    assert!(encode_with_layout(&random_grid(40, 1), b"xyz", Layout::Legacy).is_ok());
}

/// 空消息只写入头部，并恢复为空字节序列
#[test]
fn test_empty_message() {
    let grid = random_grid(11, 1);
    let encoded = encode(&grid, b"").unwrap();
    assert_eq!(lsb_run(&encoded, Layout::Packed, 0, 32), vec![0; 32]);
    assert!(decode(&encoded).unwrap().is_empty());
}

/// 编码不修改源网格，且只改变被使用槽位的最低位
#[test]
fn test_channel_bit_isolation() {
    let grid = random_grid(16, 16);
    let snapshot = grid.clone();
    let mut message = vec![0u8; 40];
    rand::rng().fill_bytes(&mut message);

    let encoded = encode(&grid, &message).unwrap();
    assert_eq!(grid, snapshot, "The source grid must never be mutated.");

    let used = 32 + 8 * message.len() as u64;
    let sequencer = Sequencer::for_grid(&grid, Layout::Packed);
    for (index, slot) in sequencer
        .range(0, sequencer.slot_count())
        .unwrap()
        .enumerate()
    {
        let before = grid.channel(slot.x, slot.y, slot.channel);
        let after = encoded.channel(slot.x, slot.y, slot.channel);
        assert_eq!(before & 0xFE, after & 0xFE, "high bits changed at {slot:?}");
        if index as u64 >= used {
            assert_eq!(before, after, "untouched slot changed at {slot:?}");
        }
    }
}

/// 头部区域只取决于消息长度，与内容无关
#[test]
fn test_header_depends_only_on_length() {
    let grid = random_grid(12, 12);
    let first = encode(&grid, b"aaaaaaaa").unwrap();
    let second = encode(&grid, &[0xFF; 8]).unwrap();

    assert_eq!(
        lsb_run(&first, Layout::Packed, 0, 32),
        lsb_run(&second, Layout::Packed, 0, 32)
    );
}

/// 手动写入过大的长度头部后，解码报告头部损坏而不是越界读取
#[test]
fn test_corrupt_header_rejected() {
    let mut grid = random_grid(8, 8);
    let sequencer = Sequencer::for_grid(&grid, Layout::Packed);
    // 8 * 8 * 3 = 192 个槽位，最多容纳 20 字节
    write_length(&mut grid, &sequencer, 21).unwrap();

    assert!(matches!(
        decode(&grid),
        Err(StegoError::CorruptHeader {
            claimed_length: 21,
            available: 192
        })
    ));

    write_length(&mut grid, &sequencer, 20).unwrap();
    assert_eq!(decode(&grid).unwrap().len(), 20);
}

/// 网格连头部都放不下时，解码返回容量错误
#[test]
fn test_decode_grid_too_small_for_header() {
    let grid = MemoryGrid::new(3, 3);
    assert!(matches!(
        decode(&grid),
        Err(StegoError::Capacity {
            required: 32,
            available: 27
        })
    ));
}

/// 随机消息在两种布局下都能往返
#[test]
fn test_random_round_trips() {
    let mut rng = rand::rng();
    for layout in [Layout::Packed, Layout::Legacy] {
        for _ in 0..16 {
            let width = rng.random_range(6..40);
            let height = rng.random_range(6..40);
            let grid = random_grid(width, height);
            let limit = capacity(&grid, layout) as usize;
            let mut message = vec![0u8; rng.random_range(0..=limit)];
            rng.fill_bytes(&mut message);

            let encoded = encode_with_layout(&grid, &message, layout).unwrap();
            assert_eq!(decode_with_layout(&encoded, layout).unwrap(), message);
        }
    }
}

/// 旧版布局的头部写在前 32 个像素中，每个像素只使用一个通道
#[test]
fn test_legacy_header_placement() {
    let grid = MemoryGrid::new(8, 8);
    let encoded = encode_with_layout(&grid, &[0xAB], Layout::Legacy).unwrap();

    // 长度 1 的最低位位于槽位 31：像素 (7, 3)，通道 31 % 3 = G
    assert_eq!(encoded.pixel(7, 3), [0, 1, 0]);
    // 正文 0xAB = 1010_1011 从像素 32 = (0, 4) 开始
    assert_eq!(encoded.pixel(0, 4), [1, 0, 1]);
    assert_eq!(encoded.pixel(1, 4), [0, 1, 0]);
    assert_eq!(encoded.pixel(2, 4), [1, 1, 0]);

    // 不足 32 个像素时旧版布局无法容纳头部
    assert_eq!(capacity(&MemoryGrid::new(5, 5), Layout::Legacy), 0);
    assert!(encode_with_layout(&MemoryGrid::new(5, 5), b"", Layout::Legacy).is_err());
}

/// 原地编码在容量不足时不修改网格
#[test]
fn test_encode_in_place() {
    let mut grid = random_grid(4, 4);
    let snapshot = grid.clone();
    assert!(encode_in_place(&mut grid, b"too long", Layout::Packed).is_err());
    assert_eq!(grid, snapshot);

    encode_in_place(&mut grid, b"ok", Layout::Packed).unwrap();
    assert_eq!(decode(&grid).unwrap(), b"ok");
}

/// 文本层对非法 UTF-8 报告编码错误
#[test]
fn test_text_layer() {
    let grid = random_grid(32, 32);
    let encoded = encode_text(&grid, "Ho! Ho! Ho! 🎅", Layout::Packed).unwrap();
    assert_eq!(
        decode_text(&encoded, Layout::Packed).unwrap(),
        "Ho! Ho! Ho! 🎅"
    );

    let binary = encode(&grid, &[0xC3, 0x28]).unwrap();
    assert!(matches!(
        decode_text(&binary, Layout::Packed),
        Err(StegoError::InvalidEncoding(_))
    ));
}

/// `image` 的 RGB 与 RGBA 缓冲区都能直接作为像素网格使用，且 Alpha 不变
#[test]
fn test_image_buffers() {
    let rgb: RgbImage = ImageBuffer::from_pixel(20, 20, Rgb([10, 20, 30]));
    let encoded = encode(&rgb, "image crate".as_bytes()).unwrap();
    assert_eq!(decode(&encoded).unwrap(), b"image crate");

    let rgba: RgbaImage = ImageBuffer::from_pixel(20, 20, Rgba([10, 20, 30, 77]));
    let encoded = encode(&rgba, "with alpha".as_bytes()).unwrap();
    assert!(encoded.pixels().all(|pixel| pixel.0[3] == 77));
    assert_eq!(decode(&encoded).unwrap(), b"with alpha");

    // 两种缓冲区按同样的槽位顺序存储
    let as_rgb: RgbImage = ImageBuffer::from_fn(20, 20, |x, y| {
        let [r, g, b, _] = encoded.get_pixel(x, y).0;
        Rgb([r, g, b])
    });
    assert_eq!(decode(&as_rgb).unwrap(), b"with alpha");
}
