//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::constants::{DOCTORED_PREFIX, RECOVERED_EXTENSION, RECOVERED_PREFIX};
use crate::error::StegoError;
use crate::sequencer::Layout;
use crate::steganography::{capacity, decode_text, decode_with_layout, encode_with_layout};
use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use image::{DynamicImage, GenericImageView};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// 在 `source` 所在目录下生成 `<prefix><文件名>` 形式的默认路径。
fn sibling_path(source: &Path, file_name: &str) -> PathBuf {
    source
        .parent()
        .map(|dir| dir.join(file_name))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

fn default_hide_dest(image: &Path) -> PathBuf {
    let name = image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    sibling_path(image, &format!("{DOCTORED_PREFIX}{name}"))
}

fn default_recover_dest(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    sibling_path(
        image,
        &format!("{RECOVERED_PREFIX}{stem}.{RECOVERED_EXTENSION}"),
    )
}

/// 目标文件已存在且未指定 `--force` 时拒绝继续。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

/// 将核心隐写错误转换为面向用户的描述。
fn describe_hide_error(err: StegoError) -> anyhow::Error {
    match err {
        StegoError::Capacity {
            required,
            available,
        } => anyhow!(
            "Not enough space in the image to hide the text. \nRequired: {} bits, Available: {} bits",
            required.to_string().red().bold(),
            available.to_string().green().bold()
        ),
        other => anyhow::Error::new(other).context("Failed to hide the message in the image."),
    }
}

fn describe_recover_error(err: StegoError, image: &Path) -> anyhow::Error {
    match err {
        StegoError::CorruptHeader {
            claimed_length,
            available,
        } => anyhow!(
            "No hidden message found in '{}'. \nThe length header claims {} bytes, but the image only has {} channel slots.",
            image.to_string_lossy().red().bold(),
            claimed_length.to_string().red().bold(),
            available.to_string().green().bold()
        ),
        other => anyhow::Error::new(other).context(format!(
            "Failed to recover the message from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            image.to_string_lossy().red().bold()
        )),
    }
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本文件、检查隐写空间是否足够、调用隐写核心函数隐藏长度和正文，
/// 最后将结果写入目标图像文件。带 Alpha 通道的图像按 RGBA 处理并保留 Alpha，
/// 其余按 RGB 处理。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像或文本文件。
/// * 图像没有足够的空间来隐藏文本。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_hide_dest(&args.image));
    ensure_writable(&dest, args.force)?;

    let picture = open_image(&args.image)?;

    let text = fs::read(&args.text).with_context(|| {
        format!(
            "Unable to read text file: {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;

    let layout = Layout::from(args.layout);
    let (width, height) = picture.dimensions();
    info!(
        "hiding {} bytes from {} in {}x{} image {}",
        text.len(),
        args.text.display(),
        width,
        height,
        args.image.display()
    );

    let result = if picture.color().has_alpha() {
        encode_with_layout(&picture.to_rgba8(), &text, layout)
            .map(|encoded| encoded.save(&dest))
    } else {
        encode_with_layout(&picture.to_rgb8(), &text, layout).map(|encoded| encoded.save(&dest))
    };

    result.map_err(describe_hide_error)?.with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用恢复核心函数获取消息长度和正文，
/// 最后将恢复的文本内容写入目标文本文件，或在指定 `--print` 时打印到标准输出。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像文件。
/// * 图像中的长度头部不可信 (图像未经隐写或已损坏)。
/// * 指定 `--print` 而恢复的内容不是合法的 UTF-8。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let layout = Layout::from(args.layout);

    if args.print {
        let picture = open_image(&args.image)?.to_rgb8();
        let text = decode_text(&picture, layout)
            .map_err(|err| describe_recover_error(err, &args.image))?;
        println!("{text}");
        return Ok(());
    }

    let dest = args
        .text
        .clone()
        .unwrap_or_else(|| default_recover_dest(&args.image));
    ensure_writable(&dest, args.force)?;

    // Alpha 通道从不承载数据，按 RGB 读取即可。
    let picture = open_image(&args.image)?.to_rgb8();
    let text = decode_with_layout(&picture, layout)
        .map_err(|err| describe_recover_error(err, &args.image))?;
    info!(
        "recovered {} bytes from {}",
        text.len(),
        args.image.display()
    );

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑：报告图像最多能隐藏的字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let picture = open_image(&args.image)?.to_rgb8();
    let bytes = capacity(&picture, Layout::from(args.layout));

    println!(
        "{} ({}x{}) can hide up to {} bytes.",
        args.image.to_string_lossy().green().bold(),
        picture.width(),
        picture.height(),
        bytes.to_string().green().bold()
    );
    Ok(())
}
