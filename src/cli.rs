//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use crate::sequencer::Layout;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 的 RGB 通道中隐藏或恢复文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 的 RGB 通道中隐藏或恢复文本。\n消息长度以 32 位头部存储，随后是逐字节、最高位在前的消息正文。"
)]
pub struct Cli {
    /// 输出更详细的日志 (-v: info, -vv: debug, -vvv: trace)。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像 (如 PNG, BMP) 中隐藏文本文件内容。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 显示图像最多能隐藏多少字节。
    Capacity(CapacityArgs),
}

/// 槽位布局的命令行取值。
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutChoice {
    /// 每个像素依次使用 R、G、B 三个通道。
    #[default]
    Packed,
    /// 兼容旧版编码器：长度头部占用 32 个像素，每个像素一个通道。
    Legacy,
}

impl From<LayoutChoice> for Layout {
    fn from(choice: LayoutChoice) -> Self {
        match choice {
            LayoutChoice::Packed => Layout::Packed,
            LayoutChoice::Legacy => Layout::Legacy,
        }
    }
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long)]
    pub text: PathBuf,

    /// 隐写完成后，保存结果图像的输出路径。
    /// 省略时在输入图像旁生成 `doctored_<文件名>`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 槽位布局。
    #[arg(short, long, value_enum, default_value_t)]
    pub layout: LayoutChoice,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本后，保存文本内容的输出路径。
    /// 省略时在图像旁生成 `recovered_<文件名>.txt`。
    #[arg(short, long, conflicts_with = "print")]
    pub text: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 槽位布局，必须与隐藏时使用的一致。
    #[arg(short, long, value_enum, default_value_t)]
    pub layout: LayoutChoice,

    /// 将恢复的文本直接打印到标准输出 (要求为合法 UTF-8)，不写入文件。
    #[arg(short, long)]
    pub print: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 槽位布局。
    #[arg(short, long, value_enum, default_value_t)]
    pub layout: LayoutChoice,
}
