//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::payload::Framing;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 的 RGB 像素中隐藏或恢复文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 的 RGB 像素中隐藏或恢复文本。\n结果图像总是以 PNG 格式保存，任何有损重新压缩都会破坏隐藏的数据。"
)]
pub struct Cli {
    /// 提高日志详细程度 (可重复使用，如 -vv)。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// 只输出错误日志。
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量查询)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像 (如 PNG, BMP) 中隐藏文本。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 查看图像可以隐藏多少字节。
    Capacity(CapacityArgs),
}

/// 文本与载荷字节之间的转换方式。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TextEncoding {
    /// 以 UTF-8 字节作为不透明载荷，支持任意文本。
    #[default]
    Utf8,

    /// 每个字符占一个字节，仅支持码点 0-255 的字符。
    Latin1,
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long, required_unless_present = "message", conflicts_with = "message")]
    pub text: Option<PathBuf>,

    /// 直接在命令行上给出要隐藏的文本。
    #[arg(short, long)]
    pub message: Option<String>,

    /// 隐写完成后，保存结果图像的输出路径。
    /// 默认为输入图像同目录下的 `doctored_<文件名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 载荷的分帧方式。
    #[arg(long, value_enum, default_value_t = Framing::default())]
    pub framing: Framing,

    /// 文本的编码方式。
    #[arg(long, value_enum, default_value_t = TextEncoding::default())]
    pub encoding: TextEncoding,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本后，保存文本内容的输出路径。
    /// 默认为图像同目录下的 `recovered_<文件名>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 隐写时使用的分帧方式。
    #[arg(long, value_enum, default_value_t = Framing::default())]
    pub framing: Framing,

    /// 隐写时使用的文本编码方式。
    #[arg(long, value_enum, default_value_t = TextEncoding::default())]
    pub encoding: TextEncoding,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要查询的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 计算可用字节数时采用的分帧方式。
    #[arg(long, value_enum, default_value_t = Framing::default())]
    pub framing: Framing,
}
