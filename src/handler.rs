//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::bits::capacity_bits;
use crate::cli::{CapacityArgs, HideArgs, RecoverArgs, TextEncoding};
use crate::constants::{DOCTORED_PREFIX, RECOVERED_PREFIX};
use crate::payload::{Payload, latin1_to_string};
use crate::steganography::{embed, extract, max_payload_len, to_rgb};
use anyhow::{Context, Result};
use colored::Colorize;
use image::{ImageFormat, RgbImage};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本、检查隐写空间是否足够、调用隐写核心函数写入载荷，
/// 最后将结果以 PNG 格式写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径及编码选项的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取或解码输入的图像，或无法读取文本文件。
/// * 文本为空，或在 latin1 模式下含有超出单字节范围的字符。
/// * 图像没有足够的空间来隐藏文本。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_path(&args.image, DOCTORED_PREFIX, "png"));
    ensure_writable(&dest, args.force)?;

    let cover = load_rgb(&args.image)?;

    let text = match (&args.message, &args.text) {
        (Some(message), _) => message.clone(),
        (None, Some(path)) => fs::read_to_string(path).with_context(|| {
            format!(
                "Unable to read text file: {}",
                path.to_string_lossy().red().bold()
            )
        })?,
        (None, None) => anyhow::bail!("No text to hide. Pass either --text or --message."),
    };

    let payload = match args.encoding {
        TextEncoding::Utf8 => Payload::from_utf8(&text),
        TextEncoding::Latin1 => Payload::from_latin1(&text),
    }
    .context("The text cannot be hidden with the selected encoding.")?;

    let required_space = args.framing.required_bits(payload.len());
    let available_space = capacity_bits(cover.width(), cover.height());

    anyhow::ensure!(
        available_space >= required_space,
        "Not enough space in the image to hide the text. \nRequired: {} bits, Available: {} bits",
        required_space.to_string().red().bold(),
        available_space.to_string().green().bold()
    );

    let stego = embed(&cover, &payload, args.framing).with_context(|| {
        format!(
            "Failed to hide the text in {}.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    save_png(&stego, &dest)?;
    info!(
        "hid {} bytes using {:?} framing ({required_space} of {available_space} bits)",
        payload.len(),
        args.framing
    );

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用恢复核心函数读取载荷，
/// 最后将恢复的文本内容写入目标文本文件。
/// 图像中没有隐藏消息时只做提示，不会写入任何文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径及编码选项的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取或解码输入的图像文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let dest = args
        .text
        .clone()
        .unwrap_or_else(|| default_path(&args.image, RECOVERED_PREFIX, "txt"));
    ensure_writable(&dest, args.force)?;

    let stego = load_rgb(&args.image)?;

    let Some(bytes) = extract(&stego, args.framing).with_context(|| {
        format!(
            "Failed to recover the text from '{}'.",
            args.image.to_string_lossy().red().bold()
        )
    })?
    else {
        println!(
            "No hidden message found in: {}",
            args.image.to_string_lossy().yellow().bold()
        );
        return Ok(());
    };

    let text = match args.encoding {
        TextEncoding::Latin1 => latin1_to_string(&bytes),
        TextEncoding::Utf8 => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                warn!("recovered payload is not valid UTF-8, replacing invalid sequences");
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        },
    };

    fs::write(&dest, &text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;
    info!("recovered {} characters using {:?} framing", text.chars().count(), args.framing);

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// 输出图像尺寸、原始比特容量以及在所选分帧方式下可隐藏的最大字节数。
///
/// # Errors
///
/// 无法读取或解码输入的图像文件时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let image = load_rgb(&args.image)?;
    let bits = capacity_bits(image.width(), image.height());
    let max_bytes = max_payload_len(&image, args.framing);

    println!(
        "{}: {}x{} pixels, {} bits, up to {} bytes with {:?} framing",
        args.image.to_string_lossy().bold(),
        image.width(),
        image.height(),
        bits.to_string().green().bold(),
        max_bytes.to_string().green().bold(),
        args.framing
    );
    Ok(())
}

/// 读取并解码图像文件，转换为三通道 RGB 像素网格。
fn load_rgb(path: &Path) -> Result<RgbImage> {
    let image = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    if image.color().has_alpha() {
        info!("discarding the alpha channel of {}", path.display());
    }
    to_rgb(&image).with_context(|| {
        format!(
            "Unsupported image: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

/// 以无损的 PNG 格式保存图像，与目标路径的扩展名无关。
fn save_png(image: &RgbImage, dest: &Path) -> Result<()> {
    let is_png = dest
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !is_png {
        warn!(
            "{} does not end in .png; the image is still written as PNG",
            dest.display()
        );
    }

    image
        .save_with_format(dest, ImageFormat::Png)
        .with_context(|| {
            format!(
                "Unable to write to target image file: {}",
                dest.to_string_lossy().red().bold()
            )
        })
}

/// 在输入文件同目录下生成 `<prefix><文件名>.<ext>` 形式的默认路径。
fn default_path(input: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{prefix}{stem}.{extension}"))
}

/// 目标文件已存在且未指定 `--force` 时拒绝继续。
fn ensure_writable(dest: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !dest.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        dest.to_string_lossy().red().bold()
    );
    Ok(())
}
