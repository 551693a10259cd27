//! # 隐写编解码核心模块
//!
//! 在三通道 RGB 像素的最低有效位中写入或读取分帧后的载荷。
//!
//! 像素按行优先顺序扫描 (第 0 行从左到右，然后第 1 行……)，
//! 每个像素内按 R、G、B 顺序各承载 1 bit，字节内最高位优先。
//! 所有函数都是无状态的：借用输入图像，返回新分配的结果。

use crate::bits::{ByteAssembler, bits_msb_first, capacity_bits, set_lsb};
use crate::constants::{BITS_PER_BYTE, LENGTH_PREFIX_BITS, TERMINATOR};
use crate::error::{CodecError, Result};
use crate::payload::{Framing, Payload, latin1_to_string};
use image::{DynamicImage, RgbImage};
use log::{debug, trace};

/// 把任意输入图像转换为 8 位 RGB 像素网格。
///
/// 透明通道被直接丢弃，调色板被展开，高位深采样被缩减为 8 位。
/// 对带透明度的输入而言这是有损且不可逆的转换。
///
/// # Errors
///
/// 图像没有任何像素时返回 [`CodecError::UnsupportedImage`]。
pub fn to_rgb(image: &DynamicImage) -> Result<RgbImage> {
    ensure_pixels(image.width(), image.height())?;
    Ok(image.to_rgb8())
}

fn ensure_pixels(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(CodecError::UnsupportedImage { width, height });
    }
    Ok(())
}

/// 使用默认分帧方式，把单字节文本隐藏到图像中。
///
/// # Errors
///
/// * [`CodecError::InvalidMessage`]：消息为空或含有码点大于 255 的字符。
/// * [`CodecError::CapacityExceeded`]：图像容量不足以容纳整条比特流。
/// * [`CodecError::UnsupportedImage`]：图像没有像素。
pub fn encode(image: &DynamicImage, message: &str) -> Result<RgbImage> {
    let payload = Payload::from_latin1(message)?;
    encode_with(image, &payload, Framing::default())
}

/// 以指定的分帧方式把载荷写入图像，返回尺寸相同的新 RGB 图像。
pub fn encode_with(image: &DynamicImage, payload: &Payload, framing: Framing) -> Result<RgbImage> {
    let cover = to_rgb(image)?;
    embed(&cover, payload, framing)
}

/// 在已是 RGB 形式的封面图像上写入载荷。
///
/// 写入前先检查容量，容量不足时立即失败，不会写入被截断的消息。
/// 比特流耗尽后逐像素提前退出，其后的像素与原图逐字节相同。
pub fn embed(cover: &RgbImage, payload: &Payload, framing: Framing) -> Result<RgbImage> {
    ensure_pixels(cover.width(), cover.height())?;

    let framed = framing.frame(payload)?;
    let required = framed.len() as u64 * BITS_PER_BYTE;
    let available = capacity_bits(cover.width(), cover.height());
    debug!(
        "embedding {} payload bytes ({framing:?}): {required} of {available} bits",
        payload.len()
    );
    if required > available {
        return Err(CodecError::CapacityExceeded { required, available });
    }

    let mut stego = cover.clone();
    let mut bits = bits_msb_first(&framed).peekable();
    let mut touched = 0u64;

    for pixel in stego.pixels_mut() {
        if bits.peek().is_none() {
            break;
        }
        for channel in pixel.0.iter_mut() {
            match bits.next() {
                Some(bit) => *channel = set_lsb(*channel, bit),
                None => break,
            }
        }
        touched += 1;
    }

    trace!("wrote payload into the first {touched} pixels");
    Ok(stego)
}

/// 使用默认分帧方式读取隐藏的单字节文本。
///
/// 返回 `Ok(None)` 表示图像中没有找到隐藏消息，这是正常结果而非错误。
///
/// # Errors
///
/// 图像没有像素时返回 [`CodecError::UnsupportedImage`]。
pub fn decode(image: &DynamicImage) -> Result<Option<String>> {
    Ok(decode_with(image, Framing::default())?.map(|bytes| latin1_to_string(&bytes)))
}

/// 以指定的分帧方式从图像中读取原始载荷字节。
pub fn decode_with(image: &DynamicImage, framing: Framing) -> Result<Option<Vec<u8>>> {
    let stego = to_rgb(image)?;
    extract(&stego, framing)
}

/// 在已是 RGB 形式的图像上读取载荷。
///
/// 读取是惰性的：一旦帧完整就停止，剩余像素不会被访问。
pub fn extract(stego: &RgbImage, framing: Framing) -> Result<Option<Vec<u8>>> {
    ensure_pixels(stego.width(), stego.height())?;

    let capacity = capacity_bits(stego.width(), stego.height());
    // RGB 缓冲区本身就是行优先、R/G/B 交错排列的通道序列。
    let mut bytes = ByteAssembler::new(stego.as_raw().iter().map(|channel| channel & 1));

    let found = match framing {
        Framing::Terminator => scan_for_terminator(&mut bytes),
        Framing::LengthPrefixed => read_length_prefixed(&mut bytes, capacity),
    };

    match &found {
        Some(payload) => debug!("recovered {} payload bytes ({framing:?})", payload.len()),
        None => debug!("no complete {framing:?} frame in {capacity} bits"),
    }
    Ok(found)
}

fn scan_for_terminator(bytes: &mut impl Iterator<Item = u8>) -> Option<Vec<u8>> {
    let mut output = Vec::new();
    for byte in bytes {
        output.push(byte);
        if output.ends_with(TERMINATOR) {
            output.truncate(output.len() - TERMINATOR.len());
            return Some(output);
        }
    }
    None
}

fn read_length_prefixed(bytes: &mut impl Iterator<Item = u8>, capacity: u64) -> Option<Vec<u8>> {
    let mut prefix = [0u8; 4];
    for slot in prefix.iter_mut() {
        *slot = bytes.next()?;
    }
    let len = u32::from_be_bytes(prefix);
    if len == 0 || LENGTH_PREFIX_BITS + u64::from(len) * BITS_PER_BYTE > capacity {
        trace!("length prefix {len} is not plausible for this image");
        return None;
    }

    let payload: Vec<u8> = bytes.take(len as usize).collect();
    (payload.len() == len as usize).then_some(payload)
}

/// 计算图像在指定分帧方式下最多能隐藏多少字节。
pub fn max_payload_len(image: &RgbImage, framing: Framing) -> u64 {
    framing.max_payload_len(capacity_bits(image.width(), image.height()))
}
