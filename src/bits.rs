//! # 位平面工具模块
//!
//! 编码器与解码器共用的底层操作：容量计算、最低有效位替换、
//! 字节按最高位优先展开为比特流，以及比特流重新组装为字节。

use crate::constants::{BITS_PER_BYTE, CHANNELS_PER_PIXEL};

/// 计算 `width × height` 图像可承载的总位数。
pub fn capacity_bits(width: u32, height: u32) -> u64 {
    u64::from(width) * u64::from(height) * CHANNELS_PER_PIXEL
}

/// 将 `channel` 的最低有效位替换为 `bit` (只取其最低位)。
#[inline]
pub fn set_lsb(channel: u8, bit: u8) -> u8 {
    (channel & !1) | (bit & 1)
}

/// 按最高位优先的顺序，把字节序列展开为逐位的比特流。
pub fn bits_msb_first(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    bytes
        .iter()
        .flat_map(|&byte| (0..BITS_PER_BYTE as u8).rev().map(move |shift| (byte >> shift) & 1))
}

/// 把比特流每 8 位组装为一个字节 (最高位优先)。
///
/// 迭代是惰性的：只有在请求下一个字节时才会读取对应的 8 个比特。
/// 末尾不足 8 位的残余比特会被丢弃。
pub struct ByteAssembler<I> {
    bits: I,
}

impl<I: Iterator<Item = u8>> ByteAssembler<I> {
    pub fn new(bits: I) -> Self {
        Self { bits }
    }
}

impl<I: Iterator<Item = u8>> Iterator for ByteAssembler<I> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let mut byte = 0u8;
        for _ in 0..BITS_PER_BYTE {
            byte = (byte << 1) | (self.bits.next()? & 1);
        }
        Some(byte)
    }
}
