//! # 载荷与帧格式模块
//!
//! [`Payload`] 是真正写入图像的非空字节序列；[`Framing`] 决定解码器
//! 如何在比特流中找到载荷的结尾。

use crate::constants::{BITS_PER_BYTE, LENGTH_PREFIX_BITS, TERMINATOR};
use crate::error::{MessageError, Result};

/// 待隐藏的非空字节序列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(Vec<u8>);

impl Payload {
    /// 以单字节 (Latin-1) 方式序列化文本，每个字符对应一个字节。
    ///
    /// # Errors
    ///
    /// * 文本为空时返回 [`MessageError::Empty`]。
    /// * 存在码点大于 255 的字符时返回 [`MessageError::OutOfRange`]，不会截断。
    pub fn from_latin1(text: &str) -> Result<Self> {
        let bytes = text
            .chars()
            .enumerate()
            .map(|(position, ch)| {
                u8::try_from(u32::from(ch)).map_err(|_| MessageError::OutOfRange { ch, position })
            })
            .collect::<std::result::Result<Vec<u8>, _>>()?;
        Self::from_bytes(bytes)
    }

    /// 以 UTF-8 字节作为不透明载荷，适用于超出单字节范围的文本。
    pub fn from_utf8(text: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes().to_vec())
    }

    /// 直接使用任意非空字节序列作为载荷。
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(MessageError::Empty.into());
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 载荷在构造时已保证非空。
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 把字节逐个映射为 Latin-1 字符。该过程不会失败。
pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// 隐藏载荷在比特流中的分帧方式。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Framing {
    /// 先写入 32 位大端序的载荷字节数，再写入载荷本身。
    #[default]
    #[value(name = "length")]
    LengthPrefixed,

    /// 在载荷末尾追加 `###END###`，解码到第一次出现为止。
    /// 与旧版工具生成的图像兼容，但载荷内含该序列时会被提前截断。
    Terminator,
}

impl Framing {
    /// 计算载荷经此分帧后的比特流长度。
    pub fn required_bits(self, payload_len: usize) -> u64 {
        let payload_bits = payload_len as u64 * BITS_PER_BYTE;
        match self {
            Framing::LengthPrefixed => LENGTH_PREFIX_BITS + payload_bits,
            Framing::Terminator => payload_bits + TERMINATOR.len() as u64 * BITS_PER_BYTE,
        }
    }

    /// 在给定容量 (位) 内可容纳的最大载荷字节数。
    pub fn max_payload_len(self, capacity_bits: u64) -> u64 {
        let overhead = self.required_bits(0);
        let max = capacity_bits.saturating_sub(overhead) / BITS_PER_BYTE;
        match self {
            Framing::LengthPrefixed => max.min(u64::from(u32::MAX)),
            Framing::Terminator => max,
        }
    }

    /// 生成完整的帧字节序列。
    pub fn frame(self, payload: &Payload) -> Result<Vec<u8>> {
        let bytes = payload.as_bytes();
        let mut framed = Vec::with_capacity(bytes.len() + TERMINATOR.len().max(4));
        match self {
            Framing::LengthPrefixed => {
                let len = u32::try_from(bytes.len())
                    .map_err(|_| MessageError::TooLong { len: bytes.len() })?;
                framed.extend_from_slice(&len.to_be_bytes());
                framed.extend_from_slice(bytes);
            }
            Framing::Terminator => {
                framed.extend_from_slice(bytes);
                framed.extend_from_slice(TERMINATOR);
            }
        }
        Ok(framed)
    }
}
