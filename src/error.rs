//! # 错误类型模块
//!
//! 定义隐写编解码核心可能返回的全部错误。
//! “图像中没有隐藏消息” 不属于错误，解码器以 `Ok(None)` 表示。

/// 消息本身不满足编码前置条件的具体原因。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    /// 消息为空。
    #[error("the message is empty")]
    Empty,

    /// 消息中包含无法用单个字节表示的字符。
    #[error("character {ch:?} at position {position} does not fit in a single byte")]
    OutOfRange { ch: char, position: usize },

    /// 消息长度超出 32 位长度前缀所能表示的范围。
    #[error("payload of {len} bytes is too long for a 32-bit length prefix")]
    TooLong { len: usize },
}

/// 隐写编解码过程中可能出现的错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// 消息为空或包含非单字节字符。
    #[error("invalid message: {0}")]
    InvalidMessage(#[from] MessageError),

    /// 比特流长度超过图像容量。
    #[error("the message needs {required} bits but the image only holds {available} bits")]
    CapacityExceeded { required: u64, available: u64 },

    /// 图像无法转换为可用的三通道像素网格。
    #[error("unsupported image: {width}x{height} has no pixels to carry data")]
    UnsupportedImage { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, CodecError>;
