//! # lsb_embed 库
//!
//! 本库包含 LSB 文本隐写工具的核心逻辑：位平面工具、载荷分帧、
//! 编解码器，以及命令行前端所用的参数定义与处理函数。

// 声明库包含的所有模块。

pub mod bits;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod logging;
pub mod payload;
pub mod steganography;

pub use error::{CodecError, MessageError};
pub use payload::{Framing, Payload};
pub use steganography::{decode, decode_with, encode, encode_with};
