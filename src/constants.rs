/// 每个像素参与隐写的颜色通道数 (R, G, B)。
/// 每个通道的最低有效位承载 1 bit，因此每个像素可承载 3 bits。
pub const CHANNELS_PER_PIXEL: u64 = 3;

/// 终止符帧模式下追加在消息末尾的结束标记。
/// 解码时一旦累积输出以该序列结尾，即视为消息结束。
pub const TERMINATOR: &[u8] = b"###END###";

/// 长度前缀帧模式下，用于记录消息字节数的前缀位数。
/// 前缀为 `u32` 大端序，按最高位优先写入。
pub const LENGTH_PREFIX_BITS: u64 = 32;

/// 每个字节展开后的位数。
pub const BITS_PER_BYTE: u64 = 8;

/// 未指定输出路径时，隐写结果图像的文件名前缀。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 未指定输出路径时，恢复文本的文件名前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";
