use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use lsb_embed::{
    CodecError, Framing, MessageError, Payload, decode, decode_with, encode, encode_with,
};
use rand::{Rng, RngCore};

/// 创建一个带有随机像素的 RGB 测试图像
fn random_image(width: u32, height: u32) -> DynamicImage {
    let mut raw = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw);
    let buffer = RgbImage::from_raw(width, height, raw).expect("buffer size matches dimensions");
    DynamicImage::ImageRgb8(buffer)
}

fn solid(width: u32, height: u32, value: u8) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([value; 3])))
}

/// 把单字节文本用指定分帧写入并读回
fn round_trip(image: &DynamicImage, message: &str, framing: Framing) -> Option<String> {
    let payload = Payload::from_latin1(message).expect("message is single-byte safe");
    let stego = encode_with(image, &payload, framing).expect("message fits");
    decode_with(&DynamicImage::ImageRgb8(stego), framing)
        .expect("image has pixels")
        .map(|bytes| bytes.into_iter().map(char::from).collect())
}

/// 验证默认分帧的往返编解码
#[test]
fn round_trip_with_default_framing() {
    let cover = random_image(64, 48);
    let message = "The quick brown fox jumps over the lazy dog. ©®±";
    let stego = encode(&cover, message).expect("message fits");
    assert_eq!(stego.dimensions(), (64, 48));
    assert_eq!(
        decode(&DynamicImage::ImageRgb8(stego)).unwrap().as_deref(),
        Some(message)
    );
}

/// 验证两种分帧方式在随机消息上的往返编解码
#[test]
fn round_trip_random_messages_under_both_framings() {
    let mut rng = rand::rng();
    let cover = random_image(50, 40);
    for framing in [Framing::LengthPrefixed, Framing::Terminator] {
        for _ in 0..20 {
            let len = rng.random_range(1..=200);
            // 避开 '#'，防止随机消息本身包含终止符
            let message: String = (0..len)
                .map(|_| char::from(rng.random_range(0u8..=255)))
                .map(|ch| if ch == '#' { '_' } else { ch })
                .collect();
            assert_eq!(
                round_trip(&cover, &message, framing).as_deref(),
                Some(message.as_str()),
                "round trip failed for {framing:?}"
            );
        }
    }
}

/// 验证具体场景：2x2 全黑图像容量不足，10x10 全白图像可以往返
#[test]
fn concrete_capacity_scenarios() {
    let tiny = solid(2, 2, 0);
    for framing in [Framing::LengthPrefixed, Framing::Terminator] {
        let payload = Payload::from_latin1("A").unwrap();
        let err = encode_with(&tiny, &payload, framing).unwrap_err();
        assert!(matches!(err, CodecError::CapacityExceeded { available: 12, .. }));
    }
    let payload = Payload::from_latin1("A").unwrap();
    assert_eq!(
        encode_with(&tiny, &payload, Framing::Terminator).unwrap_err(),
        CodecError::CapacityExceeded { required: 80, available: 12 }
    );

    let white = solid(10, 10, 255);
    assert_eq!(round_trip(&white, "A", Framing::Terminator).as_deref(), Some("A"));
    assert_eq!(round_trip(&white, "A", Framing::LengthPrefixed).as_deref(), Some("A"));
}

/// 验证容量边界：恰好填满成功，多一位失败
#[test]
fn capacity_boundary_is_exact() {
    // 8x10x3 = 240 bits = 9 bytes of terminator + 21 bytes of message
    let cover = random_image(8, 10);
    let exact = "x".repeat(21);
    assert_eq!(round_trip(&cover, &exact, Framing::Terminator), Some(exact));

    let over = Payload::from_latin1(&"x".repeat(22)).unwrap();
    assert_eq!(
        encode_with(&cover, &over, Framing::Terminator).unwrap_err(),
        CodecError::CapacityExceeded { required: 248, available: 240 }
    );

    // 7x8x3 = 168 bits = 32-bit prefix + 17 bytes
    let cover = random_image(7, 8);
    let exact = "y".repeat(17);
    assert_eq!(round_trip(&cover, &exact, Framing::LengthPrefixed), Some(exact));

    let over = Payload::from_latin1(&"y".repeat(18)).unwrap();
    assert!(matches!(
        encode_with(&cover, &over, Framing::LengthPrefixed),
        Err(CodecError::CapacityExceeded { required: 176, available: 168 })
    ));
}

/// 验证只改动最低有效位，且所需像素之后的像素保持不变
#[test]
fn only_needed_pixels_change_and_only_by_one() {
    let cover = random_image(30, 30);
    let source = cover.to_rgb8();
    let payload = Payload::from_latin1("hidden in plain sight").unwrap();

    for framing in [Framing::LengthPrefixed, Framing::Terminator] {
        let stego = encode_with(&cover, &payload, framing).unwrap();
        let bits = framing.required_bits(payload.len()) as usize;
        let pixels_needed = bits.div_ceil(3);

        for (index, (before, after)) in source.pixels().zip(stego.pixels()).enumerate() {
            for (b, a) in before.0.iter().zip(after.0.iter()) {
                assert!(b.abs_diff(*a) <= 1, "channel changed by more than one");
            }
            if index >= pixels_needed {
                assert_eq!(before, after, "pixel {index} should be untouched");
            }
        }
    }
}

/// 验证终止符优先：消息内的第一个终止符截断结果，长度前缀则不受影响
#[test]
fn first_terminator_wins_in_legacy_framing() {
    let cover = random_image(40, 40);
    let message = "before###END###after";
    assert_eq!(
        round_trip(&cover, message, Framing::Terminator).as_deref(),
        Some("before")
    );
    assert_eq!(
        round_trip(&cover, message, Framing::LengthPrefixed).as_deref(),
        Some(message)
    );
}

/// 验证未隐写的图像返回“未找到”而不是错误
#[test]
fn plain_images_report_no_message() {
    for value in [0u8, 255] {
        let image = solid(25, 25, value);
        assert_eq!(decode(&image).unwrap(), None);
        assert_eq!(decode_with(&image, Framing::Terminator).unwrap(), None);
    }
    let noise = random_image(20, 20);
    assert_eq!(decode_with(&noise, Framing::Terminator).unwrap(), None);
}

/// 验证消息与图像的前置条件检查
#[test]
fn invalid_inputs_are_rejected() {
    let cover = solid(10, 10, 128);
    assert_eq!(
        encode(&cover, "").unwrap_err(),
        CodecError::InvalidMessage(MessageError::Empty)
    );
    assert!(matches!(
        encode(&cover, "emoji 🙂"),
        Err(CodecError::InvalidMessage(MessageError::OutOfRange { ch: '🙂', position: 6 }))
    ));

    let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 5));
    assert_eq!(
        encode(&empty, "A").unwrap_err(),
        CodecError::UnsupportedImage { width: 0, height: 5 }
    );
    assert!(matches!(
        decode(&empty),
        Err(CodecError::UnsupportedImage { .. })
    ));
}

/// 验证带透明通道的输入被转换为 RGB 输出且仍可解码
#[test]
fn alpha_is_discarded_on_encode() {
    let rgba = RgbaImage::from_pixel(12, 12, Rgba([10, 20, 30, 0]));
    let stego = encode(&DynamicImage::ImageRgba8(rgba), "alpha").unwrap();
    assert_eq!(stego.dimensions(), (12, 12));
    assert_eq!(
        decode(&DynamicImage::ImageRgb8(stego)).unwrap().as_deref(),
        Some("alpha")
    );
}

/// 验证不同线程上的独立编解码互不影响
#[test]
fn independent_images_encode_in_parallel() {
    let messages = ["first", "second", "third", "fourth"];
    std::thread::scope(|scope| {
        let handles: Vec<_> = messages
            .iter()
            .map(|message| {
                scope.spawn(move || {
                    let cover = random_image(32, 32);
                    let stego = encode(&cover, message).unwrap();
                    decode(&DynamicImage::ImageRgb8(stego)).unwrap()
                })
            })
            .collect();
        for (handle, message) in handles.into_iter().zip(messages) {
            assert_eq!(handle.join().unwrap().as_deref(), Some(message));
        }
    });
}
