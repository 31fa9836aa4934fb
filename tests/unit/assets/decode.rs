use std::io::Cursor;

use super::*;

#[test]
fn decode_png_dimensions_and_pixels() {
    let img = image::RgbaImage::from_raw(2, 1, vec![100, 50, 200, 255, 1, 2, 3, 128]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let frame = decode_frame(&buf).unwrap();
    assert_eq!(frame.width, 2);
    assert_eq!(frame.height, 1);
    assert_eq!(frame.pixels.get_pixel(0, 0).0, [100, 50, 200, 255]);
    assert_eq!(frame.pixels.get_pixel(1, 0).0, [1, 2, 3, 128]);
}

#[test]
fn decode_garbage_is_an_error() {
    assert!(decode_frame(b"not an image").is_err());
    assert!(decode_frame(&[]).is_err());
}
