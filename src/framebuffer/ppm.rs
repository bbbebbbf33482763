//! Binary PPM (P6) reading/writing, plus export through the `image` crate
//!
//! Header layout:
//!
//! ```text
//! P6\n
//! <width> <height>\n
//! 255\n
//! <width * height * 3 bytes, top row first>
//! ```
//!
//! On read, one `#` comment line directly after the magic line is skipped.

use std::io::{self, Read, Write};
use std::path::Path;

use super::buffer::Framebuffer;
use super::color::Color;

/// Error type for image file reading and writing
#[derive(Debug)]
pub enum ImageFileError {
    IoError(io::Error),
    /// First line does not start with `P6`
    BadMagic(String),
    /// Width or height is not a number
    BadDimensions(String),
    /// File ended inside the header or pixel data
    Truncated,
    /// Requested rectangle has no pixels
    EmptyRegion { ul_x: i32, ul_y: i32, lr_x: i32, lr_y: i32 },
    /// Viewport handle belongs to another framebuffer
    ForeignViewport,
    UnknownFormat(String),
    EncodeError(image::ImageError),
}

impl From<io::Error> for ImageFileError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            ImageFileError::Truncated
        } else {
            ImageFileError::IoError(e)
        }
    }
}

impl From<image::ImageError> for ImageFileError {
    fn from(e: image::ImageError) -> Self {
        ImageFileError::EncodeError(e)
    }
}

impl std::fmt::Display for ImageFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFileError::IoError(e) => write!(f, "IO error: {}", e),
            ImageFileError::BadMagic(m) => write!(f, "Improper PPM magic number: {:?}", m),
            ImageFileError::BadDimensions(d) => write!(f, "Improper PPM dimensions: {:?}", d),
            ImageFileError::Truncated => write!(f, "PPM data ended early"),
            ImageFileError::EmptyRegion { ul_x, ul_y, lr_x, lr_y } => write!(
                f,
                "Empty pixel region ({}, {})-({}, {})",
                ul_x, ul_y, lr_x, lr_y
            ),
            ImageFileError::ForeignViewport => {
                write!(f, "Viewport does not belong to this framebuffer")
            }
            ImageFileError::UnknownFormat(name) => write!(f, "Unknown image format: {}", name),
            ImageFileError::EncodeError(e) => write!(f, "Encode error: {}", e),
        }
    }
}

impl std::error::Error for ImageFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageFileError::IoError(e) => Some(e),
            ImageFileError::EncodeError(e) => Some(e),
            _ => None,
        }
    }
}

fn next_byte<R: Read>(reader: &mut R) -> Result<u8, ImageFileError> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Largest pixel count a decoded image may have (1 GiB of packed pixels)
pub const MAX_PPM_PIXELS: usize = 1 << 28;

fn parse_dimension(bytes: &[u8]) -> Result<usize, ImageFileError> {
    let text = String::from_utf8_lossy(bytes);
    let value: usize = text
        .trim()
        .parse()
        .map_err(|_| ImageFileError::BadDimensions(text.to_string()))?;
    // Viewport rectangles address pixels with i32
    if value > i32::MAX as usize {
        return Err(ImageFileError::BadDimensions(text.into_owned()));
    }
    Ok(value)
}

fn check_image_size(width: usize, height: usize) -> Result<(), ImageFileError> {
    let pixels = width
        .checked_mul(height)
        .filter(|&n| n <= MAX_PPM_PIXELS && n.checked_mul(3).is_some());
    match pixels {
        Some(_) => Ok(()),
        None => Err(ImageFileError::BadDimensions(format!("{} {}", width, height))),
    }
}

/// Read the header and return (width, height). The reader is left at the
/// first pixel byte.
pub fn read_header<R: Read>(reader: &mut R) -> Result<(usize, usize), ImageFileError> {
    let mut magic = Vec::new();
    let mut c = next_byte(reader)?;
    while c != b'\n' {
        magic.push(c);
        c = next_byte(reader)?;
    }
    let magic = String::from_utf8_lossy(&magic);
    if !magic.trim().starts_with("P6") {
        return Err(ImageFileError::BadMagic(magic.into_owned()));
    }

    c = next_byte(reader)?;
    if c == b'#' {
        while c != b'\n' {
            c = next_byte(reader)?;
        }
        c = next_byte(reader)?;
    }

    let mut width = Vec::new();
    while c != b' ' && c != b'\n' {
        width.push(c);
        c = next_byte(reader)?;
    }

    let mut height = Vec::new();
    c = next_byte(reader)?;
    while c != b'\n' {
        height.push(c);
        c = next_byte(reader)?;
    }

    let width = parse_dimension(&width)?;
    let height = parse_dimension(&height)?;
    check_image_size(width, height)?;

    // maxval line (always 255 for our files; not used)
    c = next_byte(reader)?;
    while c != b'\n' {
        c = next_byte(reader)?;
    }

    Ok((width, height))
}

/// Read `width * height` RGB triplets into `fb`, placing the image's
/// upper-left corner at (ul_x, ul_y)
pub fn read_pixels_into<R: Read>(
    reader: &mut R,
    fb: &mut Framebuffer,
    ul_x: i32,
    ul_y: i32,
    width: usize,
    height: usize,
) -> Result<(), ImageFileError> {
    let mut rgb = [0u8; 3];
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            reader.read_exact(&mut rgb)?;
            let color = Color::new(rgb[0], rgb[1], rgb[2]);
            fb.set_pixel(ul_x.saturating_add(x), ul_y.saturating_add(y), color);
        }
    }
    Ok(())
}

/// Size of the inclusive rectangle. Zero-width or zero-height is fine
/// (lr one less than ul); only an inverted rectangle is an error.
fn region_size(ul_x: i32, ul_y: i32, lr_x: i32, lr_y: i32) -> Result<(u32, u32), ImageFileError> {
    let w = lr_x as i64 - ul_x as i64 + 1;
    let h = lr_y as i64 - ul_y as i64 + 1;
    if w < 0 || h < 0 {
        return Err(ImageFileError::EmptyRegion { ul_x, ul_y, lr_x, lr_y });
    }
    Ok((w as u32, h as u32))
}

/// Write the inclusive rectangle (ul_x, ul_y)-(lr_x, lr_y) of `fb` as P6
pub fn write_region<W: Write>(
    fb: &Framebuffer,
    ul_x: i32,
    ul_y: i32,
    lr_x: i32,
    lr_y: i32,
    mut writer: W,
) -> Result<(), ImageFileError> {
    let (w, h) = region_size(ul_x, ul_y, lr_x, lr_y)?;
    write!(writer, "P6\n{} {}\n255\n", w, h)?;

    let mut row = Vec::with_capacity(w as usize * 3);
    for n in 0..h as i32 {
        row.clear();
        for i in 0..w as i32 {
            row.extend_from_slice(&fb.get_pixel(ul_x + i, ul_y + n).to_bytes());
        }
        writer.write_all(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Hand a rectangle of `fb` to the `image` crate's encoder for `format_name`
/// ("png", "jpg"/"jpeg", "bmp")
pub fn encode_region(
    fb: &Framebuffer,
    ul_x: i32,
    ul_y: i32,
    lr_x: i32,
    lr_y: i32,
    path: &Path,
    format_name: &str,
) -> Result<(), ImageFileError> {
    let format = match format_name.to_ascii_lowercase().as_str() {
        "png" => image::ImageFormat::Png,
        "jpg" | "jpeg" => image::ImageFormat::Jpeg,
        "bmp" => image::ImageFormat::Bmp,
        _ => return Err(ImageFileError::UnknownFormat(format_name.to_string())),
    };

    let (w, h) = region_size(ul_x, ul_y, lr_x, lr_y)?;
    let img = image::RgbImage::from_fn(w, h, |i, n| {
        image::Rgb(fb.get_pixel(ul_x + i as i32, ul_y + n as i32).to_bytes())
    });
    img.save_with_format(path, format)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("wire_renderer_{}_{}", std::process::id(), name))
    }

    fn pattern(w: usize, h: usize) -> Framebuffer {
        let mut fb = Framebuffer::new(w, h);
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                let v = ((x | y) % 255) as u8;
                fb.set_pixel(x, y, Color::new(v, v.wrapping_mul(3), 255 - v));
            }
        }
        fb
    }

    #[test]
    fn test_header_layout() {
        let fb = Framebuffer::new(3, 2);
        let mut out = Vec::new();
        fb.write_ppm(&mut out).unwrap();
        assert!(out.starts_with(b"P6\n3 2\n255\n"));
        assert_eq!(out.len(), "P6\n3 2\n255\n".len() + 3 * 2 * 3);
    }

    #[test]
    fn test_round_trip_in_memory() {
        for &(w, h) in &[(0, 0), (0, 3), (1, 1), (7, 3), (16, 9)] {
            let fb = pattern(w, h);
            let mut out = Vec::new();
            fb.write_ppm(&mut out).unwrap();

            let back = Framebuffer::from_ppm_reader(out.as_slice()).unwrap();
            assert_eq!(back.width(), w);
            assert_eq!(back.height(), h);
            assert_eq!(back.pixels(), fb.pixels());
        }
    }

    #[test]
    fn test_round_trip_file() {
        let fb = pattern(20, 12);
        let path = temp_path("round_trip.ppm");
        fb.dump_to_ppm(&path).unwrap();
        let back = Framebuffer::from_ppm_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(back.pixels(), fb.pixels());
    }

    #[test]
    fn test_comment_line_is_skipped() {
        let mut data = b"P6\n# made by hand\n2 1\n255\n".to_vec();
        data.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        let fb = Framebuffer::from_ppm_reader(data.as_slice()).unwrap();
        assert_eq!(fb.get_pixel(0, 0), Color::new(1, 2, 3));
        assert_eq!(fb.get_pixel(1, 0), Color::new(4, 5, 6));
    }

    #[test]
    fn test_bad_magic() {
        let data = b"P3\n1 1\n255\n0 0 0\n";
        let err = Framebuffer::from_ppm_reader(&data[..]).unwrap_err();
        assert!(matches!(err, ImageFileError::BadMagic(_)));
    }

    #[test]
    fn test_bad_dimensions() {
        let data = b"P6\nten 1\n255\n";
        let err = Framebuffer::from_ppm_reader(&data[..]).unwrap_err();
        assert!(matches!(err, ImageFileError::BadDimensions(_)));
    }

    #[test]
    fn test_huge_dimensions_rejected() {
        let data = b"P6\n5000000000 5000000000\n255\n\x01\x02\x03";
        let err = Framebuffer::from_ppm_reader(&data[..]).unwrap_err();
        assert!(matches!(err, ImageFileError::BadDimensions(_)));

        // Fits in i32 per axis but not in memory
        let data = b"P6\n2000000000 2000000000\n255\n";
        let err = Framebuffer::from_ppm_reader(&data[..]).unwrap_err();
        assert!(matches!(err, ImageFileError::BadDimensions(_)));

        let mut fb = Framebuffer::new(4, 4);
        let path = temp_path("huge.ppm");
        std::fs::write(&path, b"P6\n99999999999999999999 1\n255\n").unwrap();
        let err = fb.viewport_from_ppm_file(0, 0, &path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, ImageFileError::BadDimensions(_)));
    }

    #[test]
    fn test_zero_size_header() {
        let mut out = Vec::new();
        Framebuffer::new(0, 0).write_ppm(&mut out).unwrap();
        assert_eq!(out, b"P6\n0 0\n255\n".to_vec());
    }

    #[test]
    fn test_truncated_pixels() {
        let data = b"P6\n2 2\n255\n\x01\x02\x03";
        let err = Framebuffer::from_ppm_reader(&data[..]).unwrap_err();
        assert!(matches!(err, ImageFileError::Truncated));
    }

    #[test]
    fn test_region_and_viewport_dump() {
        let mut fb = pattern(8, 8);
        let vp = fb.new_viewport(2, 3, 4, 2);

        let mut region = Vec::new();
        write_region(&fb, 2, 3, 5, 4, &mut region).unwrap();
        let mut via_vp = Vec::new();
        vp.write_ppm(&fb, &mut via_vp).unwrap();
        assert_eq!(region, via_vp);

        let back = Framebuffer::from_ppm_reader(region.as_slice()).unwrap();
        assert_eq!((back.width(), back.height()), (4, 2));
        assert_eq!(back.get_pixel(0, 0), fb.get_pixel(2, 3));
        assert_eq!(back.get_pixel(3, 1), fb.get_pixel(5, 4));
    }

    #[test]
    fn test_empty_region_rejected() {
        let fb = Framebuffer::new(4, 4);
        let err = write_region(&fb, 3, 3, 1, 1, Vec::new()).unwrap_err();
        assert!(matches!(err, ImageFileError::EmptyRegion { .. }));
    }

    #[test]
    fn test_viewport_from_ppm_file() {
        let src = pattern(3, 2);
        let path = temp_path("vp_source.ppm");
        src.dump_to_ppm(&path).unwrap();

        let mut fb = Framebuffer::with_background(10, 10, Color::ORANGE);
        let vp = fb.viewport_from_ppm_file(5, 5, &path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!((vp.width(&fb), vp.height(&fb)), (3, 2));
        assert_eq!(fb.get_pixel(7, 6), src.get_pixel(2, 1));
        assert_eq!(fb.get_pixel(4, 4), Color::ORANGE);
    }

    #[test]
    fn test_image_export() {
        let fb = pattern(6, 4);
        let path = temp_path("export.png");
        fb.dump_to_image(&path, "png").unwrap();
        let decoded = image::open(&path).unwrap().to_rgb8();
        let _ = std::fs::remove_file(&path);

        assert_eq!(decoded.dimensions(), (6, 4));
        assert_eq!(decoded.get_pixel(5, 3).0, fb.get_pixel(5, 3).to_bytes());
    }

    #[test]
    fn test_unknown_format() {
        let fb = Framebuffer::new(2, 2);
        let err = fb.dump_to_image(temp_path("x.tga"), "tga").unwrap_err();
        assert!(matches!(err, ImageFileError::UnknownFormat(_)));
    }
}
