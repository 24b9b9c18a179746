use std::sync::OnceLock;

use crate::error::{Result, ViewerError};

// ---------------------------------------------------------------------------
// Color value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    fn distance_sq(self, other: Rgba) -> u32 {
        let d = |x: u8, y: u8| {
            let v = x as i32 - y as i32;
            (v * v) as u32
        };
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b) + d(self.a, other.a)
    }
}

// ---------------------------------------------------------------------------
// Byte order
// ---------------------------------------------------------------------------

/// How multi-byte pixels are laid out in memory. Surface memory follows the
/// machine's byte order, so this is probed at runtime, not fixed per format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the running machine. Probed on first use and cached.
    pub fn native() -> ByteOrder {
        static NATIVE: OnceLock<ByteOrder> = OnceLock::new();
        *NATIVE.get_or_init(|| {
            let bytes = 1u16.to_ne_bytes();
            let order = if bytes[0] == 1 { ByteOrder::Little } else { ByteOrder::Big };
            log::debug!("Detected {:?}-endian pixel packing", order);
            order
        })
    }
}

/// Decode one raw pixel into its packed value. The slice length is the pixel
/// byte width; widths other than 1..=4 are not decodable.
pub fn read_pixel(raw: &[u8], order: ByteOrder) -> Option<u32> {
    let value = match (raw, order) {
        (&[b0], _) => b0 as u32,
        (&[b0, b1], ByteOrder::Little) => u16::from_le_bytes([b0, b1]) as u32,
        (&[b0, b1], ByteOrder::Big) => u16::from_be_bytes([b0, b1]) as u32,
        (&[b0, b1, b2], ByteOrder::Little) => b0 as u32 | (b1 as u32) << 8 | (b2 as u32) << 16,
        (&[b0, b1, b2], ByteOrder::Big) => (b0 as u32) << 16 | (b1 as u32) << 8 | b2 as u32,
        (&[b0, b1, b2, b3], ByteOrder::Little) => u32::from_le_bytes([b0, b1, b2, b3]),
        (&[b0, b1, b2, b3], ByteOrder::Big) => u32::from_be_bytes([b0, b1, b2, b3]),
        _ => return None,
    };
    Some(value)
}

/// Encode a packed value back into raw pixel bytes using the same width and
/// byte order rules as [`read_pixel`]. Returns false for unsupported widths.
pub fn write_pixel(raw: &mut [u8], value: u32, order: ByteOrder) -> bool {
    match (raw.len(), order) {
        (1, _) => raw[0] = value as u8,
        (2, ByteOrder::Little) => raw.copy_from_slice(&(value as u16).to_le_bytes()),
        (2, ByteOrder::Big) => raw.copy_from_slice(&(value as u16).to_be_bytes()),
        (3, ByteOrder::Little) => {
            raw[0] = value as u8;
            raw[1] = (value >> 8) as u8;
            raw[2] = (value >> 16) as u8;
        }
        (3, ByteOrder::Big) => {
            raw[0] = (value >> 16) as u8;
            raw[1] = (value >> 8) as u8;
            raw[2] = value as u8;
        }
        (4, ByteOrder::Little) => raw.copy_from_slice(&value.to_le_bytes()),
        (4, ByteOrder::Big) => raw.copy_from_slice(&value.to_be_bytes()),
        _ => return false,
    }
    true
}

// ---------------------------------------------------------------------------
// Pixel formats
// ---------------------------------------------------------------------------

/// One channel of a packed pixel: where it sits (`mask`, `shift`) and how many
/// low bits of the 8-bit channel value it drops (`loss`). Masks of up to eight
/// contiguous bits are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub mask: u32,
    pub shift: u8,
    pub loss: u8,
}

impl Channel {
    pub const NONE: Channel = Channel { mask: 0, shift: 0, loss: 8 };

    pub fn from_mask(mask: u32) -> Self {
        if mask == 0 {
            return Self::NONE;
        }
        let shift = mask.trailing_zeros();
        let bits = (mask >> shift).count_ones().min(8);
        Self {
            mask,
            shift: shift as u8,
            loss: (8 - bits) as u8,
        }
    }

    fn extract(&self, pixel: u32) -> Option<u8> {
        if self.mask == 0 {
            return None;
        }
        let max = (1u32 << (8 - self.loss as u32)) - 1;
        let v = ((pixel & self.mask) >> self.shift).min(max);
        Some((v * 255 / max) as u8)
    }

    fn insert(&self, value: u8) -> u32 {
        if self.mask == 0 {
            return 0;
        }
        (((value as u32) >> self.loss) << self.shift) & self.mask
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    Packed {
        r: Channel,
        g: Channel,
        b: Channel,
        a: Channel,
    },
    /// One byte per pixel indexing into a palette.
    Indexed(Vec<Rgba>),
}

/// Declared color format of a [`PixelBuffer`].
#[derive(Debug, Clone, PartialEq)]
pub struct PixelFormat {
    bytes_per_pixel: usize,
    layout: Layout,
}

impl PixelFormat {
    pub fn from_masks(bytes_per_pixel: usize, r: u32, g: u32, b: u32, a: u32) -> Self {
        Self {
            bytes_per_pixel,
            layout: Layout::Packed {
                r: Channel::from_mask(r),
                g: Channel::from_mask(g),
                b: Channel::from_mask(b),
                a: Channel::from_mask(a),
            },
        }
    }

    pub fn indexed(palette: Vec<Rgba>) -> Self {
        Self {
            bytes_per_pixel: 1,
            layout: Layout::Indexed(palette),
        }
    }

    /// 8-bit grayscale as a 256-entry gray palette.
    pub fn gray8() -> Self {
        Self::indexed((0..=255u8).map(|v| Rgba::rgb(v, v, v)).collect())
    }

    pub fn rgb332() -> Self {
        Self::from_masks(1, 0xE0, 0x1C, 0x03, 0)
    }

    pub fn rgb565() -> Self {
        Self::from_masks(2, 0xF800, 0x07E0, 0x001F, 0)
    }

    pub fn argb8888() -> Self {
        Self::from_masks(4, 0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000)
    }

    /// Bytes R, G, B in memory order.
    pub fn rgb24() -> Self {
        Self::rgb24_for(ByteOrder::native())
    }

    pub fn rgb24_for(order: ByteOrder) -> Self {
        match order {
            ByteOrder::Little => Self::from_masks(3, 0x00_00FF, 0x00_FF00, 0xFF_0000, 0),
            ByteOrder::Big => Self::from_masks(3, 0xFF_0000, 0x00_FF00, 0x00_00FF, 0),
        }
    }

    /// Bytes R, G, B, A in memory order.
    pub fn rgba32() -> Self {
        Self::rgba32_for(ByteOrder::native())
    }

    pub fn rgba32_for(order: ByteOrder) -> Self {
        match order {
            ByteOrder::Little => {
                Self::from_masks(4, 0x0000_00FF, 0x0000_FF00, 0x00FF_0000, 0xFF00_0000)
            }
            ByteOrder::Big => {
                Self::from_masks(4, 0xFF00_0000, 0x00FF_0000, 0x0000_FF00, 0x0000_00FF)
            }
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Split a packed pixel value into 8-bit channels. Formats without an
    /// alpha channel read as opaque.
    pub fn unpack(&self, value: u32) -> Rgba {
        match &self.layout {
            Layout::Packed { r, g, b, a } => Rgba {
                r: r.extract(value).unwrap_or(0),
                g: g.extract(value).unwrap_or(0),
                b: b.extract(value).unwrap_or(0),
                a: a.extract(value).unwrap_or(255),
            },
            Layout::Indexed(palette) => palette.get(value as usize).copied().unwrap_or(Rgba::BLACK),
        }
    }

    /// Map 8-bit channels back to a packed value. Palette formats pick the
    /// closest entry.
    pub fn pack(&self, color: Rgba) -> u32 {
        match &self.layout {
            Layout::Packed { r, g, b, a } => {
                r.insert(color.r) | g.insert(color.g) | b.insert(color.b) | a.insert(color.a)
            }
            Layout::Indexed(palette) => palette
                .iter()
                .enumerate()
                .min_by_key(|(_, entry)| entry.distance_sq(color))
                .map(|(i, _)| i as u32)
                .unwrap_or(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Pixel buffer
// ---------------------------------------------------------------------------

/// A rectangular grid of raw pixels. Rows are `pitch` bytes apart; only the
/// first `width * bytes_per_pixel` bytes of each row hold pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pitch: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let pitch = width as usize * format.bytes_per_pixel();
        Self {
            width,
            height,
            pitch,
            format,
            data: vec![0; pitch * height as usize],
        }
    }

    pub fn from_raw(
        width: u32,
        height: u32,
        pitch: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self> {
        let row_bytes = width as usize * format.bytes_per_pixel();
        if pitch < row_bytes {
            return Err(ViewerError::PitchTooSmall { pitch, row_bytes });
        }
        let needed = match height as usize {
            0 => 0,
            h => (h - 1) * pitch + row_bytes,
        };
        if data.len() < needed {
            return Err(ViewerError::BufferTooSmall {
                needed,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pitch,
            format,
            data,
        })
    }

    /// Tightly packed rows.
    pub fn from_pixels(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let pitch = width as usize * format.bytes_per_pixel();
        Self::from_raw(width, height, pitch, format, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// The pixel bytes of each row, without padding.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        let row_bytes = self.row_bytes();
        self.data
            .chunks(self.pitch.max(1))
            .take(self.height as usize)
            .map(move |row| &row[..row_bytes])
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        let row_bytes = self.row_bytes();
        self.data
            .chunks_mut(self.pitch.max(1))
            .take(self.height as usize)
            .map(move |row| &mut row[..row_bytes])
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.pitch + x as usize * self.format.bytes_per_pixel())
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let start = self.offset(x, y)?;
        let raw = &self.data[start..start + self.format.bytes_per_pixel()];
        read_pixel(raw, ByteOrder::native()).map(|v| self.format.unpack(v))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) -> bool {
        let Some(start) = self.offset(x, y) else {
            return false;
        };
        let value = self.format.pack(color);
        let bpp = self.format.bytes_per_pixel();
        write_pixel(&mut self.data[start..start + bpp], value, ByteOrder::native())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_order_matches_target() {
        let expected = if cfg!(target_endian = "little") {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        };
        assert_eq!(ByteOrder::native(), expected);
        // Cached value is stable.
        assert_eq!(ByteOrder::native(), expected);
    }

    #[test]
    fn three_byte_packing_follows_byte_order() {
        let mut raw = [0u8; 3];
        assert!(write_pixel(&mut raw, 0x112233, ByteOrder::Little));
        assert_eq!(raw, [0x33, 0x22, 0x11]);
        assert_eq!(read_pixel(&raw, ByteOrder::Little), Some(0x112233));

        assert!(write_pixel(&mut raw, 0x112233, ByteOrder::Big));
        assert_eq!(raw, [0x11, 0x22, 0x33]);
        assert_eq!(read_pixel(&raw, ByteOrder::Big), Some(0x112233));
    }

    #[test]
    fn three_byte_channels_survive_encode_decode() {
        let format = PixelFormat::from_masks(3, 0xFF_0000, 0x00_FF00, 0x00_00FF, 0);
        let value = format.pack(Rgba::rgb(0x11, 0x22, 0x33));
        assert_eq!(value, 0x112233);

        let mut raw = [0u8; 3];
        write_pixel(&mut raw, value, ByteOrder::Little);
        assert_eq!(raw[0], 0x33);
        let decoded = read_pixel(&raw, ByteOrder::Little).unwrap();
        assert_eq!(format.unpack(decoded), Rgba::rgb(0x11, 0x22, 0x33));
    }

    #[test]
    fn two_and_four_byte_values_use_machine_words() {
        let mut raw = [0u8; 2];
        write_pixel(&mut raw, 0xABCD, ByteOrder::Little);
        assert_eq!(raw, [0xCD, 0xAB]);
        write_pixel(&mut raw, 0xABCD, ByteOrder::Big);
        assert_eq!(raw, [0xAB, 0xCD]);

        let mut raw = [0u8; 4];
        write_pixel(&mut raw, 0x0102_0304, ByteOrder::Little);
        assert_eq!(raw, [4, 3, 2, 1]);
        assert_eq!(read_pixel(&raw, ByteOrder::Little), Some(0x0102_0304));
        assert_eq!(read_pixel(&raw, ByteOrder::Big), Some(0x0403_0201));
    }

    #[test]
    fn unsupported_widths_are_rejected() {
        let mut raw = [7u8; 5];
        assert_eq!(read_pixel(&raw, ByteOrder::Little), None);
        assert!(!write_pixel(&mut raw, 0, ByteOrder::Little));
        assert_eq!(raw, [7u8; 5]);
        assert_eq!(read_pixel(&[], ByteOrder::Big), None);
    }

    #[test]
    fn channel_from_mask_computes_shift_and_loss() {
        let green = Channel::from_mask(0x07E0);
        assert_eq!(green.shift, 5);
        assert_eq!(green.loss, 2);
        assert_eq!(Channel::from_mask(0), Channel::NONE);
    }

    #[test]
    fn rgb565_expands_full_channels() {
        let format = PixelFormat::rgb565();
        assert_eq!(format.unpack(0xF800), Rgba::rgb(255, 0, 0));
        assert_eq!(format.unpack(0x07E0), Rgba::rgb(0, 255, 0));
        assert_eq!(format.unpack(0x001F), Rgba::rgb(0, 0, 255));
        assert_eq!(format.pack(Rgba::rgb(255, 255, 255)), 0xFFFF);
        // Expanded values map back to the same packed bits.
        for v in 0..=0x1Fu32 {
            let c = format.unpack(v << 11);
            assert_eq!(format.pack(c), v << 11);
        }
    }

    #[test]
    fn rgba32_matches_memory_order() {
        let format = PixelFormat::rgba32();
        let buf = PixelBuffer::from_pixels(1, 1, format, vec![10, 20, 30, 40]).unwrap();
        assert_eq!(buf.pixel(0, 0), Some(Rgba::new(10, 20, 30, 40)));

        let buf = PixelBuffer::from_pixels(1, 1, PixelFormat::rgb24(), vec![1, 2, 3]).unwrap();
        assert_eq!(buf.pixel(0, 0), Some(Rgba::rgb(1, 2, 3)));
    }

    #[test]
    fn gray_palette_packs_to_nearest_entry() {
        let format = PixelFormat::gray8();
        assert_eq!(format.unpack(200), Rgba::rgb(200, 200, 200));
        assert_eq!(format.pack(Rgba::rgb(100, 100, 100)), 100);
        assert_eq!(format.pack(Rgba::rgb(99, 101, 100)), 100);
        assert_eq!(PixelFormat::indexed(vec![]).unpack(3), Rgba::BLACK);
    }

    #[test]
    fn from_raw_validates_geometry() {
        let err = PixelBuffer::from_raw(4, 2, 8, PixelFormat::rgb24(), vec![0; 64]).unwrap_err();
        assert!(matches!(err, ViewerError::PitchTooSmall { pitch: 8, row_bytes: 12 }));

        let err = PixelBuffer::from_raw(4, 2, 16, PixelFormat::rgb24(), vec![0; 20]).unwrap_err();
        assert!(matches!(err, ViewerError::BufferTooSmall { needed: 28, actual: 20 }));

        // Last row does not need trailing padding.
        assert!(PixelBuffer::from_raw(4, 2, 16, PixelFormat::rgb24(), vec![0; 28]).is_ok());
    }

    #[test]
    fn rows_skip_padding() {
        let data = vec![1, 2, 9, 9, 3, 4, 9, 9];
        let buf = PixelBuffer::from_raw(2, 2, 4, PixelFormat::rgb332(), data).unwrap();
        let rows: Vec<&[u8]> = buf.rows().collect();
        assert_eq!(rows, vec![&[1u8, 2][..], &[3u8, 4][..]]);
    }

    #[test]
    fn set_pixel_round_trips_and_rejects_out_of_bounds() {
        let mut buf = PixelBuffer::new(2, 2, PixelFormat::argb8888());
        assert!(buf.set_pixel(1, 1, Rgba::new(1, 2, 3, 4)));
        assert_eq!(buf.pixel(1, 1), Some(Rgba::new(1, 2, 3, 4)));
        assert!(!buf.set_pixel(2, 0, Rgba::BLACK));
        assert_eq!(buf.pixel(0, 2), None);
    }
}
