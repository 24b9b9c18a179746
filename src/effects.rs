use crate::pixel::{read_pixel, write_pixel, ByteOrder, PixelBuffer, Rgba};

/// Color transforms that can be applied to a whole image. Alpha is never
/// touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Invert,
    CycleChannels,
    SwapGB,
    SwapRB,
    SwapRG,
}

impl EffectKind {
    pub const ALL: [EffectKind; 5] = [
        EffectKind::Invert,
        EffectKind::CycleChannels,
        EffectKind::SwapGB,
        EffectKind::SwapRB,
        EffectKind::SwapRG,
    ];

    pub fn transform(self) -> fn(Rgba) -> Rgba {
        match self {
            EffectKind::Invert => invert,
            EffectKind::CycleChannels => cycle_channels,
            EffectKind::SwapGB => swap_gb,
            EffectKind::SwapRB => swap_rb,
            EffectKind::SwapRG => swap_rg,
        }
    }
}

pub fn invert(c: Rgba) -> Rgba {
    Rgba::new(255 - c.r, 255 - c.g, 255 - c.b, c.a)
}

/// (r, g, b) -> (g, b, r)
pub fn cycle_channels(c: Rgba) -> Rgba {
    Rgba::new(c.g, c.b, c.r, c.a)
}

pub fn swap_gb(c: Rgba) -> Rgba {
    Rgba::new(c.r, c.b, c.g, c.a)
}

pub fn swap_rb(c: Rgba) -> Rgba {
    Rgba::new(c.b, c.g, c.r, c.a)
}

pub fn swap_rg(c: Rgba) -> Rgba {
    Rgba::new(c.g, c.r, c.b, c.a)
}

/// Rewrite every pixel of `buffer` in place through `kind`'s transform.
///
/// Each pixel is decoded from its raw bytes, unpacked with the buffer's
/// format, transformed, repacked and written back with the same byte width
/// and machine byte order. Buffers whose pixel width is not 1..=4 bytes are
/// left unmodified. Returns the number of pixels rewritten.
///
/// Any texture or other cached copy of the buffer is stale afterwards.
pub fn apply_effect(buffer: &mut PixelBuffer, kind: EffectKind) -> usize {
    apply_with_order(buffer, ByteOrder::native(), kind.transform())
}

pub(crate) fn apply_with_order(
    buffer: &mut PixelBuffer,
    order: ByteOrder,
    effect: impl Fn(Rgba) -> Rgba,
) -> usize {
    let bpp = buffer.format().bytes_per_pixel();
    if !(1..=4).contains(&bpp) {
        log::debug!("Skipping effect: unsupported pixel width of {} bytes", bpp);
        return 0;
    }

    let format = buffer.format().clone();
    let mut count = 0;

    // Single-byte pixels take at most 256 values: transform each one once.
    if bpp == 1 {
        let table: Vec<u8> = (0..=255u32)
            .map(|v| format.pack(effect(format.unpack(v))) as u8)
            .collect();
        for row in buffer.rows_mut() {
            for px in row.iter_mut() {
                *px = table[*px as usize];
                count += 1;
            }
        }
        return count;
    }

    for row in buffer.rows_mut() {
        for raw in row.chunks_exact_mut(bpp) {
            let Some(value) = read_pixel(raw, order) else {
                continue;
            };
            let color = effect(format.unpack(value));
            if write_pixel(raw, format.pack(color), order) {
                count += 1;
            }
        }
    }
    count
}
