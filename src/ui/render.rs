use crate::pixel::{read_pixel, ByteOrder, PixelBuffer, Rgba};
use crate::view::Frame;

// Constants
pub const DARK_BACKGROUND: Rgba = Rgba::rgb(0, 0, 0);
pub const LIGHT_BACKGROUND: Rgba = Rgba::rgb(255, 255, 255);

const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

/// Pack RGB into softbuffer u32 format: 0x00RRGGBB.
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Unpack softbuffer u32 into (r, g, b).
fn unpack_rgb(v: u32) -> (u8, u8, u8) {
    ((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

// ---------------------------------------------------------------------------
// Texture
// ---------------------------------------------------------------------------

/// Decoded RGBA copy of a [`PixelBuffer`] that the presenter samples from.
/// It does not track the buffer: rebuild it after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<Rgba>,
}

impl Texture {
    pub fn from_buffer(buffer: &PixelBuffer) -> Self {
        let (width, height) = (buffer.width(), buffer.height());
        let format = buffer.format();
        let bpp = format.bytes_per_pixel().max(1);
        let order = ByteOrder::native();

        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for row in buffer.rows() {
            texels.extend(row.chunks_exact(bpp).map(|raw| {
                read_pixel(raw, order).map_or(TRANSPARENT, |v| format.unpack(v))
            }));
        }
        // Zero-width pixel formats produce no chunks.
        texels.resize(width as usize * height as usize, TRANSPARENT);

        Self {
            width,
            height,
            texels,
        }
    }

    pub fn texel(&self, x: u32, y: u32) -> Rgba {
        self.texels[y as usize * self.width as usize + x as usize]
    }
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

fn blend(dst: u32, src: Rgba) -> u32 {
    let sa = src.a as u32;
    if sa == 255 {
        return rgb(src.r, src.g, src.b);
    }
    let inv = 255 - sa;
    let (dr, dg, db) = unpack_rgb(dst);
    let r = ((src.r as u32 * sa + dr as u32 * inv) / 255) as u8;
    let g = ((src.g as u32 * sa + dg as u32 * inv) / 255) as u8;
    let b = ((src.b as u32 * sa + db as u32 * inv) / 255) as u8;
    rgb(r, g, b)
}

/// Clear `dst` to `background` and draw `texture` into `frame.dest`, rotated
/// clockwise by the view's angle about the rect's center. Flips apply in
/// texture space before rotation. Sampling is nearest-neighbor.
pub fn present(
    dst: &mut [u32],
    dst_w: u32,
    dst_h: u32,
    texture: &Texture,
    frame: &Frame,
    background: Rgba,
) {
    dst.fill(rgb(background.r, background.g, background.b));

    let dest = frame.dest;
    if texture.width == 0 || texture.height == 0 || dest.width <= 0.0 || dest.height <= 0.0 {
        return;
    }

    let view = &frame.view;
    let (sin, cos) = view.rotation.to_radians().sin_cos();
    let (cx, cy) = dest.center();
    let (tex_w, tex_h) = (texture.width as f32, texture.height as f32);

    let bounds = frame.bounds;
    let x_start = bounds.x.floor().max(0.0) as u32;
    let y_start = bounds.y.floor().max(0.0) as u32;
    let x_end = ((bounds.x + bounds.width).ceil().max(0.0) as u32).min(dst_w);
    let y_end = ((bounds.y + bounds.height).ceil().max(0.0) as u32).min(dst_h);

    for dy in y_start..y_end {
        let ry = dy as f32 + 0.5 - cy;
        for dx in x_start..x_end {
            let rx = dx as f32 + 0.5 - cx;

            // Undo the rotation to land in the unrotated dest rect.
            let lx = rx * cos + ry * sin;
            let ly = -rx * sin + ry * cos;
            let u = (lx + dest.width / 2.0) / dest.width;
            let v = (ly + dest.height / 2.0) / dest.height;
            if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                continue;
            }

            let mut tx = ((u * tex_w) as u32).min(texture.width - 1);
            let mut ty = ((v * tex_h) as u32).min(texture.height - 1);
            if view.flip_horizontal {
                tx = texture.width - 1 - tx;
            }
            if view.flip_vertical {
                ty = texture.height - 1 - ty;
            }

            let src = texture.texel(tx, ty);
            if src.a == 0 {
                continue;
            }
            let di = dy as usize * dst_w as usize + dx as usize;
            dst[di] = blend(dst[di], src);
        }
    }
}
