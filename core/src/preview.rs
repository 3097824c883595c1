use palette::{Gradient, LinSrgb};

use crate::heightfield::Heightfield;

// Same water-to-snow ramp the fragment shader uses
pub fn elevation_gradient() -> Gradient<LinSrgb> {
    Gradient::with_domain(vec![
        (0.00, LinSrgb::new(0.05, 0.20, 0.55)), // water
        (0.30, LinSrgb::new(0.80, 0.75, 0.50)), // sand
        (0.50, LinSrgb::new(0.15, 0.55, 0.20)), // grass
        (0.75, LinSrgb::new(0.45, 0.40, 0.35)), // rock
        (1.00, LinSrgb::new(0.95, 0.95, 0.97)), // snow
    ])
}

// RGB8 buffer, row-major, one pixel per sample
pub fn colorize(heightfield: &Heightfield) -> Vec<u8> {
    let gradient = elevation_gradient();
    let mut buf = Vec::with_capacity(heightfield.samples().len() * 3);
    for &h in heightfield.samples() {
        let col: LinSrgb = gradient.get(h);
        let rgb = col.into_format::<u8>();
        buf.extend_from_slice(&[rgb.red, rgb.green, rgb.blue]);
    }
    buf
}

// Nearest-neighbour downsample so the longer side is at most `max_side`.
// Returns (width, height, RGB8 pixels).
pub fn thumbnail(heightfield: &Heightfield, max_side: u32) -> (u32, u32, Vec<u8>) {
    let (w, h) = (heightfield.width(), heightfield.height());
    let longest = w.max(h);
    if longest <= max_side.max(1) {
        return (w, h, colorize(heightfield));
    }
    let scale = longest as f32 / max_side.max(1) as f32;
    let tw = ((w as f32 / scale) as u32).max(1);
    let th = ((h as f32 / scale) as u32).max(1);

    let gradient = elevation_gradient();
    let mut buf = Vec::with_capacity((tw * th * 3) as usize);
    for ty in 0..th {
        let sy = ((ty as f32 * scale) as u32).min(h - 1);
        for tx in 0..tw {
            let sx = ((tx as f32 * scale) as u32).min(w - 1);
            let rgb = gradient.get(heightfield.get(sx, sy)).into_format::<u8>();
            buf.extend_from_slice(&[rgb.red, rgb.green, rgb.blue]);
        }
    }
    (tw, th, buf)
}
