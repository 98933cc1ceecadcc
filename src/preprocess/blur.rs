use rayon::prelude::*;

use crate::foundation::error::{FxError, FxResult};

/// Box blur of the RGB channels with a `(2 * radius + 1)^2` kernel and clamped borders.
///
/// Runs as two passes over exact integer sums and divides once at the end, so the result is
/// identical to averaging the full square window. Alpha is copied through.
pub fn box_blur_rgba8(src: &[u8], width: u32, height: u32, radius: u32) -> FxResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| FxError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(FxError::render(
            "box_blur_rgba8 expects src matching width*height*4",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let w = width as usize;
    let mut sums = vec![[0u32; 3]; w * height as usize];
    horizontal_pass(src, &mut sums, width, radius);

    let mut out = src.to_vec();
    vertical_pass(&sums, &mut out, width, height, radius);
    Ok(out)
}

fn horizontal_pass(src: &[u8], dst: &mut [[u32; 3]], width: u32, radius: u32) {
    let w = width as i64;
    let r = radius as i64;
    dst.par_chunks_exact_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let base = y * (width as usize) * 4;
            for (x, acc) in row.iter_mut().enumerate() {
                let mut s = [0u32; 3];
                for dx in -r..=r {
                    let sx = (x as i64 + dx).clamp(0, w - 1) as usize;
                    let idx = base + sx * 4;
                    for c in 0..3 {
                        s[c] += u32::from(src[idx + c]);
                    }
                }
                *acc = s;
            }
        });
}

fn vertical_pass(sums: &[[u32; 3]], dst: &mut [u8], width: u32, height: u32, radius: u32) {
    let w = width as usize;
    let h = height as i64;
    let r = radius as i64;
    let size = 2 * radius + 1;
    let n = size * size;
    dst.par_chunks_exact_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w {
                let mut s = [0u32; 3];
                for dy in -r..=r {
                    let sy = (y as i64 + dy).clamp(0, h - 1) as usize;
                    let acc = sums[sy * w + x];
                    for c in 0..3 {
                        s[c] += acc[c];
                    }
                }
                for c in 0..3 {
                    row[x * 4 + c] = ((s[c] + n / 2) / n).min(255) as u8;
                }
            }
        });
}

#[cfg(test)]
#[path = "../../tests/unit/preprocess/blur.rs"]
mod tests;
