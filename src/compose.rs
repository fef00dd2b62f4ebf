use std::path::Path;

use image::{Rgba, RgbaImage, imageops};

use crate::error::{PhotoreelError, PhotoreelResult};

/// Fraction of the target frame an overlay may occupy on each axis.
const FRAME_FILL: f32 = 0.7;
/// Border thickness divisor: border = min(w, h) / 15.
const BORDER_DIVISOR: u32 = 15;
/// Outer dark margin divisor: margin = border / 5.
const OUTER_MARGIN_DIVISOR: u32 = 5;

const DARK_GRAY: Rgba<u8> = Rgba([64, 64, 64, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Decode `path` and compose it into a bordered overlay sized for a
/// `frame_width` x `frame_height` base frame.
///
/// Decode failure yields [`PhotoreelError::Decode`]; the caller skips the
/// photo's animation and reports the error, it is never fatal to the pass.
pub fn load_overlay(path: &Path, frame_width: u32, frame_height: u32) -> PhotoreelResult<RgbaImage> {
    let img = image::open(path).map_err(|source| PhotoreelError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(compose_overlay(&img.to_rgba8(), frame_width, frame_height))
}

/// Scale `source` to fit within 70% of the frame (aspect preserved) and wrap
/// it in a dark-gray/white double border. The result is self-contained and
/// strictly smaller than the frame.
pub fn compose_overlay(source: &RgbaImage, frame_width: u32, frame_height: u32) -> RgbaImage {
    let max_w = ((frame_width as f32) * FRAME_FILL).round() as u32;
    let max_h = ((frame_height as f32) * FRAME_FILL).round() as u32;
    let scaled = fit_within(source, max_w.max(1), max_h.max(1));
    add_border(&scaled)
}

/// Fit-to-width, then fit-to-height if still too tall. High-quality resampling.
fn fit_within(source: &RgbaImage, max_w: u32, max_h: u32) -> RgbaImage {
    let (w, h) = source.dimensions();
    if w == 0 || h == 0 {
        return source.clone();
    }

    let mut target_w = max_w;
    let mut target_h = ((u64::from(target_w) * u64::from(h)) / u64::from(w)).max(1) as u32;
    if target_h > max_h {
        target_h = max_h;
        target_w = ((u64::from(target_h) * u64::from(w)) / u64::from(h)).max(1) as u32;
    }
    imageops::resize(source, target_w, target_h, imageops::FilterType::Lanczos3)
}

fn add_border(scaled: &RgbaImage) -> RgbaImage {
    let (w, h) = scaled.dimensions();
    let border = w.min(h) / BORDER_DIVISOR;
    let outer = border / OUTER_MARGIN_DIVISOR;

    let mut out = RgbaImage::from_pixel(w + 2 * border, h + 2 * border, DARK_GRAY);
    let (out_w, out_h) = out.dimensions();
    fill_rect(
        &mut out,
        outer,
        outer,
        out_w - 2 * outer,
        out_h - 2 * outer,
        WHITE,
    );
    imageops::overlay(&mut out, scaled, i64::from(border), i64::from(border));
    out
}

fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    for yy in y..y + h {
        for xx in x..x + w {
            img.put_pixel(xx, yy, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(rgba))
    }

    #[test]
    fn overlay_fits_within_frame_budget_plus_border() {
        let source = flat(4_000, 3_000, [10, 20, 30, 255]);
        let overlay = compose_overlay(&source, 1_000, 1_000);

        // scaled to 700x525, border = 525/15 = 35
        assert_eq!(overlay.dimensions(), (700 + 70, 525 + 70));
    }

    #[test]
    fn tall_sources_fit_to_height() {
        let source = flat(1_000, 4_000, [0, 0, 0, 255]);
        let overlay = compose_overlay(&source, 1_000, 1_000);

        // fit-to-width gives 700x2800, too tall; fit-to-height gives 175x700
        let border = 175 / BORDER_DIVISOR;
        assert_eq!(overlay.dimensions(), (175 + 2 * border, 700 + 2 * border));
    }

    #[test]
    fn border_layers_are_dark_gray_then_white_then_image() {
        // 150x150 at 70% of 215x215 ≈ 150, border 10, outer margin 2
        let source = flat(150, 150, [200, 0, 0, 255]);
        let scaled = fit_within(&source, 150, 150);
        let overlay = add_border(&scaled);

        assert_eq!(overlay.dimensions(), (170, 170));
        assert_eq!(*overlay.get_pixel(0, 0), DARK_GRAY);
        assert_eq!(*overlay.get_pixel(5, 5), WHITE);
        assert_eq!(*overlay.get_pixel(85, 85), Rgba([200, 0, 0, 255]));
    }

    #[test]
    fn load_overlay_reports_decode_failures() {
        let tmp = std::env::temp_dir().join(format!(
            "photoreel_bad_{}_{}.png",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::write(&tmp, b"not a png").unwrap();

        let err = load_overlay(&tmp, 100, 100).unwrap_err();
        assert!(matches!(err, PhotoreelError::Decode { .. }));
        assert!(err.to_string().contains("photoreel_bad_"));

        std::fs::remove_file(&tmp).ok();
    }
}
