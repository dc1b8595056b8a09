//! I/O helpers used by the CLI boundary.
//!
//! - `load_rgba_image`: read a PNG/JPEG/etc. into an owned RGBA byte buffer.
//! - `save_rgb_png` / `save_rgba_png`: write sampler output bitmaps.
//! - `save_heatmap_png`: write the quantized energy map as grayscale.
//! - `write_json_file`: pretty-print a serializable report to disk.
//!
//! The pipeline core never touches the filesystem; decoding and encoding
//! stay here, next to the binary.
use super::u8::ImageU8;
use image::{GrayImage, ImageBuffer, Rgb, Rgba};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned RGBA buffer with its dimensions, as decoded from disk.
#[derive(Clone, Debug)]
pub struct RgbaImageOwned {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

/// Load an image from disk and convert to 8-bit RGBA.
pub fn load_rgba_image(path: &Path) -> Result<RgbaImageOwned, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgba8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.into_raw();
    Ok(RgbaImageOwned {
        width,
        height,
        data,
    })
}

/// Save a packed RGB buffer to a PNG.
pub fn save_rgb_png(width: usize, height: usize, rgb: &[u8], path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width as u32, height as u32, rgb.to_vec())
            .ok_or_else(|| "RGB buffer does not match the declared dimensions".to_string())?;
    buffer
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a packed RGBA buffer to a PNG.
pub fn save_rgba_png(width: usize, height: usize, rgba: &[u8], path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width as u32, height as u32, rgba.to_vec())
            .ok_or_else(|| "RGBA buffer does not match the declared dimensions".to_string())?;
    buffer
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save an 8-bit heatmap to a grayscale PNG.
pub fn save_heatmap_png(heatmap: &ImageU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let buffer = GrayImage::from_raw(heatmap.w as u32, heatmap.h as u32, heatmap.data.clone())
        .ok_or_else(|| "heatmap buffer does not match the declared dimensions".to_string())?;
    buffer
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
