use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use base64::Engine;
use image::{codecs::png::PngEncoder, ColorType, ImageEncoder};
use tracing::info;

use crate::plot::{Bounds, Color, Figure, FigureSettings, Renderer};

const MARGIN: u32 = 48;
const GRID_LINES: u32 = 5;
const LEGEND_SWATCH: u32 = 12;
/// Largest raster `rasterize` will allocate (4096 x 4096).
const MAX_PIXELS: usize = 4096 * 4096;

const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };
const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
const GRID: Color = Color { r: 0.88, g: 0.88, b: 0.88 };

/// Encode an RGB image (values in [0, 1]) as PNG bytes.
pub fn encode_rgb_png(width: u32, height: u32, pixels: &[f32]) -> Result<Vec<u8>> {
    let expected_len = rgb_len(width, height)?;
    if pixels.len() != expected_len {
        anyhow::bail!(
            "pixel buffer length {} does not match RGB image size {}x{}",
            pixels.len(),
            width,
            height
        );
    }

    let mut encoded = Vec::with_capacity(expected_len);
    for chunk in pixels.chunks_exact(3) {
        encoded.push((chunk[0].clamp(0.0, 1.0) * 255.0).round() as u8);
        encoded.push((chunk[1].clamp(0.0, 1.0) * 255.0).round() as u8);
        encoded.push((chunk[2].clamp(0.0, 1.0) * 255.0).round() as u8);
    }

    let mut buffer = Vec::new();
    let encoder = PngEncoder::new(&mut buffer);
    encoder
        .write_image(&encoded, width, height, ColorType::Rgb8)
        .context("failed to encode RGB PNG data")?;
    Ok(buffer)
}

/// Number of channel values in a `width` x `height` RGB buffer.
fn rgb_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| anyhow::anyhow!("RGB image size {}x{} overflows a pixel buffer", width, height))
}

/// Wrap PNG bytes in a data URL for embedding in Markdown.
pub fn png_data_url(png: &[u8]) -> String {
    let base64 = base64::engine::general_purpose::STANDARD.encode(png);
    format!("data:image/png;base64,{base64}")
}

/// RGB pixel canvas with channels in [0, 1], row-major.
struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<f32>,
}

impl Canvas {
    fn new(width: u32, height: u32, len: usize) -> Self {
        let pixels = [WHITE.r, WHITE.g, WHITE.b].repeat(len / 3);
        Self {
            width,
            height,
            pixels,
        }
    }

    fn set(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[offset] = color.r;
        self.pixels[offset + 1] = color.g;
        self.pixels[offset + 2] = color.b;
    }

    fn hline(&mut self, x0: u32, x1: u32, y: u32, color: Color) {
        for x in x0..=x1 {
            self.set(x as i64, y as i64, color);
        }
    }

    fn vline(&mut self, x: u32, y0: u32, y1: u32, color: Color) {
        for y in y0..=y1 {
            self.set(x as i64, y as i64, color);
        }
    }

    fn disc(&mut self, cx: i64, cy: i64, radius: i64, color: Color) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let distance = dx * dx + dy * dy;
                if distance <= radius * radius {
                    let edge = distance > (radius - 1).max(0).pow(2);
                    self.set(cx + dx, cy + dy, if edge { BLACK } else { color });
                }
            }
        }
    }

    fn square(&mut self, x: u32, y: u32, size: u32, color: Color) {
        for dy in 0..size {
            for dx in 0..size {
                self.set((x + dx) as i64, (y + dy) as i64, color);
            }
        }
    }
}

/// Draw a scatter figure: grid, axes, one disc per point, and a colour
/// legend stacked in the top-right corner.
pub fn rasterize(figure: &Figure, settings: &FigureSettings) -> Result<Vec<f32>> {
    let (width, height) = (settings.width, settings.height);
    if width <= 2 * MARGIN || height <= 2 * MARGIN {
        anyhow::bail!(
            "figure size {}x{} leaves no plot area inside a {}px margin",
            width,
            height,
            MARGIN
        );
    }

    let len = rgb_len(width, height)?;
    if len / 3 > MAX_PIXELS {
        anyhow::bail!(
            "figure size {}x{} exceeds the {} pixel limit",
            width,
            height,
            MAX_PIXELS
        );
    }

    let mut canvas = Canvas::new(width, height, len);
    let (left, right) = (MARGIN, width - MARGIN);
    let (top, bottom) = (MARGIN, height - MARGIN);

    for step in 0..=GRID_LINES {
        let x = left + (right - left) * step / GRID_LINES;
        let y = top + (bottom - top) * step / GRID_LINES;
        canvas.vline(x, top, bottom, GRID);
        canvas.hline(left, right, y, GRID);
    }
    canvas.hline(left, right, bottom, BLACK);
    canvas.vline(left, top, bottom, BLACK);

    if let Some(bounds) = figure.bounds() {
        let radius = settings.marker_radius as i64;
        for series in &figure.series {
            for point in &series.points {
                let (px, py) = project(&bounds, point.x, point.y, left, right, top, bottom);
                canvas.disc(px, py, radius, series.color);
            }
        }
    }

    for (index, series) in figure.series.iter().enumerate() {
        let y = top + 4 + index as u32 * (LEGEND_SWATCH + 4);
        if y + LEGEND_SWATCH >= bottom {
            break;
        }
        canvas.square(right - LEGEND_SWATCH - 4, y, LEGEND_SWATCH, series.color);
    }

    Ok(canvas.pixels)
}

fn project(
    bounds: &Bounds,
    x: f64,
    y: f64,
    left: u32,
    right: u32,
    top: u32,
    bottom: u32,
) -> (i64, i64) {
    let fx = (x - bounds.x_min) / (bounds.x_max - bounds.x_min);
    let fy = (y - bounds.y_min) / (bounds.y_max - bounds.y_min);
    let px = left as f64 + fx * (right - left) as f64;
    let py = bottom as f64 - fy * (bottom - top) as f64;
    (px.round() as i64, py.round() as i64)
}

/// PNG output of a rendered figure.
#[derive(Clone, Debug)]
pub struct RenderedFigure {
    pub png: Vec<u8>,
    pub path: Option<PathBuf>,
}

impl RenderedFigure {
    pub fn data_url(&self) -> String {
        png_data_url(&self.png)
    }
}

/// Rasterises figures to PNG, optionally writing each one to disk.
#[derive(Clone, Debug)]
pub struct PngRenderer {
    settings: FigureSettings,
    output: Option<PathBuf>,
}

impl PngRenderer {
    pub fn new(settings: FigureSettings) -> Self {
        Self {
            settings,
            output: None,
        }
    }

    pub fn writing_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }
}

impl Renderer for PngRenderer {
    type Output = RenderedFigure;

    fn render(&mut self, figure: &Figure) -> Result<RenderedFigure> {
        let pixels = rasterize(figure, &self.settings)?;
        let png = encode_rgb_png(self.settings.width, self.settings.height, &pixels)?;

        if let Some(path) = &self.output {
            write_png(path, &png)?;
            info!(path = %path.display(), series = figure.series.len(), "wrote tradeoff figure");
        }

        Ok(RenderedFigure {
            png,
            path: self.output.clone(),
        })
    }
}

fn write_png(path: &Path, png: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, png).with_context(|| format!("failed to write figure to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::plot::TradeoffPlotter;
    use crate::results::{LearnerId, TradeoffPoint};

    fn small_settings() -> FigureSettings {
        FigureSettings {
            width: 160,
            height: 120,
            marker_radius: 3,
        }
    }

    #[test]
    fn rejects_mismatched_buffers() {
        assert!(encode_rgb_png(2, 2, &[0.0; 5]).is_err());
    }

    #[test]
    fn renders_png_with_signature() {
        let clusters = BTreeMap::from([
            (LearnerId::new("0"), vec![TradeoffPoint { x: 0.1, y: 60.0 }]),
            (LearnerId::new("1"), vec![TradeoffPoint { x: 0.4, y: 70.0 }]),
        ]);
        let mut renderer = PngRenderer::new(small_settings());
        let rendered = TradeoffPlotter::default().plot(&clusters, &mut renderer).unwrap();
        assert_eq!(&rendered.png[..8], b"\x89PNG\r\n\x1a\n");
        assert!(rendered.data_url().starts_with("data:image/png;base64,"));
        assert!(rendered.path.is_none());
    }

    #[test]
    fn markers_are_painted_in_series_colour() {
        let clusters = BTreeMap::from([(
            LearnerId::new("0"),
            vec![
                TradeoffPoint { x: 0.0, y: 0.0 },
                TradeoffPoint { x: 1.0, y: 1.0 },
            ],
        )]);
        let figure = TradeoffPlotter::default().figure(&clusters);
        let settings = small_settings();
        let pixels = rasterize(&figure, &settings).unwrap();

        let bounds = figure.bounds().unwrap();
        let (px, py) = project(&bounds, 0.0, 0.0, MARGIN, 160 - MARGIN, MARGIN, 120 - MARGIN);
        let offset = (py as usize * settings.width as usize + px as usize) * 3;
        let red = Color::from_hue(0.0);
        assert_eq!(&pixels[offset..offset + 3], &[red.r, red.g, red.b]);
    }

    #[test]
    fn oversized_buffers_error_instead_of_overflowing() {
        assert!(encode_rgb_png(40_000, 40_000, &[]).is_err());
        assert!(encode_rgb_png(u32::MAX, u32::MAX, &[]).is_err());

        let figure = TradeoffPlotter::default().figure(&BTreeMap::new());
        let settings = FigureSettings {
            width: 40_000,
            height: 40_000,
            marker_radius: 4,
        };
        let err = rasterize(&figure, &settings).unwrap_err();
        assert!(err.to_string().contains("pixel limit"), "{err}");
    }

    #[test]
    fn tiny_figures_are_rejected() {
        let figure = TradeoffPlotter::default().figure(&BTreeMap::new());
        let settings = FigureSettings {
            width: 50,
            height: 50,
            marker_radius: 2,
        };
        assert!(rasterize(&figure, &settings).is_err());
    }
}
