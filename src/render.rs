use crate::{
    config::EngineConfig, error::Result, pipeline::StoryLayout, shaping::load_system_font,
};
use ab_glyph::{FontVec, PxScale};
use image::{ImageBuffer, Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};
use std::path::Path;

pub struct Colors;

impl Colors {
    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    pub const CURVE_BLUE: Rgb<u8> = Rgb([0, 100, 255]);
    pub const GAP_GRAY: Rgb<u8> = Rgb([180, 180, 180]);
}

/// Debug renderer: strokes the fitted per-segment polylines and stamps each
/// placed character at its committed position. Rotation is drawn as a short
/// tangent tick rather than rotated text; the production rasterizer is an
/// external collaborator, this is a development aid.
pub struct Renderer {
    image: RgbImage,
    font: Option<FontVec>,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            image: ImageBuffer::from_pixel(width, height, Colors::WHITE),
            font: Some(load_system_font()?),
        })
    }

    /// Renderer without text output (no font lookup); used by tests.
    pub fn without_font(width: u32, height: u32) -> Self {
        Self {
            image: ImageBuffer::from_pixel(width, height, Colors::WHITE),
            font: None,
        }
    }

    pub fn draw_polyline(&mut self, points: &[crate::curve::Point], color: Rgb<u8>) {
        for pair in points.windows(2) {
            draw_line_segment_mut(
                &mut self.image,
                (pair[0].x as f32, pair[0].y as f32),
                (pair[1].x as f32, pair[1].y as f32),
                color,
            );
        }
    }

    fn draw_char(&mut self, x: f64, y: f64, rotation: f64, ch: char, size: f32) {
        // tangent tick under the character
        let (sin, cos) = rotation.sin_cos();
        let half = size as f64 * 0.4;
        draw_line_segment_mut(
            &mut self.image,
            ((x - half * cos) as f32, (y - half * sin) as f32),
            ((x + half * cos) as f32, (y + half * sin) as f32),
            Colors::GAP_GRAY,
        );
        if let Some(font) = &self.font {
            let scale = PxScale::from(size);
            draw_text_mut(
                &mut self.image,
                Colors::BLACK,
                (x - half) as i32,
                (y - half) as i32,
                scale,
                font,
                &ch.to_string(),
            );
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }
}

/// Render a full story layout to a PNG file.
pub fn render_story<P: AsRef<Path>>(
    layout: &StoryLayout,
    cfg: &EngineConfig,
    font_px: f32,
    path: P,
) -> Result<()> {
    let mut renderer = Renderer::new(
        cfg.curve.canvas_width_px as u32,
        cfg.curve.canvas_height_px as u32,
    )?;
    render_into(&mut renderer, layout, font_px);
    renderer.save(path)
}

fn render_into(renderer: &mut Renderer, layout: &StoryLayout, font_px: f32) {
    for segment in &layout.segments {
        let color = if segment.placement.is_some() {
            Colors::CURVE_BLUE
        } else {
            Colors::GAP_GRAY
        };
        renderer.draw_polyline(&segment.polyline, color);

        if let Some(placement) = &segment.placement {
            for glyph in &placement.glyphs {
                renderer.draw_char(glyph.x, glyph.y, glyph.rotation, glyph.ch, font_px);
            }
        }
    }
}
