use vello_cpu::kurbo::Shape as _;

use crate::{
    assets::color::Rgba8,
    foundation::core::Canvas,
    foundation::error::{MorphError, MorphResult},
    render::compositor::DrawCircle,
};

const CIRCLE_TOLERANCE: f64 = 0.1;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A rendered frame as tightly packed RGBA8 rows.
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of this frame, e.g. for PNG output.
    pub fn to_unpremultiplied(&self) -> FrameRGBA {
        if !self.premultiplied {
            return self.clone();
        }
        let mut data = self.data.clone();
        for px in data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        FrameRGBA {
            width: self.width,
            height: self.height,
            data,
            premultiplied: false,
        }
    }

    pub fn to_image(&self) -> MorphResult<image::RgbaImage> {
        let straight = self.to_unpremultiplied();
        image::RgbaImage::from_raw(self.width, self.height, straight.data)
            .ok_or_else(|| MorphError::evaluation("frame buffer size does not match dimensions"))
    }
}

/// Rasterize draw circles over an opaque `background` with `vello_cpu`.
///
/// Circles are painted in slice order. Output is premultiplied RGBA8.
pub fn rasterize_frame(
    circles: &[DrawCircle],
    canvas: Canvas,
    background: Rgba8,
) -> MorphResult<FrameRGBA> {
    let (width, height) = canvas_u16(canvas)?;
    let mut ctx = vello_cpu::RenderContext::new(width, height);

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        background.r,
        background.g,
        background.b,
        background.a,
    ));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(width),
        f64::from(height),
    ));

    for c in circles {
        if !(c.r > 0.0 && c.alpha > 0.0) || !(c.x.is_finite() && c.y.is_finite()) {
            continue;
        }
        let color = c.color.with_opacity(c.alpha);
        if color.a == 0 {
            continue;
        }
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        let path = vello_cpu::kurbo::Circle::new((c.x, c.y), c.r).to_path(CIRCLE_TOLERANCE);
        ctx.fill_path(&path);
    }

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    })
}

fn canvas_u16(canvas: Canvas) -> MorphResult<(u16, u16)> {
    let w = u16::try_from(canvas.width).ok().filter(|&w| w > 0);
    let h = u16::try_from(canvas.height).ok().filter(|&h| h > 0);
    match (w, h) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(MorphError::validation(format!(
            "canvas {}x{} is outside the CPU rasterizer's 1..=65535 range",
            canvas.width, canvas.height
        ))),
    }
}
