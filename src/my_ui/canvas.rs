use fltk::{draw, enums::{Align, ColorDepth, FrameType}, frame, image::RgbImage, prelude::*};
use crate::{img::Renderable, my_err::MyError};


/// Paints a subwindow's renderable, scaled to fit and keeping the display aspect.
pub struct RenderCanvas {
    frame_img: frame::Frame,
    lbl_status: frame::Frame,
}

impl RenderCanvas {
    const STATUS_HEIGHT: i32 = 24;

    pub fn new(x: i32, y: i32, w: i32, h: i32, title: &str) -> Self {
        let mut frame_img = frame::Frame::new(x, y, w, h - Self::STATUS_HEIGHT, "")
            .with_label(title)
            .with_align(Align::Top | Align::Inside);
        frame_img.set_frame(FrameType::EmbossedBox);

        let mut lbl_status = frame::Frame::new(x, y + h - Self::STATUS_HEIGHT, w, Self::STATUS_HEIGHT, "");
        lbl_status.set_align(Align::Left | Align::Inside);

        RenderCanvas { frame_img, lbl_status }
    }

    /// `aspect` is pixel height over pixel width, 1 when unknown.
    pub fn set_renderable(&mut self, renderable: &Renderable, aspect: Option<f64>) -> Result<(), MyError> {
        let (im_w, im_h) = (renderable.w() as i32, renderable.h() as i32);
        let mut drawable = RgbImage::new(renderable.rgb(), im_w, im_h, ColorDepth::Rgb8)?;
        let aspect = aspect.unwrap_or(1_f64);

        self.frame_img.draw(move |f| {
            let shown_w = im_w as f64;
            let shown_h = im_h as f64 * aspect;
            let scale = f64::min(f.w() as f64 / shown_w, f.h() as f64 / shown_h);

            let w = ((shown_w * scale) as i32).max(1);
            let h = ((shown_h * scale) as i32).max(1);
            let x = f.x() + (f.w() - w) / 2;
            let y = f.y() + (f.h() - h) / 2;

            drawable.scale(w, h, false, true);
            draw::push_clip(f.x(), f.y(), f.w(), f.h());
            drawable.draw(x, y, w, h);
            draw::pop_clip();
        });

        self.frame_img.redraw();

        Ok(())
    }

    pub fn set_status(&mut self, text: &str) {
        self.lbl_status.set_label(text);
        self.lbl_status.redraw();
    }

    pub fn center(&self) -> (i32, i32) {
        (self.frame_img.x() + self.frame_img.w() / 2, self.frame_img.y() + self.frame_img.h() / 2)
    }
}
