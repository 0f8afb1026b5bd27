use anyhow::Result;
use minifb::{Key, Window, WindowOptions};

use crate::classify::Verdict;
use crate::pose::Skeleton;
use crate::render::skeleton::{
    verdict_color, KEYPOINT_COLOR, PROGRESS_BACKGROUND, PROGRESS_COLOR, SKELETON_CONNECTIONS,
};
use crate::source::RgbFrame;

const PROGRESS_HEIGHT: usize = 12;

/// Pixel buffer with the drawing primitives used for the session view
pub struct Canvas {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self { buffer: vec![0u32; width * height], width, height }
    }

    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.buffer[y * self.width + x])
    }

    pub fn clear(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// Copy a frame into the canvas, cropping whatever does not fit
    pub fn draw_frame(&mut self, frame: &RgbFrame) {
        let w = self.width.min(frame.width);
        for y in 0..self.height.min(frame.height) {
            let src = &frame.data[y * frame.width..y * frame.width + w];
            self.buffer[y * self.width..y * self.width + w].copy_from_slice(src);
        }
    }

    /// Draw the skeleton in the colour for `verdict`
    pub fn draw_skeleton(&mut self, skeleton: &Skeleton, verdict: Option<&Verdict>) {
        let w = self.width as u32;
        let h = self.height as u32;
        let color = verdict_color(verdict);

        for (start, end) in SKELETON_CONNECTIONS.iter() {
            let (x1, y1) = skeleton.get(*start).to_pixel(w, h);
            let (x2, y2) = skeleton.get(*end).to_pixel(w, h);
            self.draw_line(x1, y1, x2, y2, color);
        }

        for (_, point) in skeleton.iter() {
            let (px, py) = point.to_pixel(w, h);
            self.draw_circle(px, py, 4, KEYPOINT_COLOR);
        }
    }

    /// Bar along the bottom edge, filled by the share of the hold already done
    pub fn draw_progress(&mut self, remaining_secs: u32, required_secs: u32) {
        let done = if required_secs == 0 {
            1.0
        } else {
            1.0 - remaining_secs.min(required_secs) as f32 / required_secs as f32
        };
        let filled = (self.width as f32 * done).round() as usize;
        let top = self.height.saturating_sub(PROGRESS_HEIGHT);
        for y in top..self.height {
            for x in 0..self.width {
                let color = if x < filled { PROGRESS_COLOR } else { PROGRESS_BACKGROUND };
                self.buffer[y * self.width + x] = color;
            }
        }
    }

    /// Bresenham line
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}

/// Session window backed by minifb
pub struct MinifbRenderer {
    window: Window,
    canvas: Canvas,
}

impl MinifbRenderer {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        Ok(Self {
            window,
            canvas: Canvas::new(width, height),
        })
    }

    /// Open until closed or Escape is pressed
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    pub fn canvas(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Push the canvas to the window and pump its events
    pub fn update(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(self.canvas.buffer(), self.canvas.width, self.canvas.height)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Landmark, Point2D};
    use crate::render::skeleton::{CORRECT_COLOR, WRONG_POSE_COLOR};

    #[test]
    fn test_draw_frame_crops() {
        let mut canvas = Canvas::new(4, 2);
        let frame = RgbFrame { width: 6, height: 3, data: (0..18).collect() };
        canvas.draw_frame(&frame);
        assert_eq!(canvas.buffer(), &[0, 1, 2, 3, 6, 7, 8, 9]);
    }

    #[test]
    fn test_draw_frame_smaller_than_canvas() {
        let mut canvas = Canvas::new(3, 3);
        canvas.clear(0xFFFFFF);
        canvas.draw_frame(&RgbFrame { width: 2, height: 1, data: vec![5, 6] });
        assert_eq!(canvas.pixel(0, 0), Some(5));
        assert_eq!(canvas.pixel(1, 0), Some(6));
        assert_eq!(canvas.pixel(2, 0), Some(0xFFFFFF));
        assert_eq!(canvas.pixel(0, 1), Some(0xFFFFFF));
        assert_eq!(canvas.pixel(3, 0), None);
    }

    #[test]
    fn test_skeleton_color_follows_verdict() {
        let skeleton = Skeleton::default()
            .with(Landmark::LeftShoulder, Point2D::new(0.1, 0.5))
            .with(Landmark::RightShoulder, Point2D::new(0.9, 0.5));
        let mut canvas = Canvas::new(100, 100);
        canvas.draw_skeleton(&skeleton, Some(&Verdict::Correct));
        assert_eq!(canvas.pixel(50, 50), Some(CORRECT_COLOR));

        canvas.draw_skeleton(&skeleton, Some(&Verdict::WrongPose("Tree Pose")));
        assert_eq!(canvas.pixel(50, 50), Some(WRONG_POSE_COLOR));
    }

    #[test]
    fn test_progress_bar() {
        let mut canvas = Canvas::new(100, 20);
        canvas.draw_progress(15, 30);
        let y = 19;
        assert_eq!(canvas.pixel(49, y), Some(PROGRESS_COLOR));
        assert_eq!(canvas.pixel(50, y), Some(PROGRESS_BACKGROUND));
        assert_eq!(canvas.pixel(0, 0), Some(0));

        canvas.draw_progress(30, 30);
        assert_eq!(canvas.pixel(0, y), Some(PROGRESS_BACKGROUND));

        canvas.draw_progress(0, 0);
        assert_eq!(canvas.pixel(99, y), Some(PROGRESS_COLOR));
    }
}
