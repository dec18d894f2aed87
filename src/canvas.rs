// canvas.rs
//
// Copyright (c) 2025-2026  gifstream developers
//
//! Frame composition onto the logical screen
use crate::block::{Color, DisposalMethod, GraphicControl, ImageDesc, Palette};
use crate::error::{Error, Result};

/// RGBA canvas the size of the logical screen.
///
/// Every image block paints a sub-rectangle of the canvas through the
/// active palette.  The canvas handles interlace row ordering,
/// transparency, the three disposal methods, and optional vertical
/// flipping so the finished buffer can be uploaded to a bottom-up
/// texture directly.
#[derive(Debug)]
pub(crate) struct Canvas {
    width: usize,
    height: usize,
    /// Composed output colors, `width * height`
    colors: Vec<Color>,
    /// Snapshot for `DisposalMethod::Previous`, allocated on first use
    revert: Option<Vec<Color>>,
    /// Background color with alpha 0
    background: Color,
    flip_vertically: bool,
    /// Disposal of the frame painted before the current one
    prev_disposal: DisposalMethod,
    /// Palette of the current frame
    palette: Palette,
    transparent_color: Option<u8>,
    /// Canvas position of each output row start / end
    row_start: Vec<usize>,
    row_end: Vec<usize>,
    /// Current row in the schedule
    row: usize,
    /// Linear cursor within the current row
    pos: usize,
    /// Pixels received past the end of the frame
    dropped: usize,
}

impl Canvas {
    pub fn new() -> Self {
        Canvas {
            width: 0,
            height: 0,
            colors: Vec::new(),
            revert: None,
            background: Color::default(),
            flip_vertically: true,
            prev_disposal: DisposalMethod::Keep,
            palette: Palette::default(),
            transparent_color: None,
            row_start: Vec::new(),
            row_end: Vec::new(),
            row: 0,
            pos: 0,
            dropped: 0,
        }
    }

    /// Resize to the logical screen dimensions and reset
    pub fn set_size(&mut self, width: u16, height: u16) {
        let width = width as usize;
        let height = height as usize;
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.colors.resize(width * height, Color::default());
            if let Some(revert) = &mut self.revert {
                revert.resize(width * height, Color::default());
            }
        }
        self.reset();
    }

    /// Clear to transparent black and forget disposal state
    pub fn reset(&mut self) {
        for c in &mut self.colors {
            *c = Color::default();
        }
        self.prev_disposal = DisposalMethod::Keep;
    }

    /// Record the background color; painted with alpha 0
    pub fn set_background(&mut self, color: Color) {
        self.background = Color {
            a: 0,
            ..color
        };
    }

    pub fn set_flip_vertically(&mut self, flip: bool) {
        self.flip_vertically = flip;
    }

    pub fn flip_vertically(&self) -> bool {
        self.flip_vertically
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Prepare the canvas for one frame.
    ///
    /// The *previous* frame's disposal is applied first; then, if this
    /// frame will be disposed with `Previous`, the canvas is
    /// snapshotted before any painting happens.
    pub fn begin_frame(
        &mut self,
        desc: &ImageDesc,
        palette: &Palette,
        control: &GraphicControl,
    ) -> Result<()> {
        let left = desc.left() as usize;
        let top = desc.top() as usize;
        let width = desc.width() as usize;
        let height = desc.height() as usize;
        if left + width > self.width || top + height > self.height {
            return Err(Error::InvalidFrameDimensions);
        }
        if palette.is_empty() {
            return Err(Error::MissingColorTable);
        }
        match self.prev_disposal {
            DisposalMethod::Keep => {}
            DisposalMethod::Background => {
                let bg = self.background;
                for c in &mut self.colors {
                    *c = bg;
                }
            }
            DisposalMethod::Previous => {
                if let Some(revert) = &self.revert {
                    self.colors.copy_from_slice(revert);
                }
            }
        }
        if control.disposal_method() == DisposalMethod::Previous {
            match &mut self.revert {
                Some(revert) => revert.copy_from_slice(&self.colors),
                None => self.revert = Some(self.colors.clone()),
            }
        }
        self.palette = palette.clone();
        self.transparent_color = control.transparent_color();
        self.prev_disposal = control.disposal_method();
        self.row_start.clear();
        self.row_end.clear();
        if desc.interlaced() {
            // the four fixed interlace passes
            for r in (0..height).step_by(8) {
                self.schedule_row(left, top, width, r);
            }
            for r in (4..height).step_by(8) {
                self.schedule_row(left, top, width, r);
            }
            for r in (2..height).step_by(4) {
                self.schedule_row(left, top, width, r);
            }
            for r in (1..height).step_by(2) {
                self.schedule_row(left, top, width, r);
            }
        } else {
            for r in 0..height {
                self.schedule_row(left, top, width, r);
            }
        }
        self.row = 0;
        self.pos = self.row_start.first().copied().unwrap_or(0);
        self.dropped = 0;
        Ok(())
    }

    /// Append one output row to the schedule
    fn schedule_row(&mut self, left: usize, top: usize, width: usize, r: usize) {
        let line = if self.flip_vertically {
            self.height - 1 - (top + r)
        } else {
            top + r
        };
        let start = line * self.width + left;
        self.row_start.push(start);
        self.row_end.push(start + width);
    }

    /// Paint the next pixel of the current frame.
    ///
    /// The transparent index advances the cursor without writing.
    /// Pixels past the end of the frame are counted and ignored.
    pub fn output_pixel(&mut self, color_index: u8) -> Result<()> {
        if self.row >= self.row_start.len() {
            self.dropped += 1;
            return Ok(());
        }
        if self.transparent_color != Some(color_index) {
            match self.palette.color(color_index as usize) {
                Some(color) => self.colors[self.pos] = color,
                None => return Err(Error::InvalidColorIndex),
            }
        }
        self.pos += 1;
        if self.pos == self.row_end[self.row] {
            self.row += 1;
            if self.row < self.row_start.len() {
                self.pos = self.row_start[self.row];
            }
        }
        Ok(())
    }

    /// Check whether the whole frame rectangle has been painted
    pub fn is_complete(&self) -> bool {
        self.row >= self.row_start.len()
    }

    /// Pixels received past the end of the frame
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const RED: Color = Color::new(255, 0, 0);
    const GREEN: Color = Color::new(0, 255, 0);
    const CLEAR: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    fn palette(colors: &[Color]) -> Palette {
        let mut rgb = Vec::new();
        for c in colors {
            rgb.extend_from_slice(&[c.r, c.g, c.b]);
        }
        let mut p = Palette::default();
        p.set_rgb(&rgb);
        p
    }

    fn grays(n: usize) -> Palette {
        let v: Vec<Color> =
            (0..n).map(|i| Color::new(i as u8, i as u8, i as u8)).collect();
        palette(&v)
    }

    fn control(buf: [u8; 4]) -> GraphicControl {
        GraphicControl::from_buf(buf).unwrap()
    }

    fn paint(c: &mut Canvas, pixels: &[u8]) {
        for &p in pixels {
            c.output_pixel(p).unwrap();
        }
    }

    #[test]
    fn natural_row_order() {
        let mut c = Canvas::new();
        c.set_flip_vertically(false);
        c.set_size(2, 2);
        let desc = ImageDesc::default().with_width(2).with_height(2);
        c.begin_frame(&desc, &grays(4), &GraphicControl::default()).unwrap();
        paint(&mut c, &[0, 1, 2, 3]);
        assert!(c.is_complete());
        let px: Vec<u8> = c.colors().iter().map(|c| c.r).collect();
        assert_eq!(px, [0, 1, 2, 3]);
    }

    #[test]
    fn flipped_row_order() {
        let mut c = Canvas::new();
        c.set_size(2, 2);
        assert!(c.flip_vertically());
        let desc = ImageDesc::default().with_width(2).with_height(2);
        c.begin_frame(&desc, &grays(4), &GraphicControl::default()).unwrap();
        paint(&mut c, &[0, 1, 2, 3]);
        let px: Vec<u8> = c.colors().iter().map(|c| c.r).collect();
        assert_eq!(px, [2, 3, 0, 1]);
    }

    #[test]
    fn interlaced_pass_order() {
        let mut c = Canvas::new();
        c.set_flip_vertically(false);
        c.set_size(8, 8);
        let desc = ImageDesc::default()
            .with_width(8)
            .with_height(8)
            .with_flags(0x40);
        c.begin_frame(&desc, &grays(8), &GraphicControl::default()).unwrap();
        // pixel value = order the row arrived in
        for arrival in 0..8u8 {
            paint(&mut c, &[arrival; 8]);
        }
        assert!(c.is_complete());
        let row = |r: usize| c.colors()[r * 8].r;
        assert_eq!(row(0), 0);
        assert_eq!(row(4), 1);
        assert_eq!(row(2), 2);
        assert_eq!(row(6), 3);
        assert_eq!(row(1), 4);
        assert_eq!(row(3), 5);
        assert_eq!(row(5), 6);
        assert_eq!(row(7), 7);
    }

    #[test]
    fn transparent_index_skips_write() {
        let mut c = Canvas::new();
        c.set_flip_vertically(false);
        c.set_size(2, 1);
        let desc = ImageDesc::default().with_width(2).with_height(1);
        let pal = palette(&[RED, GREEN]);
        c.begin_frame(&desc, &pal, &GraphicControl::default()).unwrap();
        paint(&mut c, &[0, 0]);
        // repaint with index 1 transparent
        c.begin_frame(&desc, &pal, &control([0x01, 0, 0, 1])).unwrap();
        paint(&mut c, &[1, 1]);
        assert_eq!(c.colors(), &[RED, RED]);
    }

    #[test]
    fn background_disposal_clears() {
        let mut c = Canvas::new();
        c.set_flip_vertically(false);
        c.set_size(2, 1);
        c.set_background(RED);
        let desc = ImageDesc::default().with_width(2).with_height(1);
        let pal = palette(&[RED, GREEN]);
        // disposal method 2 is clear-to-background
        c.begin_frame(&desc, &pal, &control([0x08, 0, 0, 0])).unwrap();
        paint(&mut c, &[1, 1]);
        let one = ImageDesc::default().with_width(1).with_height(1);
        c.begin_frame(&one, &pal, &GraphicControl::default()).unwrap();
        paint(&mut c, &[1]);
        let bg = Color { r: 255, g: 0, b: 0, a: 0 };
        assert_eq!(c.colors(), &[GREEN, bg]);
    }

    #[test]
    fn previous_disposal_reverts() {
        let mut c = Canvas::new();
        c.set_flip_vertically(false);
        c.set_size(2, 1);
        let desc = ImageDesc::default().with_width(2).with_height(1);
        let pal = palette(&[RED, GREEN]);
        // first frame on a fresh canvas snapshots transparent black
        c.begin_frame(&desc, &pal, &control([0x0C, 0, 0, 0])).unwrap();
        paint(&mut c, &[0, 0]);
        assert_eq!(c.colors(), &[RED, RED]);
        let one = ImageDesc::default().with_width(1).with_height(1);
        c.begin_frame(&one, &pal, &GraphicControl::default()).unwrap();
        paint(&mut c, &[1]);
        assert_eq!(c.colors(), &[GREEN, CLEAR]);
    }

    #[test]
    fn consecutive_previous_disposals() {
        let mut c = Canvas::new();
        c.set_flip_vertically(false);
        c.set_size(1, 1);
        let desc = ImageDesc::default().with_width(1).with_height(1);
        let pal = palette(&[RED, GREEN]);
        c.begin_frame(&desc, &pal, &control([0x0C, 0, 0, 0])).unwrap();
        paint(&mut c, &[0]);
        // second revert frame snapshots the *restored* state
        c.begin_frame(&desc, &pal, &control([0x0C, 0, 0, 0])).unwrap();
        paint(&mut c, &[1]);
        assert_eq!(c.colors(), &[GREEN]);
        c.begin_frame(&desc, &pal, &GraphicControl::default()).unwrap();
        // before painting, the canvas is back to transparent black
        assert_eq!(c.colors(), &[CLEAR]);
    }

    #[test]
    fn frame_rect_validated() {
        let mut c = Canvas::new();
        c.set_size(2, 2);
        let desc = ImageDesc::default()
            .with_left(1)
            .with_width(2)
            .with_height(1);
        assert!(matches!(
            c.begin_frame(&desc, &grays(2), &GraphicControl::default()),
            Err(Error::InvalidFrameDimensions)
        ));
    }

    #[test]
    fn empty_palette_rejected() {
        let mut c = Canvas::new();
        c.set_size(2, 2);
        let desc = ImageDesc::default().with_width(1).with_height(1);
        assert!(matches!(
            c.begin_frame(&desc, &Palette::default(), &GraphicControl::default()),
            Err(Error::MissingColorTable)
        ));
    }

    #[test]
    fn extra_pixels_dropped() {
        let mut c = Canvas::new();
        c.set_flip_vertically(false);
        c.set_size(1, 1);
        let desc = ImageDesc::default().with_width(1).with_height(1);
        c.begin_frame(&desc, &grays(2), &GraphicControl::default()).unwrap();
        paint(&mut c, &[1, 0, 0]);
        assert!(c.is_complete());
        assert_eq!(c.dropped(), 2);
        assert_eq!(c.colors()[0].r, 1);
    }

    #[test]
    fn out_of_range_index() {
        let mut c = Canvas::new();
        c.set_size(1, 1);
        let desc = ImageDesc::default().with_width(1).with_height(1);
        c.begin_frame(&desc, &grays(2), &GraphicControl::default()).unwrap();
        assert!(matches!(
            c.output_pixel(2),
            Err(Error::InvalidColorIndex)
        ));
    }
}
