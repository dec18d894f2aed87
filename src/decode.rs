// decode.rs
//
// Copyright (c) 2025-2026  gifstream developers
//
use crate::bits::{self, BlockReader};
use crate::block::{
    Color, GraphicControl, ImageDesc, Palette, ScreenDesc, Version,
};
use crate::canvas::Canvas;
use crate::error::{Error, Result};
use crate::lzw::Dictionary;
use pix::rgb::SRgba8;
use pix::Raster;
use std::io::{Read, Seek, SeekFrom};

/// Things a decoder can surface next
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// An image is ready to be read or skipped
    Image,
    /// A comment extension is ready to be read or skipped
    Comment,
    /// The file trailer was reached
    EndOfFile,
}

/// Pending token state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    /// No token surfaced; `next_token` may be called
    None,
    Image,
    Comment,
    Done,
}

/// One composed frame of an animation.
///
/// `colors` is a borrowed view of the decoder's canvas; it stays valid
/// until the next call that mutates the canvas (`read_image`,
/// `skip_image` or `reset`).  Callers that keep frames around must
/// copy, for example with [to_raster](struct.Frame.html#method.to_raster).
pub struct Frame<'a> {
    /// Frame number, starting at zero
    pub index: u32,
    /// Display delay in centiseconds
    pub delay_time_cs: u16,
    /// Logical screen width
    pub width: u16,
    /// Logical screen height
    pub height: u16,
    /// Composed canvas colors, `width * height`
    pub colors: &'a [Color],
}

impl<'a> Frame<'a> {
    /// Copy the frame into an owned `Raster`
    pub fn to_raster(&self) -> Raster<SRgba8> {
        let mut buf = Vec::with_capacity(self.colors.len() * 4);
        for c in self.colors {
            buf.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        Raster::with_u8_buffer(self.width.into(), self.height.into(), buf)
    }
}

/// Streaming GIF decoder.
///
/// The decoder is a pull parser: the caller asks for the next
/// [Token](enum.Token.html) and then reads or skips it.  Frames are
/// composed onto a reusable canvas, so one frame at most is buffered
/// no matter how long the animation is.
///
/// ## Example
/// ```
/// use gifstream::{Decoder, Token};
/// use std::io::Cursor;
///
/// # fn main() -> Result<(), gifstream::Error> {
/// # let gif = &[
/// #   0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00,
/// #   0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00,
/// #   0xFF, 0xFF, 0xFF, 0x2C, 0x00, 0x00, 0x00, 0x00,
/// #   0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x4C,
/// #   0x01, 0x00, 0x3B,
/// # ][..];
/// // ... open a `File` as "gif"
/// let mut decoder = Decoder::new(Cursor::new(gif))?;
/// loop {
///     match decoder.next_token()? {
///         Token::Image => {
///             let frame = decoder.read_image()?;
///             println!("frame {}: {} pixels", frame.index, frame.colors.len());
///         }
///         Token::Comment => println!("# {}", decoder.read_comment()?),
///         Token::EndOfFile => break,
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct Decoder<R: Read> {
    /// Reader for input data
    reader: R,
    version: Version,
    screen: ScreenDesc,
    global_palette: Palette,
    /// Scratch palette for images with a local color table
    local_palette: Palette,
    canvas: Canvas,
    dict: Dictionary,
    bits: BlockReader,
    /// Graphic control for the next image
    control: GraphicControl,
    pending: Pending,
    frame_index: u32,
    /// Stream offset just past the global color table
    data_start: u64,
}

impl<R: Read> Decoder<R> {
    /// Create a decoder and parse the file header eagerly.
    ///
    /// On success [width](struct.Decoder.html#method.width),
    /// [height](struct.Decoder.html#method.height) and
    /// [version](struct.Decoder.html#method.version) are valid.
    pub fn new(mut reader: R) -> Result<Self> {
        let mut buf = [0u8; 13];
        bits::read_exact(&mut reader, &mut buf)?;
        if &buf[..3] != b"GIF" {
            return Err(Error::MalformedHeader);
        }
        let version = match &buf[3..6] {
            b"87a" => Version::Gif87a,
            b"89a" => Version::Gif89a,
            v => return Err(Error::UnsupportedVersion([v[0], v[1], v[2]])),
        };
        let screen = ScreenDesc::from_buf(&buf[6..13]);
        debug!("header: GIF{} {}x{}", version, screen.width(), screen.height());
        let mut canvas = Canvas::new();
        canvas.set_size(screen.width(), screen.height());
        let mut global_palette = Palette::default();
        let mut data_start = 13u64;
        if screen.has_color_table() {
            let len = screen.color_table_len();
            let mut rgb = [0u8; 768];
            bits::read_exact(&mut reader, &mut rgb[..len * 3])?;
            global_palette.set_rgb(&rgb[..len * 3]);
            data_start += (len * 3) as u64;
            let idx = screen.background_color_idx() as usize;
            if let Some(color) = global_palette.color(idx) {
                canvas.set_background(color);
            }
        }
        Ok(Decoder {
            reader,
            version,
            screen,
            global_palette,
            local_palette: Palette::default(),
            canvas,
            dict: Dictionary::new(),
            bits: BlockReader::new(),
            control: GraphicControl::default(),
            pending: Pending::None,
            frame_index: 0,
            data_start,
        })
    }

    /// Logical screen width
    pub fn width(&self) -> u16 {
        self.screen.width()
    }

    /// Logical screen height
    pub fn height(&self) -> u16 {
        self.screen.height()
    }

    /// GIF file version
    pub fn version(&self) -> Version {
        self.version
    }

    /// Check whether frames are composed bottom-up
    pub fn flip_vertically(&self) -> bool {
        self.canvas.flip_vertically()
    }

    /// Choose the raster orientation for subsequent frames.
    ///
    /// The default is `true`: rows are stored bottom-up, ready for
    /// upload to a bottom-left-origin texture.
    pub fn set_flip_vertically(&mut self, flip: bool) {
        self.canvas.set_flip_vertically(flip);
    }

    /// Consume the decoder and return the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Advance to the next token.
    ///
    /// Graphic control extensions are consumed along the way; plain
    /// text, application and unknown extensions are skipped.  Legal
    /// only when no token is pending.
    pub fn next_token(&mut self) -> Result<Token> {
        if self.pending != Pending::None {
            return Err(Error::InvalidState);
        }
        loop {
            let b = bits::read_u8(&mut self.reader)?;
            match b {
                b'!' => {
                    // (0x21) Extension introducer
                    let label = bits::read_u8(&mut self.reader)?;
                    match label {
                        0xFE => {
                            debug!("token: comment");
                            self.pending = Pending::Comment;
                            return Ok(Token::Comment);
                        }
                        0xF9 => self.read_graphic_control()?,
                        _ => {
                            debug!("skipping extension 0x{:02X}", label);
                            self.skip_sub_blocks()?;
                        }
                    }
                }
                b',' => {
                    // (0x2C) Image separator
                    debug!("token: image {}", self.frame_index);
                    self.pending = Pending::Image;
                    return Ok(Token::Image);
                }
                b';' => {
                    // (0x3B) GIF trailer
                    debug!("token: end of file");
                    self.pending = Pending::Done;
                    return Ok(Token::EndOfFile);
                }
                b => return Err(Error::UnknownBlock(b)),
            }
        }
    }

    /// Parse a graphic control extension
    fn read_graphic_control(&mut self) -> Result<()> {
        let mut buf = [0u8; 6];
        bits::read_exact(&mut self.reader, &mut buf)?;
        if buf[0] != 4 || buf[5] != 0 {
            return Err(Error::MalformedGraphicControlExtension);
        }
        self.control =
            GraphicControl::from_buf([buf[1], buf[2], buf[3], buf[4]])?;
        Ok(())
    }

    /// Skip a sub-block chain through its terminator
    fn skip_sub_blocks(&mut self) -> Result<()> {
        let mut buf = [0u8; 255];
        loop {
            let len = bits::read_u8(&mut self.reader)? as usize;
            if len == 0 {
                return Ok(());
            }
            bits::read_exact(&mut self.reader, &mut buf[..len])?;
        }
    }

    /// Decode the pending image and borrow the composed frame
    pub fn read_image(&mut self) -> Result<Frame> {
        let delay_time_cs = self.decode_image()?;
        Ok(Frame {
            index: self.frame_index - 1,
            delay_time_cs,
            width: self.screen.width(),
            height: self.screen.height(),
            colors: self.canvas.colors(),
        })
    }

    /// Decode the pending image without surfacing it.
    ///
    /// The image is still fully composed, since later frames may
    /// depend on its pixels.
    pub fn skip_image(&mut self) -> Result<()> {
        self.decode_image()?;
        Ok(())
    }

    /// Read the pending comment as text
    pub fn read_comment(&mut self) -> Result<String> {
        if self.pending != Pending::Comment {
            return Err(Error::InvalidState);
        }
        let mut bytes = Vec::new();
        let mut buf = [0u8; 255];
        loop {
            let len = bits::read_u8(&mut self.reader)? as usize;
            if len == 0 {
                break;
            }
            bits::read_exact(&mut self.reader, &mut buf[..len])?;
            bytes.extend_from_slice(&buf[..len]);
        }
        self.pending = Pending::None;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Skip the pending comment
    pub fn skip_comment(&mut self) -> Result<()> {
        if self.pending != Pending::Comment {
            return Err(Error::InvalidState);
        }
        self.skip_sub_blocks()?;
        self.pending = Pending::None;
        Ok(())
    }

    /// Parse the image descriptor and decode its data onto the canvas
    fn decode_image(&mut self) -> Result<u16> {
        if self.pending != Pending::Image {
            return Err(Error::InvalidState);
        }
        let mut buf = [0u8; 9];
        bits::read_exact(&mut self.reader, &mut buf)?;
        let desc = ImageDesc::from_buf(&buf);
        debug!("image: {:?}", desc);
        if desc.has_color_table() {
            let len = desc.color_table_len();
            let mut rgb = [0u8; 768];
            bits::read_exact(&mut self.reader, &mut rgb[..len * 3])?;
            self.local_palette.set_rgb(&rgb[..len * 3]);
        }
        let min_code_size = bits::read_u8(&mut self.reader)?;
        let palette = if desc.has_color_table() {
            &self.local_palette
        } else {
            &self.global_palette
        };
        self.canvas.begin_frame(&desc, palette, &self.control)?;
        let delay_time_cs = self.control.delay_time_cs();
        self.decode_pixels(min_code_size)?;
        self.control = GraphicControl::default();
        self.pending = Pending::None;
        self.frame_index += 1;
        Ok(delay_time_cs)
    }

    /// Run the LZW decode loop, feeding pixels to the canvas
    fn decode_pixels(&mut self, min_code_size: u8) -> Result<()> {
        let reader = &mut self.reader;
        let bits = &mut self.bits;
        let dict = &mut self.dict;
        let canvas = &mut self.canvas;
        dict.init(min_code_size)?;
        bits.start(reader)?;
        let mut last: Option<u16> = None;
        loop {
            if bits.is_ended() {
                // encoder ended the chain without a stop code
                break;
            }
            let code = bits.read_bits(reader, dict.code_width())?;
            if dict.is_clear_code(code) {
                dict.clear();
                last = None;
            } else if dict.is_stop_code(code) {
                break;
            } else if dict.contains(code) {
                dict.output(code, canvas)?;
                if let Some(prev) = last {
                    dict.create_new_code(prev, code)?;
                }
                last = Some(code);
            } else if code == dict.next_code() {
                // the KwKwK case: the entry being referenced is the
                // one derived from the previous code and itself
                let prev = last.ok_or(Error::InvalidLzwData)?;
                match dict.create_new_code(prev, prev)? {
                    Some(new_code) => {
                        dict.output(new_code, canvas)?;
                        last = Some(new_code);
                    }
                    None => return Err(Error::InvalidLzwData),
                }
            } else {
                return Err(Error::InvalidLzwData);
            }
        }
        bits.drain(reader)?;
        if !canvas.is_complete() {
            return Err(Error::IncompleteImageData);
        }
        if canvas.dropped() > 0 {
            warn!("{} extra pixels in image data", canvas.dropped());
        }
        Ok(())
    }
}

impl<R: Read + Seek> Decoder<R> {
    /// Seek back to the first frame.
    ///
    /// With `reset_canvas` the canvas is cleared as well, making the
    /// following decode byte-identical to the first one.
    pub fn reset(&mut self, reset_canvas: bool) -> Result<()> {
        self.reader.seek(SeekFrom::Start(self.data_start))?;
        self.pending = Pending::None;
        self.frame_index = 0;
        self.control = GraphicControl::default();
        if reset_canvas {
            self.canvas.reset();
        }
        Ok(())
    }
}
