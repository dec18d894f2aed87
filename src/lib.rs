// lib.rs      gifstream crate.
//
// Copyright (c) 2025-2026  gifstream developers
//
//! # gifstream
//!
//! A streaming decoder for GIF images and animations.  Frames are
//! composed onto a single RGBA canvas as they are decoded, so even
//! very long animations never buffer more than one frame of pixels.
//! The finished buffer is laid out for direct upload to a GPU texture
//! (bottom-up by default).
//!
//! ```
//! use gifstream::{Decoder, Token};
//! use std::io::Cursor;
//!
//! # fn main() -> Result<(), gifstream::Error> {
//! # let gif = &[
//! #   0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00,
//! #   0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00,
//! #   0xFF, 0xFF, 0xFF, 0x2C, 0x00, 0x00, 0x00, 0x00,
//! #   0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x4C,
//! #   0x01, 0x00, 0x3B,
//! # ][..];
//! // ... open a `File` as "gif"
//! let mut decoder = Decoder::new(Cursor::new(gif))?;
//! loop {
//!     match decoder.next_token()? {
//!         Token::Image => {
//!             // upload frame.colors, wait frame.delay_time_cs
//!             let frame = decoder.read_image()?;
//!             assert_eq!(frame.colors.len(), 1);
//!         }
//!         Token::Comment => {
//!             decoder.skip_comment()?;
//!         }
//!         Token::EndOfFile => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

pub mod block;
mod bits;
mod canvas;
mod decode;
mod error;
mod lzw;

pub use crate::decode::{Decoder, Frame, Token};
pub use crate::error::{Error, Result};
