// error.rs
//
// Copyright (c) 2025-2026  gifstream developers
//
use std::fmt;
use std::io;

/// Errors encountered while decoding
#[derive(Debug)]
pub enum Error {
    /// A wrapped I/O error.
    Io(io::Error),
    /// File signature is not `GIF`.
    MalformedHeader,
    /// GIF version not supported (87a or 89a only).
    UnsupportedVersion([u8; 3]),
    /// Top-level byte is not an extension, image descriptor or trailer.
    UnknownBlock(u8),
    /// Graphic control extension has an invalid length, terminator or
    /// disposal method.
    MalformedGraphicControlExtension,
    /// File ends in the middle of a block.
    UnexpectedEndOfFile,
    /// LZW minimum code size out of range.
    InvalidCodeSize,
    /// Compressed LZW data invalid or corrupt.
    InvalidLzwData,
    /// Image data ended before the frame was fully painted.
    IncompleteImageData,
    /// Frame location / size larger than the logical screen.
    InvalidFrameDimensions,
    /// Missing color table for a frame.
    MissingColorTable,
    /// Color index not within the active color table.
    InvalidColorIndex,
    /// A read or skip method was called in the wrong token state.
    InvalidState,
}

/// Decode result type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(fmt),
            _ => fmt::Debug::fmt(self, fmt),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
