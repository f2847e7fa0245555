//! Image: an opaque camera frame submitted for cat detection.

use serde::{Deserialize, Serialize};

use crate::error::{SecurityError, ValidationError};

/// Bytes per pixel of an RGB frame.
const RGB_BYTES: usize = 3;

/// A packed RGB camera frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Image {
    /// Wrap a packed RGB buffer of `width * height * 3` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidImage`] when the buffer length does
    /// not match the dimensions.
    pub fn rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self, SecurityError> {
        if frame_len(width, height) != Some(data.len()) {
            return Err(ValidationError::InvalidImage {
                width,
                height,
                len: data.len(),
            }
            .into());
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// An all-black frame, handy for demos and tests.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidImage`] when the frame size does not
    /// fit in memory addressing.
    pub fn blank(width: u32, height: u32) -> Result<Self, SecurityError> {
        let len = frame_len(width, height)
            .ok_or(ValidationError::InvalidImage { width, height, len: 0 })?;
        Self::rgb(width, height, vec![0; len])
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

fn frame_len(width: u32, height: u32) -> Option<usize> {
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)?
        .checked_mul(RGB_BYTES)
}
