//! Simulated cat detector.

use std::collections::VecDeque;
use std::future::Future;

use tokio::sync::Mutex;

use catpoint_app::ports::ImageAnalysis;
use catpoint_domain::error::SecurityError;
use catpoint_domain::image::Image;

#[derive(Debug)]
enum Mode {
    Fixed(bool),
    Scripted(Mutex<VecDeque<bool>>),
    Brightness,
    Unavailable,
}

/// [`ImageAnalysis`] stand-in with predictable verdicts.
#[derive(Debug)]
pub struct FakeImageAnalysis {
    mode: Mode,
}

impl FakeImageAnalysis {
    /// Always answer `present`.
    #[must_use]
    pub fn always(present: bool) -> Self {
        Self {
            mode: Mode::Fixed(present),
        }
    }

    /// Answer with `verdicts` in order, then "no cat" once they run out.
    #[must_use]
    pub fn scripted(verdicts: impl IntoIterator<Item = bool>) -> Self {
        Self {
            mode: Mode::Scripted(Mutex::new(verdicts.into_iter().collect())),
        }
    }

    /// Treat mean pixel brightness as the detector's confidence, in percent.
    /// Brighter frames look more like a cat.
    #[must_use]
    pub fn brightness() -> Self {
        Self {
            mode: Mode::Brightness,
        }
    }

    /// Fail every call, as an unreachable detection service would.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            mode: Mode::Unavailable,
        }
    }
}

/// Mean byte value of the frame scaled to `0..=100`. An empty frame scores 0.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn brightness_confidence(image: &Image) -> f32 {
    let data = image.data();
    if data.is_empty() {
        return 0.0;
    }
    let total: u64 = data.iter().map(|&b| u64::from(b)).sum();
    let mean = total as f64 / data.len() as f64;
    (mean / 255.0 * 100.0) as f32
}

impl ImageAnalysis for FakeImageAnalysis {
    fn image_contains_cat(
        &self,
        image: &Image,
        confidence_threshold: f32,
    ) -> impl Future<Output = Result<bool, SecurityError>> + Send {
        async move {
            match &self.mode {
                Mode::Fixed(present) => Ok(*present),
                Mode::Scripted(verdicts) => Ok(verdicts.lock().await.pop_front().unwrap_or(false)),
                Mode::Brightness => Ok(brightness_confidence(image) >= confidence_threshold),
                Mode::Unavailable => Err(SecurityError::image_analysis(
                    "image analysis service unreachable",
                )),
            }
        }
    }
}
