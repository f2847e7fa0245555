//! Image-analysis port: the cat detector behind the camera.

use std::future::Future;

use catpoint_domain::error::SecurityError;
use catpoint_domain::image::Image;

/// Decides whether a camera frame depicts a cat.
pub trait ImageAnalysis: Send + Sync {
    /// `true` when the detector is at least `confidence_threshold` percent
    /// sure the image contains a cat.
    fn image_contains_cat(
        &self,
        image: &Image,
        confidence_threshold: f32,
    ) -> impl Future<Output = Result<bool, SecurityError>> + Send;
}

impl<T: ImageAnalysis> ImageAnalysis for std::sync::Arc<T> {
    fn image_contains_cat(
        &self,
        image: &Image,
        confidence_threshold: f32,
    ) -> impl Future<Output = Result<bool, SecurityError>> + Send {
        (**self).image_contains_cat(image, confidence_threshold)
    }
}
