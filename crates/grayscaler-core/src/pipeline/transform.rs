//! Grayscale conversion with PNG output.
//!
//! Decoding and encoding happen entirely in memory; there is no scratch file
//! to clean up on any exit path.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::ProcessingError;

/// Converts encoded images to single-channel PNGs.
pub struct Transformer {
    limits: LimitsConfig,
}

impl Transformer {
    /// Create a new transformer with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Convert an encoded image to a grayscale PNG on the blocking pool.
    ///
    /// The result is all-or-nothing: either the complete PNG or an error.
    pub async fn to_grayscale(&self, bytes: Vec<u8>) -> Result<Vec<u8>, ProcessingError> {
        let timeout_duration = Duration::from_millis(self.limits.transform_timeout_ms);

        let result = timeout(timeout_duration, async {
            tokio::task::spawn_blocking(move || Self::to_grayscale_sync(&bytes)).await
        })
        .await;

        match result {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => Err(ProcessingError::Task(e.to_string())),
            Err(_) => Err(ProcessingError::Timeout {
                timeout_ms: self.limits.transform_timeout_ms,
            }),
        }
    }

    /// Synchronous decode → luminance → PNG encode.
    ///
    /// Luminance uses the `image` crate's standard RGB weighting; alpha is
    /// dropped.
    pub fn to_grayscale_sync(bytes: &[u8]) -> Result<Vec<u8>, ProcessingError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ProcessingError::Decode(e.to_string()))?;

        let gray = DynamicImage::ImageLuma8(image.to_luma8());

        let mut buffer = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive);
        gray.write_with_encoder(encoder)
            .map_err(|e| ProcessingError::Encode(e.to_string()))?;

        Ok(buffer)
    }
}
