//! Filename validation before any bytes are touched.

use crate::error::InvalidInput;
use crate::types::UploadedImage;

/// Extensions accepted for uploads (compared lowercase).
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Gates uploads on their declared filename.
pub struct Validator;

impl Validator {
    /// Check whether a filename has an allowed extension.
    ///
    /// The suffix after the final `.` must be one of [`ALLOWED_EXTENSIONS`],
    /// case-insensitively. Names without a `.` are rejected.
    pub fn is_allowed(filename: &str) -> bool {
        match filename.rsplit_once('.') {
            Some((_, ext)) => {
                let ext = ext.to_lowercase();
                ALLOWED_EXTENSIONS.contains(&ext.as_str())
            }
            None => false,
        }
    }

    /// Validate a source/dest pair.
    ///
    /// Missing filenames are reported before bad extensions, across both
    /// uploads.
    pub fn validate_pair(source: &UploadedImage, dest: &UploadedImage) -> Result<(), InvalidInput> {
        let (source_name, dest_name) = match (non_empty(source), non_empty(dest)) {
            (Some(s), Some(d)) => (s, d),
            _ => return Err(InvalidInput::NoFileSelected),
        };

        if !(Self::is_allowed(source_name) && Self::is_allowed(dest_name)) {
            return Err(InvalidInput::InvalidFormat);
        }

        Ok(())
    }
}

fn non_empty(upload: &UploadedImage) -> Option<&str> {
    upload.filename.as_deref().filter(|name| !name.is_empty())
}
