//! Validation for the `[upload]` section.

use crate::schema::LoanchatConfig;

use super::helpers::validate_range;

const MAX_CONFIGURABLE_UPLOAD: u64 = 100 * 1024 * 1024;

pub(crate) fn validate_upload(errors: &mut Vec<String>, config: &LoanchatConfig) {
    let upload = &config.upload;

    if upload.allowed_mime_types.is_empty() {
        errors.push("upload.allowed_mime_types must not be empty".into());
    }
    for mime in &upload.allowed_mime_types {
        if !mime.contains('/') {
            errors.push(format!("upload.allowed_mime_types entry '{mime}' is not a MIME type"));
        }
    }

    validate_range(
        errors,
        "upload.max_size_bytes",
        upload.max_size_bytes,
        1,
        MAX_CONFIGURABLE_UPLOAD,
    );
}
