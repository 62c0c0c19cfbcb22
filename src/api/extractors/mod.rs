//! Custom request extractors.

mod multipart;
mod validated_json;

pub use multipart::{UploadForm, UploadedFile};
pub use validated_json::ValidatedJson;
