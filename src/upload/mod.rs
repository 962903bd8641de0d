// Upload staging: previews, validation, and batch preparation

pub mod staging;

pub use staging::{DropOutcome, PreviewPhoto, UploadStaging, MAX_UPLOAD_DIMENSION};
