mod client;
mod coordinator;
pub mod picker;
mod state;
mod types;

pub use client::{HttpUploader, Uploader};
pub use coordinator::{BatchCoordinator, BATCH_IN_FLIGHT};
pub use picker::{ImagePicker, Picked};
pub use state::{progress_percent, BatchState};
pub use types::{
    BatchReport, FileId, Payload, ProgressFn, SelectedFile, UploadReceipt, UploadStatus,
    UploadedFile,
};
