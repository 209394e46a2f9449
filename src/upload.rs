//! File-upload checks for spreadsheet imports.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use crate::config::{LIMIT_PLACEHOLDER, PageConfig};
use crate::page::{FileInfo, Page};

/// Why a selected file was refused. Checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("file is {size} bytes; limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
    #[error("unsupported file type: {mime:?}")]
    UnsupportedType { mime: String },
}

/// Check size first, then declared type. A file exactly at the limit passes.
pub fn check_file(file: &FileInfo, config: &PageConfig) -> Result<(), UploadRejection> {
    if file.size > config.max_upload_bytes {
        return Err(UploadRejection::TooLarge { size: file.size, limit: config.max_upload_bytes });
    }
    if !config.accepted_upload_types.iter().any(|t| *t == file.mime) {
        return Err(UploadRejection::UnsupportedType { mime: file.mime.clone() });
    }
    Ok(())
}

/// User-facing text for a rejection.
#[must_use]
pub fn rejection_message(rejection: &UploadRejection, config: &PageConfig) -> String {
    match rejection {
        UploadRejection::TooLarge { limit, .. } => {
            config.messages.upload_too_large.replace(LIMIT_PLACEHOLDER, &size_label(*limit))
        }
        UploadRejection::UnsupportedType { .. } => config.messages.upload_wrong_type.clone(),
    }
}

/// Short size text: whole MiB as `16MB`, whole KiB as `512KB`, otherwise bytes.
#[must_use]
pub fn size_label(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * KIB;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{bytes} bytes")
    }
}

/// Whether `node` is an `<input type="file">`.
pub fn is_file_input<P: Page>(page: &P, node: &P::Node) -> bool {
    page.attribute(node, "type").is_some_and(|t| t.eq_ignore_ascii_case("file"))
}

/// Validate the file selected in `input`. Refused selections are cleared.
///
/// Returns the rejection so the caller can tell the user; `Ok` also covers
/// inputs with nothing selected.
pub fn validate_selection<P: Page>(page: &mut P, input: &P::Node, config: &PageConfig) -> Result<(), UploadRejection> {
    let Some(file) = page.selected_file(input) else {
        return Ok(());
    };
    if let Err(rejection) = check_file(&file, config) {
        log::info!("rejected upload {:?}: {rejection}", file.name);
        page.set_value(input, "");
        return Err(rejection);
    }
    Ok(())
}
