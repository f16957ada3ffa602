//! Media file acceptance and storage

use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use dugout_db::entities::media::MediaKind;

/// Largest accepted file part
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Room for the text fields and multipart framing on top of the file
pub const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Public path prefix the upload directory is served under
pub const UPLOADS_PREFIX: &str = "/uploads";

const ALLOWED_TYPES: [&str; 7] = ["jpeg", "jpg", "png", "gif", "mp4", "mov", "avi"];

/// Lower-cased extension of `filename` when it is an accepted media type.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_TYPES.contains(&ext.as_str()).then_some(ext)
}

fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// The declared MIME type must be an image or video whose subtype is one of
/// the accepted names, or one of the types registered for `ext`
/// (`video/quicktime` for `.mov`, `video/x-msvideo` for `.avi`).
pub fn mime_matches(content_type: &str, ext: &str) -> bool {
    let essence = essence(content_type);
    let Some((top, subtype)) = essence.split_once('/') else {
        return false;
    };
    if top != "image" && top != "video" {
        return false;
    }

    ALLOWED_TYPES.contains(&subtype)
        || mime_guess::from_ext(ext)
            .iter()
            .any(|known| known.essence_str() == essence)
}

/// Accept or reject a file part by name and declared type; returns the
/// extension to store under.
pub fn check_media_type(filename: Option<&str>, content_type: Option<&str>) -> Option<String> {
    let ext = allowed_extension(filename?)?;
    mime_matches(content_type?, &ext).then_some(ext)
}

pub fn media_kind(content_type: &str) -> MediaKind {
    if essence(content_type).starts_with("image/") {
        MediaKind::Image
    } else {
        MediaKind::Video
    }
}

/// `file-<unix millis>-<random>.<ext>`
pub fn stored_file_name(ext: &str) -> String {
    format!(
        "file-{}-{}.{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        ext
    )
}

pub fn public_url(file_name: &str) -> String {
    format!("{}/{}", UPLOADS_PREFIX, file_name)
}

/// Write the file into `dir`, creating the directory if needed.
pub async fn save(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(file_name), bytes).await
}
