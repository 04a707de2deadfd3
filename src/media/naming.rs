//! Pin IDs and output filenames.

use std::path::{Path, PathBuf};

use crate::config::{FALLBACK_BASENAME, THUMBNAIL_EXTENSION, VIDEO_EXTENSION};

const PIN_SEGMENT: &str = "/pin/";

/// Returns the path segment after `/pin/`, up to the next `/` or the end.
///
/// `None` if the URL has no `/pin/` segment or the ID is empty.
pub fn extract_pin_id(url: &str) -> Option<&str> {
    let start = url.find(PIN_SEGMENT)? + PIN_SEGMENT.len();
    let rest = &url[start..];
    let id = rest.find('/').map_or(rest, |end| &rest[..end]);
    (!id.is_empty()).then_some(id)
}

/// Cuts a pin URL right after `/pin/<id>/`, dropping tracking segments and
/// query strings.
///
/// URLs without a `/pin/` segment, or without a `/` after the ID, are
/// returned unchanged.
pub fn sanitize_pin_url(url: &str) -> &str {
    let Some(pin) = url.find(PIN_SEGMENT) else {
        return url;
    };
    let id_start = pin + PIN_SEGMENT.len();
    match url[id_start..].find('/') {
        Some(end) => &url[..=id_start + end],
        None => url,
    }
}

fn base_name(page_url: &str) -> &str {
    extract_pin_id(page_url).unwrap_or(FALLBACK_BASENAME)
}

/// Where to save the video: the custom name verbatim, else `<pin_id>.mp4`.
pub fn video_filename(custom: Option<&Path>, page_url: &str) -> PathBuf {
    match custom {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(format!("{}.{VIDEO_EXTENSION}", base_name(page_url))),
    }
}

/// Where to save the thumbnail: the custom name with a `.jpg` extension,
/// else `<pin_id>.jpg`.
pub fn thumbnail_filename(custom: Option<&Path>, page_url: &str) -> PathBuf {
    match custom {
        Some(path) => path.with_extension(THUMBNAIL_EXTENSION),
        None => PathBuf::from(format!("{}.{THUMBNAIL_EXTENSION}", base_name(page_url))),
    }
}
