//! Media URL extraction from pin page HTML.

/// Anchors preceding the 720p video entry, newest page layout first.
const VIDEO_ANCHORS: &[&str] = &[
    r#""v720P":{"thumbnail":"#,
    r#""videoList720P":{"v720P":{"thumbnail""#,
    r#""video_list":{"V_720P""#,
    r#""videoList":{"V_720P""#,
    r#""v720P":{"url""#,
];

const URL_MARKER: &str = r#""url":""#;
const OG_IMAGE_MARKER: &str = r#"<meta property="og:image" content=""#;
const THUMBNAIL_ANCHOR: &str = r#""v720P":{"thumbnail":""#;
const THUMBNAIL_MARKER: &str = r#""thumbnail":""#;

/// Returns the text between the first `marker` at or after `from` and the
/// next double quote.
fn quoted_after<'a>(html: &'a str, from: usize, marker: &str) -> Option<&'a str> {
    let start = from + html[from..].find(marker)? + marker.len();
    let len = html[start..].find('"')?;
    Some(&html[start..start + len])
}

/// Finds the 720p video URL in a pin page.
///
/// For each anchor in turn, takes the first `"url":"…"` value after it.
/// An anchor with no complete URL value after it is skipped.
pub fn find_video_url(html: &str) -> Option<&str> {
    VIDEO_ANCHORS.iter().find_map(|anchor| {
        let at = html.find(anchor)?;
        quoted_after(html, at, URL_MARKER)
    })
}

/// Finds the cover image URL in a pin page.
///
/// Prefers the Open Graph image; falls back to the `thumbnail` value of the
/// 720p video entry.
pub fn find_thumbnail_url(html: &str) -> Option<&str> {
    quoted_after(html, 0, OG_IMAGE_MARKER).or_else(|| {
        let at = html.find(THUMBNAIL_ANCHOR)?;
        quoted_after(html, at, THUMBNAIL_MARKER)
    })
}
