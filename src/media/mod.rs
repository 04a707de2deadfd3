//! Pinterest page scraping and output naming.
//!
//! Pin pages embed their media in a JSON blob whose layout has changed over
//! time; the video URL is located through a list of known anchors, newest
//! first. Output files are named after the pin ID unless the user picked a
//! name.

mod naming;
mod scrape;

pub use naming::{extract_pin_id, sanitize_pin_url, thumbnail_filename, video_filename};
pub use scrape::{find_thumbnail_url, find_video_url};
