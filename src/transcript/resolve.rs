/// URL markers that precede a video identifier, tried in this order.
/// Covers watch URLs (`v=`), short links (`youtu.be/`), embeds and shorts.
const URL_MARKERS: [&str; 4] = ["v=", "be/", "embed/", "shorts/"];

/// Extract a video identifier from the various YouTube URL shapes.
///
/// The identifier is the run of characters after a marker up to (but not
/// including) the first `&`, `#` or `?`. The first marker that yields a
/// non-empty token wins. Returns `None` when no marker is present; callers
/// treat that as "not a recognizable YouTube URL", not as a failure.
pub fn extract_video_id(url: &str) -> Option<&str> {
    for marker in URL_MARKERS {
        for (pos, _) in url.match_indices(marker) {
            let rest = &url[pos + marker.len()..];
            let end = rest
                .find(|c| matches!(c, '&' | '#' | '?'))
                .unwrap_or(rest.len());
            if end > 0 {
                return Some(&rest[..end]);
            }
        }
    }

    None
}
