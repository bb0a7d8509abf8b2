use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Caption payload encodings we know how to handle.
///
/// `json3` and `srv3` are YouTube's timed-JSON encodings; the rest are
/// line-based subtitle formats. Anything else is carried through as
/// `Other` so the line-based parser can still take a swing at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionFormat {
    Json3,
    Srv3,
    Vtt,
    Ttml,
    Xml,
    Srt,
    Other(String),
}

impl CaptionFormat {
    pub fn from_ext(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "json3" => CaptionFormat::Json3,
            "srv3" => CaptionFormat::Srv3,
            "vtt" => CaptionFormat::Vtt,
            "ttml" => CaptionFormat::Ttml,
            "xml" => CaptionFormat::Xml,
            "srt" => CaptionFormat::Srt,
            other => CaptionFormat::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CaptionFormat::Json3 => "json3",
            CaptionFormat::Srv3 => "srv3",
            CaptionFormat::Vtt => "vtt",
            CaptionFormat::Ttml => "ttml",
            CaptionFormat::Xml => "xml",
            CaptionFormat::Srt => "srt",
            CaptionFormat::Other(ext) => ext,
        }
    }

    /// Whether this format carries timed-JSON events rather than cue lines.
    pub fn is_timed_json(&self) -> bool {
        matches!(self, CaptionFormat::Json3 | CaptionFormat::Srv3)
    }
}

/// Format preference within a language, best first.
const FORMAT_PREFERENCE: [CaptionFormat; 6] = [
    CaptionFormat::Json3,
    CaptionFormat::Srv3,
    CaptionFormat::Vtt,
    CaptionFormat::Ttml,
    CaptionFormat::Xml,
    CaptionFormat::Srt,
];

/// Where a caption track came from. Informational only: the selection
/// policy pools both origins per language and does not rank by origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOrigin {
    Manual,
    AutoGenerated,
}

/// One fetchable caption resource.
#[derive(Debug, Clone)]
pub struct CaptionTrack {
    /// Language tag, e.g. "en" or "en-US".
    pub language: String,

    /// Payload encoding of the resource.
    pub format: CaptionFormat,

    /// Fetchable locator; may be absent or empty in provider listings.
    pub url: Option<String>,

    /// Human-authored vs auto-generated.
    pub origin: TrackOrigin,
}

impl CaptionTrack {
    /// The locator, if it is actually usable.
    pub fn fetchable_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Raw caption track entry as reported by the fallback provider.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCaptionTrack {
    #[serde(default)]
    pub ext: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

/// A fallback provider's capability listing: human-authored subtitles and
/// auto-generated captions, each keyed by language tag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptionListing {
    #[serde(default)]
    pub subtitles: HashMap<String, Vec<RawCaptionTrack>>,

    #[serde(default)]
    pub automatic_captions: HashMap<String, Vec<RawCaptionTrack>>,
}

/// Catalog of caption tracks keyed by language tag. Built once per
/// acquisition attempt and discarded after selection.
pub type CaptionCatalog = BTreeMap<String, Vec<CaptionTrack>>;

/// Merge a provider listing into a single catalog, pooling human-authored
/// and auto-generated tracks for the same language.
pub fn build_catalog(listing: &CaptionListing) -> CaptionCatalog {
    let mut catalog = CaptionCatalog::new();

    let sources = [
        (TrackOrigin::Manual, &listing.subtitles),
        (TrackOrigin::AutoGenerated, &listing.automatic_captions),
    ];

    for (origin, tracks_by_language) in sources {
        for (language, tracks) in tracks_by_language {
            let pooled = catalog.entry(language.clone()).or_default();
            for raw in tracks {
                pooled.push(CaptionTrack {
                    language: language.clone(),
                    format: CaptionFormat::from_ext(raw.ext.as_deref().unwrap_or("")),
                    url: raw.url.clone(),
                    origin,
                });
            }
        }
    }

    catalog
}

/// Pick the single best caption track from a catalog.
///
/// Language correctness dominates format preference: the preferred
/// languages are tried first (in order), then every other language in the
/// catalog. Within a language the format preference list is scanned, and
/// if nothing there matches, any track with a usable locator is accepted.
pub fn select_track<'a>(
    catalog: &'a CaptionCatalog,
    preferred_languages: &[String],
) -> Option<&'a CaptionTrack> {
    if catalog.is_empty() {
        return None;
    }

    let mut language_order: Vec<&str> =
        preferred_languages.iter().map(String::as_str).collect();
    for language in catalog.keys() {
        if !preferred_languages.iter().any(|preferred| preferred == language) {
            language_order.push(language.as_str());
        }
    }

    for language in language_order {
        let Some(tracks) = catalog.get(language) else {
            continue;
        };
        if tracks.is_empty() {
            continue;
        }

        for format in &FORMAT_PREFERENCE {
            if let Some(track) = tracks
                .iter()
                .find(|track| &track.format == format && track.fetchable_url().is_some())
            {
                return Some(track);
            }
        }

        // No preferred format in this language: take anything fetchable.
        if let Some(track) = tracks.iter().find(|track| track.fetchable_url().is_some()) {
            return Some(track);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_track(ext: &str, url: &str) -> RawCaptionTrack {
        RawCaptionTrack {
            ext: Some(ext.to_string()),
            url: Some(url.to_string()),
        }
    }

    fn preferred() -> Vec<String> {
        vec!["en".to_string(), "en-US".to_string(), "en-GB".to_string()]
    }

    #[test]
    fn merge_pools_manual_and_auto_tracks() {
        let mut listing = CaptionListing::default();
        listing
            .subtitles
            .insert("en".to_string(), vec![raw_track("vtt", "https://c/manual.vtt")]);
        listing.automatic_captions.insert(
            "en".to_string(),
            vec![raw_track("json3", "https://c/auto.json3")],
        );

        let catalog = build_catalog(&listing);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog["en"].len(), 2);
        assert_eq!(catalog["en"][0].origin, TrackOrigin::Manual);
        assert_eq!(catalog["en"][1].origin, TrackOrigin::AutoGenerated);
    }

    #[test]
    fn language_priority_beats_catalog_order() {
        let mut listing = CaptionListing::default();
        listing
            .subtitles
            .insert("fr".to_string(), vec![raw_track("vtt", "https://c/fr.vtt")]);
        listing.subtitles.insert(
            "en".to_string(),
            vec![
                raw_track("srt", "https://c/en.srt"),
                raw_track("json3", "https://c/en.json3"),
            ],
        );

        let catalog = build_catalog(&listing);
        let track = select_track(&catalog, &preferred()).expect("a track");

        // English wins over French, and json3 wins over srt within English.
        assert_eq!(track.language, "en");
        assert_eq!(track.format, CaptionFormat::Json3);
        assert_eq!(track.fetchable_url(), Some("https://c/en.json3"));
    }

    #[test]
    fn format_agnostic_fallback_within_language() {
        let mut listing = CaptionListing::default();
        listing.automatic_captions.insert(
            "de".to_string(),
            vec![raw_track("m3u8", "https://c/de.m3u8")],
        );

        let catalog = build_catalog(&listing);
        let track = select_track(&catalog, &preferred()).expect("a track");

        assert_eq!(track.language, "de");
        assert_eq!(track.format, CaptionFormat::Other("m3u8".to_string()));
    }

    #[test]
    fn empty_catalog_selects_nothing() {
        let catalog = build_catalog(&CaptionListing::default());
        assert!(select_track(&catalog, &preferred()).is_none());
    }

    #[test]
    fn tracks_without_locator_are_skipped() {
        let mut listing = CaptionListing::default();
        listing.subtitles.insert(
            "en".to_string(),
            vec![RawCaptionTrack {
                ext: Some("json3".to_string()),
                url: None,
            }],
        );
        listing
            .subtitles
            .insert("fr".to_string(), vec![raw_track("vtt", "https://c/fr.vtt")]);

        let catalog = build_catalog(&listing);
        let track = select_track(&catalog, &preferred()).expect("a track");
        assert_eq!(track.language, "fr");
    }

    #[test]
    fn format_matching_is_case_insensitive() {
        assert_eq!(CaptionFormat::from_ext("JSON3"), CaptionFormat::Json3);
        assert_eq!(CaptionFormat::from_ext("Srv3"), CaptionFormat::Srv3);
        assert!(CaptionFormat::from_ext("SRV3").is_timed_json());
    }
}
