use iced::widget::image::Handle;

use crate::fetch::fragment::ThumbEntry;

/// Where a panel's thumbnails come from: one page/folder on the host.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSource {
    /// Source page identifier; empty until assigned for dynamic panels
    pub pageid: String,
    /// Optional folder-path qualifier below the page
    pub folderpath: Option<String>,
    /// Image-field names to include in the listing, in order
    pub images_fields: Vec<String>,
}

impl PanelSource {
    pub fn page(pageid: impl Into<String>) -> Self {
        PanelSource {
            pageid: pageid.into(),
            folderpath: None,
            images_fields: Vec::new(),
        }
    }
}

/// One selectable entry in a loaded panel
#[derive(Debug, Clone)]
pub struct Thumbnail {
    /// Attributes parsed from the server fragment
    pub entry: ThumbEntry,
    /// Decoded image, None when the image itself could not be loaded
    pub handle: Option<Handle>,
}

/// Cache state of a panel's thumbnail listing.
///
/// Explicit, rather than derived from what the content area happens to
/// contain. `Loading` carries the sequence number of the request it is
/// waiting for; completions with any other number are stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Never fetched
    Unloaded,
    /// A fetch with this sequence number is in flight
    Loading { seq: u64 },
    /// Fetch completed; a non-empty listing is trusted until a forced
    /// refresh, an empty one is fetched again on the next expand
    Loaded,
    /// Last fetch failed; the next expand fetches again
    Failed,
}

/// A collapsible container of lazily loaded thumbnails for one source.
#[derive(Debug, Clone)]
pub struct ThumbnailPanel {
    pub title: String,
    pub source: PanelSource,
    /// True for the any-page panel whose source is picked at runtime
    pub dynamic: bool,
    pub expanded: bool,
    pub load: LoadState,
    pub thumbnails: Vec<Thumbnail>,
    /// Chosen page title shown on the dynamic panel's header
    pub label: String,
    /// Presentational show/hide flag for the dynamic panel
    pub visible: bool,
    /// Last issued request number; increases on every fetch
    seq: u64,
}

impl ThumbnailPanel {
    pub fn new(title: impl Into<String>, source: PanelSource) -> Self {
        ThumbnailPanel {
            title: title.into(),
            source,
            dynamic: false,
            expanded: false,
            load: LoadState::Unloaded,
            thumbnails: Vec::new(),
            label: String::new(),
            visible: true,
            seq: 0,
        }
    }

    /// The any-page panel: no source until the host's page picker assigns
    /// one, hidden until then.
    pub fn new_dynamic(title: impl Into<String>) -> Self {
        ThumbnailPanel {
            dynamic: true,
            visible: false,
            ..ThumbnailPanel::new(title, PanelSource::page(""))
        }
    }

    /// Lazy policy, called when the panel transitions to expanded.
    ///
    /// Fetches from `Unloaded`, `Failed`, or a `Loaded` panel whose
    /// listing came back empty, so images added server-side show up on
    /// the next expand. A panel holding at least one thumbnail is
    /// trusted, and `Loading` means a request is already in flight.
    pub fn maybe_load(&mut self) -> Option<u64> {
        match self.load {
            LoadState::Unloaded | LoadState::Failed => Some(self.begin_fetch()),
            LoadState::Loaded if self.thumbnails.is_empty() => Some(self.begin_fetch()),
            LoadState::Loading { .. } | LoadState::Loaded => None,
        }
    }

    /// Forced refresh: discard content and fetch unconditionally.
    ///
    /// This is the only transition out of `Loaded` back to `Loading`. The
    /// bumped sequence number retires any fetch still in flight.
    pub fn force_load(&mut self) -> u64 {
        self.thumbnails.clear();
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> u64 {
        self.seq += 1;
        self.load = LoadState::Loading { seq: self.seq };
        self.seq
    }

    /// Apply a completed fetch. Returns false when the completion was
    /// stale (a newer request superseded it) and nothing changed.
    pub fn finish_load(&mut self, seq: u64, result: Result<Vec<Thumbnail>, String>) -> bool {
        match self.load {
            LoadState::Loading { seq: current } if current == seq => {
                match result {
                    Ok(thumbnails) => {
                        self.thumbnails = thumbnails;
                        self.load = LoadState::Loaded;
                    }
                    Err(e) => {
                        // Indicator stays up, no automatic retry
                        eprintln!("⚠️  Thumbnail fetch failed for '{}': {}", self.title, e);
                        self.load = LoadState::Failed;
                    }
                }
                true
            }
            _ => {
                println!("Ignoring stale thumbnail response for '{}'", self.title);
                false
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thumb(filename: &str, pageid: &str) -> Thumbnail {
        Thumbnail {
            entry: ThumbEntry {
                src: format!("http://host/t/{}", filename),
                info: filename.to_string(),
                filename: filename.to_string(),
                pageid: pageid.to_string(),
            },
            handle: None,
        }
    }

    #[test]
    fn test_first_expand_fetches_once() {
        let mut panel = ThumbnailPanel::new("Gallery", PanelSource::page("42"));

        let first = panel.maybe_load();
        assert!(first.is_some());
        assert!(panel.is_loading());

        // A second expand while the request is in flight issues nothing
        assert_eq!(panel.maybe_load(), None);
    }

    #[test]
    fn test_loaded_panel_never_refetches_on_expand() {
        let mut panel = ThumbnailPanel::new("Gallery", PanelSource::page("42"));

        let seq = panel.maybe_load().unwrap();
        assert!(panel.finish_load(seq, Ok(vec![thumb("foo.jpg", "42")])));
        assert_eq!(panel.load, LoadState::Loaded);

        // Any number of expand/collapse cycles trust the cache
        assert_eq!(panel.maybe_load(), None);
        assert_eq!(panel.maybe_load(), None);
        assert_eq!(panel.thumbnails.len(), 1);
    }

    #[test]
    fn test_failed_fetch_retries_on_next_expand() {
        let mut panel = ThumbnailPanel::new("Gallery", PanelSource::page("42"));

        let seq = panel.maybe_load().unwrap();
        assert!(panel.finish_load(seq, Err("boom".to_string())));
        assert_eq!(panel.load, LoadState::Failed);

        // The next expand naturally issues a retry
        assert!(panel.maybe_load().is_some());
    }

    #[test]
    fn test_force_load_discards_loaded_content() {
        let mut panel = ThumbnailPanel::new("Gallery", PanelSource::page("42"));

        let seq = panel.maybe_load().unwrap();
        panel.finish_load(seq, Ok(vec![thumb("foo.jpg", "42")]));

        let forced = panel.force_load();
        assert!(forced > seq);
        assert!(panel.thumbnails.is_empty());
        assert!(panel.is_loading());
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut panel = ThumbnailPanel::new("Gallery", PanelSource::page("42"));

        let old_seq = panel.maybe_load().unwrap();
        // A forced refresh overlaps the in-flight fetch
        let new_seq = panel.force_load();

        // The older response arrives last but must not win
        assert!(!panel.finish_load(old_seq, Ok(vec![thumb("stale.jpg", "42")])));
        assert!(panel.thumbnails.is_empty());
        assert!(panel.is_loading());

        assert!(panel.finish_load(new_seq, Ok(vec![thumb("fresh.jpg", "42")])));
        assert_eq!(panel.thumbnails[0].entry.filename, "fresh.jpg");
    }

    #[test]
    fn test_empty_listing_refetches_on_next_expand() {
        let mut panel = ThumbnailPanel::new("Gallery", PanelSource::page("42"));

        // The page had no images yet
        let seq = panel.maybe_load().unwrap();
        assert!(panel.finish_load(seq, Ok(vec![])));
        assert_eq!(panel.load, LoadState::Loaded);

        // An empty listing is not trusted content; the next expand asks
        // again and picks up images added server-side in the meantime
        let retry = panel.maybe_load().unwrap();
        assert!(retry > seq);
        assert!(panel.finish_load(retry, Ok(vec![thumb("new.jpg", "42")])));

        // Now the panel holds content and the cache is trusted
        assert_eq!(panel.maybe_load(), None);
    }

    #[test]
    fn test_completion_after_loaded_is_ignored() {
        let mut panel = ThumbnailPanel::new("Gallery", PanelSource::page("42"));

        let seq = panel.maybe_load().unwrap();
        panel.finish_load(seq, Ok(vec![thumb("keep.jpg", "42")]));

        assert!(!panel.finish_load(seq, Ok(vec![thumb("dup.jpg", "42")])));
        assert_eq!(panel.thumbnails.len(), 1);
        assert_eq!(panel.thumbnails[0].entry.filename, "keep.jpg");
    }

    #[test]
    fn test_dynamic_panel_starts_hidden_without_source() {
        let panel = ThumbnailPanel::new_dynamic("From any page");
        assert!(panel.dynamic);
        assert!(!panel.visible);
        assert_eq!(panel.source.pageid, "");
        assert_eq!(panel.label, "");
    }
}
