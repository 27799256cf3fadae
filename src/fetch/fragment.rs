/// Thumbnail-fragment parsing
///
/// The fragment endpoint responds with pre-rendered markup, one entry per
/// selectable image:
///
/// ```html
/// <li><img src="<url>" uk-tooltip="<info>" data-filename="<name>" data-pageid="<id>"></li>
/// ```
///
/// Only the `img` entries matter here; surrounding markup is skipped.
/// Attributes that are absent substitute empty strings; downstream code
/// accepts any string, the fragment is trusted content from the same host.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::FetchError;

/// One parsed thumbnail entry from the fragment
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbEntry {
    /// URL of the thumbnail image itself
    pub src: String,
    /// Tooltip/info text, used as the caption on selection
    pub info: String,
    /// Filename recorded in the selection value
    pub filename: String,
    /// Source page identifier recorded in the selection value
    pub pageid: String,
}

/// Parse every `img` entry out of a thumbnail fragment.
pub fn parse_fragment(body: &str) -> Result<Vec<ThumbEntry>, FetchError> {
    let mut reader = Reader::from_str(body);
    // The fragment is HTML, not XML: img tags are usually unclosed
    reader.check_end_names(false);
    reader.trim_text(true);

    let mut entries = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                if e.name().as_ref() == b"img" {
                    entries.push(entry_from_attributes(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}

fn entry_from_attributes(element: &BytesStart<'_>) -> ThumbEntry {
    let mut entry = ThumbEntry {
        src: String::new(),
        info: String::new(),
        filename: String::new(),
        pageid: String::new(),
    };

    for attr in element.attributes().flatten() {
        let value = attr
            .unescape_value()
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());

        match attr.key.as_ref() {
            b"src" => entry.src = value,
            b"uk-tooltip" => entry.info = value,
            b"data-filename" => entry.filename = value,
            b"data-pageid" => entry.pageid = value,
            _ => {}
        }
    }

    entry
}
