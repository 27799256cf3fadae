/// Fragment-endpoint URL construction
///
/// The host exposes one endpoint that renders a thumbnail listing for a
/// page/folder. The query format is a compatibility contract with that
/// endpoint, so the parameters are appended verbatim with no extra encoding.

use crate::state::panel::PanelSource;

/// Build the fetch URL for a panel source.
///
/// The base URL already carries a query string, so every parameter is
/// appended with '&':
/// `<base>&pageid=<id>[&folderpath=<path>][&imagesfields[<i>]=<field> ...]`
pub fn thumbnails_url(base: &str, source: &PanelSource) -> String {
    let mut url = format!("{}&pageid={}", base, source.pageid);

    if let Some(folderpath) = &source.folderpath {
        if !folderpath.is_empty() {
            url.push_str("&folderpath=");
            url.push_str(folderpath);
        }
    }

    for (index, field) in source.images_fields.iter().enumerate() {
        url.push_str(&format!("&imagesfields[{}]={}", index, field));
    }

    url
}
