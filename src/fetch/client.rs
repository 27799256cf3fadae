/// Async thumbnail fetching
///
/// Fetches the thumbnail fragment for one panel, parses it, then downloads
/// and decodes each listed image. Runs on the executor behind
/// `Task::perform`; the result comes back into the update loop as a message.

use iced::widget::image::Handle;
use image::imageops::FilterType;
use tokio::task;

use super::fragment::{self, ThumbEntry};
use super::FetchError;
use crate::state::panel::Thumbnail;

/// Display size of fetched thumbnails (square bound)
const THUMBNAIL_SIZE: u32 = 256;

/// Fetch and decode a panel's thumbnail listing.
///
/// Errors are stringified at this boundary so the result can travel
/// inside a `Clone` message.
pub async fn fetch_thumbnails(
    client: reqwest::Client,
    url: String,
) -> Result<Vec<Thumbnail>, String> {
    fetch_thumbnails_inner(client, url)
        .await
        .map_err(|e| e.to_string())
}

async fn fetch_thumbnails_inner(
    client: reqwest::Client,
    url: String,
) -> Result<Vec<Thumbnail>, FetchError> {
    let entries = fetch_fragment(&client, &url).await?;

    // Download and decode each listed image. A broken image never fails
    // the panel; the entry stays selectable with a placeholder.
    let mut thumbnails = Vec::with_capacity(entries.len());
    for entry in entries {
        let handle = match fetch_image(&client, &entry.src).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                eprintln!("⚠️  Could not load thumbnail {}: {}", entry.src, e);
                None
            }
        };
        thumbnails.push(Thumbnail { entry, handle });
    }

    Ok(thumbnails)
}

/// GET the fragment with the AJAX marker header so the host renders a
/// fragment instead of a full page.
async fn fetch_fragment(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<ThumbEntry>, FetchError> {
    let response = client
        .get(url)
        .header("X-Requested-With", "XMLHttpRequest")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    let body = response.text().await?;
    fragment::parse_fragment(&body)
}

/// Download one image and decode it into a display handle.
async fn fetch_image(client: &reqwest::Client, src: &str) -> Result<Handle, FetchError> {
    let response = client.get(src).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    let bytes = response.bytes().await?.to_vec();

    // Decoding and resizing are CPU-bound, keep them off the UI thread
    let handle = task::spawn_blocking(move || decode_thumbnail(&bytes)).await?;
    Ok(handle)
}

/// Decode image bytes and resize them down to thumbnail size.
/// Undecodable bytes fall back to a 1x1 transparent pixel.
fn decode_thumbnail(bytes: &[u8]) -> Handle {
    match image::load_from_memory(bytes) {
        Ok(img) => {
            let thumbnail = img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3);
            let rgba = thumbnail.to_rgba8();
            let (width, height) = rgba.dimensions();
            Handle::from_rgba(width, height, rgba.into_raw())
        }
        Err(e) => {
            eprintln!("⚠️  Thumbnail decode failed: {}", e);
            Handle::from_rgba(1, 1, vec![0u8; 4])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_garbage_falls_back_to_placeholder() {
        // Must not panic on arbitrary bytes
        let _handle = decode_thumbnail(b"not an image");
    }

    #[test]
    fn test_decode_valid_png() {
        // Minimal 1x1 PNG, encoded in-process to keep the test honest
        let mut bytes = Vec::new();
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 0, 255]));
        image::DynamicImage::ImageRgba8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();

        let _handle = decode_thumbnail(&bytes);
    }
}
