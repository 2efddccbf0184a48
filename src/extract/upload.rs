//! Upload metadata extraction

use crate::extract::diagnostic::EntryContext;
use crate::extract::{element_text, DiagnosticField};
use crate::resource::Upload;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static INLINE_BLOCK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.inlineBlock").expect("inline block selector is valid"));

const UPLOAD_MARKER: &str = "ago by";

const UPLOADER_SEPARATOR: &str = " by ";

/// Finds the `"<time> ago by <user>"` fragment of an entry
///
/// Only the first fragment that reads like upload metadata is considered. If
/// it cannot be split, the upload is left absent rather than half-filled.
pub(crate) fn extract_upload(container: ElementRef, ctx: &mut EntryContext) -> Option<Upload> {
    let fragment = container
        .select(&INLINE_BLOCK)
        .map(element_text)
        .find(|text| text.contains(UPLOAD_MARKER))?;

    let upload = split_upload(&fragment);
    if upload.is_none() {
        ctx.note(
            DiagnosticField::Upload,
            format!("could not split upload text '{}'", fragment),
        );
    }
    upload
}

/// Splits `"2h ago by Han_Solo"` into its time and uploader halves
///
/// The split happens once, at the first `" by "`. Both halves must be
/// non-empty after trimming.
///
/// # Example
///
/// ```
/// use harvest_watch::extract::split_upload;
///
/// let upload = split_upload("2h ago by Han_Solo").unwrap();
/// assert_eq!(upload.uploaded_at, "2h ago");
/// assert_eq!(upload.uploaded_by, "Han_Solo");
/// ```
pub fn split_upload(text: &str) -> Option<Upload> {
    let (time_ago, uploader) = text.split_once(UPLOADER_SEPARATOR)?;
    let time_ago = time_ago.trim();
    let uploader = uploader.trim();

    if time_ago.is_empty() || uploader.is_empty() {
        return None;
    }

    Some(Upload {
        uploaded_at: time_ago.to_string(),
        uploaded_by: uploader.to_string(),
    })
}
