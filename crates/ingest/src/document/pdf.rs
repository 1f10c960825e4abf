use std::panic::{self, AssertUnwindSafe};

use super::PageContent;

/// Extract per-page text from PDF bytes. The error is a human-readable cause.
///
/// `pdf-extract` can panic on malformed input; that is reported as an
/// ordinary failure.
pub(super) fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, String> {
    let text = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|payload| format!("PDF parser panicked: {}", panic_message(&*payload)))?
        .map_err(|e| e.to_string())?;

    Ok(split_pages(&text))
}

/// pdf-extract returns all text as one string; form feeds (\x0C), when
/// present, separate pages.
fn split_pages(text: &str) -> Vec<PageContent> {
    if !text.contains('\x0C') {
        return vec![PageContent {
            page_number: 1,
            text: text.trim().to_string(),
        }];
    }

    text.split('\x0C')
        .enumerate()
        .filter(|(_, page_text)| !page_text.trim().is_empty())
        .map(|(i, page_text)| PageContent {
            page_number: i + 1,
            text: page_text.trim().to_string(),
        })
        .collect()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
