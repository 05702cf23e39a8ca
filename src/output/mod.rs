//! Output rendering: the XSPF playlist and the plain path listing

pub mod xspf;

pub use xspf::XspfWriter;

use crate::domain::model::ScoredEntry;

/// One absolute path per line, in playlist order
pub fn render_listing(entries: &[ScoredEntry]) -> String {
    let mut listing = String::new();
    for entry in entries {
        listing.push_str(entry.path());
        listing.push('\n');
    }
    listing
}
