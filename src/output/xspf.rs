//! XSPF playlist rendering

use std::fmt::Write;

use crate::domain::model::*;

pub const XSPF_NAMESPACE: &str = "http://xspf.org/ns/0/";
pub const VLC_NAMESPACE: &str = "http://www.videolan.org/vlc/playlist/ns/0/";
pub const VLC_APPLICATION: &str = "http://www.videolan.org/vlc/playlist/0";

/// Renders a [`PlaylistDocument`] as tab-indented XSPF text
pub struct XspfWriter;

impl XspfWriter {
    /// Render the whole document, including the trailing `vlc:item` block
    pub fn render(document: &PlaylistDocument) -> String {
        let mut out = String::with_capacity(256 + document.len() * 256);

        // writing into a String cannot fail
        let _ = Self::write_document(&mut out, document);
        out
    }

    /// Build the document from ordered entries and render it
    pub fn render_entries(title: &str, entries: &[ScoredEntry]) -> String {
        Self::render(&PlaylistDocument::from_entries(title, entries))
    }

    fn write_document(out: &mut String, document: &PlaylistDocument) -> std::fmt::Result {
        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<playlist xmlns="{}" xmlns:vlc="{}" version="1">"#,
            XSPF_NAMESPACE, VLC_NAMESPACE
        )?;
        writeln!(out, "\t<title>{}</title>", escape_xml(document.title()))?;
        writeln!(out, "\t<trackList>")?;

        for track in document.tracks() {
            writeln!(out, "\t\t<track>")?;
            writeln!(out, "\t\t\t<location>{}</location>", escape_xml(&track.location))?;
            writeln!(out, "\t\t\t<duration>{}</duration>", track.duration_ms)?;
            writeln!(out, "\t\t\t<extension application=\"{}\">", VLC_APPLICATION)?;
            writeln!(out, "\t\t\t\t<vlc:id>{}</vlc:id>", track.track_id)?;
            writeln!(out, "\t\t\t</extension>")?;
            writeln!(out, "\t\t</track>")?;
        }

        writeln!(out, "\t</trackList>")?;
        writeln!(out, "\t<extension application=\"{}\">", VLC_APPLICATION)?;
        for id in document.extension_item_ids() {
            writeln!(out, "\t\t<vlc:item tid=\"{}\"/>", id)?;
        }
        writeln!(out, "\t</extension>")?;
        writeln!(out, "</playlist>")?;
        Ok(())
    }
}

/// Escape the five XML special characters
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
