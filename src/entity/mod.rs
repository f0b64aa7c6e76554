mod content;
mod note;
mod nullable;

pub use content::Content;
pub use note::Note;
pub use nullable::zero_time;

use crate::error::Result;

/// The entire persisted state: every note, in client order.
pub type Snapshot = Vec<Note>;

/// Parse a raw payload as a note collection.
///
/// A top-level `null` is an empty collection and `null` items are empty notes.
pub fn parse_snapshot(bytes: &[u8]) -> Result<Snapshot> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let snapshot = nullable::items_or_default(&mut de)?;
    de.end()?;
    Ok(snapshot)
}

/// Render a snapshot with two-space indentation for the readable store.
pub fn render_readable(snapshot: &[Note]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(snapshot)?)
}
