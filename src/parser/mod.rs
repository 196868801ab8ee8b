pub mod events;
pub mod extractor;

use tracing::debug;

use crate::record::Record;

/// Tokenize a page and fold its events into link/heading records.
pub fn extract_records(html: &str) -> Vec<Record> {
    let records = extractor::extract_events(events::tokenize(html));
    debug!(bytes = html.len(), records = records.len(), "Extracted records");
    records
}
