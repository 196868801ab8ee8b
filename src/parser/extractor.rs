use std::sync::LazyLock;

use regex::Regex;

use super::events::Event;
use crate::record::Record;

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Tags whose text becomes a record.
const INTEREST_TAGS: &[&str] = &["a", "h1", "h2", "h3"];

#[derive(Debug)]
struct OpenElement {
    tag: String,
    href: String,
    text_parts: Vec<String>,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Open(OpenElement),
}

/// Turns a flat event stream into link/heading records, tracking at most one
/// open element of interest. A new interesting start tag always replaces
/// whatever was open; the abandoned element produces nothing.
#[derive(Debug, Default)]
pub struct Extractor {
    state: State,
    records: Vec<Record>,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, event: Event) {
        match event {
            Event::StartTag { name, attrs } => {
                if !INTEREST_TAGS.contains(&name.as_str()) {
                    return;
                }
                let href = if name == "a" {
                    first_href(&attrs)
                } else {
                    String::new()
                };
                self.state = State::Open(OpenElement {
                    tag: name,
                    href,
                    text_parts: Vec::new(),
                });
            }
            Event::Text(data) => {
                if let State::Open(open) = &mut self.state {
                    let text = data.trim();
                    if !text.is_empty() {
                        open.text_parts.push(text.to_string());
                    }
                }
            }
            Event::EndTag { name } => {
                let matches = matches!(&self.state, State::Open(open) if open.tag == name);
                if !matches {
                    return;
                }
                if let State::Open(open) = std::mem::take(&mut self.state) {
                    if let Some(record) = finalize(open) {
                        self.records.push(record);
                    }
                }
            }
        }
    }

    /// Ends the stream. An element still open is dropped without a record.
    pub fn finish(self) -> Vec<Record> {
        self.records
    }
}

/// Fold a whole event sequence through a fresh extractor.
pub fn extract_events<I>(events: I) -> Vec<Record>
where
    I: IntoIterator<Item = Event>,
{
    let mut extractor = Extractor::new();
    for event in events {
        extractor.feed(event);
    }
    extractor.finish()
}

fn first_href(attrs: &[(String, Option<String>)]) -> String {
    attrs
        .iter()
        .find_map(|(key, value)| match value {
            Some(v) if key == "href" && !v.is_empty() => Some(v.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

fn finalize(open: OpenElement) -> Option<Record> {
    let joined = open.text_parts.join(" ");
    let text = WS_RE.replace_all(joined.trim(), " ").into_owned();
    if text.is_empty() {
        return None;
    }
    Some(if open.tag == "a" {
        Record::link(text, open.href)
    } else {
        Record::heading(open.tag, text)
    })
}
