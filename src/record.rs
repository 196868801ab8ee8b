use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Link,
    Heading,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Link => "link",
            RecordKind::Heading => "heading",
        }
    }
}

// CSV and SQLite both write the kind through `as_str`.
impl Serialize for RecordKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One finished link or heading, in the column order of the CSV output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub tag: String,
    pub text: String,
    /// Empty for headings and for anchors without a usable href.
    pub href: String,
}

impl Record {
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Record {
            kind: RecordKind::Link,
            tag: "a".to_string(),
            text: text.into(),
            href: href.into(),
        }
    }

    pub fn heading(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Record {
            kind: RecordKind::Heading,
            tag: tag.into(),
            text: text.into(),
            href: String::new(),
        }
    }
}
