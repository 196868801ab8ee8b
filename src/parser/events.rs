use html5gum::{DefaultEmitter, HtmlString, Token, Tokenizer};
use tracing::trace;

/// A lexical event from the markup, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartTag {
        name: String,
        attrs: Vec<(String, Option<String>)>,
    },
    Text(String),
    EndTag {
        name: String,
    },
}

#[cfg(test)]
impl Event {
    pub fn start(name: &str, attrs: &[(&str, Option<&str>)]) -> Self {
        Event::StartTag {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect(),
        }
    }

    pub fn text(data: &str) -> Self {
        Event::Text(data.to_string())
    }

    pub fn end(name: &str) -> Self {
        Event::EndTag {
            name: name.to_string(),
        }
    }
}

/// Stream `html` as start-tag / text / end-tag events without building a tree.
///
/// Comments, doctypes and parse errors are skipped. `<script>`, `<style>` and
/// similar elements switch the tokenizer into raw-text mode, so markup inside
/// them arrives as text. A self-closing start tag is followed by its own end
/// tag, so `<a href="x"/>` opens and closes at once.
pub fn tokenize(html: &str) -> impl Iterator<Item = Event> + '_ {
    let mut emitter = DefaultEmitter::default();
    emitter.naively_switch_states(true);

    Tokenizer::new_with_emitter(html, emitter)
        .flatten()
        .flat_map(|token| {
            let (event, close) = match token {
                Token::StartTag(tag) => {
                    let name = lossy(&tag.name);
                    let attrs = tag
                        .attributes
                        .iter()
                        .map(|(k, v)| (lossy(k), Some(lossy(v))))
                        .collect();
                    let close = tag.self_closing.then(|| Event::EndTag { name: name.clone() });
                    (Some(Event::StartTag { name, attrs }), close)
                }
                Token::EndTag(tag) => (
                    Some(Event::EndTag {
                        name: lossy(&tag.name),
                    }),
                    None,
                ),
                Token::String(data) => (Some(Event::Text(lossy(&data))), None),
                Token::Error(e) => {
                    trace!(error = ?e, "Markup parse error (ignored)");
                    (None, None)
                }
                _ => (None, None),
            };
            event.into_iter().chain(close)
        })
}

fn lossy(s: &HtmlString) -> String {
    String::from_utf8_lossy(s).into_owned()
}
