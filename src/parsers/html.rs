use crate::parsers::text;
use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text never shows up on screen
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Collects the plain text of every element matching `selector`, in
/// document order.
///
/// `<br>` becomes a newline, all other markup is dropped and the result is
/// normalized with [`text::normalize_message`]. Returns `None` when nothing
/// matches.
pub fn matching_texts(doc: &Html, selector: &Selector) -> Option<Vec<String>> {
    let texts = doc
        .select(selector)
        .map(|el| text::normalize_message(&element_text(el)))
        .collect::<Vec<_>>();

    ::log::debug!("HTML parser found {} message nodes", texts.len());

    if texts.is_empty() { None } else { Some(texts) }
}

/// Text content of an element with line breaks kept
pub fn element_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_text(el, &mut out, Some('\n'));
    out
}

/// Visible text of the document body with whitespace runs collapsed
pub fn body_text(doc: &Html) -> String {
    let body_selector = Selector::parse("body").unwrap();
    let mut raw = String::new();
    for body in doc.select(&body_selector) {
        push_text(body, &mut raw, None);
    }
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Appends the visible text under `el` to `out`.
///
/// With `line_break` set, `<br>` is written as that character and nested
/// elements are joined as-is. Without it, elements are padded with spaces
/// so that block boundaries still separate words.
fn push_text(el: ElementRef<'_>, out: &mut String, line_break: Option<char>) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(e) if HIDDEN_ELEMENTS.contains(&e.name()) => {}
            Node::Element(e) if e.name() == "br" => out.push(line_break.unwrap_or(' ')),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    if line_break.is_none() {
                        out.push(' ');
                    }
                    push_text(child_el, out, line_break);
                    if line_break.is_none() {
                        out.push(' ');
                    }
                }
            }
            _ => {}
        }
    }
}
