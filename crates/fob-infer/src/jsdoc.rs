//! Documentation comment tokenizer.
//!
//! Splits one comment body into [`TagRecord`]s. Each tag is parsed with the
//! grammar registered for its (alias-resolved) name, and the consumed text is
//! cut out of the comment so whatever remains at the end becomes a trailing
//! `desc` record.

use once_cell::sync::Lazy;
use regex::Regex;

static IGNORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@ignore(\s|$)").expect("valid regex"));

static CLEAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*[/*]+[ \t]?|[ \t]+$").expect("valid regex"));

static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)@(\w+)([ \t]*)(.*)$").expect("valid regex"));

static TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\{\(?([\w <>|.#!?=*,:\[\]]+)\)?\}\s*|([\w.#]+)\s*)").expect("valid regex")
});

static TYPE_NAME_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{\(?([\w <>|.#!?=*,:\[\]]+)\)?\}\s*(\[[.\w]*(?:=[^\]]*)?\]|[.\w]*)\s*(.*)")
        .expect("valid regex")
});

static TYPE_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\{\(?([\w <>|.#!?=*,:\[\]]+)\)?\})?\s*(.*)").expect("valid regex")
});

static NAME_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\[[.\w]*(?:=[^\]]*)?\]|[.\w]+)\s*(.*)").expect("valid regex"));

/// One tag occurrence inside a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRecord {
    /// Canonical tag name, after alias resolution.
    pub tag: String,
    pub type_expr: Option<String>,
    pub ident: Option<String>,
    pub text: Option<String>,
    /// `[name]` in a parameter-like tag.
    pub optional: bool,
    /// Byte range of the consumed text in the cleaned comment.
    pub start: usize,
    pub end: usize,
}

impl TagRecord {
    fn new(tag: &str, start: usize) -> Self {
        Self {
            tag: tag.to_string(),
            start,
            end: start,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedComment {
    pub tags: Vec<TagRecord>,
}

impl ParsedComment {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagRecord> {
        self.tags.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grammar {
    /// `@tag {type}` or `@tag name`
    Type,
    /// `@tag {type} name text`
    TypeNameText,
    /// `@tag {type} text`
    TypeText,
    /// `@tag text`
    Text,
    /// Bare flag; following text stays in the description.
    Flag,
    /// Unregistered tag: the rest of the line is its text.
    Raw,
}

fn canonical(tag: &str) -> &str {
    match tag {
        "virtual" => "abstract",
        "augments" | "extend" => "extends",
        "const" => "constant",
        "emits" => "fires",
        "return" => "returns",
        "arg" | "argument" => "param",
        "prop" => "property",
        "exception" => "throws",
        "description" => "desc",
        other => other,
    }
}

fn grammar(tag: &str) -> Grammar {
    match tag {
        "alias" | "borrows" | "callback" | "constant" | "constructs" | "enum" | "event"
        | "exports" | "extends" | "external" | "fires" | "lends" | "memberof" | "method"
        | "mixes" | "mixin" | "name" | "type" => Grammar::Type,
        "param" | "property" | "typedef" => Grammar::TypeNameText,
        "returns" | "this" => Grammar::TypeText,
        "author" | "deprecated" | "copyright" | "classdesc" | "desc" | "license" | "requires"
        | "since" | "summary" | "throws" | "todo" | "variation" | "version" | "see" => {
            Grammar::Text
        }
        "abstract" | "class" | "constructor" | "function" | "global" | "ignore" | "inner"
        | "instance" | "interface" | "namespace" | "override" | "private" | "protected"
        | "public" | "readonly" | "static" => Grammar::Flag,
        _ => Grammar::Raw,
    }
}

/// Tokenize a raw comment body (without the `/*`, `*/` or `//` delimiters).
///
/// Returns `None` for plain comments (not starting with `*` or `/`) and for
/// comments carrying `@ignore`.
pub fn parse(comment: &str) -> Option<ParsedComment> {
    if !(comment.starts_with('*') || comment.starts_with('/')) || IGNORE.is_match(comment) {
        return None;
    }

    let normalized = comment.replace("\r\n", "\n");
    let mut text = CLEAN.replace_all(&normalized, "").into_owned();
    let mut tags = Vec::new();
    let mut from = 0;

    while let Some(caps) = TAG.captures_at(&text, from) {
        let (Some(whole), Some(raw), Some(spaces), Some(rest)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            break;
        };
        let start = whole.start();
        let mut record = TagRecord::new(canonical(raw.as_str()), start);
        let consumed = apply_grammar(&mut record, rest.as_str());
        record.end = (start + raw.len() + 1 + spaces.len() + consumed).min(text.len());

        text.replace_range(record.start..record.end, "");
        tags.push(record);
        from = start;
    }

    let rest = text.trim();
    if !rest.is_empty() {
        let mut desc = TagRecord::new("desc", 0);
        desc.text = Some(rest.to_string());
        desc.end = rest.len();
        tags.push(desc);
    }

    Some(ParsedComment { tags })
}

/// Fill `record` from the text after the tag name; returns the bytes consumed.
fn apply_grammar(record: &mut TagRecord, rest: &str) -> usize {
    match grammar(&record.tag) {
        Grammar::Type => match TYPE.captures(rest) {
            Some(caps) => {
                let value = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str().trim());
                if let Some(value) = value.filter(|value| !value.is_empty()) {
                    record.type_expr = Some(value.to_string());
                    record.text = Some(value.to_string());
                }
                caps.get(0).map_or(0, |m| m.len())
            }
            None => 0,
        },
        Grammar::TypeNameText => {
            if let Some(caps) = TYPE_NAME_TEXT.captures(rest) {
                record.type_expr = caps.get(1).map(|m| m.as_str().trim().to_string());
                set_name(record, caps.get(2).map_or("", |m| m.as_str()));
                record.text = description(caps.get(3).map_or("", |m| m.as_str()));
            } else if let Some(caps) = NAME_TEXT.captures(rest) {
                set_name(record, caps.get(1).map_or("", |m| m.as_str()));
                record.text = description(caps.get(2).map_or("", |m| m.as_str()));
            } else {
                record.text = description(rest);
            }
            rest.len()
        }
        Grammar::TypeText => {
            if let Some(caps) = TYPE_TEXT.captures(rest) {
                record.type_expr = caps.get(1).map(|m| m.as_str().trim().to_string());
                record.text = description(caps.get(2).map_or("", |m| m.as_str()));
            }
            rest.len()
        }
        Grammar::Text | Grammar::Raw => {
            record.text = non_empty(rest);
            rest.len()
        }
        Grammar::Flag => 0,
    }
}

fn set_name(record: &mut TagRecord, name: &str) {
    let (name, optional) = match name.strip_prefix('[') {
        Some(inner) => (inner.trim_end_matches(']'), true),
        None => (name, false),
    };
    let name = name.split('=').next().unwrap_or_default().trim();
    record.optional = optional;
    if !name.is_empty() {
        record.ident = Some(name.to_string());
    }
}

fn description(text: &str) -> Option<String> {
    let text = text.trim();
    non_empty(text.strip_prefix('-').map_or(text, str::trim_start))
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
