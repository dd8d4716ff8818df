//! XML documentation fragment handling.
//!
//! Documentation text lives on model nodes as raw XML fragments in the C#
//! compiler's shape: a sequence of top-level tags like `<summary>`,
//! `<param name="x">`, `<returns>`. This module detects `<inheritdoc/>`
//! markers, merges inherited text with local overrides, and extracts
//! plain-text sections for rendering.
//!
//! Merging supports two marker positions:
//! 1. Top level: `<inheritdoc/>` next to other tags inherits everything and
//!    locally defined tags win over same-named inherited ones.
//! 2. Nested: `<summary><inheritdoc/></summary>` splices the inherited
//!    summary content into that one tag.
//! A fragment with more than one marker is left unchanged.

use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;

/// Count inheritdoc markers anywhere in the fragment.
pub fn count_inheritdoc(xml: &str) -> usize {
    let re = Regex::new(r"<inheritdoc[^>]*>").expect("Failed to compile inheritdoc regex");
    re.find_iter(xml).count()
}

/// True when the whole fragment is a single self-closed inheritdoc marker.
pub fn is_bare_inheritdoc(xml: &str) -> bool {
    let trimmed = xml.trim();
    trimmed.starts_with("<inheritdoc") && trimmed.ends_with("/>") && count_inheritdoc(trimmed) == 1
}

/// Explicit inheritance target named by the first marker, if any.
pub fn inheritdoc_cref(xml: &str) -> Option<String> {
    let re = Regex::new(r#"<inheritdoc\s+cref\s*=\s*["']([^"']+)["']"#)
        .expect("Failed to compile cref regex");
    re.captures(xml)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether a member's documentation still wants text from elsewhere:
/// missing, blank, or carrying exactly one inheritdoc marker.
pub fn needs_inheritance(doc: Option<&str>) -> bool {
    match doc {
        None => true,
        Some(text) => {
            let trimmed = text.trim();
            trimmed.is_empty() || count_inheritdoc(trimmed) == 1
        }
    }
}

/// Merge inherited documentation into a fragment holding one marker.
/// Fragments with zero or several markers come back unchanged.
pub fn merge_inherited(local: &str, inherited: &str) -> String {
    let local = local.trim();
    let inherited = inherited.trim();

    if count_inheritdoc(local) != 1 {
        return local.to_string();
    }
    if is_bare_inheritdoc(local) {
        return inherited.to_string();
    }

    let local_tags = top_level_tags(local);
    if local_tags.iter().any(|t| t.tag == "inheritdoc") {
        merge_top_level(&local_tags, inherited)
    } else {
        merge_nested(&local_tags, inherited)
    }
}

/// Inherit every tag, then apply local tags over same-keyed ones and append
/// the rest.
fn merge_top_level(local_tags: &[TopTag], inherited: &str) -> String {
    let mut merged = top_level_tags(inherited);
    for tag in local_tags {
        if tag.tag == "inheritdoc" {
            continue;
        }
        match merged.iter_mut().find(|t| t.key == tag.key) {
            Some(existing) => existing.raw = tag.raw.clone(),
            None => merged.push(tag.clone()),
        }
    }
    merged
        .iter()
        .map(|t| t.raw.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splice the same-keyed inherited tag's content over the marker, leaving
/// the surrounding tags alone.
fn merge_nested(local_tags: &[TopTag], inherited: &str) -> String {
    let marker_re = Regex::new(r"<inheritdoc[^>]*>").expect("Failed to compile inheritdoc regex");
    let inherited_tags = top_level_tags(inherited);

    let mut result = Vec::with_capacity(local_tags.len());
    for tag in local_tags {
        let rebuilt = match (tag.inner(), tag.inner_span) {
            (Some(inner), Some((start, end))) if marker_re.is_match(inner) => {
                match inherited_tags
                    .iter()
                    .find(|t| t.key == tag.key)
                    .and_then(|t| t.inner())
                {
                    Some(source) => {
                        let new_inner = marker_re.replace(inner, source);
                        format!("{}{}{}", &tag.raw[..start], new_inner, &tag.raw[end..])
                    }
                    None => tag.raw.clone(),
                }
            }
            _ => tag.raw.clone(),
        };
        result.push(rebuilt);
    }
    result.join("\n")
}

/// One top-level element of a fragment. `key` folds in the `name` attribute
/// so `<param name="a">` and `<param name="b">` stay distinct.
#[derive(Debug, Clone)]
struct TopTag {
    tag: String,
    key: String,
    raw: String,
    inner_span: Option<(usize, usize)>,
}

impl TopTag {
    fn inner(&self) -> Option<&str> {
        self.inner_span.map(|(start, end)| &self.raw[start..end])
    }
}

/// Scan a fragment into its top-level elements. Loose text, comments, and
/// processing instructions between elements are skipped.
fn top_level_tags(xml: &str) -> Vec<TopTag> {
    let name_re =
        Regex::new(r#"name\s*=\s*["']([^"']*)["']"#).expect("Failed to compile name regex");
    let mut tags = Vec::new();
    let mut pos = 0;

    while let Some(open_rel) = xml[pos..].find('<') {
        let open = pos + open_rel;
        let rest = &xml[open..];
        if rest.starts_with("<!--") {
            pos = match rest.find("-->") {
                Some(end) => open + end + 3,
                None => break,
            };
            continue;
        }
        if rest.starts_with("</") || rest.starts_with("<?") {
            pos = match rest.find('>') {
                Some(end) => open + end + 1,
                None => break,
            };
            continue;
        }

        let Some(gt_rel) = rest.find('>') else { break };
        let open_end = open + gt_rel + 1;
        let open_text = &xml[open..open_end];
        let tag: String = open_text[1..]
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == ':')
            .collect();
        if tag.is_empty() {
            pos = open_end;
            continue;
        }
        let name_attr = name_re
            .captures(open_text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        let key = match &name_attr {
            Some(name) => format!("{tag}#{name}"),
            None => tag.clone(),
        };

        if open_text.ends_with("/>") {
            tags.push(TopTag {
                tag,
                key,
                raw: open_text.to_string(),
                inner_span: None,
            });
            pos = open_end;
            continue;
        }

        match find_closing(xml, open_end, &tag) {
            Some((inner_end, close_end)) => {
                let raw = xml[open..close_end].to_string();
                let inner_start = open_end - open;
                tags.push(TopTag {
                    tag,
                    key,
                    raw,
                    inner_span: Some((inner_start, inner_end - open)),
                });
                pos = close_end;
            }
            None => {
                // Unterminated element: keep what is there and stop.
                tags.push(TopTag {
                    tag,
                    key,
                    raw: xml[open..].to_string(),
                    inner_span: None,
                });
                break;
            }
        }
    }
    tags
}

/// Find the matching close of `tag` starting at `from`, stepping over
/// nested elements with the same name. Returns (inner end, element end).
fn find_closing(xml: &str, from: usize, tag: &str) -> Option<(usize, usize)> {
    let open_pat = format!("<{tag}");
    let close_pat = format!("</{tag}>");
    let mut depth = 1usize;
    let mut cursor = from;

    while depth > 0 {
        let next_close = xml[cursor..].find(&close_pat)?;
        let close_at = cursor + next_close;

        // Same-named opens between here and that close increase the depth.
        let mut scan = cursor;
        while let Some(rel) = xml[scan..close_at].find(&open_pat) {
            let at = scan + rel;
            let after = xml[at + open_pat.len()..].chars().next();
            let is_open = matches!(after, Some(c) if c.is_whitespace() || c == '>' || c == '/');
            if is_open && !is_self_closing(&xml[at..]) {
                depth += 1;
            }
            scan = at + open_pat.len();
        }

        depth -= 1;
        cursor = close_at + close_pat.len();
        if depth == 0 {
            return Some((close_at, cursor));
        }
    }
    None
}

fn is_self_closing(from_open: &str) -> bool {
    match from_open.find('>') {
        Some(gt) => from_open[..gt + 1].ends_with("/>"),
        None => false,
    }
}

/// Plain-text sections extracted from a fragment for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocSections {
    pub summary: Option<String>,
    pub remarks: Option<String>,
    pub returns: Option<String>,
    pub params: Vec<(String, String)>,
}

/// Pull the common sections out of a fragment, flattening markup to text.
/// Malformed XML yields whatever was readable up to the defect.
pub fn parse_sections(xml: &str) -> DocSections {
    let mut reader = Reader::from_str(xml);
    let mut sections = DocSections::default();
    let mut buf = Vec::new();
    let mut current: Option<(Section, String, String)> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if depth == 0 {
                    let section = match e.name().as_ref() {
                        b"summary" => Some(Section::Summary),
                        b"remarks" => Some(Section::Remarks),
                        b"returns" => Some(Section::Returns),
                        b"param" => Some(Section::Param),
                        _ => None,
                    };
                    if let Some(section) = section {
                        let mut param_name = String::new();
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"name" {
                                if let Ok(value) = std::str::from_utf8(&attr.value) {
                                    param_name = value.to_string();
                                }
                            }
                        }
                        current = Some((section, param_name, String::new()));
                    }
                }
                depth += 1;
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some((section, name, text)) = current.take() {
                        store_section(&mut sections, section, name, text);
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some((_, _, text)) = current.as_mut() {
                    if let Ok(piece) = e.unescape() {
                        text.push_str(&piece);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(_) => break,
        }
        buf.clear();
    }
    sections
}

enum Section {
    Summary,
    Remarks,
    Returns,
    Param,
}

fn store_section(sections: &mut DocSections, section: Section, name: String, text: String) {
    let text = text.trim().to_string();
    match section {
        Section::Summary => sections.summary = Some(text),
        Section::Remarks => sections.remarks = Some(text),
        Section::Returns => sections.returns = Some(text),
        Section::Param => sections.params.push((name, text)),
    }
}
