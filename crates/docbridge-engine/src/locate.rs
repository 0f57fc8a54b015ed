//! # Source Locations
//!
//! Maps a JSON Pointer into a parsed document back to a line and column
//! in the document text. Object members resolve to their key, array
//! elements to the element (or its `-` marker in YAML).
//!
//! Location is best effort. A pointer that cannot be followed all the way
//! resolves to the deepest segment that could; YAML flow collections are
//! not descended into.

use crate::traits::Position;

/// Surface syntax of a document's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Syntax {
    Json,
    Yaml,
}

/// Position of the value at `instance_path` in `source`, if any segment
/// of the pointer could be found. The document root has no position.
pub(crate) fn locate(source: &str, syntax: Syntax, instance_path: &str) -> Option<Position> {
    let segments: Vec<String> = instance_path
        .split('/')
        .skip(1)
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect();
    if segments.is_empty() {
        return None;
    }
    let offset = match syntax {
        Syntax::Json => json::locate(source.as_bytes(), &segments),
        Syntax::Yaml => yaml::locate(source, &segments),
    }?;
    position_at(source, offset)
}

fn position_at(source: &str, offset: usize) -> Option<Position> {
    let before = source.get(..offset)?;
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    Some(Position::new(line, column))
}

mod json {
    pub(super) fn locate(text: &[u8], segments: &[String]) -> Option<usize> {
        let mut cursor = skip_ws(text, 0);
        let mut found = None;
        for segment in segments {
            let next = match text.get(cursor) {
                Some(b'{') => member(text, cursor, segment),
                Some(b'[') => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| element(text, cursor, index))
                    .map(|at| (at, at)),
                _ => None,
            };
            let Some((at, value)) = next else { break };
            found = Some(at);
            cursor = value;
        }
        found
    }

    /// Offsets of the key and of the value of member `key` in the object
    /// opening at `open`.
    fn member(text: &[u8], open: usize, key: &str) -> Option<(usize, usize)> {
        let mut i = skip_ws(text, open + 1);
        loop {
            if text.get(i) != Some(&b'"') {
                return None;
            }
            let key_end = skip_string(text, i)?;
            let name: String = serde_json::from_slice(&text[i..key_end]).ok()?;
            let colon = skip_ws(text, key_end);
            if text.get(colon) != Some(&b':') {
                return None;
            }
            let value = skip_ws(text, colon + 1);
            if name == key {
                return Some((i, value));
            }
            i = skip_ws(text, skip_value(text, value)?);
            if text.get(i) != Some(&b',') {
                return None;
            }
            i = skip_ws(text, i + 1);
        }
    }

    /// Offset of element `index` in the array opening at `open`.
    fn element(text: &[u8], open: usize, index: usize) -> Option<usize> {
        let mut i = skip_ws(text, open + 1);
        for _ in 0..index {
            if text.get(i) == Some(&b']') {
                return None;
            }
            i = skip_ws(text, skip_value(text, i)?);
            if text.get(i) != Some(&b',') {
                return None;
            }
            i = skip_ws(text, i + 1);
        }
        match text.get(i) {
            Some(b']') | None => None,
            Some(_) => Some(i),
        }
    }

    fn skip_ws(text: &[u8], mut i: usize) -> usize {
        while matches!(text.get(i), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            i += 1;
        }
        i
    }

    /// Offset just past the string literal starting at `start`.
    fn skip_string(text: &[u8], start: usize) -> Option<usize> {
        let mut i = start + 1;
        loop {
            match text.get(i)? {
                b'\\' => i += 2,
                b'"' => return Some(i + 1),
                _ => i += 1,
            }
        }
    }

    /// Offset just past the value starting at `start`.
    fn skip_value(text: &[u8], start: usize) -> Option<usize> {
        match text.get(start)? {
            b'"' => skip_string(text, start),
            b'{' | b'[' => {
                let mut depth = 0usize;
                let mut i = start;
                loop {
                    match text.get(i)? {
                        b'"' => {
                            i = skip_string(text, i)?;
                            continue;
                        }
                        b'{' | b'[' => depth += 1,
                        b'}' | b']' => {
                            depth -= 1;
                            if depth == 0 {
                                return Some(i + 1);
                            }
                        }
                        _ => {}
                    }
                    i += 1;
                }
            }
            _ => {
                let mut i = start;
                while !matches!(text.get(i), None | Some(b',' | b'}' | b']' | b' ' | b'\t' | b'\n' | b'\r')) {
                    i += 1;
                }
                Some(i)
            }
        }
    }
}

mod yaml {
    /// One logical line of block YAML. A `- ` marker and the content after
    /// it are separate lines, the content indented past the marker.
    struct Line<'a> {
        offset: usize,
        indent: usize,
        item: bool,
        content: &'a str,
    }

    pub(super) fn locate(source: &str, segments: &[String]) -> Option<usize> {
        let lines = logical_lines(source);
        let (mut start, mut end) = (0, lines.len());
        let mut found = None;
        for segment in segments {
            let Some(first) = lines.get(start).filter(|_| start < end) else { break };
            let indent = first.indent;
            let mut siblings = (start..end).filter(|&i| lines[i].indent == indent);
            let hit = if first.item {
                segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| siblings.filter(|&i| lines[i].item).nth(index))
            } else {
                siblings.find(|&i| !lines[i].item && key_of(lines[i].content).as_deref() == Some(segment.as_str()))
            };
            let Some(at) = hit else { break };
            found = Some(lines[at].offset);
            start = at + 1;
            end = block_end(&lines, start, end, &lines[at]);
        }
        found
    }

    fn logical_lines(source: &str) -> Vec<Line<'_>> {
        let mut lines = Vec::new();
        let mut line_start = 0;
        for raw in source.split_inclusive('\n') {
            let offset = line_start;
            line_start += raw.len();
            let text = raw.trim_end_matches(['\n', '\r']);
            let mut indent = text.len() - text.trim_start_matches(' ').len();
            let mut rest = &text[indent..];
            if rest.is_empty() || rest.starts_with('#') || rest == "---" || rest == "..." {
                continue;
            }
            loop {
                if rest == "-" || rest.starts_with("- ") {
                    lines.push(Line {
                        offset: offset + indent,
                        indent,
                        item: true,
                        content: "",
                    });
                    let after = &rest[1..];
                    let pad = after.len() - after.trim_start_matches(' ').len();
                    indent += 1 + pad;
                    rest = &after[pad..];
                    if rest.is_empty() {
                        break;
                    }
                } else {
                    lines.push(Line {
                        offset: offset + indent,
                        indent,
                        item: false,
                        content: rest,
                    });
                    break;
                }
            }
        }
        lines
    }

    /// First line after `parent`'s body. A mapping key's body also takes
    /// sequence items written at the key's own indentation.
    fn block_end(lines: &[Line<'_>], from: usize, end: usize, parent: &Line<'_>) -> usize {
        (from..end)
            .find(|&i| {
                let line = &lines[i];
                line.indent < parent.indent
                    || (line.indent == parent.indent && (parent.item || !line.item))
            })
            .unwrap_or(end)
    }

    /// The mapping key a line starts with, unquoted.
    fn key_of(content: &str) -> Option<String> {
        if content.starts_with('"') {
            let end = closing_quote(content)?;
            let key: String = serde_json::from_str(&content[..=end]).ok()?;
            return content[end + 1..].trim_start().starts_with(':').then_some(key);
        }
        if let Some(quoted) = content.strip_prefix('\'') {
            let mut key = String::new();
            let mut chars = quoted.char_indices().peekable();
            while let Some((i, c)) = chars.next() {
                if c == '\'' {
                    if chars.peek().map(|&(_, n)| n) == Some('\'') {
                        chars.next();
                        key.push('\'');
                        continue;
                    }
                    return quoted[i + 1..].trim_start().starts_with(':').then_some(key);
                }
                key.push(c);
            }
            return None;
        }
        let colon = content
            .char_indices()
            .find(|&(i, c)| c == ':' && matches!(content[i + 1..].chars().next(), None | Some(' ' | '\t')))
            .map(|(i, _)| i)?;
        Some(content[..colon].trim_end().to_string())
    }

    fn closing_quote(content: &str) -> Option<usize> {
        let bytes = content.as_bytes();
        let mut i = 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'"' => return Some(i),
                _ => i += 1,
            }
        }
        None
    }
}
