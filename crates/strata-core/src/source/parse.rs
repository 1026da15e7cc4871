//! Recover a [`SourceTree`] from previously written bytes.
//!
//! Parsing is deliberately narrow. The file is split into top-level chunks
//! on blank lines outside any bracket, string or comment. Each chunk is
//! decomposed structurally if it re-renders to exactly the same text;
//! otherwise it is kept as [`Declaration::Verbatim`]. The whole parse only
//! succeeds when serializing the result reproduces the input byte-for-byte,
//! so a successful parse never loses content.

use super::render::{render, render_declaration};
use super::tree::{
    Declaration, DocComment, FuncDecl, ImportGroup, ImportSpec, Param, Signature, SourceTree,
    StructField, StructTag, TypeDecl, TypeSpec, ValueDecl, ValueSpec,
};

/// Keywords a top-level chunk may start with.
const DECL_KEYWORDS: [&str; 4] = ["type ", "func ", "const ", "var "];

/// Parse file bytes, returning `None` when the content is not something this
/// module could have written (or losslessly extended).
pub fn parse(bytes: &[u8]) -> Option<SourceTree> {
    let text = std::str::from_utf8(bytes).ok()?;
    let tree = parse_text(text)?;
    if render(&tree) == text {
        Some(tree)
    } else {
        tracing::debug!("parsed tree does not reproduce input");
        None
    }
}

fn parse_text(text: &str) -> Option<SourceTree> {
    let body = text.strip_suffix('\n')?;
    let lines: Vec<&str> = body.split('\n').collect();
    let mut pos = package_clause(&lines)?;

    // The doc is the `// ` run touching the clause; anything above it is header.
    let preamble = &lines[..pos];
    let doc_start = preamble
        .iter()
        .rposition(|l| doc_line(l).is_none())
        .map_or(0, |i| i + 1);
    let doc: Vec<String> = preamble[doc_start..]
        .iter()
        .filter_map(|l| doc_line(l))
        .collect();

    let package = lines[pos].strip_prefix("package ")?;
    if !is_ident(package) {
        return None;
    }
    pos += 1;

    let mut tree = SourceTree::new(package);
    if doc_start > 0 {
        let mut header = preamble[..doc_start].join("\n");
        header.push('\n');
        tree.set_header(Some(header));
    }
    if !doc.is_empty() {
        tree.set_doc(Some(DocComment::from_lines(doc)));
    }

    if lines.get(pos) == Some(&"") && lines.get(pos + 1).is_some_and(|l| l.starts_with("import")) {
        pos = parse_imports(&lines, pos + 1, &mut tree)?;
    }

    for chunk in split_chunks(&lines[pos..])? {
        tree.push(parse_chunk(&chunk));
    }

    Some(tree)
}

/// Index of the `package` line. Only blank lines, `//` comments and
/// `/* */` blocks may precede it.
fn package_clause(lines: &[&str]) -> Option<usize> {
    let mut in_block = false;
    for (idx, line) in lines.iter().enumerate() {
        if in_block {
            if let Some((_, rest)) = line.split_once("*/") {
                if !rest.trim().is_empty() {
                    return None;
                }
                in_block = false;
            }
            continue;
        }
        if line.starts_with("package ") {
            return Some(idx);
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        let opened = trimmed.strip_prefix("/*")?;
        match opened.split_once("*/") {
            Some((_, rest)) if rest.trim().is_empty() => {}
            Some(_) => return None,
            None => in_block = true,
        }
    }
    None
}

// ── Imports ───────────────────────────────────────────────────────────────────

/// Parse the import declaration starting at `pos`; returns the next line index.
fn parse_imports(lines: &[&str], pos: usize, tree: &mut SourceTree) -> Option<usize> {
    let head = lines[pos];
    if let Some(single) = head.strip_prefix("import ").filter(|s| *s != "(") {
        tree.add_import(parse_import_spec(single, ImportGroup::STANDARD)?);
        return Some(pos + 1);
    }
    if head != "import (" {
        return None;
    }

    let mut group = 0u8;
    let mut pending_break = false;
    let mut idx = pos + 1;
    loop {
        let line = *lines.get(idx)?;
        idx += 1;
        match line {
            ")" => return Some(idx),
            "" => pending_break = true,
            spec => {
                if pending_break {
                    group = group.checked_add(1)?;
                    pending_break = false;
                }
                let spec = parse_import_spec(spec.strip_prefix('\t')?, ImportGroup(group))?;
                if !tree.add_import(spec) {
                    return None;
                }
            }
        }
    }
}

fn parse_import_spec(spec: &str, group: ImportGroup) -> Option<ImportSpec> {
    let (alias, quoted) = match spec.split_once(' ') {
        Some((alias, quoted)) => (Some(alias), quoted),
        None => (None, spec),
    };
    let path = quoted.strip_prefix('"')?.strip_suffix('"')?;
    if path.is_empty() || path.contains('"') {
        return None;
    }
    Some(match alias {
        Some(alias) if is_ident(alias) || alias == "." => ImportSpec::aliased(group, alias, path),
        Some(_) => return None,
        None => ImportSpec::new(group, path),
    })
}

// ── Chunking ──────────────────────────────────────────────────────────────────

/// Lexical state carried across lines.
#[derive(Debug, Default, Clone, Copy)]
struct ScanState {
    depth: i32,
    raw_string: bool,
    block_comment: bool,
}

impl ScanState {
    fn at_top_level(&self) -> bool {
        self.depth == 0 && !self.raw_string && !self.block_comment
    }

    /// Advance over one line. Returns `false` on a closing bracket with no
    /// matching opener.
    fn scan(&mut self, line: &str) -> bool {
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();

            if self.block_comment {
                if c == '*' && next == Some('/') {
                    self.block_comment = false;
                    i += 1;
                }
                i += 1;
                continue;
            }
            if self.raw_string {
                if c == '`' {
                    self.raw_string = false;
                }
                i += 1;
                continue;
            }

            match c {
                '/' if next == Some('/') => break,
                '/' if next == Some('*') => {
                    self.block_comment = true;
                    i += 1;
                }
                '`' => self.raw_string = true,
                '"' | '\'' => {
                    i += 1;
                    while i < chars.len() && chars[i] != c {
                        if chars[i] == '\\' {
                            i += 1;
                        }
                        i += 1;
                    }
                }
                '(' | '[' | '{' => self.depth += 1,
                ')' | ']' | '}' => {
                    self.depth -= 1;
                    if self.depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        true
    }
}

/// Split declaration lines into blank-line separated top-level chunks.
///
/// Fails on unbalanced brackets, unterminated raw strings or block
/// comments, and on any top-level line that does not open a declaration or
/// a comment.
fn split_chunks<'a>(lines: &[&'a str]) -> Option<Vec<Vec<&'a str>>> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut state = ScanState::default();

    for &line in lines {
        if state.at_top_level() {
            if line.is_empty() {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }
                continue;
            }
            let opens_decl = line.starts_with("//")
                || line.starts_with("/*")
                || DECL_KEYWORDS.iter().any(|k| line.starts_with(k));
            if !opens_decl {
                tracing::trace!(line, "unexpected top-level line");
                return None;
            }
        }
        current.push(line);
        if !state.scan(line) {
            return None;
        }
    }

    if !state.at_top_level() {
        return None;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    Some(chunks)
}

/// Decompose a chunk, falling back to verbatim text when the structured
/// form would not reproduce it exactly.
fn parse_chunk(lines: &[&str]) -> Declaration {
    let text = lines.join("\n");
    match parse_declaration(lines) {
        Some(decl) if render_declaration(&decl) == format!("{text}\n") => decl,
        _ => Declaration::Verbatim(text),
    }
}

fn parse_declaration(lines: &[&str]) -> Option<Declaration> {
    let doc_len = lines.iter().take_while(|l| l.starts_with("//")).count();
    let (doc_lines, rest) = lines.split_at(doc_len);
    let (head, tail) = rest.split_first()?;

    let doc = if doc_lines.is_empty() {
        None
    } else {
        let lines = doc_lines
            .iter()
            .map(|l| doc_line(l))
            .collect::<Option<Vec<_>>>()?;
        Some(DocComment::from_lines(lines))
    };

    if let Some(head) = head.strip_prefix("type ") {
        let mut decl = parse_type(head, tail)?;
        decl.doc = doc;
        Some(Declaration::Type(decl))
    } else if let Some(head) = head.strip_prefix("func ") {
        let mut decl = parse_func(head, tail)?;
        decl.doc = doc;
        Some(Declaration::Func(decl))
    } else if let Some(head) = head.strip_prefix("const ") {
        let mut decl = parse_values(head, tail)?;
        decl.doc = doc;
        Some(Declaration::Const(decl))
    } else if let Some(head) = head.strip_prefix("var ") {
        let mut decl = parse_values(head, tail)?;
        decl.doc = doc;
        Some(Declaration::Var(decl))
    } else {
        None
    }
}

// ── Declarations ──────────────────────────────────────────────────────────────

fn parse_type(head: &str, tail: &[&str]) -> Option<TypeDecl> {
    let (name, spec) = head.split_once(' ')?;
    if !is_ident(name) {
        return None;
    }

    let spec = match spec {
        "struct{}" if tail.is_empty() => TypeSpec::Struct(Vec::new()),
        "interface{}" if tail.is_empty() => TypeSpec::Interface(Vec::new()),
        "struct {" => {
            let rows = block_rows(tail, "}")?;
            TypeSpec::Struct(rows.into_iter().map(parse_field).collect::<Option<_>>()?)
        }
        "interface {" => {
            let rows = block_rows(tail, "}")?;
            TypeSpec::Interface(rows.into_iter().map(parse_signature).collect::<Option<_>>()?)
        }
        _ if !tail.is_empty() => return None,
        alias if alias.starts_with("= ") => TypeSpec::Alias(alias[2..].to_string()),
        underlying => TypeSpec::Defined(underlying.to_string()),
    };

    Some(TypeDecl {
        doc: None,
        name: name.to_string(),
        spec,
    })
}

/// Rows of a `{ ... }` or `( ... )` block with one level of indent removed.
fn block_rows<'a>(tail: &[&'a str], close: &str) -> Option<Vec<&'a str>> {
    let (last, rows) = tail.split_last()?;
    if *last != close {
        return None;
    }
    rows.iter().map(|r| r.strip_prefix('\t')).collect()
}

fn parse_field(row: &str) -> Option<StructField> {
    let (head, tag) = match row.strip_suffix('`') {
        Some(without_close) => {
            let open = without_close.rfind('`')?;
            (row[..open].trim_end(), Some(parse_tag(&row[open..])?))
        }
        None => (row, None),
    };

    let field = match top_level_space(head) {
        Some(idx) => {
            let name = &head[..idx];
            if !is_ident(name) {
                return None;
            }
            StructField::new(name, head[idx..].trim_start())
        }
        None if !head.is_empty() => StructField::embedded(head),
        None => return None,
    };

    Some(StructField { tag, ..field })
}

fn parse_tag(raw: &str) -> Option<StructTag> {
    let inner = raw.strip_prefix('`')?.strip_suffix('`')?;
    let mut tag = StructTag::new();
    for pair in inner.split(' ') {
        let (key, quoted) = pair.split_once(':')?;
        let value = quoted.strip_prefix('"')?.strip_suffix('"')?;
        if key.is_empty() || value.contains('"') {
            return None;
        }
        tag = tag.with(key, value);
    }
    Some(tag)
}

fn parse_func(head: &str, tail: &[&str]) -> Option<FuncDecl> {
    let head = head.strip_suffix(" {")?;

    let (receiver, rest) = if head.starts_with('(') {
        let close = matching_close(head, 0)?;
        let receiver = parse_param(&head[1..close])?;
        (Some(receiver), head[close + 1..].strip_prefix(' ')?)
    } else {
        (None, head)
    };

    let signature = parse_signature(rest)?;
    let (last, body) = tail.split_last()?;
    if *last != "}" {
        return None;
    }
    let body = body
        .iter()
        .map(|line| {
            if line.is_empty() {
                Some(String::new())
            } else {
                line.strip_prefix('\t').map(str::to_string)
            }
        })
        .collect::<Option<Vec<_>>>()?;

    Some(FuncDecl {
        doc: None,
        receiver,
        signature,
        body,
    })
}

fn parse_signature(s: &str) -> Option<Signature> {
    let open = s.find('(')?;
    let name = &s[..open];
    if !is_ident(name) {
        return None;
    }
    let close = matching_close(s, open)?;
    let params = parse_params(&s[open + 1..close])?;

    let rest = &s[close + 1..];
    let results = if rest.is_empty() {
        Vec::new()
    } else {
        let rest = rest.strip_prefix(' ')?;
        if rest.starts_with('(') {
            let close = matching_close(rest, 0)?;
            if close + 1 != rest.len() {
                return None;
            }
            parse_params(&rest[1..close])?
        } else {
            vec![Param::unnamed(rest)]
        }
    };

    Some(Signature {
        name: name.to_string(),
        params,
        results,
    })
}

fn parse_params(s: &str) -> Option<Vec<Param>> {
    if s.trim().is_empty() {
        return Some(Vec::new());
    }
    split_top_level(s, ',')
        .into_iter()
        .map(|p| parse_param(p.trim()))
        .collect()
}

fn parse_param(p: &str) -> Option<Param> {
    if p.is_empty() {
        return None;
    }
    Some(match top_level_space(p) {
        Some(idx) if is_ident(&p[..idx]) => Param::new(&p[..idx], p[idx + 1..].trim_start()),
        _ => Param::unnamed(p),
    })
}

fn parse_values(head: &str, tail: &[&str]) -> Option<ValueDecl> {
    let specs = if head == "(" {
        block_rows(tail, ")")?
            .into_iter()
            .map(parse_value_spec)
            .collect::<Option<Vec<_>>>()?
    } else if tail.is_empty() {
        vec![parse_value_spec(head)?]
    } else {
        return None;
    };
    Some(ValueDecl::new(specs))
}

fn parse_value_spec(row: &str) -> Option<ValueSpec> {
    let name_end = row.find(' ').unwrap_or(row.len());
    let name = &row[..name_end];
    if !is_ident(name) {
        return None;
    }
    let rest = row[name_end..].trim_start();
    let spec = ValueSpec::new(name);

    Some(if rest.is_empty() {
        spec
    } else if let Some(value) = rest.strip_prefix("= ") {
        spec.value(value)
    } else if let Some(idx) = rest.find(" = ") {
        spec.typed(rest[..idx].trim_end()).value(&rest[idx + 3..])
    } else {
        spec.typed(rest)
    })
}

// ── Lexical helpers ───────────────────────────────────────────────────────────

fn doc_line(line: &str) -> Option<String> {
    if line == "//" {
        return Some(String::new());
    }
    line.strip_prefix("// ").map(str::to_string)
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Byte index of the bracket closing the one at `open`.
fn matching_close(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (idx, c) in s.char_indices().skip_while(|(i, _)| *i < open) {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn top_level_space(s: &str) -> Option<usize> {
    let mut depth = 0i32;
    for (idx, c) in s.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ' ' if depth == 0 => return Some(idx),
            _ => {}
        }
    }
    None
}

fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (idx, c) in s.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&s[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}
