//! Canonical serializer for [`SourceTree`].
//!
//! Output layout is fixed: header text read from disk (if any), package doc,
//! package clause, a parenthesized import block
//! grouped by [`ImportGroup`](super::ImportGroup) and sorted by path, then
//! declarations separated by exactly one blank line, ending in a single
//! newline. Struct fields and const/var blocks are column-aligned the way
//! gofmt's tabwriter aligns them.

use std::fmt::Write as _;

use super::tree::{
    Declaration, DocComment, FuncDecl, ImportSpec, SourceTree, StructField, TypeDecl, TypeSpec,
    ValueDecl, ValueSpec,
};

/// Render a tree to the exact bytes written to disk.
pub fn serialize(tree: &SourceTree) -> Vec<u8> {
    render(tree).into_bytes()
}

/// Render a tree to text.
pub fn render(tree: &SourceTree) -> String {
    let mut out = String::new();

    if let Some(header) = tree.header() {
        out.push_str(header);
    }
    if let Some(doc) = tree.doc() {
        write_doc(&mut out, doc);
    }
    let _ = writeln!(out, "package {}", tree.package());

    if !tree.imports().is_empty() {
        out.push('\n');
        write_imports(&mut out, tree.imports());
    }

    for decl in tree.declarations() {
        out.push('\n');
        out.push_str(&render_declaration(decl));
    }

    out
}

/// Render one top-level declaration, including its doc comment and a
/// trailing newline.
pub fn render_declaration(decl: &Declaration) -> String {
    let mut out = String::new();
    match decl {
        Declaration::Type(t) => write_type(&mut out, t),
        Declaration::Func(f) => write_func(&mut out, f),
        Declaration::Const(v) => write_values(&mut out, "const", v),
        Declaration::Var(v) => write_values(&mut out, "var", v),
        Declaration::Verbatim(text) => {
            out.push_str(text);
            out.push('\n');
        }
    }
    out
}

fn write_doc(out: &mut String, doc: &DocComment) {
    for line in doc.lines() {
        if line.is_empty() {
            out.push_str("//\n");
        } else {
            let _ = writeln!(out, "// {line}");
        }
    }
}

fn write_imports(out: &mut String, imports: &[ImportSpec]) {
    let mut sorted: Vec<&ImportSpec> = imports.iter().collect();
    sorted.sort_by(|a, b| {
        a.group
            .cmp(&b.group)
            .then_with(|| a.path.cmp(&b.path))
            .then_with(|| a.alias.cmp(&b.alias))
    });

    out.push_str("import (\n");
    let mut previous = None;
    for spec in sorted {
        if previous.is_some_and(|group| group != spec.group) {
            out.push('\n');
        }
        let _ = writeln!(out, "\t{spec}");
        previous = Some(spec.group);
    }
    out.push_str(")\n");
}

fn write_type(out: &mut String, decl: &TypeDecl) {
    if let Some(doc) = &decl.doc {
        write_doc(out, doc);
    }
    match &decl.spec {
        TypeSpec::Alias(target) => {
            let _ = writeln!(out, "type {} = {target}", decl.name);
        }
        TypeSpec::Defined(underlying) => {
            let _ = writeln!(out, "type {} {underlying}", decl.name);
        }
        TypeSpec::Struct(fields) if fields.is_empty() => {
            let _ = writeln!(out, "type {} struct{{}}", decl.name);
        }
        TypeSpec::Struct(fields) => {
            let _ = writeln!(out, "type {} struct {{", decl.name);
            let rows: Vec<Vec<String>> = fields.iter().map(field_cells).collect();
            write_aligned(out, &rows);
            out.push_str("}\n");
        }
        TypeSpec::Interface(methods) if methods.is_empty() => {
            let _ = writeln!(out, "type {} interface{{}}", decl.name);
        }
        TypeSpec::Interface(methods) => {
            let _ = writeln!(out, "type {} interface {{", decl.name);
            for method in methods {
                let _ = writeln!(out, "\t{method}");
            }
            out.push_str("}\n");
        }
    }
}

fn field_cells(field: &StructField) -> Vec<String> {
    let mut cells = Vec::with_capacity(3);
    if let Some(name) = &field.name {
        cells.push(name.clone());
    }
    cells.push(field.ty.clone());
    if let Some(tag) = &field.tag {
        cells.push(tag.to_string());
    }
    cells
}

fn write_func(out: &mut String, decl: &FuncDecl) {
    if let Some(doc) = &decl.doc {
        write_doc(out, doc);
    }
    out.push_str("func ");
    if let Some(receiver) = &decl.receiver {
        let _ = write!(out, "({receiver}) ");
    }
    let _ = writeln!(out, "{} {{", decl.signature);
    for line in &decl.body {
        if line.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "\t{line}");
        }
    }
    out.push_str("}\n");
}

fn write_values(out: &mut String, keyword: &str, decl: &ValueDecl) {
    if let Some(doc) = &decl.doc {
        write_doc(out, doc);
    }
    match decl.specs.as_slice() {
        [single] => {
            let _ = writeln!(out, "{keyword} {}", value_cells(single, false).join(" "));
        }
        specs => {
            let keep_type_column = specs.iter().any(|s| s.ty.is_some());
            let _ = writeln!(out, "{keyword} (");
            let rows: Vec<Vec<String>> = specs
                .iter()
                .map(|s| value_cells(s, keep_type_column))
                .collect();
            write_aligned(out, &rows);
            out.push_str(")\n");
        }
    }
}

/// Cells of `Name [Type] [= value]`.
///
/// In a block that has any typed spec, an untyped spec with a value keeps an
/// empty type cell so the `=` signs line up.
fn value_cells(spec: &ValueSpec, keep_type_column: bool) -> Vec<String> {
    let mut cells = vec![spec.name.clone()];
    match (&spec.ty, &spec.value) {
        (Some(ty), _) => cells.push(ty.clone()),
        (None, Some(_)) if keep_type_column => cells.push(String::new()),
        _ => {}
    }
    if let Some(value) = &spec.value {
        cells.push(format!("= {value}"));
    }
    cells
}

/// Write tab-indented rows with space-padded columns.
///
/// A column's width only counts rows that have a cell after it, so a short
/// trailing cell never widens the column before it.
fn write_aligned(out: &mut String, rows: &[Vec<String>]) {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(row.len().saturating_sub(1)) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    for row in rows {
        out.push('\t');
        let last = row.len().saturating_sub(1);
        for (i, cell) in row.iter().enumerate() {
            if i == last {
                out.push_str(cell);
            } else {
                let _ = write!(out, "{cell:<width$} ", width = widths[i]);
            }
        }
        out.push('\n');
    }
}
