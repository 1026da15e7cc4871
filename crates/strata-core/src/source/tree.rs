//! Structural representation of one Go compilation unit.
//!
//! A [`SourceTree`] is the contract between declaration builders and the
//! reconciler: builders produce one, the serializer renders it, the parser
//! recovers it from disk.
//!
//! ```text
//! SourceTree
//! ├── header         Option<String>       comments above the package doc, as read
//! ├── package        "models"
//! ├── doc            Option<DocComment>
//! ├── imports        Vec<ImportSpec>      unique (alias, path)
//! └── declarations   Vec<Declaration>     order is preserved
//!      ├── Type(TypeDecl)     struct / interface / alias / defined
//!      ├── Func(FuncDecl)     signature + body lines
//!      ├── Const(ValueDecl)
//!      ├── Var(ValueDecl)
//!      └── Verbatim(String)   parsed chunk kept byte-for-byte
//! ```

use std::fmt;

// ── SourceTree ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    header: Option<String>,
    package: String,
    doc: Option<DocComment>,
    imports: Vec<ImportSpec>,
    declarations: Vec<Declaration>,
}

impl SourceTree {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            header: None,
            package: package.into(),
            doc: None,
            imports: Vec::new(),
            declarations: Vec::new(),
        }
    }

    /// Attach a package doc comment.
    pub fn with_doc(mut self, doc: impl Into<DocComment>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub(crate) fn set_doc(&mut self, doc: Option<DocComment>) {
        self.doc = doc;
    }

    pub(crate) fn set_header(&mut self, header: Option<String>) {
        self.header = header;
    }

    /// Add an import, ignoring exact `(alias, path)` duplicates.
    ///
    /// Returns `true` if the import was new.
    pub fn add_import(&mut self, spec: ImportSpec) -> bool {
        if self
            .imports
            .iter()
            .any(|i| i.alias == spec.alias && i.path == spec.path)
        {
            return false;
        }
        self.imports.push(spec);
        true
    }

    pub fn import_std(&mut self, path: impl Into<String>) {
        self.add_import(ImportSpec::new(ImportGroup::STANDARD, path));
    }

    pub fn import_external(&mut self, path: impl Into<String>) {
        self.add_import(ImportSpec::new(ImportGroup::THIRD_PARTY, path));
    }

    pub fn import_local(&mut self, path: impl Into<String>) {
        self.add_import(ImportSpec::new(ImportGroup::LOCAL, path));
    }

    pub fn push(&mut self, decl: impl Into<Declaration>) {
        self.declarations.push(decl.into());
    }

    pub fn with(mut self, decl: impl Into<Declaration>) -> Self {
        self.push(decl);
        self
    }

    /// Text preceding the package doc comment (license banners, build
    /// constraints), including its trailing newline. Builders never set it.
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn doc(&self) -> Option<&DocComment> {
        self.doc.as_ref()
    }

    pub fn imports(&self) -> &[ImportSpec] {
        &self.imports
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn has_import(&self, path: &str) -> bool {
        self.imports.iter().any(|i| i.path == path)
    }

    /// Look up a type declaration by name.
    pub fn find_type(&self, name: &str) -> Option<&TypeDecl> {
        self.declarations.iter().find_map(|d| match d {
            Declaration::Type(t) if t.name == name => Some(t),
            _ => None,
        })
    }

    /// Look up a function or method by name (and receiver type, if given).
    pub fn find_func(&self, receiver: Option<&str>, name: &str) -> Option<&FuncDecl> {
        self.declarations.iter().find_map(|d| match d {
            Declaration::Func(f) if f.name() == name && f.receiver_type() == receiver => Some(f),
            _ => None,
        })
    }

    /// Names of every declared identifier, in declaration order.
    pub fn declared_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for decl in &self.declarations {
            match decl {
                Declaration::Type(t) => names.push(t.name.clone()),
                Declaration::Func(f) => names.push(match f.receiver_type() {
                    Some(recv) => format!("{recv}.{}", f.name()),
                    None => f.name().to_string(),
                }),
                Declaration::Const(v) | Declaration::Var(v) => {
                    names.extend(v.specs.iter().map(|s| s.name.clone()))
                }
                Declaration::Verbatim(_) => {}
            }
        }
        names
    }
}

// ── Comments ──────────────────────────────────────────────────────────────────

/// A `//` comment group attached to a package clause or declaration.
///
/// Lines are stored without the `// ` prefix; an empty line renders as `//`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    lines: Vec<String>,
}

impl DocComment {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            lines: text.as_ref().lines().map(str::to_string).collect(),
        }
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl From<&str> for DocComment {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DocComment {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

// ── Imports ───────────────────────────────────────────────────────────────────

/// Blank-line separated section of the import block.
///
/// Builders use the three named groups; the parser numbers groups in the
/// order they appear. Only relative order matters when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportGroup(pub u8);

impl ImportGroup {
    pub const STANDARD: Self = Self(0);
    pub const THIRD_PARTY: Self = Self(1);
    pub const LOCAL: Self = Self(2);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub alias: Option<String>,
    pub path: String,
    pub group: ImportGroup,
}

impl ImportSpec {
    pub fn new(group: ImportGroup, path: impl Into<String>) -> Self {
        Self {
            alias: None,
            path: path.into(),
            group,
        }
    }

    pub fn aliased(group: ImportGroup, alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            path: path.into(),
            group,
        }
    }
}

impl fmt::Display for ImportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{alias} \"{}\"", self.path),
            None => write!(f, "\"{}\"", self.path),
        }
    }
}

// ── Declarations ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Type(TypeDecl),
    Func(FuncDecl),
    Const(ValueDecl),
    Var(ValueDecl),
    /// A top-level chunk that was read from disk but could not be decomposed.
    Verbatim(String),
}

impl Declaration {
    pub fn doc(&self) -> Option<&DocComment> {
        match self {
            Self::Type(t) => t.doc.as_ref(),
            Self::Func(f) => f.doc.as_ref(),
            Self::Const(v) | Self::Var(v) => v.doc.as_ref(),
            Self::Verbatim(_) => None,
        }
    }

    pub fn is_verbatim(&self) -> bool {
        matches!(self, Self::Verbatim(_))
    }
}

impl From<TypeDecl> for Declaration {
    fn from(d: TypeDecl) -> Self {
        Self::Type(d)
    }
}

impl From<FuncDecl> for Declaration {
    fn from(d: FuncDecl) -> Self {
        Self::Func(d)
    }
}

/// `type Name <spec>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub doc: Option<DocComment>,
    pub name: String,
    pub spec: TypeSpec,
}

impl TypeDecl {
    pub fn structure(name: impl Into<String>, fields: Vec<StructField>) -> Self {
        Self {
            doc: None,
            name: name.into(),
            spec: TypeSpec::Struct(fields),
        }
    }

    pub fn interface(name: impl Into<String>, methods: Vec<Signature>) -> Self {
        Self {
            doc: None,
            name: name.into(),
            spec: TypeSpec::Interface(methods),
        }
    }

    pub fn alias(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            doc: None,
            name: name.into(),
            spec: TypeSpec::Alias(target.into()),
        }
    }

    pub fn defined(name: impl Into<String>, underlying: impl Into<String>) -> Self {
        Self {
            doc: None,
            name: name.into(),
            spec: TypeSpec::Defined(underlying.into()),
        }
    }

    pub fn doc(mut self, doc: impl Into<DocComment>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn fields(&self) -> &[StructField] {
        match &self.spec {
            TypeSpec::Struct(fields) => fields,
            _ => &[],
        }
    }

    pub fn methods(&self) -> &[Signature] {
        match &self.spec {
            TypeSpec::Interface(methods) => methods,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    Struct(Vec<StructField>),
    Interface(Vec<Signature>),
    /// `type A = B`
    Alias(String),
    /// `type A B`
    Defined(String),
}

/// One struct field; `name == None` is an embedded field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    pub name: Option<String>,
    pub ty: String,
    pub tag: Option<StructTag>,
}

impl StructField {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ty: ty.into(),
            tag: None,
        }
    }

    pub fn embedded(ty: impl Into<String>) -> Self {
        Self {
            name: None,
            ty: ty.into(),
            tag: None,
        }
    }

    pub fn tag(mut self, tag: StructTag) -> Self {
        self.tag = Some(tag);
        self
    }
}

/// Ordered `key:"value"` pairs rendered inside backquotes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructTag {
    pairs: Vec<(String, String)>,
}

impl StructTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("`")?;
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}:\"{value}\"")?;
        }
        f.write_str("`")
    }
}

/// A named parameter or result; `name == None` for bare types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Option<String>,
    pub ty: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ty: ty.into(),
        }
    }

    pub fn unnamed(ty: impl Into<String>) -> Self {
        Self {
            name: None,
            ty: ty.into(),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} {}", self.ty),
            None => f.write_str(&self.ty),
        }
    }
}

/// `Name(params) results`, shared by interface methods and functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub params: Vec<Param>,
    pub results: Vec<Param>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push(Param::new(name, ty));
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.results.push(Param::unnamed(ty));
        self
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_params(f, &self.params)?;
        f.write_str(")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] if single.name.is_none() => write!(f, " {}", single.ty),
            results => {
                f.write_str(" (")?;
                write_params(f, results)?;
                f.write_str(")")
            }
        }
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[Param]) -> fmt::Result {
    for (i, p) in params.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{p}")?;
    }
    Ok(())
}

/// A function or method with a boilerplate body.
///
/// Body lines are stored one indentation level in: the serializer prefixes
/// each non-empty line with a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub doc: Option<DocComment>,
    pub receiver: Option<Param>,
    pub signature: Signature,
    pub body: Vec<String>,
}

impl FuncDecl {
    pub fn new(signature: Signature) -> Self {
        Self {
            doc: None,
            receiver: None,
            signature,
            body: Vec::new(),
        }
    }

    pub fn method(receiver: Param, signature: Signature) -> Self {
        Self {
            receiver: Some(receiver),
            ..Self::new(signature)
        }
    }

    pub fn doc(mut self, doc: impl Into<DocComment>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    pub fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    /// Receiver type without the pointer star (`*Foo` → `Foo`).
    pub fn receiver_type(&self) -> Option<&str> {
        self.receiver
            .as_ref()
            .map(|r| r.ty.trim_start_matches('*'))
    }
}

/// A `const` or `var` declaration.
///
/// One spec renders on a single line; more render as an aligned block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDecl {
    pub doc: Option<DocComment>,
    pub specs: Vec<ValueSpec>,
}

impl ValueDecl {
    pub fn new(specs: Vec<ValueSpec>) -> Self {
        Self { doc: None, specs }
    }

    pub fn single(spec: ValueSpec) -> Self {
        Self::new(vec![spec])
    }

    pub fn doc(mut self, doc: impl Into<DocComment>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn into_const(self) -> Declaration {
        Declaration::Const(self)
    }

    pub fn into_var(self) -> Declaration {
        Declaration::Var(self)
    }
}

/// `Name [Type] [= value]`; the value is a single-line expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpec {
    pub name: String,
    pub ty: Option<String>,
    pub value: Option<String>,
}

impl ValueSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            value: None,
        }
    }

    pub fn typed(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}
