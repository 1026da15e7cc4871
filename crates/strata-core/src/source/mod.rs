//! Go source model, canonical serializer and lossless parser.
//!
//! The round-trip contract: for any tree `t` built by this crate,
//! `parse(&serialize(&t))` succeeds and serializing the result yields the
//! same bytes. For any bytes `b` where `parse(b)` succeeds,
//! `serialize(&parse(b)?) == b`.

mod parse;
mod render;
mod tree;

pub use parse::parse;
pub use render::{render, render_declaration, serialize};
pub use tree::{
    Declaration, DocComment, FuncDecl, ImportGroup, ImportSpec, Param, Signature, SourceTree,
    StructField, StructTag, TypeDecl, TypeSpec, ValueDecl, ValueSpec,
};
