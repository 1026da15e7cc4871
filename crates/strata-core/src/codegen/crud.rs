//! The fixed CRUD operation set shared by every interface-style artifact.

use crate::domain::Entity;
use crate::source::Signature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    List,
    Count,
    Create,
    Update,
    Delete,
}

/// What an operation takes besides the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument {
    Id,
    Filter,
    Entity,
}

impl Operation {
    pub const ALL: [Self; 6] = [
        Self::Get,
        Self::List,
        Self::Count,
        Self::Create,
        Self::Update,
        Self::Delete,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::List => "List",
            Self::Count => "Count",
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }

    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }

    pub const fn argument(&self) -> Argument {
        match self {
            Self::Get | Self::Delete => Argument::Id,
            Self::List | Self::Count => Argument::Filter,
            Self::Create | Self::Update => Argument::Entity,
        }
    }

    /// Past-tense event suffix for writes (`Created`, `Updated`, `Deleted`).
    pub const fn event_suffix(&self) -> Option<&'static str> {
        match self {
            Self::Create => Some("Created"),
            Self::Update => Some("Updated"),
            Self::Delete => Some("Deleted"),
            _ => None,
        }
    }

    /// Zero values returned alongside an error, with trailing `, ` when
    /// there are any.
    pub const fn zero_prefix(&self) -> &'static str {
        match self {
            Self::Get | Self::List => "nil, ",
            Self::Count => "0, ",
            _ => "",
        }
    }

    /// Name of the non-context argument as it appears in signatures.
    pub fn argument_name(&self, entity: &Entity) -> String {
        match self.argument() {
            Argument::Id => "id".into(),
            Argument::Filter => "filter".into(),
            Argument::Entity => entity.var_name(),
        }
    }

    /// Method signature, with model types qualified by `models` (pass `""`
    /// inside the models package).
    pub fn signature(&self, entity: &Entity, models: &str) -> Signature {
        let q = |name: String| {
            if models.is_empty() {
                name
            } else {
                format!("{models}.{name}")
            }
        };

        let arg_type = match self.argument() {
            Argument::Id => q(entity.id_type()),
            Argument::Filter => format!("*{}", q(entity.filter_type())),
            Argument::Entity => format!("*{}", q(entity.type_name())),
        };

        let sig = Signature::new(self.name())
            .param("ctx", "context.Context")
            .param(self.argument_name(entity), arg_type);

        match self {
            Self::Get => sig.returns(format!("*{}", q(entity.type_name()))).returns("error"),
            Self::List => sig
                .returns(format!("[]*{}", q(entity.type_name())))
                .returns("error"),
            Self::Count => sig.returns("uint64").returns("error"),
            _ => sig.returns("error"),
        }
    }

    /// Call expression forwarding the same arguments (`Get(ctx, id)`).
    pub fn forward(&self, entity: &Entity) -> String {
        format!("{}(ctx, {})", self.name(), self.argument_name(entity))
    }
}

/// The full method set, in declaration order.
pub fn method_set(entity: &Entity, models: &str) -> Vec<Signature> {
    Operation::ALL
        .iter()
        .map(|op| op.signature(entity, models))
        .collect()
}
