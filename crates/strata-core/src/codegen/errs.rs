use crate::domain::{ArtifactKind, Feature, ProjectConfig};
use crate::source::{
    FuncDecl, Param, Signature, SourceTree, StructField, TypeDecl, ValueDecl, ValueSpec,
};

use super::tree_for;

/// One row of the error taxonomy.
struct Constructor {
    name: &'static str,
    code: &'static str,
    params: &'static [(&'static str, &'static str)],
    message: &'static str,
    doc: &'static str,
    /// Only emitted when authentication is enabled.
    auth: bool,
}

const CONSTRUCTORS: &[Constructor] = &[
    Constructor {
        name: "NotFound",
        code: "not_found",
        params: &[("resource", "string")],
        message: "fmt.Sprintf(\"%s not found\", resource)",
        doc: "reports that resource does not exist.",
        auth: false,
    },
    Constructor {
        name: "InvalidParameter",
        code: "invalid_parameter",
        params: &[("name", "string"), ("reason", "string")],
        message: "fmt.Sprintf(\"invalid %s: %s\", name, reason)",
        doc: "reports a rejected input value.",
        auth: false,
    },
    Constructor {
        name: "AlreadyExists",
        code: "already_exists",
        params: &[("resource", "string")],
        message: "fmt.Sprintf(\"%s already exists\", resource)",
        doc: "reports a uniqueness conflict.",
        auth: false,
    },
    Constructor {
        name: "Internal",
        code: "internal",
        params: &[("cause", "error")],
        message: "cause.Error()",
        doc: "wraps an unexpected failure.",
        auth: false,
    },
    Constructor {
        name: "Unimplemented",
        code: "unimplemented",
        params: &[("operation", "string")],
        message: "fmt.Sprintf(\"%s is not implemented\", operation)",
        doc: "marks generated code that still needs a body.",
        auth: false,
    },
    Constructor {
        name: "Unauthenticated",
        code: "unauthenticated",
        params: &[],
        message: "\"authentication required\"",
        doc: "reports a request without a subject.",
        auth: true,
    },
    Constructor {
        name: "PermissionDenied",
        code: "permission_denied",
        params: &[("permission", "string")],
        message: "fmt.Sprintf(\"missing permission %s\", permission)",
        doc: "reports a subject lacking permission.",
        auth: true,
    },
];

/// `domain/errs/errors.go`: error codes, the `Error` type and one
/// constructor per code.
pub(super) fn build(config: &ProjectConfig) -> SourceTree {
    let auth = config.is_enabled(Feature::Auth);
    let rows: Vec<&Constructor> = CONSTRUCTORS.iter().filter(|c| auth || !c.auth).collect();

    let mut tree =
        tree_for(ArtifactKind::ErrorModule).with_doc("Package errs defines the error taxonomy shared by every layer.");
    tree.import_std("errors");
    tree.import_std("fmt");

    tree.push(TypeDecl::defined("ErrorCode", "string").doc("ErrorCode classifies an Error."));
    tree.push(
        ValueDecl::new(
            rows.iter()
                .map(|c| {
                    ValueSpec::new(format!("Code{}", c.name))
                        .typed("ErrorCode")
                        .value(format!("\"{}\"", c.code))
                })
                .collect(),
        )
        .into_const(),
    );

    tree.push(
        TypeDecl::structure(
            "Error",
            vec![
                StructField::new("Code", "ErrorCode"),
                StructField::new("Message", "string"),
            ],
        )
        .doc("Error is a classified error with a human-readable message."),
    );
    tree.push(
        FuncDecl::method(
            Param::new("e", "*Error"),
            Signature::new("Error").returns("string"),
        )
        .line("return fmt.Sprintf(\"%s: %s\", e.Code, e.Message)"),
    );
    tree.push(
        FuncDecl::new(
            Signature::new("AsError")
                .param("err", "error")
                .returns("*Error")
                .returns("bool"),
        )
        .doc("AsError extracts the first *Error in err's chain.")
        .lines([
            "var target *Error",
            "if errors.As(err, &target) {",
            "\treturn target, true",
            "}",
            "",
            "return nil, false",
        ]),
    );
    tree.push(
        FuncDecl::new(
            Signature::new("HasCode")
                .param("err", "error")
                .param("code", "ErrorCode")
                .returns("bool"),
        )
        .doc("HasCode reports whether err carries code.")
        .lines(["e, ok := AsError(err)", "", "return ok && e.Code == code"]),
    );

    for c in rows {
        let mut sig = Signature::new(format!("New{}Error", c.name));
        for (name, ty) in c.params {
            sig = sig.param(*name, *ty);
        }
        tree.push(
            FuncDecl::new(sig.returns("error"))
                .doc(format!("New{}Error {}", c.name, c.doc))
                .line(format!(
                    "return &Error{{Code: Code{}, Message: {}}}",
                    c.name, c.message
                )),
        );
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::domain::FeatureFlags;

    #[test]
    fn base_taxonomy_without_auth() {
        let tree = build(&config(FeatureFlags::default(), vec![]));
        assert_eq!(tree.package(), "errs");
        assert!(tree.find_func(None, "NewNotFoundError").is_some());
        assert!(tree.find_func(None, "NewUnimplementedError").is_some());
        assert!(tree.find_func(None, "NewUnauthenticatedError").is_none());
        assert!(!tree.declared_names().contains(&"CodePermissionDenied".to_string()));
    }

    #[test]
    fn auth_adds_constructors() {
        let features = FeatureFlags {
            auth: true,
            ..FeatureFlags::default()
        };
        let tree = build(&config(features, vec![]));
        assert!(tree.find_func(None, "NewUnauthenticatedError").is_some());
        let denied = tree.find_func(None, "NewPermissionDeniedError").unwrap();
        assert_eq!(denied.signature.params[0].name.as_deref(), Some("permission"));
    }
}
