use crate::domain::{ArtifactKind, Entity, Feature, ProjectConfig};
use crate::source::{
    FuncDecl, Param, Signature, SourceTree, StructField, TypeDecl, ValueDecl, ValueSpec,
};

use super::crud::{Argument, Operation};
use super::types::UUID_IMPORT;
use super::{import_package, tree_for};

const CHECKER_SIGNATURE: &str = "func(ctx context.Context, subject *auth.Subject, resource any) bool";

/// `domain/auth/auth.go`: the authenticated subject and its context key.
pub(super) fn build_module(_config: &ProjectConfig) -> SourceTree {
    let mut tree = tree_for(ArtifactKind::AuthModule)
        .with_doc("Package auth carries the authenticated subject through a request.");
    tree.import_std("context");
    tree.import_external(UUID_IMPORT);

    tree.push(
        TypeDecl::structure(
            "Subject",
            vec![
                StructField::new("ID", "uuid.UUID"),
                StructField::new("Roles", "[]string"),
            ],
        )
        .doc("Subject is the authenticated caller."),
    );
    tree.push(
        FuncDecl::method(
            Param::new("s", "*Subject"),
            Signature::new("HasRole").param("role", "string").returns("bool"),
        )
        .doc("HasRole reports whether the subject carries role.")
        .lines([
            "for _, r := range s.Roles {",
            "\tif r == role {",
            "\t\treturn true",
            "\t}",
            "}",
            "",
            "return false",
        ]),
    );
    tree.push(TypeDecl::structure("subjectKey", vec![]));
    tree.push(
        FuncDecl::new(
            Signature::new("WithSubject")
                .param("ctx", "context.Context")
                .param("subject", "*Subject")
                .returns("context.Context"),
        )
        .doc("WithSubject returns a copy of ctx carrying subject.")
        .line("return context.WithValue(ctx, subjectKey{}, subject)"),
    );
    tree.push(
        FuncDecl::new(
            Signature::new("SubjectFromContext")
                .param("ctx", "context.Context")
                .returns("*Subject")
                .returns("bool"),
        )
        .doc("SubjectFromContext returns the subject stored by WithSubject.")
        .lines([
            "subject, ok := ctx.Value(subjectKey{}).(*Subject)",
            "",
            "return subject, ok && subject != nil",
        ]),
    );

    tree
}

/// Permission constant name (`Widget` + `Get` → `WidgetGet`).
fn permission_const(entity: &Entity, op: Operation) -> String {
    format!("{}{}", entity.type_name(), op.name())
}

/// Writes on owned entities are checked against the owner; everything
/// else against roles.
fn checked_by_owner(entity: &Entity, op: Operation) -> bool {
    entity.owned_by.is_some() && matches!(op, Operation::Update | Operation::Delete)
}

/// `domain/permissions/permissions.go`: permission names, the checker
/// abstraction, and the declarative rule list turned into a lookup table.
pub(super) fn build_permissions(config: &ProjectConfig) -> SourceTree {
    let mut tree = tree_for(ArtifactKind::PermissionTable)
        .with_doc("Package permissions maps every operation to the checker that guards it.");
    tree.import_std("context");
    tree.import_external(UUID_IMPORT);
    import_package(&mut tree, config, ArtifactKind::AuthModule);

    tree.push(
        TypeDecl::defined("Permission", "string").doc("Permission names an operation on an entity."),
    );

    let specs: Vec<ValueSpec> = config
        .entities()
        .iter()
        .flat_map(|entity| {
            Operation::ALL.into_iter().map(move |op| {
                ValueSpec::new(permission_const(entity, op))
                    .typed("Permission")
                    .value(format!(
                        "\"{}.{}\"",
                        entity.file_stem(),
                        op.name().to_ascii_lowercase()
                    ))
            })
        })
        .collect();
    if !specs.is_empty() {
        tree.push(ValueDecl::new(specs).into_const());
    }

    tree.push(
        TypeDecl::interface("Owned", vec![Signature::new("OwnerID").returns("uuid.UUID")])
            .doc("Owned is implemented by entities that record their owner."),
    );
    tree.push(
        TypeDecl::interface(
            "Checker",
            vec![Signature::new("Check")
                .param("ctx", "context.Context")
                .param("subject", "*auth.Subject")
                .param("resource", "any")
                .returns("bool")],
        )
        .doc("Checker decides whether subject may act on resource.\nresource is nil for operations that do not load an entity."),
    );
    tree.push(
        TypeDecl::defined("CheckerFunc", CHECKER_SIGNATURE)
            .doc("CheckerFunc adapts a function to Checker."),
    );
    tree.push(
        FuncDecl::method(
            Param::new("f", "CheckerFunc"),
            Signature::new("Check")
                .param("ctx", "context.Context")
                .param("subject", "*auth.Subject")
                .param("resource", "any")
                .returns("bool"),
        )
        .line("return f(ctx, subject, resource)"),
    );
    tree.push(
        FuncDecl::new(
            Signature::new("AnyRole")
                .param("roles", "...string")
                .returns("Checker"),
        )
        .doc("AnyRole allows subjects carrying at least one of roles.")
        .lines([
            "return CheckerFunc(func(_ context.Context, subject *auth.Subject, _ any) bool {",
            "\tfor _, role := range roles {",
            "\t\tif subject.HasRole(role) {",
            "\t\t\treturn true",
            "\t\t}",
            "\t}",
            "",
            "\treturn false",
            "})",
        ]),
    );
    tree.push(
        FuncDecl::new(Signature::new("OwnerOnly").returns("Checker"))
            .doc("OwnerOnly allows subjects that own the resource.")
            .lines([
                "return CheckerFunc(func(_ context.Context, subject *auth.Subject, resource any) bool {",
                "\towned, ok := resource.(Owned)",
                "",
                "\treturn ok && owned.OwnerID() == subject.ID",
                "})",
            ]),
    );
    tree.push(
        TypeDecl::structure(
            "Rule",
            vec![
                StructField::new("Permission", "Permission"),
                StructField::new("Checker", "Checker"),
            ],
        )
        .doc("Rule binds a permission to the checker that guards it."),
    );

    let mut rules = Vec::new();
    for entity in config.entities() {
        for op in Operation::ALL {
            let checker = if checked_by_owner(entity, op) {
                "owners"
            } else {
                "roles"
            };
            rules.push(format!(
                "\t{{Permission: {}, Checker: {checker}}},",
                permission_const(entity, op)
            ));
        }
    }
    let body = if rules.is_empty() {
        vec!["return nil".to_string()]
    } else {
        let mut body = vec!["return []Rule{".to_string()];
        body.extend(rules);
        body.push("}".into());
        body
    };
    tree.push(
        FuncDecl::new(
            Signature {
                name: "Rules".into(),
                params: vec![Param::unnamed("roles"), Param::new("owners", "Checker")],
                results: vec![Param::unnamed("[]Rule")],
            },
        )
        .doc("Rules lists the checker for every permission. Updates and deletes of\nowned entities are checked by owners; everything else by roles.")
        .lines(body),
    );
    tree.push(
        FuncDecl::new(
            Signature::new("NewTable")
                .param("rules", "[]Rule")
                .returns("map[Permission]Checker"),
        )
        .doc("NewTable indexes rules by permission.")
        .lines([
            "table := make(map[Permission]Checker, len(rules))",
            "for _, rule := range rules {",
            "\ttable[rule.Permission] = rule.Checker",
            "}",
            "",
            "return table",
        ]),
    );

    tree
}

/// `interceptors/<entity>.go`: requires an authenticated subject and, with
/// permissions enabled, consults the checker table before delegating.
pub(super) fn build_interceptor(entity: &Entity, config: &ProjectConfig) -> SourceTree {
    let checks = config.is_enabled(Feature::Permissions);
    let type_name = entity.type_name();
    let port = format!("usecases.{type_name}UseCase");
    let interceptor = format!("{type_name}Interceptor");
    let table = "map[permissions.Permission]permissions.Checker";

    let mut tree = tree_for(ArtifactKind::Interceptor);
    tree.import_std("context");
    import_package(&mut tree, config, ArtifactKind::AuthModule);
    import_package(&mut tree, config, ArtifactKind::ErrorModule);
    import_package(&mut tree, config, ArtifactKind::Model);
    import_package(&mut tree, config, ArtifactKind::UseCaseInterface);
    if checks {
        import_package(&mut tree, config, ArtifactKind::PermissionTable);
    }

    let mut fields = vec![StructField::new("next", &port)];
    let mut ctor = Signature::new(format!("New{interceptor}")).param("next", &port);
    let mut init = "next: next".to_string();
    if checks {
        fields.push(StructField::new("checks", table));
        ctor = ctor.param("checks", table);
        init.push_str(", checks: checks");
    }

    tree.push(
        TypeDecl::structure(&interceptor, fields)
            .doc(format!("{interceptor} guards a {port} with authentication checks.")),
    );
    tree.push(
        ValueDecl::single(
            ValueSpec::new("_")
                .typed(&port)
                .value(format!("(*{interceptor})(nil)")),
        )
        .into_var(),
    );
    tree.push(
        FuncDecl::new(ctor.returns(format!("*{interceptor}")))
            .doc(format!("New{interceptor} wraps next."))
            .line(format!("return &{interceptor}{{{init}}}")),
    );

    let recv = || Param::new("i", format!("*{interceptor}"));
    if checks {
        tree.push(
            FuncDecl::method(
                recv(),
                Signature::new("authorize")
                    .param("ctx", "context.Context")
                    .param("permission", "permissions.Permission")
                    .param("resource", "any")
                    .returns("error"),
            )
            .lines([
                "subject, ok := auth.SubjectFromContext(ctx)",
                "if !ok {",
                "\treturn errs.NewUnauthenticatedError()",
                "}",
                "",
                "checker, ok := i.checks[permission]",
                "if !ok || !checker.Check(ctx, subject, resource) {",
                "\treturn errs.NewPermissionDeniedError(string(permission))",
                "}",
                "",
                "return nil",
            ]),
        );
    } else {
        tree.push(
            FuncDecl::method(
                recv(),
                Signature::new("authenticate")
                    .param("ctx", "context.Context")
                    .returns("error"),
            )
            .lines([
                "if _, ok := auth.SubjectFromContext(ctx); !ok {",
                "\treturn errs.NewUnauthenticatedError()",
                "}",
                "",
                "return nil",
            ]),
        );
    }

    for op in Operation::ALL {
        let zero = op.zero_prefix();
        let mut body = Vec::new();
        let guard = if !checks {
            "i.authenticate(ctx)".to_string()
        } else if checked_by_owner(entity, op) {
            let id = match op.argument() {
                Argument::Id => "id".to_string(),
                _ => format!("{}.ID", entity.var_name()),
            };
            body.extend([
                format!("current, err := i.next.Get(ctx, {id})"),
                "if err != nil {".into(),
                format!("\treturn {zero}err"),
                "}".into(),
            ]);
            format!(
                "i.authorize(ctx, permissions.{}, current)",
                permission_const(entity, op)
            )
        } else {
            format!(
                "i.authorize(ctx, permissions.{}, nil)",
                permission_const(entity, op)
            )
        };
        body.extend([
            format!("if err := {guard}; err != nil {{"),
            format!("\treturn {zero}err"),
            "}".into(),
            String::new(),
            format!("return i.next.{}", op.forward(entity)),
        ]);

        tree.push(FuncDecl::method(recv(), op.signature(entity, "models")).lines(body));
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::domain::FeatureFlags;
    use crate::source::{Declaration, TypeSpec};

    fn auth_only() -> FeatureFlags {
        FeatureFlags {
            auth: true,
            ..FeatureFlags::default()
        }
    }

    #[test]
    fn auth_module_exposes_subject_helpers() {
        let tree = build_module(&config(auth_only(), vec![]));
        assert_eq!(tree.package(), "auth");
        assert!(tree.find_type("Subject").is_some());
        assert!(tree.find_func(None, "WithSubject").is_some());
        assert!(tree.find_func(None, "SubjectFromContext").is_some());
    }

    #[test]
    fn permission_table_uses_owner_checker_for_owned_writes() {
        let config = config(all_features(), vec![document(), user()]);
        let tree = build_permissions(&config);

        let consts = tree
            .declarations()
            .iter()
            .find_map(|d| match d {
                Declaration::Const(v) => Some(v),
                _ => None,
            })
            .unwrap();
        assert_eq!(consts.specs.len(), 12);
        assert_eq!(consts.specs[0].name, "DocumentGet");
        assert_eq!(consts.specs[0].value.as_deref(), Some("\"document.get\""));

        let rules = tree.find_func(None, "Rules").unwrap();
        assert!(rules
            .body
            .contains(&"\t{Permission: DocumentUpdate, Checker: owners},".to_string()));
        assert!(rules
            .body
            .contains(&"\t{Permission: DocumentGet, Checker: roles},".to_string()));
        assert!(rules
            .body
            .contains(&"\t{Permission: UserDelete, Checker: roles},".to_string()));

        let checker = tree.find_type("CheckerFunc").unwrap();
        assert_eq!(checker.spec, TypeSpec::Defined(CHECKER_SIGNATURE.into()));
        assert!(tree.find_func(None, "NewTable").is_some());
    }

    #[test]
    fn permission_table_without_entities_is_valid() {
        let tree = build_permissions(&config(all_features(), vec![]));
        let rules = tree.find_func(None, "Rules").unwrap();
        assert_eq!(rules.body, vec!["return nil"]);
    }

    #[test]
    fn interceptor_only_authenticates_without_permissions() {
        let config = config(auth_only(), vec![widget()]);
        let tree = build_interceptor(&config.entities()[0], &config);

        assert!(tree.find_func(Some("WidgetInterceptor"), "authenticate").is_some());
        assert!(!tree.has_import("acme/svc/internal/domain/permissions"));
        let get = tree.find_func(Some("WidgetInterceptor"), "Get").unwrap();
        assert_eq!(get.body[0], "if err := i.authenticate(ctx); err != nil {");
        assert_eq!(get.body[1], "\treturn nil, err");
    }

    #[test]
    fn interceptor_checks_permissions_and_ownership() {
        let config = config(all_features(), vec![document(), user()]);
        let tree = build_interceptor(&config.entities()[0], &config);

        let list = tree.find_func(Some("DocumentInterceptor"), "List").unwrap();
        assert_eq!(
            list.body[0],
            "if err := i.authorize(ctx, permissions.DocumentList, nil); err != nil {"
        );

        let delete = tree.find_func(Some("DocumentInterceptor"), "Delete").unwrap();
        assert_eq!(delete.body[0], "current, err := i.next.Get(ctx, id)");
        assert_eq!(
            delete.body[4],
            "if err := i.authorize(ctx, permissions.DocumentDelete, current); err != nil {"
        );
    }
}
