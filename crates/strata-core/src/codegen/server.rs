use crate::domain::{ArtifactKind, Feature, ProjectConfig};
use crate::source::{FuncDecl, ImportGroup, ImportSpec, Signature, SourceTree};

use super::{import_package, tree_for};

const POSTGRES_DRIVER: &str = "github.com/lib/pq";
const OTEL_IMPORT: &str = "go.opentelemetry.io/otel";

/// `cmd/<name>/main.go`: opens the database and wires every entity's use
/// case through the enabled decorators.
pub(super) fn build(config: &ProjectConfig) -> SourceTree {
    let entities = config.entities();
    let auth = config.is_enabled(Feature::Auth);
    let permissions = config.is_enabled(Feature::Permissions);
    let bus = config.is_enabled(Feature::EventBus);
    let tracing = config.is_enabled(Feature::Tracing);

    let mut tree = tree_for(ArtifactKind::ServerBootstrap)
        .with_doc(format!("Command {} serves the generated API.", config.binary_name()));
    for path in ["database/sql", "log", "net/http", "os"] {
        tree.import_std(path);
    }
    tree.add_import(ImportSpec::aliased(ImportGroup::THIRD_PARTY, "_", POSTGRES_DRIVER));

    let mut body = vec![
        "db, err := sql.Open(\"postgres\", os.Getenv(\"DATABASE_URL\"))".to_string(),
        "if err != nil {".into(),
        "\tlog.Fatalf(\"open database: %v\", err)".into(),
        "}".into(),
        "defer db.Close()".into(),
        String::new(),
    ];

    if !entities.is_empty() {
        import_package(&mut tree, config, ArtifactKind::RepositoryImpl);
        import_package(&mut tree, config, ArtifactKind::Interactor);

        let mut setup = Vec::new();
        if bus {
            import_package(&mut tree, config, ArtifactKind::EventBus);
            setup.push("bus := events.NewBus()".to_string());
        }
        if tracing {
            tree.import_external(OTEL_IMPORT);
            import_package(&mut tree, config, ArtifactKind::TracingDecorator);
            setup.push(format!("tracer := otel.Tracer(\"{}\")", config.binary_name()));
        }
        if auth {
            import_package(&mut tree, config, ArtifactKind::Interceptor);
        }
        if permissions {
            import_package(&mut tree, config, ArtifactKind::PermissionTable);
            setup.push(
                "checks := permissions.NewTable(permissions.Rules(permissions.AnyRole(\"admin\"), permissions.OwnerOnly()))"
                    .into(),
            );
        }
        if !setup.is_empty() {
            body.extend(setup);
            body.push(String::new());
        }

        body.push("services := []any{".into());
        for entity in entities {
            let name = entity.type_name();
            let mut expr = format!("usecases.New{name}Interactor(postgres.New{name}Repository(db)");
            expr.push_str(if bus { ", bus)" } else { ")" });
            if tracing {
                expr = format!("tracing.New{name}Tracer({expr}, tracer)");
            }
            if auth {
                let extra = if permissions { ", checks" } else { "" };
                expr = format!("interceptors.New{name}Interceptor({expr}{extra})");
            }
            body.push(format!("\t{expr},"));
        }
        body.push("}".into());
        body.push("log.Printf(\"wired %d services\", len(services))".into());
        body.push(String::new());
    }

    body.extend([
        "addr := os.Getenv(\"ADDR\")".to_string(),
        "if addr == \"\" {".into(),
        "\taddr = \":8080\"".into(),
        "}".into(),
        String::new(),
        format!("log.Printf(\"{} listening on %s\", addr)", config.binary_name()),
        "if err := http.ListenAndServe(addr, http.NewServeMux()); err != nil {".into(),
        "\tlog.Fatal(err)".into(),
        "}".into(),
    ]);

    tree.push(FuncDecl::new(Signature::new("main")).lines(body));
    tree
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::domain::FeatureFlags;

    #[test]
    fn bootstrap_without_entities_imports_no_layers() {
        let tree = build(&config(FeatureFlags::default(), vec![]));
        assert_eq!(tree.package(), "main");
        assert!(!tree.has_import("acme/svc/internal/usecases"));
        assert!(tree.find_func(None, "main").is_some());
    }

    #[test]
    fn bootstrap_wires_decorators_in_order() {
        let config = config(all_features(), vec![widget()]);
        let tree = build(&config);
        let main = tree.find_func(None, "main").unwrap();

        assert!(main.body.contains(
            &"\tinterceptors.NewWidgetInterceptor(tracing.NewWidgetTracer(usecases.NewWidgetInteractor(postgres.NewWidgetRepository(db), bus), tracer), checks),"
                .to_string()
        ));
        assert!(tree.has_import(OTEL_IMPORT));
        assert!(tree.has_import("acme/svc/internal/domain/permissions"));
    }

    #[test]
    fn bootstrap_base_only() {
        let config = config(FeatureFlags::default(), vec![widget()]);
        let main = build(&config).find_func(None, "main").cloned().unwrap();
        assert!(main.body.contains(
            &"\tusecases.NewWidgetInteractor(postgres.NewWidgetRepository(db)),".to_string()
        ));
        assert!(!main.body.iter().any(|l| l.contains("bus")));
    }
}
