use crate::domain::{ArtifactKind, Entity, ProjectConfig};
use crate::source::{FuncDecl, Param, Signature, SourceTree, StructField, TypeDecl, ValueDecl, ValueSpec};

use super::crud::Operation;
use super::{import_package, tree_for};

pub const OTEL_TRACE_IMPORT: &str = "go.opentelemetry.io/otel/trace";

/// `usecases/tracing/<entity>.go`: a use-case decorator that opens one span
/// per call.
pub(super) fn build(entity: &Entity, config: &ProjectConfig) -> SourceTree {
    let type_name = entity.type_name();
    let port = format!("usecases.{type_name}UseCase");
    let tracer = format!("{type_name}Tracer");

    let mut tree = tree_for(ArtifactKind::TracingDecorator);
    tree.import_std("context");
    tree.import_external(OTEL_TRACE_IMPORT);
    import_package(&mut tree, config, ArtifactKind::Model);
    import_package(&mut tree, config, ArtifactKind::UseCaseInterface);

    tree.push(
        TypeDecl::structure(
            &tracer,
            vec![
                StructField::new("next", &port),
                StructField::new("tracer", "trace.Tracer"),
            ],
        )
        .doc(format!("{tracer} records a span around every {port} call.")),
    );
    tree.push(
        ValueDecl::single(
            ValueSpec::new("_")
                .typed(&port)
                .value(format!("(*{tracer})(nil)")),
        )
        .into_var(),
    );
    tree.push(
        FuncDecl::new(
            Signature::new(format!("New{tracer}"))
                .param("next", &port)
                .param("tracer", "trace.Tracer")
                .returns(format!("*{tracer}")),
        )
        .doc(format!("New{tracer} decorates next with spans from tracer."))
        .line(format!("return &{tracer}{{next: next, tracer: tracer}}")),
    );

    for op in Operation::ALL {
        tree.push(
            FuncDecl::method(
                Param::new("t", format!("*{tracer}")),
                op.signature(entity, "models"),
            )
            .lines([
                format!(
                    "ctx, span := t.tracer.Start(ctx, \"{type_name}UseCase.{}\")",
                    op.name()
                ),
                "defer span.End()".into(),
                String::new(),
                format!("return t.next.{}", op.forward(entity)),
            ]),
        );
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn decorator_spans_every_operation() {
        let config = config(all_features(), vec![widget()]);
        let tree = build(&config.entities()[0], &config);

        assert_eq!(tree.package(), "tracing");
        assert!(tree.has_import(OTEL_TRACE_IMPORT));
        for op in Operation::ALL {
            let method = tree.find_func(Some("WidgetTracer"), op.name()).unwrap();
            assert_eq!(method.body[1], "defer span.End()");
        }
        let list = tree.find_func(Some("WidgetTracer"), "List").unwrap();
        assert_eq!(list.body[3], "return t.next.List(ctx, filter)");
    }
}
