use crate::domain::{ArtifactKind, Entity, Feature, ProjectConfig};
use crate::source::{
    FuncDecl, Param, Signature, SourceTree, StructField, TypeDecl, ValueDecl, ValueSpec,
};

use super::crud::{self, Argument, Operation};
use super::{import_package, import_package_as, tree_for};

/// Alias the interactor package uses for the use-case ports, which share its
/// package name.
const PORTS_ALIAS: &str = "ports";

/// `domain/usecases/<entity>.go`: the application port.
pub(super) fn build_interface(entity: &Entity, config: &ProjectConfig) -> SourceTree {
    let mut tree = tree_for(ArtifactKind::UseCaseInterface);
    tree.import_std("context");
    import_package(&mut tree, config, ArtifactKind::Model);

    let name = format!("{}UseCase", entity.type_name());
    tree.push(
        TypeDecl::interface(&name, crud::method_set(entity, "models"))
            .doc(format!("{name} is the application API for {} entities.", entity.type_name())),
    );
    tree
}

/// `usecases/<entity>.go`: delegates to the repository and, with the event
/// bus enabled, publishes after every successful write.
pub(super) fn build_interactor(entity: &Entity, config: &ProjectConfig) -> SourceTree {
    let publishes = config.is_enabled(Feature::EventBus);
    let type_name = entity.type_name();
    let interactor = format!("{type_name}Interactor");
    let repo = format!("repositories.{type_name}Repository");

    let mut tree = tree_for(ArtifactKind::Interactor);
    tree.import_std("context");
    import_package(&mut tree, config, ArtifactKind::Model);
    import_package(&mut tree, config, ArtifactKind::RepositoryInterface);
    import_package_as(&mut tree, config, ArtifactKind::UseCaseInterface, PORTS_ALIAS);
    if publishes {
        import_package(&mut tree, config, ArtifactKind::EventBus);
    }

    let mut fields = vec![StructField::new("repo", &repo)];
    let mut ctor = Signature::new(format!("New{interactor}")).param("repo", &repo);
    let mut init = "repo: repo".to_string();
    if publishes {
        fields.push(StructField::new("publisher", "events.Publisher"));
        ctor = ctor.param("publisher", "events.Publisher");
        init.push_str(", publisher: publisher");
    }

    tree.push(
        TypeDecl::structure(&interactor, fields).doc(format!(
            "{interactor} implements {PORTS_ALIAS}.{type_name}UseCase on top of a repository."
        )),
    );
    tree.push(
        ValueDecl::single(
            ValueSpec::new("_")
                .typed(format!("{PORTS_ALIAS}.{type_name}UseCase"))
                .value(format!("(*{interactor})(nil)")),
        )
        .into_var(),
    );
    tree.push(
        FuncDecl::new(ctor.returns(format!("*{interactor}")))
            .doc(format!("New{interactor} wires an interactor to its dependencies."))
            .line(format!("return &{interactor}{{{init}}}")),
    );

    for op in Operation::ALL {
        let call = format!("i.repo.{}", op.forward(entity));
        let body: Vec<String> = match op.event_suffix() {
            Some(suffix) if publishes => {
                let id = match op.argument() {
                    Argument::Id => "id".to_string(),
                    _ => format!("{}.ID", entity.var_name()),
                };
                vec![
                    format!("if err := {call}; err != nil {{"),
                    "\treturn err".into(),
                    "}".into(),
                    String::new(),
                    format!("return i.publisher.Publish(ctx, events.{type_name}{suffix}{{ID: {id}}})"),
                ]
            }
            _ => vec![format!("return {call}")],
        };
        tree.push(
            FuncDecl::method(
                Param::new("i", format!("*{interactor}")),
                op.signature(entity, "models"),
            )
            .lines(body),
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
    fn interface_matches_repository_method_set() {
        let config = config(FeatureFlags::default(), vec![widget()]);
        let tree = build_interface(&config.entities()[0], &config);
        let iface = tree.find_type("WidgetUseCase").unwrap();
        assert_eq!(iface.methods().len(), 6);
        assert_eq!(tree.package(), "usecases");
    }

    #[test]
    fn interactor_delegates_without_event_bus() {
        let config = config(FeatureFlags::default(), vec![widget()]);
        let tree = build_interactor(&config.entities()[0], &config);

        assert!(!tree.has_import("acme/svc/internal/domain/events"));
        let create = tree.find_func(Some("WidgetInteractor"), "Create").unwrap();
        assert_eq!(create.body, vec!["return i.repo.Create(ctx, widget)"]);
        assert!(tree
            .imports()
            .iter()
            .any(|i| i.alias.as_deref() == Some("ports")));
    }

    #[test]
    fn interactor_publishes_after_writes() {
        let features = FeatureFlags {
            event_bus: true,
            ..FeatureFlags::default()
        };
        let config = config(features, vec![widget()]);
        let tree = build_interactor(&config.entities()[0], &config);

        let ctor = tree.find_func(None, "NewWidgetInteractor").unwrap();
        assert_eq!(ctor.signature.params.len(), 2);

        let delete = tree.find_func(Some("WidgetInteractor"), "Delete").unwrap();
        assert_eq!(
            delete.body.last().unwrap(),
            "return i.publisher.Publish(ctx, events.WidgetDeleted{ID: id})"
        );
        let update = tree.find_func(Some("WidgetInteractor"), "Update").unwrap();
        assert!(update.body[4].contains("events.WidgetUpdated{ID: widget.ID}"));

        let get = tree.find_func(Some("WidgetInteractor"), "Get").unwrap();
        assert_eq!(get.body, vec!["return i.repo.Get(ctx, id)"]);
    }
}
