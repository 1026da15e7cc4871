use crate::domain::{naming, ArtifactKind, Entity, ProjectConfig};
use crate::source::{
    FuncDecl, Param, Signature, SourceTree, StructField, TypeDecl, ValueDecl, ValueSpec,
};

use super::crud::{self, Operation};
use super::{import_package, receiver_name, tree_for};

/// `domain/repositories/<entity>.go`: the persistence port.
pub(super) fn build_interface(entity: &Entity, config: &ProjectConfig) -> SourceTree {
    let mut tree = tree_for(ArtifactKind::RepositoryInterface);
    tree.import_std("context");
    import_package(&mut tree, config, ArtifactKind::Model);

    let name = format!("{}Repository", entity.type_name());
    tree.push(
        TypeDecl::interface(&name, crud::method_set(entity, "models"))
            .doc(format!("{name} persists {} entities.", entity.type_name())),
    );
    tree
}

/// `repositories/postgres/<entity>.go`: a skeleton implementation whose
/// methods report `Unimplemented` until filled in by hand.
pub(super) fn build_impl(entity: &Entity, config: &ProjectConfig) -> SourceTree {
    let mut tree = tree_for(ArtifactKind::RepositoryImpl);
    tree.import_std("context");
    tree.import_std("database/sql");
    import_package(&mut tree, config, ArtifactKind::ErrorModule);
    import_package(&mut tree, config, ArtifactKind::Model);
    import_package(&mut tree, config, ArtifactKind::RepositoryInterface);

    let type_name = entity.type_name();
    let repo = format!("{type_name}Repository");
    let var = entity.var_name();
    let columns_var = format!("{var}Columns");
    let table_const = format!("{var}Table");

    let columns: Vec<String> = std::iter::once("\"id\"".to_string())
        .chain(entity.fields.iter().map(|f| format!("\"{}\"", f.column())))
        .collect();

    tree.push(
        ValueDecl::single(ValueSpec::new(&table_const).value(format!("\"{}\"", entity.table_name())))
            .doc(format!("{table_const} is the table backing {type_name}."))
            .into_const(),
    );
    tree.push(
        ValueDecl::single(
            ValueSpec::new(&columns_var).value(format!("[]string{{{}}}", columns.join(", "))),
        )
        .doc(format!("{columns_var} lists the columns of {table_const} in struct order."))
        .into_var(),
    );

    if entity.has_foreign_keys() {
        let refs_var = format!("{var}References");
        let pairs: Vec<String> = entity
            .fields
            .iter()
            .filter_map(|f| {
                f.references.as_ref().map(|target| {
                    format!(
                        "\"{}\": \"{}\"",
                        f.column(),
                        naming::pluralize(&naming::to_snake_case(target))
                    )
                })
            })
            .collect();
        tree.push(
            ValueDecl::single(
                ValueSpec::new(&refs_var)
                    .value(format!("map[string]string{{{}}}", pairs.join(", "))),
            )
            .doc(format!("{refs_var} maps foreign-key columns to the tables they reference."))
            .into_var(),
        );
    }

    tree.push(
        TypeDecl::structure(&repo, vec![StructField::new("db", "*sql.DB")])
            .doc(format!("{repo} is a PostgreSQL-backed repositories.{repo}.")),
    );
    tree.push(
        ValueDecl::single(
            ValueSpec::new("_")
                .typed(format!("repositories.{repo}"))
                .value(format!("(*{repo})(nil)")),
        )
        .into_var(),
    );
    tree.push(
        FuncDecl::new(
            Signature::new(format!("New{repo}"))
                .param("db", "*sql.DB")
                .returns(format!("*{repo}")),
        )
        .doc(format!("New{repo} returns a repository backed by db."))
        .line(format!("return &{repo}{{db: db}}")),
    );

    let recv = receiver_name(&repo);
    for op in Operation::ALL {
        tree.push(
            FuncDecl::method(
                Param::new(&recv, format!("*{repo}")),
                op.signature(entity, "models"),
            )
            .doc(format!("{} implements repositories.{repo}.", op.name()))
            .line(format!("// TODO: {}", todo_hint(op, &table_const, &columns_var)))
            .line(format!(
                "return {}errs.NewUnimplementedError(\"{repo}.{}\")",
                op.zero_prefix(),
                op.name()
            )),
        );
    }

    tree
}

fn todo_hint(op: Operation, table: &str, columns: &str) -> String {
    match op {
        Operation::Get => format!("select {columns} from {table} by id."),
        Operation::List => format!("select {columns} from {table} matching filter."),
        Operation::Count => format!("count rows in {table} matching filter."),
        Operation::Create => format!("insert {columns} into {table}."),
        Operation::Update => format!("update {columns} in {table} by id."),
        Operation::Delete => format!("delete from {table} by id."),
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::domain::FeatureFlags;
    use crate::source::Declaration;

    #[test]
    fn interface_declares_crud_methods() {
        let config = config(FeatureFlags::default(), vec![widget()]);
        let tree = build_interface(&config.entities()[0], &config);

        assert_eq!(tree.package(), "repositories");
        assert!(tree.has_import("acme/svc/internal/domain/models"));
        assert!(tree.has_import("context"));

        let iface = tree.find_type("WidgetRepository").unwrap();
        let names: Vec<_> = iface.methods().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Get", "List", "Count", "Create", "Update", "Delete"]);
        assert_eq!(iface.methods()[0].params[1].ty, "models.WidgetID");
    }

    #[test]
    fn impl_has_columns_constructor_and_stubs() {
        let config = config(FeatureFlags::default(), vec![widget()]);
        let tree = build_impl(&config.entities()[0], &config);

        assert_eq!(tree.package(), "postgres");
        let columns = tree
            .declarations()
            .iter()
            .find_map(|d| match d {
                Declaration::Var(v) if v.specs[0].name == "widgetColumns" => {
                    v.specs[0].value.clone()
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(columns, "[]string{\"id\", \"name\", \"weight\"}");
        assert!(tree.find_func(None, "NewWidgetRepository").is_some());

        let count = tree.find_func(Some("WidgetRepository"), "Count").unwrap();
        assert_eq!(
            count.body.last().unwrap(),
            "return 0, errs.NewUnimplementedError(\"WidgetRepository.Count\")"
        );
        assert!(!tree.declared_names().contains(&"widgetReferences".to_string()));
    }

    #[test]
    fn impl_lists_foreign_keys() {
        let config = config(FeatureFlags::default(), vec![document(), user()]);
        let tree = build_impl(&config.entities()[0], &config);
        assert!(tree.declared_names().contains(&"documentReferences".to_string()));
    }
}
