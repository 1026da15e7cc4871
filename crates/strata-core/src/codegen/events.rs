use crate::domain::{ArtifactKind, Entity, ProjectConfig};
use crate::source::{FuncDecl, Param, Signature, SourceTree, StructField, TypeDecl};

use super::crud::Operation;
use super::{import_package, tree_for};

/// `domain/events/bus.go`: the publisher port and an in-process bus.
pub(super) fn build_bus(_config: &ProjectConfig) -> SourceTree {
    let mut tree = tree_for(ArtifactKind::EventBus)
        .with_doc("Package events carries domain events between layers.");
    tree.import_std("context");
    tree.import_std("sync");

    tree.push(
        TypeDecl::interface("Event", vec![Signature::new("EventName").returns("string")])
            .doc("Event is a named domain event."),
    );
    tree.push(
        TypeDecl::defined("Handler", "func(ctx context.Context, event Event) error")
            .doc("Handler reacts to a published event."),
    );
    tree.push(
        TypeDecl::interface(
            "Publisher",
            vec![Signature::new("Publish")
                .param("ctx", "context.Context")
                .param("event", "Event")
                .returns("error")],
        )
        .doc("Publisher publishes domain events."),
    );
    tree.push(
        TypeDecl::structure(
            "Bus",
            vec![
                StructField::new("mu", "sync.RWMutex"),
                StructField::new("handlers", "map[string][]Handler"),
            ],
        )
        .doc("Bus is a synchronous in-process Publisher."),
    );
    tree.push(
        FuncDecl::new(Signature::new("NewBus").returns("*Bus"))
            .doc("NewBus returns a bus with no subscribers.")
            .line("return &Bus{handlers: make(map[string][]Handler)}"),
    );
    tree.push(
        FuncDecl::method(
            Param::new("b", "*Bus"),
            Signature::new("Subscribe")
                .param("name", "string")
                .param("handler", "Handler"),
        )
        .doc("Subscribe registers handler for events called name.")
        .lines([
            "b.mu.Lock()",
            "defer b.mu.Unlock()",
            "",
            "b.handlers[name] = append(b.handlers[name], handler)",
        ]),
    );
    tree.push(
        FuncDecl::method(
            Param::new("b", "*Bus"),
            Signature::new("Publish")
                .param("ctx", "context.Context")
                .param("event", "Event")
                .returns("error"),
        )
        .doc("Publish delivers event to each subscriber, stopping at the first error.")
        .lines([
            "b.mu.RLock()",
            "handlers := b.handlers[event.EventName()]",
            "b.mu.RUnlock()",
            "",
            "for _, handler := range handlers {",
            "\tif err := handler(ctx, event); err != nil {",
            "\t\treturn err",
            "\t}",
            "}",
            "",
            "return nil",
        ]),
    );

    tree
}

/// `domain/events/<entity>.go`: one event per write operation.
pub(super) fn build_entity(entity: &Entity, config: &ProjectConfig) -> SourceTree {
    let mut tree = tree_for(ArtifactKind::EntityEvents);
    import_package(&mut tree, config, ArtifactKind::Model);

    let type_name = entity.type_name();
    let stem = entity.file_stem();

    for op in Operation::ALL {
        let Some(suffix) = op.event_suffix() else {
            continue;
        };
        let event = format!("{type_name}{suffix}");
        let verb = suffix.to_ascii_lowercase();

        tree.push(
            TypeDecl::structure(
                &event,
                vec![StructField::new("ID", format!("models.{}", entity.id_type()))],
            )
            .doc(format!("{event} is published after a {type_name} is {verb}.")),
        );
        tree.push(
            FuncDecl::method(
                Param::unnamed(&event),
                Signature::new("EventName").returns("string"),
            )
            .line(format!("return \"{stem}.{verb}\"")),
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
    fn bus_declares_publisher_port() {
        let tree = build_bus(&config(FeatureFlags::default(), vec![]));
        assert_eq!(tree.package(), "events");
        assert_eq!(tree.find_type("Publisher").unwrap().methods().len(), 1);
        assert!(tree.find_func(Some("Bus"), "Publish").is_some());
    }

    #[test]
    fn entity_events_cover_writes() {
        let config = config(FeatureFlags::default(), vec![Entity::new("OrderItem")]);
        let tree = build_entity(&config.entities()[0], &config);

        for name in ["OrderItemCreated", "OrderItemUpdated", "OrderItemDeleted"] {
            assert!(tree.find_type(name).is_some(), "{name}");
        }
        let name = tree.find_func(Some("OrderItemDeleted"), "EventName").unwrap();
        assert_eq!(name.body, vec!["return \"order_item.deleted\""]);
    }
}
