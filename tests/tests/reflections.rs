//! Reflections and hooks left behind by guarded declarations.

use pretty_assertions::assert_eq;
use restrict_registry::{AssociationKind, DestroyHook, Registry};
use restrict_tests::prelude::*;

fn names(registry: &Registry, type_name: &str) -> Vec<String> {
    registry
        .reflect_on_all_associations(type_name)
        .unwrap()
        .iter()
        .map(|r| r.name.clone())
        .collect()
}

fn hooks(registry: &Registry, type_name: &str) -> Vec<String> {
    let type_def = registry.get_type_by_name(type_name).unwrap();
    type_def
        .before_destroy
        .iter()
        .map(|hook| hook.name().to_string())
        .collect()
}

// ========== TEST: unrestricted_declarations ==========
#[test]
fn test_unrestricted_declarations() {
    // GIVEN a schema without dependent options
    let world = Fixture::new().build().unwrap();
    let registry = world.store.registry();

    // THEN reflections are declared and no hooks are installed
    assert_eq!(names(registry, "Order"), vec!["category", "order_invoice"]);
    assert!(hooks(registry, "Category").is_empty());
    assert_eq!(
        registry
            .reflect_on_association("Category", "products")
            .unwrap()
            .kind,
        AssociationKind::HasAndBelongsToMany
    );
}

// ========== TEST: reflections_in_declaration_order ==========
#[test]
fn test_reflections_in_declaration_order() {
    for capabilities in [Capabilities::modern(), Capabilities::legacy()] {
        // GIVEN a restricted schema
        let world = Fixture::restricted(Dependent::RestrictWithException)
            .capabilities(capabilities)
            .build()
            .unwrap();
        let registry = world.store.registry();

        // THEN reflections keep declaration order and hide join plumbing
        assert_eq!(names(registry, "Order"), vec!["category", "order_invoice"]);
        assert_eq!(
            names(registry, "Category"),
            vec!["products", "orders", "order_invoices"]
        );
    }
}

// ========== TEST: guards_installed_in_order ==========
#[test]
fn test_guards_installed_in_order() {
    // GIVEN a restricted schema
    let world = Fixture::restricted(Dependent::Restrict).build().unwrap();
    let registry = world.store.registry();

    // THEN one guard per guarded association, in declaration order
    assert_eq!(
        hooks(registry, "Category"),
        vec![
            "dependent_restrict_for_products",
            "dependent_restrict_for_orders",
            "dependent_restrict_for_order_invoices",
        ]
    );
    assert_eq!(
        hooks(registry, "Order"),
        vec!["dependent_restrict_for_order_invoice"]
    );
    assert!(hooks(registry, "Product").is_empty());
}

// ========== TEST: dependent_option_not_forwarded ==========
#[test]
fn test_dependent_option_not_forwarded() {
    // GIVEN a restricted schema
    let world = Fixture::restricted(Dependent::RestrictWithError)
        .build()
        .unwrap();
    let registry = world.store.registry();

    // THEN the stored reflections carry no dependent option
    for name in ["products", "orders", "order_invoices"] {
        let reflection = registry.reflect_on_association("Category", name).unwrap();
        assert_eq!(reflection.dependent, None, "{}", name);
    }

    // AND the scope declared alongside survives
    let orders = registry.reflect_on_association("Category", "orders").unwrap();
    assert!(orders.scope("active").is_some());
}

// ========== TEST: join_table_rewritten_as_through ==========
#[test]
fn test_join_table_rewritten_as_through() {
    // GIVEN a restricted schema on a provider without join-table reflections
    let world = Fixture::restricted(Dependent::Restrict)
        .capabilities(Capabilities::modern())
        .build()
        .unwrap();
    let registry = world.store.registry();

    // THEN the products association goes through the join entity
    let products = registry.reflect_on_association("Category", "products").unwrap();
    assert_eq!(products.kind, AssociationKind::HasMany);
    assert_eq!(products.through.as_deref(), Some("categories_products"));
    assert_eq!(products.source.as_deref(), Some("product"));
    assert_eq!(products.class_name, "Product");
}
