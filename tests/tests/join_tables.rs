//! Guarded many-to-many associations on both kinds of provider.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use restrict_guard::RestrictDeclarations;
use restrict_registry::{AssociationOptions, Declarations, SchemaBuilder};
use restrict_tests::catalog;
use restrict_tests::prelude::*;

// ========== TEST: legacy_join_table_guard ==========
#[test]
fn test_legacy_join_table_guard() {
    // GIVEN a provider that reflects on join tables directly
    init_tracing();
    let mut world = Fixture::restricted(Dependent::RestrictWithException)
        .capabilities(Capabilities::legacy())
        .build()
        .unwrap();
    let category = world.category();
    world.product(&category);
    world.product(&category);

    // WHEN destroying the category
    let error = expect_restriction(world.destroy(&category));

    // THEN the guard sees both products
    assert_eq!(
        error.detailed_message(),
        "Cannot delete record because 2 dependent products exist\n\n\nThese include:\n\
         1: Product 1\n2: Product 2"
    );

    // AND removing the products unblocks the destroy and its join rows go
    world.store.destroy_all("Product").unwrap();
    assert_eq!(world.count("CategoriesProduct"), 0);
    assert!(world.destroy(&category).unwrap());
}

// ========== TEST: rewrite_disabled_rejects_declaration ==========
#[test]
fn test_rewrite_disabled_rejects_declaration() {
    // GIVEN a provider without join-table reflections and rewriting turned off
    let fixture = Fixture::restricted(Dependent::Restrict).options(RestrictOptions {
        rewrite_join_tables: false,
    });

    // WHEN declaring the schema
    let result = fixture.build();

    // THEN the guarded join-table association is a configuration error
    match result {
        Err(RegistryError::Unsupported { message }) => {
            assert!(message.contains("declare has_many :products through a join entity instead"));
        }
        other => panic!("expected Unsupported, got {:?}", other),
    }
}

// ========== TEST: provider_without_through_rejects_declaration ==========
#[test]
fn test_provider_without_through_rejects_declaration() {
    // GIVEN a provider with neither join-table nor through reflections
    let fixture = Fixture::restricted(Dependent::Restrict).capabilities(Capabilities {
        join_table_reflections: false,
        through_reflections: false,
    });

    // WHEN declaring the schema
    let result = fixture.build();

    // THEN the declaration is rejected
    assert!(matches!(result, Err(RegistryError::Unsupported { .. })));
}

// ========== TEST: join_entity_synthesized ==========
#[test]
fn test_join_entity_synthesized() {
    // GIVEN a guarded join-table association with no declared join entity
    let mut schema = RestrictDeclarations::new(SchemaBuilder::new(), catalog());
    schema.add_type("Tag").done().unwrap();
    schema
        .add_type("Post")
        .has_and_belongs_to_many(
            "tags",
            AssociationOptions::new().dependent(Dependent::RestrictWithException),
        )
        .done()
        .unwrap();
    let mut store = Store::new(Arc::new(schema.build().unwrap()));

    // WHEN a tagged post is destroyed
    let post = store.create("Post", attrs!()).unwrap();
    let tag = store.create("Tag", attrs!()).unwrap();
    store.link(&post, "tags", &tag).unwrap();
    let error = expect_restriction(store.destroy_record(&post));

    // THEN the guard navigates the synthesized join entity
    assert_eq!(
        error.message(),
        "Cannot delete record because dependent tags exists"
    );
    assert_eq!(store.count("PostsTag").unwrap(), 1);

    // AND the join entity stays out of the post's reflections
    let names: Vec<_> = store
        .registry()
        .reflect_on_all_associations("Post")
        .unwrap()
        .iter()
        .map(|r| r.name.clone())
        .collect();
    assert_eq!(names, vec!["tags"]);

    // AND once the tag is detached the post and its join rows go
    store.delete_all("PostsTag").unwrap();
    assert!(store.destroy_record(&post).unwrap());
}

// ========== TEST: join_model_declared_after_guard ==========
#[test]
fn test_join_model_declared_after_guard() {
    // GIVEN the join model declared after the guarded association that needs it
    init_tracing();
    let guarded = || AssociationOptions::new().dependent(Dependent::RestrictWithException);
    let mut schema = RestrictDeclarations::new(SchemaBuilder::new(), catalog());
    schema
        .add_type("OrderInvoice")
        .belongs_to("order", AssociationOptions::new())
        .done()
        .unwrap();
    schema
        .add_type("Order")
        .belongs_to("category", AssociationOptions::new())
        .has_one("order_invoice", guarded())
        .done()
        .unwrap();
    schema
        .add_type("Category")
        .has_and_belongs_to_many("products", guarded())
        .done()
        .unwrap();

    // WHEN the application declares the join model and the product afterwards
    schema
        .add_type("CategoriesProduct")
        .belongs_to("product", AssociationOptions::new())
        .belongs_to("category", AssociationOptions::new())
        .done()
        .unwrap();
    schema
        .add_type("Product")
        .has_and_belongs_to_many("categories", AssociationOptions::new())
        .done()
        .unwrap();
    let mut store = Store::new(Arc::new(schema.build().unwrap()));

    // THEN the join model exposes the associations it declared
    let names: Vec<_> = store
        .registry()
        .reflect_on_all_associations("CategoriesProduct")
        .unwrap()
        .iter()
        .map(|r| r.name.clone())
        .collect();
    assert_eq!(names, vec!["product", "category"]);

    // AND a category holding a product is still guarded
    let category = store.create("Category", attrs!()).unwrap();
    let product = store.create("Product", attrs!()).unwrap();
    store.link(&category, "products", &product).unwrap();
    let error = expect_restriction(store.destroy_record(&category));
    assert_eq!(
        error.message(),
        "Cannot delete record because dependent products exists"
    );

    // AND removing the product unblocks the destroy
    store.destroy_all("Product").unwrap();
    assert!(store.destroy_record(&category).unwrap());
}
