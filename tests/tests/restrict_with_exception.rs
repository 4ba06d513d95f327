//! Destroying records guarded by `restrict_with_exception`.
//!
//! Every guarded association with dependents raises a
//! `DeleteRestrictionError` carrying a short and a detailed message.

use pretty_assertions::assert_eq;
use restrict_tests::prelude::*;

fn world() -> World {
    init_tracing();
    Fixture::restricted(Dependent::RestrictWithException)
        .build()
        .unwrap()
}

// ========== TEST: restricts_join_table_association ==========
#[test]
fn test_restricts_join_table_association() {
    // GIVEN a category holding one product
    let mut world = world();
    let category = world.category();
    world.product(&category);

    // WHEN destroying the category
    let error = expect_restriction(world.destroy(&category));

    // THEN the products guard raises
    assert_eq!(
        error.to_string(),
        "Cannot delete record because dependent products exists"
    );
    assert_eq!(
        error.detailed_message(),
        "Cannot delete record because dependent products exists\n\n\nThese include:\n1: Product 1"
    );
    assert!(world.store.exists(&category));

    // AND once the products are gone the category can be destroyed
    world.store.destroy_all("Product").unwrap();
    assert!(world.destroy(&category).unwrap());
    assert_eq!(world.count("Category"), 0);
}

// ========== TEST: restricts_has_many ==========
#[test]
fn test_restricts_has_many() {
    // GIVEN a category with five orders
    let mut world = world();
    let category = world.category();
    world.orders(&category, 5);

    // WHEN destroying the category
    let error = expect_restriction(world.destroy(&category));

    // THEN every order is listed
    assert_eq!(
        error.message(),
        "Cannot delete record because 5 dependent orders exist"
    );
    assert_eq!(
        error.detailed_message(),
        "Cannot delete record because 5 dependent orders exist\n\n\nThese include:\n\
         1: Order 1\n2: Order 2\n3: Order 3\n4: Order 4\n5: Order 5"
    );
    assert_eq!(error.association(), "orders");
    assert_eq!(error.count(), 5);
    assert_eq!(error.record().id, category.id);

    // AND a sixth order truncates the listing
    world.order(&category, false);
    let error = expect_restriction(world.destroy(&category));
    assert_eq!(
        error.detailed_message(),
        "Cannot delete record because 6 dependent orders exist\n\n\nThese include:\n\
         1: Order 1\n2: Order 2\n3: Order 3\n4: Order 4\n...and 2 more"
    );

    // AND with the orders destroyed the category goes
    assert_eq!(world.store.destroy_all("Order").unwrap(), 6);
    assert!(world.destroy(&category).unwrap());
}

// ========== TEST: restricts_has_one ==========
#[test]
fn test_restricts_has_one() {
    // GIVEN an order with an invoice
    let mut world = world();
    let order = world.standalone_order();
    let invoice = world.invoice(&order);

    // WHEN destroying the order
    let error = expect_restriction(world.destroy(&order));

    // THEN the singular message spaces out the association name
    assert_eq!(
        error.message(),
        "Cannot delete record because dependent order invoice exists"
    );
    assert_eq!(error.samples().to_vec(), vec!["OrderInvoice 1".to_string()]);

    // AND after destroying the invoice the order goes
    assert!(world.destroy(&invoice).unwrap());
    assert!(world.destroy(&order).unwrap());
    assert_eq!(world.count("Order"), 0);
}

// ========== TEST: restricts_through_association ==========
#[test]
fn test_restricts_through_association() {
    // GIVEN a category whose only order is invoiced
    let mut world = world();
    let category = world.category();
    let order = world.order(&category, false);
    world.invoice(&order);

    // WHEN destroying the category
    let error = expect_restriction(world.destroy(&category));

    // THEN the orders guard fires before the order_invoices guard
    assert_eq!(error.association(), "orders");

    // AND detaching the order leaves the through association empty too
    world
        .store
        .update_attr(&order, "category_id", Value::Null)
        .unwrap();
    assert!(world.destroy(&category).unwrap());
}

// ========== TEST: repeated_destroy_is_idempotent ==========
#[test]
fn test_repeated_destroy_is_idempotent() {
    // GIVEN a category with two orders
    let mut world = world();
    let category = world.category();
    world.orders(&category, 2);

    // WHEN destroying it twice
    let first = expect_restriction(world.destroy(&category));
    let second = expect_restriction(world.destroy(&category));

    // THEN both attempts fail identically and nothing changed
    assert_eq!(first.message(), second.message());
    assert_eq!(first.detailed_message(), second.detailed_message());
    assert_eq!(world.count("Category"), 1);
    assert_eq!(world.count("Order"), 2);
    assert!(!world.store.in_transaction());
}

// ========== TEST: scope_still_filters ==========
#[test]
fn test_scope_still_filters() {
    // GIVEN three active and two inactive orders
    let mut world = world();
    let category = world.category();
    for _ in 0..3 {
        world.order(&category, true);
    }
    world.orders(&category, 2);

    // WHEN reading the active scope
    let active = world.store.scoped(&category, "orders", "active").unwrap();

    // THEN the scope is unaffected by the guard
    assert_eq!(active.len(), 3);

    // AND delete_all bypasses the guards
    world.store.delete_all("Category").unwrap();
    world.store.delete_all("Order").unwrap();
    assert_eq!(world.count("Category"), 0);
}

// ========== TEST: guard_raises_inside_outer_transaction ==========
#[test]
fn test_guard_raises_inside_outer_transaction() {
    // GIVEN an outer transaction that creates an order
    let mut world = world();
    let category = world.category();
    world.store.begin();
    world.order(&category, false);

    // WHEN the destroy is refused inside it
    expect_restriction(world.destroy(&category));

    // THEN only the destroy's own changes were reverted
    assert!(world.store.in_transaction());
    assert_eq!(world.count("Order"), 1);
    world.store.rollback().unwrap();
    assert_eq!(world.count("Order"), 0);
}
