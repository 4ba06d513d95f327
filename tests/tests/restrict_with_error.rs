//! Destroying records guarded by the silent policies.
//!
//! `restrict_with_error` and `rollback` refuse the destroy without raising.

use restrict_tests::prelude::*;

// ========== TEST: restrict_with_error_has_many ==========
#[test]
fn test_restrict_with_error_has_many() {
    // GIVEN a category with five orders
    init_tracing();
    let mut world = Fixture::restricted(Dependent::RestrictWithError)
        .build()
        .unwrap();
    let category = world.category();
    assert_eq!(world.count("Category"), 1);
    world.orders(&category, 5);

    // WHEN destroying the category
    let destroyed = world.destroy(&category).unwrap();

    // THEN the destroy is refused without an error
    assert!(!destroyed);
    assert_eq!(world.count("Category"), 1);

    // AND once the orders are destroyed it goes through
    world.store.destroy_all("Order").unwrap();
    let category = world.store.reload(&category).unwrap();
    assert!(world.destroy(&category).unwrap());
    assert_eq!(world.count("Category"), 0);
}

// ========== TEST: restrict_with_error_has_one ==========
#[test]
fn test_restrict_with_error_has_one() {
    // GIVEN an order with an invoice
    let mut world = Fixture::restricted(Dependent::RestrictWithError)
        .build()
        .unwrap();
    let order = world.standalone_order();
    assert_eq!(world.count("Order"), 1);
    let invoice = world.invoice(&order);

    // WHEN destroying the order
    let destroyed = world.destroy(&order).unwrap();

    // THEN it survives
    assert!(!destroyed);
    assert_eq!(world.count("Order"), 1);

    // AND after the invoice is destroyed it goes
    world.destroy(&invoice).unwrap();
    assert!(world.destroy(&order).unwrap());
    assert_eq!(world.count("Order"), 0);
}

// ========== TEST: rollback_policy ==========
#[test]
fn test_rollback_policy() {
    // GIVEN a category with a product under the rollback policy
    let mut world = Fixture::restricted(Dependent::Rollback).build().unwrap();
    let category = world.category();
    world.product(&category);

    // WHEN destroying the category
    let destroyed = world.destroy(&category).unwrap();

    // THEN it is silently kept along with its join rows
    assert!(!destroyed);
    assert!(world.store.exists(&category));
    assert_eq!(world.count("CategoriesProduct"), 1);
}

// ========== TEST: unguarded_associations_do_not_block ==========
#[test]
fn test_unguarded_associations_do_not_block() {
    // GIVEN a schema without dependent options and a category with orders
    let mut world = Fixture::new().build().unwrap();
    let category = world.category();
    world.orders(&category, 2);

    // WHEN destroying the category
    let destroyed = world.destroy(&category).unwrap();

    // THEN it goes and the orders stay behind
    assert!(destroyed);
    assert_eq!(world.count("Order"), 2);
}
