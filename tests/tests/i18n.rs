//! Localized restriction messages.

use pretty_assertions::assert_eq;
use restrict_tests::prelude::*;

fn world_in_br() -> World {
    init_tracing();
    let world = Fixture::restricted(Dependent::RestrictWithException)
        .build()
        .unwrap();
    world.catalog.set_locale("br").unwrap();
    world
}

// ========== TEST: br_has_many ==========
#[test]
fn test_br_has_many() {
    // GIVEN a category with five orders and the br locale active
    let mut world = world_in_br();
    let category = world.category();
    world.orders(&category, 5);

    // WHEN destroying the category
    let error = expect_restriction(world.destroy(&category));

    // THEN the message uses the br templates and model names
    assert_eq!(
        error.message(),
        "Não pode ser excluído pois 5 pedidos relacionados(as) foram encontrados(as)"
    );
    assert_eq!(
        error.detailed_message(),
        "Não pode ser excluído pois 5 pedidos relacionados(as) foram encontrados(as)\n\n\n\
         Incluindo:\n1: Order 1\n2: Order 2\n3: Order 3\n4: Order 4\n5: Order 5"
    );
    assert_eq!(error.locale(), "br");

    // AND a sixth order truncates the listing
    world.order(&category, false);
    let error = expect_restriction(world.destroy(&category));
    assert_eq!(
        error.detailed_message(),
        "Não pode ser excluído pois 6 pedidos relacionados(as) foram encontrados(as)\n\n\n\
         Incluindo:\n1: Order 1\n2: Order 2\n3: Order 3\n4: Order 4\n...e mais 2"
    );

    world.store.destroy_all("Order").unwrap();
    assert!(world.destroy(&category).unwrap());
}

// ========== TEST: br_has_one ==========
#[test]
fn test_br_has_one() {
    // GIVEN an invoiced order and the br locale active
    let mut world = world_in_br();
    let order = world.standalone_order();
    let invoice = world.invoice(&order);

    // WHEN destroying the order
    let error = expect_restriction(world.destroy(&order));

    // THEN the singular br template is used with the lowercased model name
    assert_eq!(
        error.to_string(),
        "Não pode ser excluído pois um(a) ordem de pedido relacionado(a) foi encontrado(a)"
    );

    world.destroy(&invoice).unwrap();
    assert!(world.destroy(&order).unwrap());
}

// ========== TEST: locale_captured_when_raised ==========
#[test]
fn test_locale_captured_when_raised() {
    // GIVEN an error raised while br was active
    let mut world = world_in_br();
    let category = world.category();
    world.orders(&category, 1);
    let error = expect_restriction(world.destroy(&category));

    // WHEN the locale is switched back before the detailed message is read
    world.catalog.reset_locale();

    // THEN the detailed message is still composed in br
    assert_eq!(world.catalog.locale(), "en");
    assert!(error.detailed_message().starts_with("Não pode ser excluído"));
    assert!(error.detailed_message().ends_with("Incluindo:\n1: Order 1"));
}

// ========== TEST: unavailable_locale ==========
#[test]
fn test_unavailable_locale() {
    let world = Fixture::new().build().unwrap();

    assert!(world.catalog.set_locale("fr").is_err());
    assert_eq!(world.catalog.locale(), "en");
}
