//! Schema and data fixtures.

use std::sync::Arc;

use restrict_core::{attrs, Record};
use restrict_guard::{RestrictDeclarations, RestrictOptions};
use restrict_i18n::{Catalog, I18nConfig};
use restrict_registry::{
    AssociationOptions, Capabilities, Declarations, Dependent, RegistryResult, SchemaBuilder,
};
use restrict_store::{Store, StoreResult};
use serde_json::json;

/// Scope filter for `Category#orders`.
pub fn active(record: &Record) -> bool {
    record
        .get_attr("active")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

/// A catalog that starts in `en` and carries the `br` translations.
pub fn catalog() -> Arc<Catalog> {
    let catalog = Catalog::from_config(I18nConfig {
        available_locales: vec!["en".into(), "br".into()],
        ..I18nConfig::default()
    });
    catalog
        .store_translations(
            "br",
            json!({
                "dependent_restrict": {
                    "basic_message": {
                        "one": "Não pode ser excluído pois um(a) %{name} relacionado(a) foi encontrado(a)",
                        "others": "Não pode ser excluído pois %{count} %{name} relacionados(as) foram encontrados(as)"
                    },
                    "detailed_message": {
                        "and_more": "e mais %{count}",
                        "includes": "Incluindo"
                    }
                },
                "activerecord": {
                    "models": {
                        "order": { "one": "Pedido", "other": "Pedidos" },
                        "order_invoice": { "one": "Ordem de pedido" }
                    }
                }
            }),
        )
        .expect("br translations are an object");
    Arc::new(catalog)
}

/// Declares the test schema.
#[derive(Debug, Clone)]
pub struct Fixture {
    policy: Option<Dependent>,
    capabilities: Capabilities,
    options: RestrictOptions,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// No dependent options anywhere.
    pub fn new() -> Self {
        Self {
            policy: None,
            capabilities: Capabilities::modern(),
            options: RestrictOptions::default(),
        }
    }

    /// `policy` on `Order#order_invoice`, `Category#products`,
    /// `Category#orders` and `Category#order_invoices`.
    pub fn restricted(policy: Dependent) -> Self {
        Self {
            policy: Some(policy),
            ..Self::new()
        }
    }

    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn options(mut self, options: RestrictOptions) -> Self {
        self.options = options;
        self
    }

    fn guarded(&self) -> AssociationOptions {
        match self.policy {
            Some(policy) => AssociationOptions::new().dependent(policy),
            None => AssociationOptions::new(),
        }
    }

    /// Declare the schema and open an empty store over it.
    pub fn build(&self) -> RegistryResult<World> {
        let catalog = catalog();
        let mut schema = RestrictDeclarations::new(
            SchemaBuilder::with_capabilities(self.capabilities),
            Arc::clone(&catalog),
        )
        .with_options(self.options);

        schema
            .add_type("OrderInvoice")
            .belongs_to("order", AssociationOptions::new())
            .done()?;
        schema
            .add_type("Order")
            .display("Order {id}")
            .belongs_to("category", AssociationOptions::new())
            .has_one("order_invoice", self.guarded())
            .done()?;
        schema
            .add_type("CategoriesProduct")
            .belongs_to("product", AssociationOptions::new())
            .belongs_to("category", AssociationOptions::new())
            .done()?;
        schema
            .add_type("Product")
            .display("Product {id}")
            .has_and_belongs_to_many("categories", AssociationOptions::new())
            .done()?;
        schema
            .add_type("Category")
            .display("Category {id}")
            .has_and_belongs_to_many("products", self.guarded())
            .has_many("orders", self.guarded().scope("active", active))
            .has_many("order_invoices", self.guarded().through("orders"))
            .done()?;

        let registry = Arc::new(schema.build()?);
        Ok(World {
            store: Store::new(registry),
            catalog,
        })
    }
}

/// A store over the test schema.
#[derive(Debug)]
pub struct World {
    pub store: Store,
    pub catalog: Arc<Catalog>,
}

impl World {
    pub fn category(&mut self) -> Record {
        self.create("Category")
    }

    /// An order of `category`.
    pub fn order(&mut self, category: &Record, active: bool) -> Record {
        let order = self
            .store
            .create("Order", attrs! { "active" => active })
            .expect("create order");
        self.store
            .link(category, "orders", &order)
            .expect("link order");
        self.store.reload(&order).expect("reload order")
    }

    /// `n` inactive orders of `category`.
    pub fn orders(&mut self, category: &Record, n: usize) -> Vec<Record> {
        (0..n).map(|_| self.order(category, false)).collect()
    }

    /// An order without a category.
    pub fn standalone_order(&mut self) -> Record {
        self.create("Order")
    }

    pub fn invoice(&mut self, order: &Record) -> Record {
        let invoice = self.create("OrderInvoice");
        self.store
            .link(order, "order_invoice", &invoice)
            .expect("link invoice");
        self.store.reload(&invoice).expect("reload invoice")
    }

    /// A product placed in `category`.
    pub fn product(&mut self, category: &Record) -> Record {
        let product = self.create("Product");
        self.store
            .link(category, "products", &product)
            .expect("link product");
        product
    }

    pub fn destroy(&mut self, record: &Record) -> StoreResult<bool> {
        self.store.destroy_record(record)
    }

    pub fn count(&self, type_name: &str) -> usize {
        self.store.count(type_name).expect("registered type")
    }

    fn create(&mut self, type_name: &str) -> Record {
        self.store
            .create(type_name, attrs!())
            .expect("registered type")
    }
}
