//! Toy store dashboard: catalog, loyalty customers, a point-of-sale cart and
//! sales history.
//!
//! Checkout is the only cross-store operation: it records the sale, takes the
//! sold quantities out of stock, then credits the customer.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::{open_store, require, DashboardError, DashboardResult};
use crate::config::DashkitConfig;
use crate::form::{non_empty, parse_count, parse_number, Draft, FormEditor, FormError, Submission};
use crate::models::toys::{
    loyalty_points_for, sample_customers, sample_sales, sample_toys, Customer, PaymentMethod,
    Sale, SaleItem, Toy,
};
use crate::store::{KeyValueStore, RecordStore, StoreContext, StoreResult};
use crate::view::{Tab, ViewState};

pub const TOYS_KEY: &str = "toys-products";
pub const CUSTOMERS_KEY: &str = "toys-customers";
pub const SALES_KEY: &str = "toys-sales";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToyStoreTab {
    #[default]
    Dashboard,
    Register,
    Products,
    Customers,
    Sales,
}

impl Tab for ToyStoreTab {
    const ALL: &'static [Self] = &[
        ToyStoreTab::Dashboard,
        ToyStoreTab::Register,
        ToyStoreTab::Products,
        ToyStoreTab::Customers,
        ToyStoreTab::Sales,
    ];

    fn label(&self) -> &'static str {
        match self {
            ToyStoreTab::Dashboard => "Tableau de bord",
            ToyStoreTab::Register => "Caisse",
            ToyStoreTab::Products => "Jouets",
            ToyStoreTab::Customers => "Clients",
            ToyStoreTab::Sales => "Ventes",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToyDraft {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub age_range: String,
    pub sku: String,
    pub price: String,
    pub cost: String,
    pub stock: String,
    pub reorder_level: String,
}

impl Draft for ToyDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("name", self.name.as_str()),
            ("sku", self.sku.as_str()),
            ("price", self.price.as_str()),
        ]
    }
}

impl From<&Toy> for ToyDraft {
    fn from(toy: &Toy) -> Self {
        Self {
            name: toy.name.clone(),
            brand: toy.brand.clone(),
            category: toy.category.clone(),
            age_range: toy.age_range.clone(),
            sku: toy.sku.clone(),
            price: toy.price.to_string(),
            cost: toy.cost.to_string(),
            stock: toy.stock.to_string(),
            reorder_level: toy.reorder_level.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl Draft for CustomerDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str()), ("phone", self.phone.as_str())]
    }
}

impl From<&Customer> for CustomerDraft {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            email: customer.email.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub toy_id: String,
    pub quantity: u32,
}

/// Register state. Prices are read from the catalog at checkout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    pub customer_id: Option<String>,
    pub payment_method: PaymentMethod,
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` of a toy, merging with an existing line.
    pub fn add(&mut self, toy_id: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.lines.iter_mut().find(|line| line.toy_id == toy_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                toy_id: toy_id.to_string(),
                quantity,
            }),
        }
    }

    /// Set a line's quantity; zero removes it.
    pub fn set_quantity(&mut self, toy_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove(toy_id);
        } else if let Some(line) = self.lines.iter_mut().find(|line| line.toy_id == toy_id) {
            line.quantity = quantity;
        }
    }

    pub fn remove(&mut self, toy_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.toy_id != toy_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One row of the best-sellers table.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSeller {
    pub toy_id: String,
    pub name: String,
    pub quantity: u32,
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToyStoreStats {
    pub toys: usize,
    pub low_stock: usize,
    pub customers: usize,
    pub sales: usize,
    pub revenue: f64,
    pub today_revenue: f64,
    pub stock_value: f64,
}

pub struct ToyStoreDashboard<S> {
    ctx: StoreContext<S>,
    toys: RecordStore<Toy>,
    customers: RecordStore<Customer>,
    sales: RecordStore<Sale>,
    pub view: ViewState<ToyStoreTab>,
    pub cart: Cart,
    pub toy_form: FormEditor<ToyDraft>,
    pub customer_form: FormEditor<CustomerDraft>,
}

impl<S: KeyValueStore> ToyStoreDashboard<S> {
    pub fn open(backend: S, config: &DashkitConfig) -> DashboardResult<Self> {
        let ctx = StoreContext::from_config(backend, &config.records);
        let seed = config.records.seed_samples;

        let toys = open_store(&ctx, TOYS_KEY, seed, sample_toys)?;
        let customers = open_store(&ctx, CUSTOMERS_KEY, seed, sample_customers)?;
        let sales = open_store(&ctx, SALES_KEY, seed, sample_sales)?;

        Ok(Self {
            ctx,
            toys,
            customers,
            sales,
            view: ViewState::new(),
            cart: Cart::default(),
            toy_form: FormEditor::new(),
            customer_form: FormEditor::new(),
        })
    }

    pub fn toys(&self) -> &RecordStore<Toy> {
        &self.toys
    }

    pub fn customers(&self) -> &RecordStore<Customer> {
        &self.customers
    }

    pub fn sales(&self) -> &RecordStore<Sale> {
        &self.sales
    }

    pub fn reload(&mut self) -> StoreResult<()> {
        self.toys.reload(&self.ctx)?;
        self.customers.reload(&self.ctx)?;
        self.sales.reload(&self.ctx)
    }

    // -- Toys --

    pub fn edit_toy(&mut self, id: &str) -> bool {
        match self.toys.get(id) {
            Some(toy) => {
                self.toy_form.open_edit(id, ToyDraft::from(toy));
                true
            }
            None => false,
        }
    }

    pub fn submit_toy(&mut self) -> DashboardResult<Option<Toy>> {
        let submission = self.toy_form.submit()?;
        let result = self.commit_toy(submission.clone());
        if result.is_err() {
            self.toy_form.restore(submission);
        }
        result
    }

    pub fn commit_toy(&mut self, submission: Submission<ToyDraft>) -> DashboardResult<Option<Toy>> {
        let draft = submission.draft();
        draft.validate()?;
        let toy = Toy {
            id: String::new(),
            name: draft.name.trim().to_string(),
            brand: draft.brand.trim().to_string(),
            category: draft.category.trim().to_string(),
            age_range: draft.age_range.trim().to_string(),
            sku: draft.sku.trim().to_string(),
            price: parse_number(&draft.price),
            cost: parse_number(&draft.cost),
            stock: parse_count(&draft.stock),
            reorder_level: parse_count(&draft.reorder_level),
        };

        match &submission {
            Submission::Create(_) => {
                let toy = self.toys.create(&self.ctx, toy)?;
                tracing::info!(id = %toy.id, sku = %toy.sku, "Created toy");
                Ok(Some(toy))
            }
            Submission::Update { id, .. } => {
                let updated = self.toys.update(&self.ctx, id, toy)?;
                Ok(updated.then(|| self.toys.get(id).cloned()).flatten())
            }
        }
    }

    pub fn restock_toy(&mut self, id: &str, quantity: u32) -> DashboardResult<bool> {
        if quantity == 0 {
            return Err(FormError::NotPositive("quantity").into());
        }
        Ok(self.toys.modify(&self.ctx, id, |toy| {
            toy.stock = toy.stock.saturating_add(quantity);
        })?)
    }

    /// Delete a toy. Past sales keep their captured name and price; a cart
    /// line for it is dropped.
    pub fn delete_toy(&mut self, id: &str) -> DashboardResult<bool> {
        let removed = self.toys.delete(&self.ctx, id)?.is_some();
        if removed {
            self.cart.remove(id);
            tracing::info!(id, "Deleted toy");
        }
        Ok(removed)
    }

    pub fn low_stock(&self) -> Vec<&Toy> {
        self.toys.filter(Toy::is_low_stock)
    }

    pub fn search_toys(&self, query: &str) -> Vec<&Toy> {
        self.toys.search(query)
    }

    // -- Customers --

    pub fn edit_customer(&mut self, id: &str) -> bool {
        match self.customers.get(id) {
            Some(customer) => {
                self.customer_form.open_edit(id, CustomerDraft::from(customer));
                true
            }
            None => false,
        }
    }

    pub fn submit_customer(&mut self) -> DashboardResult<Option<Customer>> {
        let submission = self.customer_form.submit()?;
        let result = self.commit_customer(submission.clone());
        if result.is_err() {
            self.customer_form.restore(submission);
        }
        result
    }

    /// Create or update a customer. Points and spending are only changed by
    /// checkout.
    pub fn commit_customer(
        &mut self,
        submission: Submission<CustomerDraft>,
    ) -> DashboardResult<Option<Customer>> {
        let draft = submission.draft();
        draft.validate()?;

        match &submission {
            Submission::Create(draft) => {
                let customer = Customer {
                    id: String::new(),
                    name: draft.name.trim().to_string(),
                    phone: draft.phone.trim().to_string(),
                    email: non_empty(&draft.email),
                    loyalty_points: 0,
                    total_spent: 0.0,
                    joined_at: Utc::now(),
                };
                let customer = self.customers.create(&self.ctx, customer)?;
                tracing::info!(id = %customer.id, "Created customer");
                Ok(Some(customer))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.customers.get(id) else {
                    return Ok(None);
                };
                let updated = Customer {
                    name: draft.name.trim().to_string(),
                    phone: draft.phone.trim().to_string(),
                    email: non_empty(&draft.email),
                    ..existing.clone()
                };
                self.customers.update(&self.ctx, id, updated.clone())?;
                Ok(Some(updated))
            }
        }
    }

    /// Delete a customer. Their past sales keep the captured name.
    pub fn delete_customer(&mut self, id: &str) -> DashboardResult<bool> {
        let removed = self.customers.delete(&self.ctx, id)?.is_some();
        if removed && self.cart.customer_id.as_deref() == Some(id) {
            self.cart.customer_id = None;
        }
        Ok(removed)
    }

    pub fn search_customers(&self, query: &str) -> Vec<&Customer> {
        self.customers.search(query)
    }

    pub fn customer_sales(&self, customer_id: &str) -> Vec<&Sale> {
        self.sales
            .filter(|s| s.customer_id.as_deref() == Some(customer_id))
    }

    // -- Register --

    /// Ring up the cart. Everything is checked before anything is written:
    /// the cart must be non-empty, every toy and the customer must exist, and
    /// stock must cover each line. On success the cart is cleared.
    pub fn checkout(&mut self) -> DashboardResult<Sale> {
        if self.cart.is_empty() {
            return Err(DashboardError::EmptyCart);
        }

        let mut items = Vec::with_capacity(self.cart.lines().len());
        for line in self.cart.lines() {
            let toy = require(&self.toys, "toyId", &line.toy_id)?;
            if line.quantity > toy.stock {
                return Err(DashboardError::InsufficientStock {
                    toy_id: toy.id.clone(),
                    name: toy.name.clone(),
                    requested: line.quantity,
                    available: toy.stock,
                });
            }
            items.push(SaleItem {
                toy_id: toy.id.clone(),
                name: toy.name.clone(),
                price: toy.price,
                quantity: line.quantity,
            });
        }

        let customer = match &self.cart.customer_id {
            Some(customer_id) => Some(require(&self.customers, "customerId", customer_id)?),
            None => None,
        };

        let total: f64 = items.iter().map(SaleItem::subtotal).sum();
        let points_earned = customer.map_or(0, |_| loyalty_points_for(total));
        let sale = Sale {
            id: String::new(),
            customer_id: customer.map(|c| c.id.clone()),
            customer_name: customer.map(|c| c.name.clone()),
            items,
            total,
            payment_method: self.cart.payment_method,
            points_earned,
            date: Utc::now(),
        };
        let sale = self.sales.create(&self.ctx, sale)?;

        for item in &sale.items {
            self.toys.modify(&self.ctx, &item.toy_id, |toy| {
                toy.stock = toy.stock.saturating_sub(item.quantity);
            })?;
        }
        if let Some(customer_id) = &sale.customer_id {
            self.customers.modify(&self.ctx, customer_id, |c| {
                c.loyalty_points = c.loyalty_points.saturating_add(points_earned);
                c.total_spent += total;
            })?;
        }

        self.cart.clear();
        tracing::info!(id = %sale.id, total, points_earned, "Checked out sale");
        Ok(sale)
    }

    /// Cart total at current catalog prices. Unknown toys count as zero.
    pub fn cart_total(&self) -> f64 {
        self.cart
            .lines()
            .iter()
            .filter_map(|line| {
                self.toys
                    .get(&line.toy_id)
                    .map(|toy| toy.price * f64::from(line.quantity))
            })
            .sum()
    }

    pub fn search_sales(&self, query: &str) -> Vec<&Sale> {
        self.sales.search(query)
    }

    // -- Dashboard --

    /// Toys ranked by units sold, then revenue, then name.
    pub fn best_sellers(&self, limit: usize) -> Vec<BestSeller> {
        let mut by_toy: HashMap<&str, BestSeller> = HashMap::new();
        for item in self.sales.list().iter().flat_map(|s| s.items.iter()) {
            let entry = by_toy.entry(item.toy_id.as_str()).or_insert_with(|| BestSeller {
                toy_id: item.toy_id.clone(),
                name: item.name.clone(),
                quantity: 0,
                revenue: 0.0,
            });
            entry.quantity += item.quantity;
            entry.revenue += item.subtotal();
        }

        let mut ranked: Vec<BestSeller> = by_toy.into_values().collect();
        ranked.sort_by(|a, b| {
            b.quantity
                .cmp(&a.quantity)
                .then(b.revenue.total_cmp(&a.revenue))
                .then_with(|| a.name.cmp(&b.name))
        });
        ranked.truncate(limit);
        ranked
    }

    pub fn stats(&self) -> ToyStoreStats {
        self.stats_on(Utc::now())
    }

    pub fn stats_on(&self, today: DateTime<Utc>) -> ToyStoreStats {
        let day = today.date_naive();
        let sales = self.sales.list();
        ToyStoreStats {
            toys: self.toys.len(),
            low_stock: self.toys.count(Toy::is_low_stock),
            customers: self.customers.len(),
            sales: sales.len(),
            revenue: sales.iter().map(|s| s.total).sum(),
            today_revenue: sales
                .iter()
                .filter(|s| s.date.date_naive() == day)
                .map(|s| s.total)
                .sum(),
            stock_value: self
                .toys
                .list()
                .iter()
                .map(|t| t.cost * f64::from(t.stock))
                .sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ymd, MemoryStore};

    fn setup_dashboard() -> ToyStoreDashboard<MemoryStore> {
        ToyStoreDashboard::open(MemoryStore::new(), &DashkitConfig::default()).unwrap()
    }

    #[test]
    fn test_cart_merges_lines() {
        let mut cart = Cart::default();
        cart.add("1", 2);
        cart.add("1", 1);
        cart.add("2", 0);
        assert_eq!(
            cart.lines(),
            &[CartLine {
                toy_id: "1".into(),
                quantity: 3
            }]
        );

        cart.set_quantity("1", 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_checkout_with_customer() {
        let mut dashboard = setup_dashboard();
        dashboard.cart.add("1", 2);
        dashboard.cart.add("3", 1);
        dashboard.cart.customer_id = Some("2".into());
        dashboard.cart.payment_method = PaymentMethod::Digital;
        assert_eq!(dashboard.cart_total(), 10500.0);

        let sale = dashboard.checkout().unwrap();
        assert_eq!(sale.total, 10500.0);
        assert_eq!(sale.points_earned, 105);
        assert_eq!(sale.customer_name.as_deref(), Some("Hocine Larbi"));
        assert_eq!(sale.payment_method, PaymentMethod::Digital);

        assert_eq!(dashboard.toys().get("1").unwrap().stock, 22);
        assert_eq!(dashboard.toys().get("3").unwrap().stock, 39);
        let customer = dashboard.customers().get("2").unwrap();
        assert_eq!(customer.loyalty_points, 105);
        assert_eq!(customer.total_spent, 10500.0);
        assert!(dashboard.cart.is_empty());
        assert_eq!(dashboard.sales().len(), 2);
    }

    #[test]
    fn test_walk_in_sale_earns_no_points() {
        let mut dashboard = setup_dashboard();
        dashboard.cart.add("2", 1);
        let sale = dashboard.checkout().unwrap();
        assert_eq!(sale.points_earned, 0);
        assert!(sale.customer_id.is_none());
    }

    #[test]
    fn test_checkout_rejects_before_writing() {
        let mut dashboard = setup_dashboard();
        assert!(matches!(dashboard.checkout(), Err(DashboardError::EmptyCart)));

        dashboard.cart.add("1", 1);
        dashboard.cart.add("2", 4);
        match dashboard.checkout() {
            Err(DashboardError::InsufficientStock {
                toy_id,
                requested,
                available,
                ..
            }) => {
                assert_eq!(toy_id, "2");
                assert_eq!(requested, 4);
                assert_eq!(available, 3);
            }
            other => panic!("expected insufficient stock, got {:?}", other),
        }
        assert_eq!(dashboard.toys().get("1").unwrap().stock, 24);
        assert_eq!(dashboard.sales().len(), 1);
        assert_eq!(dashboard.cart.lines().len(), 2);

        dashboard.cart.set_quantity("2", 1);
        dashboard.cart.customer_id = Some("42".into());
        assert!(matches!(
            dashboard.checkout(),
            Err(DashboardError::Form(FormError::UnknownReference { field: "customerId", .. }))
        ));
        assert_eq!(dashboard.sales().len(), 1);
    }

    #[test]
    fn test_sale_keeps_price_after_catalog_change() {
        let mut dashboard = setup_dashboard();
        dashboard.cart.add("3", 2);
        let sale = dashboard.checkout().unwrap();

        dashboard.edit_toy("3");
        dashboard.toy_form.draft_mut().price = "1800".into();
        dashboard.submit_toy().unwrap();

        let stored = dashboard.sales().get(&sale.id).unwrap();
        assert_eq!(stored.items[0].price, 1500.0);
        assert_eq!(dashboard.toys().get("3").unwrap().price, 1800.0);
    }

    #[test]
    fn test_best_sellers() {
        let mut dashboard = setup_dashboard();
        dashboard.cart.add("3", 3);
        dashboard.checkout().unwrap();

        let ranked = dashboard.best_sellers(2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].toy_id, "3");
        assert_eq!(ranked[0].quantity, 3);
        // Both sold once; the higher revenue ranks first.
        assert_eq!(ranked[1].toy_id, "1");
    }

    #[test]
    fn test_restock_and_low_stock() {
        let mut dashboard = setup_dashboard();
        assert_eq!(dashboard.low_stock().len(), 1);
        assert!(dashboard.restock_toy("2", 10).unwrap());
        assert!(dashboard.low_stock().is_empty());
        assert!(dashboard.restock_toy("2", 0).is_err());
    }

    #[test]
    fn test_stats() {
        let dashboard = setup_dashboard();
        let stats = dashboard.stats_on(ymd(2024, 1, 20));
        assert_eq!(stats.sales, 1);
        assert_eq!(stats.revenue, 6700.0);
        assert_eq!(stats.today_revenue, 6700.0);
        assert_eq!(stats.low_stock, 1);
        assert_eq!(dashboard.stats_on(ymd(2024, 1, 21)).today_revenue, 0.0);
    }
}
