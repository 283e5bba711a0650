//! Factory dashboard: products, inventory, workers, machines and production
//! orders.
//!
//! Removing a worker clears them as operator of every machine they ran.

use chrono::{DateTime, Utc};

use super::{open_store, require, DashboardError, DashboardResult};
use crate::config::DashkitConfig;
use crate::form::{
    non_empty, parse_count, parse_number, parse_optional_date, parse_required_date, Draft,
    FormEditor, FormError, Submission,
};
use crate::models::factory::{
    sample_inventory, sample_machines, sample_orders, sample_products, sample_workers,
    InventoryCategory, InventoryItem, Machine, MachineStatus, MaintenanceEntry, OrderStatus,
    Product, ProductionOrder, Shift, Worker, WorkerStatus,
};
use crate::models::realestate::Priority;
use crate::store::{format_date, KeyValueStore, RecordStore, StoreContext, StoreResult};
use crate::view::{Tab, ViewState};

pub const PRODUCTS_KEY: &str = "factory-products";
pub const INVENTORY_KEY: &str = "factory-inventory";
pub const WORKERS_KEY: &str = "factory-workers";
pub const MACHINES_KEY: &str = "factory-machines";
pub const ORDERS_KEY: &str = "factory-orders";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FactoryTab {
    #[default]
    Dashboard,
    Products,
    Inventory,
    Workers,
    Machines,
    Orders,
}

impl Tab for FactoryTab {
    const ALL: &'static [Self] = &[
        FactoryTab::Dashboard,
        FactoryTab::Products,
        FactoryTab::Inventory,
        FactoryTab::Workers,
        FactoryTab::Machines,
        FactoryTab::Orders,
    ];

    fn label(&self) -> &'static str {
        match self {
            FactoryTab::Dashboard => "Tableau de bord",
            FactoryTab::Products => "Produits",
            FactoryTab::Inventory => "Stock",
            FactoryTab::Workers => "Employés",
            FactoryTab::Machines => "Machines",
            FactoryTab::Orders => "Production",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub unit_cost: String,
    pub unit_price: String,
    pub description: String,
}

impl Draft for ProductDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str()), ("sku", self.sku.as_str())]
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            sku: product.sku.clone(),
            category: product.category.clone(),
            unit_cost: product.unit_cost.to_string(),
            unit_price: product.unit_price.to_string(),
            description: product.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryDraft {
    pub name: String,
    pub sku: String,
    pub category: InventoryCategory,
    pub quantity: String,
    pub unit: String,
    pub reorder_level: String,
    pub unit_cost: String,
    pub supplier: String,
    pub location: String,
}

impl Draft for InventoryDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("name", self.name.as_str()),
            ("sku", self.sku.as_str()),
            ("unit", self.unit.as_str()),
        ]
    }
}

impl From<&InventoryItem> for InventoryDraft {
    fn from(item: &InventoryItem) -> Self {
        Self {
            name: item.name.clone(),
            sku: item.sku.clone(),
            category: item.category,
            quantity: item.quantity.to_string(),
            unit: item.unit.clone(),
            reorder_level: item.reorder_level.to_string(),
            unit_cost: item.unit_cost.to_string(),
            supplier: item.supplier.clone().unwrap_or_default(),
            location: item.location.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerDraft {
    pub name: String,
    pub role: String,
    pub department: String,
    pub phone: String,
    pub email: String,
    pub shift: Shift,
    pub hire_date: String,
    pub hourly_rate: String,
}

impl Draft for WorkerDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("name", self.name.as_str()),
            ("role", self.role.as_str()),
            ("department", self.department.as_str()),
            ("phone", self.phone.as_str()),
        ]
    }
}

impl From<&Worker> for WorkerDraft {
    fn from(worker: &Worker) -> Self {
        Self {
            name: worker.name.clone(),
            role: worker.role.clone(),
            department: worker.department.clone(),
            phone: worker.phone.clone(),
            email: worker.email.clone().unwrap_or_default(),
            shift: worker.shift,
            hire_date: format_date(&worker.hire_date),
            hourly_rate: worker.hourly_rate.to_string(),
        }
    }
}

/// Machine form. An empty operator id leaves the machine unassigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MachineDraft {
    pub name: String,
    pub model: String,
    pub location: String,
    pub operator_id: String,
    pub next_maintenance: String,
}

impl Draft for MachineDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("name", self.name.as_str()),
            ("model", self.model.as_str()),
            ("location", self.location.as_str()),
        ]
    }
}

impl From<&Machine> for MachineDraft {
    fn from(machine: &Machine) -> Self {
        Self {
            name: machine.name.clone(),
            model: machine.model.clone(),
            location: machine.location.clone(),
            operator_id: machine.operator_id.clone().unwrap_or_default(),
            next_maintenance: machine
                .next_maintenance
                .as_ref()
                .map(format_date)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    pub product_id: String,
    pub quantity: String,
    pub priority: Priority,
    pub due_date: String,
    pub machine_id: String,
    pub notes: String,
}

impl Draft for OrderDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("productId", self.product_id.as_str()),
            ("quantity", self.quantity.as_str()),
            ("dueDate", self.due_date.as_str()),
        ]
    }
}

impl From<&ProductionOrder> for OrderDraft {
    fn from(order: &ProductionOrder) -> Self {
        Self {
            product_id: order.product_id.clone(),
            quantity: order.quantity.to_string(),
            priority: order.priority,
            due_date: format_date(&order.due_date),
            machine_id: order.machine_id.clone().unwrap_or_default(),
            notes: order.notes.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactoryStats {
    pub products: usize,
    pub inventory_value: f64,
    pub low_stock_items: usize,
    pub active_workers: usize,
    pub operational_machines: usize,
    pub orders_in_progress: usize,
    pub completed_orders: usize,
    pub overdue_orders: usize,
}

pub struct FactoryDashboard<S> {
    ctx: StoreContext<S>,
    products: RecordStore<Product>,
    inventory: RecordStore<InventoryItem>,
    workers: RecordStore<Worker>,
    machines: RecordStore<Machine>,
    orders: RecordStore<ProductionOrder>,
    pub view: ViewState<FactoryTab>,
    pub product_form: FormEditor<ProductDraft>,
    pub inventory_form: FormEditor<InventoryDraft>,
    pub worker_form: FormEditor<WorkerDraft>,
    pub machine_form: FormEditor<MachineDraft>,
    pub order_form: FormEditor<OrderDraft>,
}

impl<S: KeyValueStore> FactoryDashboard<S> {
    pub fn open(backend: S, config: &DashkitConfig) -> DashboardResult<Self> {
        let ctx = StoreContext::from_config(backend, &config.records);
        let seed = config.records.seed_samples;
        let now = Utc::now();

        let products = open_store(&ctx, PRODUCTS_KEY, seed, sample_products)?;
        let inventory = open_store(&ctx, INVENTORY_KEY, seed, sample_inventory)?;
        let workers = open_store(&ctx, WORKERS_KEY, seed, sample_workers)?;
        let machines = open_store(&ctx, MACHINES_KEY, seed, sample_machines)?;
        let orders = open_store(&ctx, ORDERS_KEY, seed, || sample_orders(now))?;

        Ok(Self {
            ctx,
            products,
            inventory,
            workers,
            machines,
            orders,
            view: ViewState::new(),
            product_form: FormEditor::new(),
            inventory_form: FormEditor::new(),
            worker_form: FormEditor::new(),
            machine_form: FormEditor::new(),
            order_form: FormEditor::new(),
        })
    }

    pub fn products(&self) -> &RecordStore<Product> {
        &self.products
    }

    pub fn inventory(&self) -> &RecordStore<InventoryItem> {
        &self.inventory
    }

    pub fn workers(&self) -> &RecordStore<Worker> {
        &self.workers
    }

    pub fn machines(&self) -> &RecordStore<Machine> {
        &self.machines
    }

    pub fn orders(&self) -> &RecordStore<ProductionOrder> {
        &self.orders
    }

    pub fn reload(&mut self) -> StoreResult<()> {
        self.products.reload(&self.ctx)?;
        self.inventory.reload(&self.ctx)?;
        self.workers.reload(&self.ctx)?;
        self.machines.reload(&self.ctx)?;
        self.orders.reload(&self.ctx)
    }

    // -- Products --

    pub fn edit_product(&mut self, id: &str) -> bool {
        match self.products.get(id) {
            Some(product) => {
                self.product_form.open_edit(id, ProductDraft::from(product));
                true
            }
            None => false,
        }
    }

    pub fn submit_product(&mut self) -> DashboardResult<Option<Product>> {
        let submission = self.product_form.submit()?;
        let result = self.commit_product(submission.clone());
        if result.is_err() {
            self.product_form.restore(submission);
        }
        result
    }

    pub fn commit_product(
        &mut self,
        submission: Submission<ProductDraft>,
    ) -> DashboardResult<Option<Product>> {
        let draft = submission.draft();
        draft.validate()?;
        let product = Product {
            id: String::new(),
            name: draft.name.trim().to_string(),
            sku: draft.sku.trim().to_string(),
            category: draft.category.trim().to_string(),
            unit_cost: parse_number(&draft.unit_cost),
            unit_price: parse_number(&draft.unit_price),
            description: non_empty(&draft.description),
        };

        match &submission {
            Submission::Create(_) => {
                let product = self.products.create(&self.ctx, product)?;
                tracing::info!(id = %product.id, "Created product");
                Ok(Some(product))
            }
            Submission::Update { id, .. } => {
                let updated = self.products.update(&self.ctx, id, product)?;
                Ok(updated.then(|| self.products.get(id).cloned()).flatten())
            }
        }
    }

    pub fn delete_product(&mut self, id: &str) -> DashboardResult<bool> {
        Ok(self.products.delete(&self.ctx, id)?.is_some())
    }

    pub fn search_products(&self, query: &str) -> Vec<&Product> {
        self.products.search(query)
    }

    // -- Inventory --

    pub fn edit_inventory(&mut self, id: &str) -> bool {
        match self.inventory.get(id) {
            Some(item) => {
                self.inventory_form.open_edit(id, InventoryDraft::from(item));
                true
            }
            None => false,
        }
    }

    pub fn submit_inventory(&mut self) -> DashboardResult<Option<InventoryItem>> {
        let submission = self.inventory_form.submit()?;
        let result = self.commit_inventory(submission.clone());
        if result.is_err() {
            self.inventory_form.restore(submission);
        }
        result
    }

    pub fn commit_inventory(
        &mut self,
        submission: Submission<InventoryDraft>,
    ) -> DashboardResult<Option<InventoryItem>> {
        let draft = submission.draft();
        draft.validate()?;
        let fields = InventoryItem {
            id: String::new(),
            name: draft.name.trim().to_string(),
            sku: draft.sku.trim().to_string(),
            category: draft.category,
            quantity: parse_number(&draft.quantity).max(0.0),
            unit: draft.unit.trim().to_string(),
            reorder_level: parse_number(&draft.reorder_level).max(0.0),
            unit_cost: parse_number(&draft.unit_cost),
            supplier: non_empty(&draft.supplier),
            location: non_empty(&draft.location),
            last_restocked: None,
        };

        match &submission {
            Submission::Create(_) => {
                let item = self.inventory.create(&self.ctx, fields)?;
                tracing::info!(id = %item.id, sku = %item.sku, "Created inventory item");
                Ok(Some(item))
            }
            Submission::Update { id, .. } => {
                let Some(existing) = self.inventory.get(id) else {
                    return Ok(None);
                };
                let updated = InventoryItem {
                    last_restocked: existing.last_restocked,
                    ..fields
                };
                self.inventory.update(&self.ctx, id, updated.clone())?;
                Ok(Some(updated))
            }
        }
    }

    /// Add `quantity` to an item's stock and stamp the restock date.
    pub fn restock(&mut self, id: &str, quantity: f64) -> DashboardResult<bool> {
        if quantity <= 0.0 {
            return Err(FormError::NotPositive("quantity").into());
        }
        let now = Utc::now();
        let restocked = self.inventory.modify(&self.ctx, id, |item| {
            item.quantity += quantity;
            item.last_restocked = Some(now);
        })?;
        if restocked {
            tracing::info!(id, quantity, "Restocked inventory item");
        }
        Ok(restocked)
    }

    pub fn low_stock(&self) -> Vec<&InventoryItem> {
        self.inventory.filter(InventoryItem::is_low_stock)
    }

    pub fn delete_inventory(&mut self, id: &str) -> DashboardResult<bool> {
        Ok(self.inventory.delete(&self.ctx, id)?.is_some())
    }

    pub fn search_inventory(&self, query: &str) -> Vec<&InventoryItem> {
        self.inventory.search(query)
    }

    // -- Workers --

    pub fn edit_worker(&mut self, id: &str) -> bool {
        match self.workers.get(id) {
            Some(worker) => {
                self.worker_form.open_edit(id, WorkerDraft::from(worker));
                true
            }
            None => false,
        }
    }

    pub fn submit_worker(&mut self) -> DashboardResult<Option<Worker>> {
        let submission = self.worker_form.submit()?;
        let result = self.commit_worker(submission.clone());
        if result.is_err() {
            self.worker_form.restore(submission);
        }
        result
    }

    /// Create or update a worker. Renaming a worker also renames them on the
    /// machines they operate.
    pub fn commit_worker(
        &mut self,
        submission: Submission<WorkerDraft>,
    ) -> DashboardResult<Option<Worker>> {
        let draft = submission.draft();
        draft.validate()?;
        let hire_date = parse_optional_date("hireDate", &draft.hire_date)?;

        match &submission {
            Submission::Create(draft) => {
                let worker = Worker {
                    id: String::new(),
                    name: draft.name.trim().to_string(),
                    role: draft.role.trim().to_string(),
                    department: draft.department.trim().to_string(),
                    phone: draft.phone.trim().to_string(),
                    email: non_empty(&draft.email),
                    shift: draft.shift,
                    status: WorkerStatus::Active,
                    hire_date: hire_date.unwrap_or_else(Utc::now),
                    hourly_rate: parse_number(&draft.hourly_rate),
                };
                let worker = self.workers.create(&self.ctx, worker)?;
                tracing::info!(id = %worker.id, "Created worker");
                Ok(Some(worker))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.workers.get(id) else {
                    return Ok(None);
                };
                let updated = Worker {
                    name: draft.name.trim().to_string(),
                    role: draft.role.trim().to_string(),
                    department: draft.department.trim().to_string(),
                    phone: draft.phone.trim().to_string(),
                    email: non_empty(&draft.email),
                    shift: draft.shift,
                    hire_date: hire_date.unwrap_or(existing.hire_date),
                    hourly_rate: parse_number(&draft.hourly_rate),
                    ..existing.clone()
                };
                self.workers.update(&self.ctx, id, updated.clone())?;
                self.machines.modify_where(
                    &self.ctx,
                    |m| m.operator_id.as_deref() == Some(updated.id.as_str()),
                    |m| m.operator_name = Some(updated.name.clone()),
                )?;
                Ok(Some(updated))
            }
        }
    }

    pub fn set_worker_status(&mut self, id: &str, status: WorkerStatus) -> DashboardResult<bool> {
        Ok(self.workers.modify(&self.ctx, id, |w| w.status = status)?)
    }

    /// Delete a worker and clear them as operator everywhere.
    pub fn delete_worker(&mut self, id: &str) -> DashboardResult<bool> {
        if self.workers.delete(&self.ctx, id)?.is_none() {
            return Ok(false);
        }
        let unassigned = self.machines.modify_where(
            &self.ctx,
            |m| m.operator_id.as_deref() == Some(id),
            Machine::clear_operator,
        )?;
        tracing::info!(id, unassigned, "Deleted worker");
        Ok(true)
    }

    pub fn search_workers(&self, query: &str) -> Vec<&Worker> {
        self.workers.search(query)
    }

    // -- Machines --

    pub fn edit_machine(&mut self, id: &str) -> bool {
        match self.machines.get(id) {
            Some(machine) => {
                self.machine_form.open_edit(id, MachineDraft::from(machine));
                true
            }
            None => false,
        }
    }

    pub fn submit_machine(&mut self) -> DashboardResult<Option<Machine>> {
        let submission = self.machine_form.submit()?;
        let result = self.commit_machine(submission.clone());
        if result.is_err() {
            self.machine_form.restore(submission);
        }
        result
    }

    pub fn commit_machine(
        &mut self,
        submission: Submission<MachineDraft>,
    ) -> DashboardResult<Option<Machine>> {
        let draft = submission.draft();
        draft.validate()?;
        let next_maintenance = parse_optional_date("nextMaintenance", &draft.next_maintenance)?;
        let operator = match non_empty(&draft.operator_id) {
            Some(operator_id) => Some(require(&self.workers, "operatorId", &operator_id)?),
            None => None,
        };
        let operator_id = operator.map(|w| w.id.clone());
        let operator_name = operator.map(|w| w.name.clone());

        match &submission {
            Submission::Create(draft) => {
                let machine = Machine {
                    id: String::new(),
                    name: draft.name.trim().to_string(),
                    model: draft.model.trim().to_string(),
                    location: draft.location.trim().to_string(),
                    status: MachineStatus::Operational,
                    operator_id,
                    operator_name,
                    last_maintenance: None,
                    next_maintenance,
                    maintenance_log: Vec::new(),
                };
                let machine = self.machines.create(&self.ctx, machine)?;
                tracing::info!(id = %machine.id, "Created machine");
                Ok(Some(machine))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.machines.get(id) else {
                    return Ok(None);
                };
                let updated = Machine {
                    name: draft.name.trim().to_string(),
                    model: draft.model.trim().to_string(),
                    location: draft.location.trim().to_string(),
                    operator_id,
                    operator_name,
                    next_maintenance,
                    ..existing.clone()
                };
                self.machines.update(&self.ctx, id, updated.clone())?;
                Ok(Some(updated))
            }
        }
    }

    pub fn set_machine_status(&mut self, id: &str, status: MachineStatus) -> DashboardResult<bool> {
        Ok(self.machines.modify(&self.ctx, id, |m| m.status = status)?)
    }

    /// Log a maintenance intervention. The machine returns to service.
    pub fn log_maintenance(
        &mut self,
        id: &str,
        description: &str,
        cost: f64,
        next: Option<DateTime<Utc>>,
    ) -> DashboardResult<bool> {
        let description =
            non_empty(description).ok_or(FormError::MissingField("description"))?;
        let now = Utc::now();
        let logged = self.machines.modify(&self.ctx, id, |machine| {
            machine.maintenance_log.push(MaintenanceEntry {
                date: now,
                description,
                cost: cost.max(0.0),
            });
            machine.last_maintenance = Some(now);
            machine.next_maintenance = next;
            machine.status = MachineStatus::Operational;
        })?;
        Ok(logged)
    }

    /// Machines whose next maintenance is due on or before `today`.
    pub fn maintenance_due(&self, today: DateTime<Utc>) -> Vec<&Machine> {
        self.machines.filter(|m| m.maintenance_due(today))
    }

    pub fn delete_machine(&mut self, id: &str) -> DashboardResult<bool> {
        Ok(self.machines.delete(&self.ctx, id)?.is_some())
    }

    pub fn search_machines(&self, query: &str) -> Vec<&Machine> {
        self.machines.search(query)
    }

    // -- Production orders --

    pub fn edit_order(&mut self, id: &str) -> bool {
        match self.orders.get(id) {
            Some(order) => {
                self.order_form.open_edit(id, OrderDraft::from(order));
                true
            }
            None => false,
        }
    }

    pub fn submit_order(&mut self) -> DashboardResult<Option<ProductionOrder>> {
        let submission = self.order_form.submit()?;
        let result = self.commit_order(submission.clone());
        if result.is_err() {
            self.order_form.restore(submission);
        }
        result
    }

    pub fn commit_order(
        &mut self,
        submission: Submission<OrderDraft>,
    ) -> DashboardResult<Option<ProductionOrder>> {
        let draft = submission.draft();
        draft.validate()?;
        let due_date = parse_required_date("dueDate", &draft.due_date)?;
        let quantity = parse_count(&draft.quantity);
        if quantity == 0 {
            return Err(FormError::NotPositive("quantity").into());
        }
        let product = require(&self.products, "productId", draft.product_id.trim())?;
        let machine_id = match non_empty(&draft.machine_id) {
            Some(machine_id) => Some(require(&self.machines, "machineId", &machine_id)?.id.clone()),
            None => None,
        };

        match &submission {
            Submission::Create(draft) => {
                let order = ProductionOrder {
                    id: String::new(),
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    quantity,
                    produced: 0,
                    status: OrderStatus::Planned,
                    priority: draft.priority,
                    start_date: Utc::now(),
                    due_date,
                    completed_at: None,
                    machine_id,
                    notes: non_empty(&draft.notes),
                };
                let order = self.orders.create(&self.ctx, order)?;
                tracing::info!(id = %order.id, product = %order.product_id, quantity, "Created production order");
                Ok(Some(order))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.orders.get(id) else {
                    return Ok(None);
                };
                let updated = ProductionOrder {
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    quantity,
                    priority: draft.priority,
                    due_date,
                    machine_id,
                    notes: non_empty(&draft.notes),
                    ..existing.clone()
                };
                self.orders.update(&self.ctx, id, updated.clone())?;
                Ok(Some(updated))
            }
        }
    }

    /// Record `quantity` more units produced. A planned order moves to in
    /// progress; reaching the target completes it. Returns the updated order,
    /// `None` when the id is unknown.
    pub fn record_production(
        &mut self,
        id: &str,
        quantity: u32,
    ) -> DashboardResult<Option<ProductionOrder>> {
        let Some(order) = self.orders.get(id) else {
            return Ok(None);
        };
        if matches!(order.status, OrderStatus::Completed | OrderStatus::Cancelled) {
            return Err(DashboardError::OrderClosed(id.to_string()));
        }
        if quantity == 0 {
            return Err(FormError::NotPositive("quantity").into());
        }

        let now = Utc::now();
        self.orders.modify(&self.ctx, id, |order| {
            order.produced = order.produced.saturating_add(quantity);
            if order.produced >= order.quantity {
                order.status = OrderStatus::Completed;
                order.completed_at = Some(now);
            } else {
                order.status = OrderStatus::InProgress;
            }
        })?;

        let order = self.orders.get(id).cloned();
        if let Some(order) = &order {
            tracing::info!(id, produced = order.produced, status = ?order.status, "Recorded production");
        }
        Ok(order)
    }

    pub fn set_order_status(&mut self, id: &str, status: OrderStatus) -> DashboardResult<bool> {
        let now = Utc::now();
        Ok(self.orders.modify(&self.ctx, id, |order| {
            order.status = status;
            order.completed_at = (status == OrderStatus::Completed).then_some(now);
        })?)
    }

    pub fn delete_order(&mut self, id: &str) -> DashboardResult<bool> {
        Ok(self.orders.delete(&self.ctx, id)?.is_some())
    }

    pub fn search_orders(&self, query: &str) -> Vec<&ProductionOrder> {
        self.orders.search(query)
    }

    // -- Dashboard --

    pub fn stats(&self) -> FactoryStats {
        self.stats_on(Utc::now())
    }

    pub fn stats_on(&self, today: DateTime<Utc>) -> FactoryStats {
        FactoryStats {
            products: self.products.len(),
            inventory_value: self.inventory.list().iter().map(InventoryItem::stock_value).sum(),
            low_stock_items: self.inventory.count(InventoryItem::is_low_stock),
            active_workers: self.workers.count(|w| w.status == WorkerStatus::Active),
            operational_machines: self
                .machines
                .count(|m| m.status == MachineStatus::Operational),
            orders_in_progress: self.orders.count(|o| o.status == OrderStatus::InProgress),
            completed_orders: self.orders.count(|o| o.status == OrderStatus::Completed),
            overdue_orders: self.orders.count(|o| o.is_overdue(today)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ymd, MemoryStore};

    fn setup_dashboard() -> FactoryDashboard<MemoryStore> {
        FactoryDashboard::open(MemoryStore::new(), &DashkitConfig::default()).unwrap()
    }

    #[test]
    fn test_record_production_completes_order() {
        let mut dashboard = setup_dashboard();

        let order = dashboard.record_production("1", 50).unwrap().unwrap();
        assert_eq!(order.produced, 170);
        assert_eq!(order.status, OrderStatus::InProgress);

        let order = dashboard.record_production("1", 40).unwrap().unwrap();
        assert_eq!(order.produced, 210);
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(order.completed_at.is_some());

        assert!(matches!(
            dashboard.record_production("1", 1),
            Err(DashboardError::OrderClosed(_))
        ));
        assert!(dashboard.record_production("missing", 1).unwrap().is_none());
    }

    #[test]
    fn test_planned_order_starts() {
        let mut dashboard = setup_dashboard();
        let order = dashboard.record_production("2", 5).unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(order.progress(), 10.0);
    }

    #[test]
    fn test_restock_clears_low_stock() {
        let mut dashboard = setup_dashboard();
        assert_eq!(dashboard.low_stock().len(), 1);

        assert!(dashboard.restock("2", 500.0).unwrap());
        let item = dashboard.inventory().get("2").unwrap();
        assert_eq!(item.quantity, 1300.0);
        assert!(item.last_restocked.is_some());
        assert!(dashboard.low_stock().is_empty());

        assert!(matches!(
            dashboard.restock("2", 0.0),
            Err(DashboardError::Form(FormError::NotPositive("quantity")))
        ));
    }

    #[test]
    fn test_delete_worker_clears_operator() {
        let mut dashboard = setup_dashboard();
        assert!(dashboard.delete_worker("1").unwrap());

        let machine = dashboard.machines().get("1").unwrap();
        assert!(machine.operator_id.is_none());
        assert!(machine.operator_name.is_none());
        assert_eq!(
            dashboard.machines().get("2").unwrap().operator_id.as_deref(),
            Some("2")
        );
    }

    #[test]
    fn test_rename_worker_updates_machine() {
        let mut dashboard = setup_dashboard();
        assert!(dashboard.edit_worker("2"));
        dashboard.worker_form.draft_mut().name = "Samira Haddad-Bey".into();
        dashboard.submit_worker().unwrap();

        assert_eq!(
            dashboard.machines().get("2").unwrap().operator_name.as_deref(),
            Some("Samira Haddad-Bey")
        );
    }

    #[test]
    fn test_log_maintenance() {
        let mut dashboard = setup_dashboard();
        dashboard.set_machine_status("2", MachineStatus::Broken).unwrap();
        assert_eq!(dashboard.maintenance_due(ymd(2024, 2, 1)).len(), 1);

        assert!(dashboard
            .log_maintenance("2", "Changement broche", 45000.0, Some(ymd(2024, 8, 1)))
            .unwrap());
        let machine = dashboard.machines().get("2").unwrap();
        assert_eq!(machine.status, MachineStatus::Operational);
        assert_eq!(machine.maintenance_log.len(), 1);
        assert!(dashboard.maintenance_due(ymd(2024, 2, 1)).is_empty());

        assert!(dashboard.log_maintenance("2", "  ", 0.0, None).is_err());
    }

    #[test]
    fn test_order_requires_known_product() {
        let mut dashboard = setup_dashboard();
        let result = dashboard.commit_order(Submission::Create(OrderDraft {
            product_id: "9".into(),
            quantity: "10".into(),
            due_date: "2024-06-01".into(),
            ..OrderDraft::default()
        }));
        assert!(matches!(
            result,
            Err(DashboardError::Form(FormError::UnknownReference { field: "productId", .. }))
        ));

        let order = dashboard
            .commit_order(Submission::Create(OrderDraft {
                product_id: "2".into(),
                quantity: "10".into(),
                due_date: "2024-06-01".into(),
                ..OrderDraft::default()
            }))
            .unwrap()
            .unwrap();
        assert_eq!(order.product_name, "Table de bureau");
        assert_eq!(order.status, OrderStatus::Planned);
    }

    #[test]
    fn test_stats() {
        let dashboard = setup_dashboard();
        let stats = dashboard.stats();
        assert_eq!(stats.products, 2);
        assert_eq!(stats.low_stock_items, 1);
        assert_eq!(stats.active_workers, 2);
        assert_eq!(stats.orders_in_progress, 1);
        assert_eq!(stats.overdue_orders, 0);
        assert_eq!(stats.inventory_value, 420.0 * 320.0 + 800.0 * 5.0 + 60.0 * 2100.0);
    }
}
