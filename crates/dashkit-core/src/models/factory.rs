//! Factory models: products, inventory, workers, machines and production orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{ymd, Record};

use super::realestate::Priority;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub unit_cost: f64,
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    pub fn margin(&self) -> f64 {
        self.unit_price - self.unit_cost
    }
}

impl Record for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.sku.as_str(), self.category.as_str()]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InventoryCategory {
    #[default]
    RawMaterial,
    Component,
    FinishedGood,
}

/// Stock of one material or part.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: InventoryCategory,
    pub quantity: f64,
    /// Unit of measure ("kg", "pcs", "m")
    pub unit: String,
    /// At or below this quantity the item needs restocking
    pub reorder_level: f64,
    pub unit_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::store::option_date"
    )]
    pub last_restocked: Option<DateTime<Utc>>,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    pub fn stock_value(&self) -> f64 {
        self.quantity * self.unit_cost
    }
}

impl Record for InventoryItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.sku.as_str()];
        if let Some(supplier) = &self.supplier {
            fields.push(supplier.as_str());
        }
        fields
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    #[default]
    Morning,
    Afternoon,
    Night,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    #[default]
    Active,
    OnLeave,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub role: String,
    pub department: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub shift: Shift,
    pub status: WorkerStatus,
    #[serde(with = "crate::store::date")]
    pub hire_date: DateTime<Utc>,
    pub hourly_rate: f64,
}

impl Record for Worker {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.role.as_str(),
            self.department.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MachineStatus {
    #[default]
    Operational,
    Idle,
    Maintenance,
    Broken,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceEntry {
    #[serde(with = "crate::store::date")]
    pub date: DateTime<Utc>,
    pub description: String,
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: String,
    pub name: String,
    pub model: String,
    pub location: String,
    pub status: MachineStatus,
    /// Assigned worker, cleared when that worker is removed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::store::option_date"
    )]
    pub last_maintenance: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::store::option_date"
    )]
    pub next_maintenance: Option<DateTime<Utc>>,
    #[serde(default)]
    pub maintenance_log: Vec<MaintenanceEntry>,
}

impl Machine {
    pub fn clear_operator(&mut self) {
        self.operator_id = None;
        self.operator_name = None;
    }

    pub fn maintenance_cost(&self) -> f64 {
        self.maintenance_log.iter().map(|entry| entry.cost).sum()
    }

    /// Maintenance is due on or before `today`.
    pub fn maintenance_due(&self, today: DateTime<Utc>) -> bool {
        self.next_maintenance.is_some_and(|next| next <= today)
    }
}

impl Record for Machine {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.name.as_str(),
            self.model.as_str(),
            self.location.as_str(),
        ];
        if let Some(operator) = &self.operator_name {
            fields.push(operator.as_str());
        }
        fields
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductionOrder {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    /// Target quantity
    pub quantity: u32,
    /// Units produced so far
    pub produced: u32,
    pub status: OrderStatus,
    pub priority: Priority,
    #[serde(with = "crate::store::date")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "crate::store::date")]
    pub due_date: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::store::option_date"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ProductionOrder {
    /// Percent complete, capped at 100.
    pub fn progress(&self) -> f64 {
        if self.quantity == 0 {
            return 100.0;
        }
        (f64::from(self.produced) / f64::from(self.quantity) * 100.0).min(100.0)
    }

    pub fn is_overdue(&self, today: DateTime<Utc>) -> bool {
        !matches!(self.status, OrderStatus::Completed | OrderStatus::Cancelled) && self.due_date < today
    }
}

impl Record for ProductionOrder {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.product_name.as_str(), self.id.as_str()]
    }
}

pub fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".into(),
            name: "Chaise en acier".into(),
            sku: "CH-ACR-01".into(),
            category: "Mobilier".into(),
            unit_cost: 2500.0,
            unit_price: 4200.0,
            description: Some("Chaise empilable, structure acier".into()),
        },
        Product {
            id: "2".into(),
            name: "Table de bureau".into(),
            sku: "TB-BUR-02".into(),
            category: "Mobilier".into(),
            unit_cost: 9000.0,
            unit_price: 15500.0,
            description: None,
        },
    ]
}

pub fn sample_inventory() -> Vec<InventoryItem> {
    vec![
        InventoryItem {
            id: "1".into(),
            name: "Tube acier 25mm".into(),
            sku: "MP-TUBE-25".into(),
            category: InventoryCategory::RawMaterial,
            quantity: 420.0,
            unit: "m".into(),
            reorder_level: 150.0,
            unit_cost: 320.0,
            supplier: Some("Sider El Hadjar".into()),
            location: Some("Entrepôt A".into()),
            last_restocked: Some(ymd(2024, 1, 12)),
        },
        InventoryItem {
            id: "2".into(),
            name: "Vis M6".into(),
            sku: "CP-VIS-M6".into(),
            category: InventoryCategory::Component,
            quantity: 800.0,
            unit: "pcs".into(),
            reorder_level: 1000.0,
            unit_cost: 5.0,
            supplier: Some("Quincaillerie Centrale".into()),
            location: Some("Entrepôt B".into()),
            last_restocked: Some(ymd(2023, 12, 2)),
        },
        InventoryItem {
            id: "3".into(),
            name: "Plateau MDF".into(),
            sku: "CP-MDF-120".into(),
            category: InventoryCategory::Component,
            quantity: 60.0,
            unit: "pcs".into(),
            reorder_level: 20.0,
            unit_cost: 2100.0,
            supplier: None,
            location: Some("Entrepôt A".into()),
            last_restocked: None,
        },
    ]
}

pub fn sample_workers() -> Vec<Worker> {
    vec![
        Worker {
            id: "1".into(),
            name: "Yacine Boudiaf".into(),
            role: "Soudeur".into(),
            department: "Assemblage".into(),
            phone: "+213 555 3001".into(),
            email: None,
            shift: Shift::Morning,
            status: WorkerStatus::Active,
            hire_date: ymd(2021, 9, 1),
            hourly_rate: 450.0,
        },
        Worker {
            id: "2".into(),
            name: "Samira Haddad".into(),
            role: "Opératrice CNC".into(),
            department: "Usinage".into(),
            phone: "+213 555 3002".into(),
            email: Some("samira@usine.dz".into()),
            shift: Shift::Afternoon,
            status: WorkerStatus::Active,
            hire_date: ymd(2022, 3, 15),
            hourly_rate: 520.0,
        },
    ]
}

pub fn sample_machines() -> Vec<Machine> {
    vec![
        Machine {
            id: "1".into(),
            name: "Poste de soudure 1".into(),
            model: "Lincoln Power MIG 260".into(),
            location: "Atelier assemblage".into(),
            status: MachineStatus::Operational,
            operator_id: Some("1".into()),
            operator_name: Some("Yacine Boudiaf".into()),
            last_maintenance: Some(ymd(2024, 1, 5)),
            next_maintenance: Some(ymd(2024, 4, 5)),
            maintenance_log: vec![MaintenanceEntry {
                date: ymd(2024, 1, 5),
                description: "Remplacement torche".into(),
                cost: 18000.0,
            }],
        },
        Machine {
            id: "2".into(),
            name: "Centre d'usinage".into(),
            model: "Haas VF-2".into(),
            location: "Atelier usinage".into(),
            status: MachineStatus::Operational,
            operator_id: Some("2".into()),
            operator_name: Some("Samira Haddad".into()),
            last_maintenance: None,
            next_maintenance: Some(ymd(2024, 2, 1)),
            maintenance_log: Vec::new(),
        },
    ]
}

pub fn sample_orders(now: DateTime<Utc>) -> Vec<ProductionOrder> {
    vec![
        ProductionOrder {
            id: "1".into(),
            product_id: "1".into(),
            product_name: "Chaise en acier".into(),
            quantity: 200,
            produced: 120,
            status: OrderStatus::InProgress,
            priority: Priority::High,
            start_date: ymd(2024, 1, 10),
            due_date: now + chrono::Duration::days(7),
            completed_at: None,
            machine_id: Some("1".into()),
            notes: None,
        },
        ProductionOrder {
            id: "2".into(),
            product_id: "2".into(),
            product_name: "Table de bureau".into(),
            quantity: 50,
            produced: 0,
            status: OrderStatus::Planned,
            priority: Priority::Medium,
            start_date: now,
            due_date: now + chrono::Duration::days(21),
            completed_at: None,
            machine_id: Some("2".into()),
            notes: Some("Commande administration".into()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_stock() {
        let inventory = sample_inventory();
        let low: Vec<_> = inventory.iter().filter(|i| i.is_low_stock()).collect();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].sku, "CP-VIS-M6");
    }

    #[test]
    fn test_order_progress() {
        let mut order = sample_orders(ymd(2024, 2, 1)).remove(0);
        assert_eq!(order.progress(), 60.0);
        order.produced = 250;
        assert_eq!(order.progress(), 100.0);
    }

    #[test]
    fn test_machine_maintenance_due() {
        let machines = sample_machines();
        assert!(machines[1].maintenance_due(ymd(2024, 2, 1)));
        assert!(!machines[0].maintenance_due(ymd(2024, 2, 1)));
        assert_eq!(machines[0].maintenance_cost(), 18000.0);
    }

    #[test]
    fn test_inventory_category_tag() {
        let value = serde_json::to_value(&sample_inventory()[0]).unwrap();
        assert_eq!(value["category"], "raw_material");
        assert_eq!(value["reorderLevel"], 150.0);
    }
}
