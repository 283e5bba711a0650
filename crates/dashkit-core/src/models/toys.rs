//! Toy store point-of-sale models: toys, customers and sales.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{ymd, Record};

/// Dinars spent per loyalty point.
pub const DINARS_PER_POINT: f64 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Toy {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    /// Recommended ages, e.g. "3-6 ans"
    pub age_range: String,
    pub sku: String,
    pub price: f64,
    pub cost: f64,
    pub stock: u32,
    pub reorder_level: u32,
}

impl Toy {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.reorder_level
    }
}

impl Record for Toy {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.brand.as_str(),
            self.category.as_str(),
            self.sku.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub loyalty_points: u32,
    pub total_spent: f64,
    #[serde(with = "crate::store::date")]
    pub joined_at: DateTime<Utc>,
}

impl Record for Customer {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.phone.as_str()]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Digital,
}

/// One line of a sale. Name and price are captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub toy_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl SaleItem {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    /// Walk-in sales have no customer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    pub items: Vec<SaleItem>,
    pub total: f64,
    pub payment_method: PaymentMethod,
    pub points_earned: u32,
    #[serde(with = "crate::store::date")]
    pub date: DateTime<Utc>,
}

impl Record for Sale {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.items.iter().map(|item| item.name.as_str()).collect();
        if let Some(customer) = &self.customer_name {
            fields.push(customer.as_str());
        }
        fields
    }
}

/// Points credited for spending `total`.
pub fn loyalty_points_for(total: f64) -> u32 {
    if total <= 0.0 {
        return 0;
    }
    (total / DINARS_PER_POINT).floor() as u32
}

pub fn sample_toys() -> Vec<Toy> {
    let toy = |id: &str, name: &str, brand: &str, category: &str, age: &str, sku: &str| Toy {
        id: id.into(),
        name: name.into(),
        brand: brand.into(),
        category: category.into(),
        age_range: age.into(),
        sku: sku.into(),
        price: 0.0,
        cost: 0.0,
        stock: 0,
        reorder_level: 5,
    };

    vec![
        Toy {
            price: 4500.0,
            cost: 2800.0,
            stock: 24,
            ..toy("1", "Château de construction", "Lego", "Construction", "6-12 ans", "LG-CH-01")
        },
        Toy {
            price: 2200.0,
            cost: 1300.0,
            stock: 3,
            ..toy("2", "Poupée exploratrice", "Barbie", "Poupées", "3-8 ans", "BB-EX-02")
        },
        Toy {
            price: 1500.0,
            cost: 700.0,
            stock: 40,
            reorder_level: 10,
            ..toy("3", "Puzzle carte d'Algérie", "Ravensburger", "Puzzles", "5-10 ans", "RV-PZ-03")
        },
    ]
}

pub fn sample_customers() -> Vec<Customer> {
    vec![
        Customer {
            id: "1".into(),
            name: "Meriem Saidi".into(),
            phone: "+213 555 6201".into(),
            email: Some("meriem@email.com".into()),
            loyalty_points: 67,
            total_spent: 6700.0,
            joined_at: ymd(2023, 11, 5),
        },
        Customer {
            id: "2".into(),
            name: "Hocine Larbi".into(),
            phone: "+213 555 6202".into(),
            email: None,
            loyalty_points: 0,
            total_spent: 0.0,
            joined_at: ymd(2024, 1, 14),
        },
    ]
}

pub fn sample_sales() -> Vec<Sale> {
    vec![Sale {
        id: "1".into(),
        customer_id: Some("1".into()),
        customer_name: Some("Meriem Saidi".into()),
        items: vec![
            SaleItem {
                toy_id: "1".into(),
                name: "Château de construction".into(),
                price: 4500.0,
                quantity: 1,
            },
            SaleItem {
                toy_id: "2".into(),
                name: "Poupée exploratrice".into(),
                price: 2200.0,
                quantity: 1,
            },
        ],
        total: 6700.0,
        payment_method: PaymentMethod::Card,
        points_earned: 67,
        date: ymd(2024, 1, 20),
    }]
}
