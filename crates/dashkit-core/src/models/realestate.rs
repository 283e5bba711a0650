//! Real-estate models: properties, tenants, leases and maintenance requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{ymd, Record};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    Apartment,
    House,
    Commercial,
    Land,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    #[default]
    Available,
    Rented,
    Sold,
    Maintenance,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    Active,
    Inactive,
    #[default]
    Pending,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeaseStatus {
    #[default]
    Active,
    Expired,
    Terminated,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
    Overdue,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    /// Still needs attention.
    pub fn is_open(self) -> bool {
        matches!(self, MaintenanceStatus::Pending | MaintenanceStatus::InProgress)
    }
}

/// A property in the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub address: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    /// Square metres
    pub area: f64,
    pub price: f64,
    pub status: PropertyStatus,
    /// Current tenant, set while a lease is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    pub owner_id: String,
    pub owner_name: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(with = "crate::store::date")]
    pub created_at: DateTime<Utc>,
}

impl Property {
    /// Drop the tenant pointer; a rented property becomes available again.
    pub fn release(&mut self) {
        self.tenant_id = None;
        self.tenant_name = None;
        if self.status == PropertyStatus::Rented {
            self.status = PropertyStatus::Available;
        }
    }
}

impl Record for Property {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.address.as_str(), self.owner_name.as_str()];
        if let Some(tenant) = &self.tenant_name {
            fields.push(tenant.as_str());
        }
        fields
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_id: Option<String>,
    pub status: TenantStatus,
    #[serde(with = "crate::store::date")]
    pub join_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_rent: Option<f64>,
}

impl Tenant {
    /// Clear lease, property and rent pointers.
    pub fn release(&mut self) {
        self.property_id = None;
        self.property_address = None;
        self.lease_id = None;
        self.monthly_rent = None;
    }
}

impl Record for Tenant {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.phone.as_str()]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lease {
    pub id: String,
    pub property_id: String,
    pub property_address: String,
    pub tenant_id: String,
    pub tenant_name: String,
    #[serde(with = "crate::store::date")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "crate::store::date")]
    pub end_date: DateTime<Utc>,
    pub monthly_rent: f64,
    pub deposit: f64,
    pub status: LeaseStatus,
    pub payment_status: PaymentStatus,
}

impl Record for Lease {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.property_address.as_str(), self.tenant_name.as_str()]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequest {
    pub id: String,
    pub property_id: String,
    pub property_address: String,
    pub tenant_id: String,
    pub tenant_name: String,
    pub description: String,
    pub priority: Priority,
    pub status: MaintenanceStatus,
    #[serde(with = "crate::store::date")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::store::option_date"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

impl Record for MaintenanceRequest {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.property_address.as_str(),
            self.tenant_name.as_str(),
            self.description.as_str(),
        ]
    }
}

const FIRST_ADDRESS: &str = "123 Rue de la République, Alger";

pub fn sample_properties(now: DateTime<Utc>) -> Vec<Property> {
    let listing = |id: &str, address: &str, kind: PropertyType| Property {
        id: id.into(),
        address: address.into(),
        kind,
        bedrooms: None,
        bathrooms: None,
        area: 0.0,
        price: 0.0,
        status: PropertyStatus::Available,
        tenant_id: None,
        tenant_name: None,
        owner_id: "1".into(),
        owner_name: "Propriétaire 1".into(),
        images: Vec::new(),
        description: None,
        features: Vec::new(),
        created_at: now,
    };

    vec![
        Property {
            bedrooms: Some(3),
            bathrooms: Some(2),
            area: 120.0,
            price: 50000.0,
            status: PropertyStatus::Rented,
            tenant_id: Some("1".into()),
            tenant_name: Some("Ahmed Benali".into()),
            images: vec!["https://images.unsplash.com/photo-1568605114967-8130f3a36994?w=800&h=600&fit=crop&q=80".into()],
            features: vec!["Balcon".into(), "Parking".into(), "Ascenseur".into()],
            ..listing("1", FIRST_ADDRESS, PropertyType::Apartment)
        },
        Property {
            bedrooms: Some(4),
            bathrooms: Some(3),
            area: 200.0,
            price: 120000.0,
            images: vec!["https://images.unsplash.com/photo-1564013799919-ab600027ffc6?w=800&h=600&fit=crop&q=80".into()],
            features: vec!["Jardin".into(), "Garage".into(), "Terrasse".into()],
            ..listing("2", "456 Avenue Didouche Mourad, Oran", PropertyType::House)
        },
        Property {
            area: 300.0,
            price: 200000.0,
            owner_id: "2".into(),
            owner_name: "Propriétaire 2".into(),
            images: vec!["https://images.unsplash.com/photo-1497366216548-37526070297c?w=800&h=600&fit=crop&q=80".into()],
            features: vec!["Vitrine".into(), "Parking".into()],
            ..listing("3", "789 Boulevard Zighout Youcef, Constantine", PropertyType::Commercial)
        },
    ]
}

pub fn sample_tenants() -> Vec<Tenant> {
    vec![
        Tenant {
            id: "1".into(),
            name: "Ahmed Benali".into(),
            email: "ahmed@email.com".into(),
            phone: "+213 555 1234".into(),
            property_id: Some("1".into()),
            property_address: Some(FIRST_ADDRESS.into()),
            lease_id: Some("1".into()),
            status: TenantStatus::Active,
            join_date: ymd(2023, 1, 15),
            monthly_rent: Some(500.0),
        },
        Tenant {
            id: "2".into(),
            name: "Fatima Kadri".into(),
            email: "fatima@email.com".into(),
            phone: "+213 555 5678".into(),
            property_id: None,
            property_address: None,
            lease_id: None,
            status: TenantStatus::Pending,
            join_date: ymd(2024, 1, 20),
            monthly_rent: None,
        },
    ]
}

pub fn sample_leases() -> Vec<Lease> {
    vec![Lease {
        id: "1".into(),
        property_id: "1".into(),
        property_address: FIRST_ADDRESS.into(),
        tenant_id: "1".into(),
        tenant_name: "Ahmed Benali".into(),
        start_date: ymd(2023, 1, 15),
        end_date: ymd(2024, 1, 15),
        monthly_rent: 500.0,
        deposit: 1000.0,
        status: LeaseStatus::Active,
        payment_status: PaymentStatus::Paid,
    }]
}

pub fn sample_maintenance(now: DateTime<Utc>) -> Vec<MaintenanceRequest> {
    let request = |id: &str, description: &str, priority: Priority, status: MaintenanceStatus| {
        MaintenanceRequest {
            id: id.into(),
            property_id: "1".into(),
            property_address: FIRST_ADDRESS.into(),
            tenant_id: "1".into(),
            tenant_name: "Ahmed Benali".into(),
            description: description.into(),
            priority,
            status,
            created_at: now,
            completed_at: None,
            cost: None,
        }
    };

    vec![
        request(
            "1",
            "Fuite d'eau dans la salle de bain",
            Priority::High,
            MaintenanceStatus::InProgress,
        ),
        request("2", "Peinture à refaire", Priority::Low, MaintenanceStatus::Pending),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_release() {
        let mut property = sample_properties(ymd(2024, 1, 1)).remove(0);
        property.release();
        assert_eq!(property.status, PropertyStatus::Available);
        assert!(property.tenant_id.is_none());

        let mut sold = property.clone();
        sold.status = PropertyStatus::Sold;
        sold.release();
        assert_eq!(sold.status, PropertyStatus::Sold);
    }

    #[test]
    fn test_optional_rooms_omitted() {
        let commercial = &sample_properties(ymd(2024, 1, 1))[2];
        let value = serde_json::to_value(commercial).unwrap();
        assert!(value.get("bedrooms").is_none());
        assert_eq!(value["type"], "commercial");
        assert_eq!(value["ownerName"], "Propriétaire 2");
    }

    #[test]
    fn test_open_maintenance() {
        let open = sample_maintenance(ymd(2024, 1, 1))
            .iter()
            .filter(|m| m.status.is_open())
            .count();
        assert_eq!(open, 2);
        assert!(!MaintenanceStatus::Completed.is_open());
        assert!(Priority::Urgent > Priority::High);
    }
}
