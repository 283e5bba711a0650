//! Real-estate dashboard: properties, tenants, leases and maintenance.
//!
//! Cascades between stores:
//!
//! | Event          | Property                               | Tenant                                      |
//! |----------------|----------------------------------------|---------------------------------------------|
//! | lease created  | `rented`, tenant id/name set           | `active`, lease/property/address/rent set   |
//! | lease deleted  | tenant cleared, `rented` -> `available`| lease/property/address/rent cleared         |
//! | tenant deleted | tenant cleared, `rented` -> `available`| -                                           |

use chrono::Utc;

use super::{open_store, require, DashboardResult};
use crate::config::DashkitConfig;
use crate::form::{
    parse_count, parse_number, parse_required_date, require_positive, Draft, FormEditor,
    Submission,
};
use crate::models::realestate::{
    sample_leases, sample_maintenance, sample_properties, sample_tenants, Lease, LeaseStatus,
    MaintenanceRequest, MaintenanceStatus, PaymentStatus, Priority, Property, PropertyStatus,
    PropertyType, Tenant, TenantStatus,
};
use crate::store::{format_date, KeyValueStore, RecordStore, StoreContext, StoreResult};
use crate::view::{Tab, ViewState};

pub const PROPERTIES_KEY: &str = "realestate-properties";
pub const TENANTS_KEY: &str = "realestate-tenants";
pub const LEASES_KEY: &str = "realestate-leases";
pub const MAINTENANCE_KEY: &str = "realestate-maintenance";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RealEstateTab {
    #[default]
    Dashboard,
    Properties,
    Tenants,
    Leases,
    Maintenance,
}

impl Tab for RealEstateTab {
    const ALL: &'static [Self] = &[
        RealEstateTab::Dashboard,
        RealEstateTab::Properties,
        RealEstateTab::Tenants,
        RealEstateTab::Leases,
        RealEstateTab::Maintenance,
    ];

    fn label(&self) -> &'static str {
        match self {
            RealEstateTab::Dashboard => "Tableau de bord",
            RealEstateTab::Properties => "Biens",
            RealEstateTab::Tenants => "Locataires",
            RealEstateTab::Leases => "Baux",
            RealEstateTab::Maintenance => "Maintenance",
        }
    }
}

/// Property form. Numeric fields are raw input; zero rooms means "not set".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDraft {
    pub address: String,
    pub kind: PropertyType,
    pub bedrooms: String,
    pub bathrooms: String,
    pub area: String,
    pub price: String,
    pub owner_name: String,
}

impl Draft for PropertyDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("address", self.address.as_str()),
            ("ownerName", self.owner_name.as_str()),
            ("area", self.area.as_str()),
        ]
    }
}

impl From<&Property> for PropertyDraft {
    fn from(property: &Property) -> Self {
        let rooms = |n: Option<u32>| n.map(|n| n.to_string()).unwrap_or_default();
        Self {
            address: property.address.clone(),
            kind: property.kind,
            bedrooms: rooms(property.bedrooms),
            bathrooms: rooms(property.bathrooms),
            area: property.area.to_string(),
            price: property.price.to_string(),
            owner_name: property.owner_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TenantDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Draft for TenantDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
        ]
    }
}

impl From<&Tenant> for TenantDraft {
    fn from(tenant: &Tenant) -> Self {
        Self {
            name: tenant.name.clone(),
            email: tenant.email.clone(),
            phone: tenant.phone.clone(),
        }
    }
}

/// Lease form. Property and tenant are fixed once the lease exists; edits
/// only change dates and amounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaseDraft {
    pub property_id: String,
    pub tenant_id: String,
    pub start_date: String,
    pub end_date: String,
    pub monthly_rent: String,
    pub deposit: String,
}

impl Draft for LeaseDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("propertyId", self.property_id.as_str()),
            ("tenantId", self.tenant_id.as_str()),
            ("startDate", self.start_date.as_str()),
            ("endDate", self.end_date.as_str()),
        ]
    }
}

impl From<&Lease> for LeaseDraft {
    fn from(lease: &Lease) -> Self {
        Self {
            property_id: lease.property_id.clone(),
            tenant_id: lease.tenant_id.clone(),
            start_date: format_date(&lease.start_date),
            end_date: format_date(&lease.end_date),
            monthly_rent: lease.monthly_rent.to_string(),
            deposit: lease.deposit.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenanceDraft {
    pub property_id: String,
    pub tenant_id: String,
    pub description: String,
    pub priority: Priority,
}

impl Draft for MaintenanceDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("propertyId", self.property_id.as_str()),
            ("tenantId", self.tenant_id.as_str()),
            ("description", self.description.as_str()),
        ]
    }
}

impl From<&MaintenanceRequest> for MaintenanceDraft {
    fn from(request: &MaintenanceRequest) -> Self {
        Self {
            property_id: request.property_id.clone(),
            tenant_id: request.tenant_id.clone(),
            description: request.description.clone(),
            priority: request.priority,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealEstateStats {
    pub total_properties: usize,
    pub available_properties: usize,
    pub rented_properties: usize,
    pub active_tenants: usize,
    /// Sum of active lease rents
    pub monthly_revenue: f64,
    /// Pending or in progress
    pub open_maintenance: usize,
}

pub struct RealEstateDashboard<S> {
    ctx: StoreContext<S>,
    properties: RecordStore<Property>,
    tenants: RecordStore<Tenant>,
    leases: RecordStore<Lease>,
    maintenance: RecordStore<MaintenanceRequest>,
    pub view: ViewState<RealEstateTab>,
    pub property_form: FormEditor<PropertyDraft>,
    pub tenant_form: FormEditor<TenantDraft>,
    pub lease_form: FormEditor<LeaseDraft>,
    pub maintenance_form: FormEditor<MaintenanceDraft>,
}

impl<S: KeyValueStore> RealEstateDashboard<S> {
    pub fn open(backend: S, config: &DashkitConfig) -> DashboardResult<Self> {
        let ctx = StoreContext::from_config(backend, &config.records);
        let seed = config.records.seed_samples;
        let now = Utc::now();

        let properties = open_store(&ctx, PROPERTIES_KEY, seed, || sample_properties(now))?;
        let tenants = open_store(&ctx, TENANTS_KEY, seed, sample_tenants)?;
        let leases = open_store(&ctx, LEASES_KEY, seed, sample_leases)?;
        let maintenance = open_store(&ctx, MAINTENANCE_KEY, seed, || sample_maintenance(now))?;

        Ok(Self {
            ctx,
            properties,
            tenants,
            leases,
            maintenance,
            view: ViewState::new(),
            property_form: FormEditor::new(),
            tenant_form: FormEditor::new(),
            lease_form: FormEditor::new(),
            maintenance_form: FormEditor::new(),
        })
    }

    pub fn context(&self) -> &StoreContext<S> {
        &self.ctx
    }

    pub fn properties(&self) -> &RecordStore<Property> {
        &self.properties
    }

    pub fn tenants(&self) -> &RecordStore<Tenant> {
        &self.tenants
    }

    pub fn leases(&self) -> &RecordStore<Lease> {
        &self.leases
    }

    pub fn maintenance(&self) -> &RecordStore<MaintenanceRequest> {
        &self.maintenance
    }

    pub fn reload(&mut self) -> StoreResult<()> {
        self.properties.reload(&self.ctx)?;
        self.tenants.reload(&self.ctx)?;
        self.leases.reload(&self.ctx)?;
        self.maintenance.reload(&self.ctx)
    }

    // -- Properties --

    pub fn edit_property(&mut self, id: &str) -> bool {
        match self.properties.get(id) {
            Some(property) => {
                self.property_form.open_edit(id, PropertyDraft::from(property));
                true
            }
            None => false,
        }
    }

    pub fn submit_property(&mut self) -> DashboardResult<Option<Property>> {
        let submission = self.property_form.submit()?;
        let result = self.commit_property(submission.clone());
        if result.is_err() {
            self.property_form.restore(submission);
        }
        result
    }

    /// Create or update a property. New properties start `available`.
    pub fn commit_property(
        &mut self,
        submission: Submission<PropertyDraft>,
    ) -> DashboardResult<Option<Property>> {
        let draft = submission.draft();
        draft.validate()?;
        let area = require_positive("area", parse_number(&draft.area))?;
        let rooms = |raw: &str| Some(parse_count(raw)).filter(|n| *n > 0);
        let bedrooms = rooms(&draft.bedrooms);
        let bathrooms = rooms(&draft.bathrooms);
        let price = parse_number(&draft.price);

        match &submission {
            Submission::Create(draft) => {
                let property = Property {
                    id: String::new(),
                    address: draft.address.trim().to_string(),
                    kind: draft.kind,
                    bedrooms,
                    bathrooms,
                    area,
                    price,
                    status: PropertyStatus::Available,
                    tenant_id: None,
                    tenant_name: None,
                    owner_id: self.ctx.next_id(),
                    owner_name: draft.owner_name.trim().to_string(),
                    images: Vec::new(),
                    description: None,
                    features: Vec::new(),
                    created_at: Utc::now(),
                };
                let property = self.properties.create(&self.ctx, property)?;
                tracing::info!(id = %property.id, "Created property");
                Ok(Some(property))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.properties.get(id) else {
                    return Ok(None);
                };
                let updated = Property {
                    address: draft.address.trim().to_string(),
                    kind: draft.kind,
                    bedrooms,
                    bathrooms,
                    area,
                    price,
                    owner_name: draft.owner_name.trim().to_string(),
                    ..existing.clone()
                };
                self.properties.update(&self.ctx, id, updated.clone())?;
                Ok(Some(updated))
            }
        }
    }

    pub fn set_property_status(&mut self, id: &str, status: PropertyStatus) -> DashboardResult<bool> {
        Ok(self.properties.modify(&self.ctx, id, |p| p.status = status)?)
    }

    pub fn delete_property(&mut self, id: &str) -> DashboardResult<bool> {
        let removed = self.properties.delete(&self.ctx, id)?;
        if removed.is_some() {
            tracing::info!(id, "Deleted property");
        }
        Ok(removed.is_some())
    }

    pub fn search_properties(&self, query: &str) -> Vec<&Property> {
        self.properties.search(query)
    }

    // -- Tenants --

    pub fn edit_tenant(&mut self, id: &str) -> bool {
        match self.tenants.get(id) {
            Some(tenant) => {
                self.tenant_form.open_edit(id, TenantDraft::from(tenant));
                true
            }
            None => false,
        }
    }

    pub fn submit_tenant(&mut self) -> DashboardResult<Option<Tenant>> {
        let submission = self.tenant_form.submit()?;
        let result = self.commit_tenant(submission.clone());
        if result.is_err() {
            self.tenant_form.restore(submission);
        }
        result
    }

    /// Create or update a tenant. New tenants start `pending`.
    pub fn commit_tenant(
        &mut self,
        submission: Submission<TenantDraft>,
    ) -> DashboardResult<Option<Tenant>> {
        submission.draft().validate()?;

        match &submission {
            Submission::Create(draft) => {
                let tenant = Tenant {
                    id: String::new(),
                    name: draft.name.trim().to_string(),
                    email: draft.email.trim().to_string(),
                    phone: draft.phone.trim().to_string(),
                    property_id: None,
                    property_address: None,
                    lease_id: None,
                    status: TenantStatus::Pending,
                    join_date: Utc::now(),
                    monthly_rent: None,
                };
                let tenant = self.tenants.create(&self.ctx, tenant)?;
                tracing::info!(id = %tenant.id, "Created tenant");
                Ok(Some(tenant))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.tenants.get(id) else {
                    return Ok(None);
                };
                let updated = Tenant {
                    name: draft.name.trim().to_string(),
                    email: draft.email.trim().to_string(),
                    phone: draft.phone.trim().to_string(),
                    ..existing.clone()
                };
                self.tenants.update(&self.ctx, id, updated.clone())?;
                Ok(Some(updated))
            }
        }
    }

    /// Delete a tenant and release every property pointing at them.
    pub fn delete_tenant(&mut self, id: &str) -> DashboardResult<bool> {
        let Some(tenant) = self.tenants.delete(&self.ctx, id)? else {
            return Ok(false);
        };
        let released = self.properties.modify_where(
            &self.ctx,
            |p| p.tenant_id.as_deref() == Some(tenant.id.as_str()),
            Property::release,
        )?;
        tracing::info!(id, released, "Deleted tenant");
        Ok(true)
    }

    pub fn search_tenants(&self, query: &str) -> Vec<&Tenant> {
        self.tenants.search(query)
    }

    // -- Leases --

    pub fn edit_lease(&mut self, id: &str) -> bool {
        match self.leases.get(id) {
            Some(lease) => {
                self.lease_form.open_edit(id, LeaseDraft::from(lease));
                true
            }
            None => false,
        }
    }

    pub fn submit_lease(&mut self) -> DashboardResult<Option<Lease>> {
        let submission = self.lease_form.submit()?;
        let result = self.commit_lease(submission.clone());
        if result.is_err() {
            self.lease_form.restore(submission);
        }
        result
    }

    /// Create or update a lease. Creating one marks the property rented and
    /// the tenant active.
    pub fn commit_lease(&mut self, submission: Submission<LeaseDraft>) -> DashboardResult<Option<Lease>> {
        let draft = submission.draft();
        draft.validate()?;
        let start_date = parse_required_date("startDate", &draft.start_date)?;
        let end_date = parse_required_date("endDate", &draft.end_date)?;
        let monthly_rent = parse_number(&draft.monthly_rent);
        let deposit = parse_number(&draft.deposit);

        match &submission {
            Submission::Create(draft) => {
                let property = require(&self.properties, "propertyId", draft.property_id.trim())?;
                let tenant = require(&self.tenants, "tenantId", draft.tenant_id.trim())?;
                let lease = Lease {
                    id: String::new(),
                    property_id: property.id.clone(),
                    property_address: property.address.clone(),
                    tenant_id: tenant.id.clone(),
                    tenant_name: tenant.name.clone(),
                    start_date,
                    end_date,
                    monthly_rent,
                    deposit,
                    status: LeaseStatus::Active,
                    payment_status: PaymentStatus::Pending,
                };
                let lease = self.leases.create(&self.ctx, lease)?;
                self.occupy(&lease)?;
                tracing::info!(id = %lease.id, property = %lease.property_id, tenant = %lease.tenant_id, "Created lease");
                Ok(Some(lease))
            }
            Submission::Update { id, .. } => {
                let Some(existing) = self.leases.get(id) else {
                    return Ok(None);
                };
                let updated = Lease {
                    start_date,
                    end_date,
                    monthly_rent,
                    deposit,
                    ..existing.clone()
                };
                self.leases.update(&self.ctx, id, updated.clone())?;
                if updated.status == LeaseStatus::Active {
                    self.tenants.modify_where(
                        &self.ctx,
                        |t| t.lease_id.as_deref() == Some(updated.id.as_str()),
                        |t| t.monthly_rent = Some(monthly_rent),
                    )?;
                }
                Ok(Some(updated))
            }
        }
    }

    fn occupy(&mut self, lease: &Lease) -> StoreResult<()> {
        self.properties.modify(&self.ctx, &lease.property_id, |p| {
            p.status = PropertyStatus::Rented;
            p.tenant_id = Some(lease.tenant_id.clone());
            p.tenant_name = Some(lease.tenant_name.clone());
        })?;
        self.tenants.modify(&self.ctx, &lease.tenant_id, |t| {
            t.status = TenantStatus::Active;
            t.lease_id = Some(lease.id.clone());
            t.property_id = Some(lease.property_id.clone());
            t.property_address = Some(lease.property_address.clone());
            t.monthly_rent = Some(lease.monthly_rent);
        })?;
        Ok(())
    }

    /// Delete a lease, releasing its property and tenant. Other properties
    /// and tenants are untouched.
    pub fn delete_lease(&mut self, id: &str) -> DashboardResult<bool> {
        let Some(lease) = self.leases.delete(&self.ctx, id)? else {
            return Ok(false);
        };
        self.properties.modify_where(
            &self.ctx,
            |p| p.id == lease.property_id && p.tenant_id.as_deref() == Some(lease.tenant_id.as_str()),
            Property::release,
        )?;
        self.tenants.modify_where(
            &self.ctx,
            |t| t.id == lease.tenant_id && t.lease_id.as_deref() == Some(lease.id.as_str()),
            Tenant::release,
        )?;
        tracing::info!(id, property = %lease.property_id, tenant = %lease.tenant_id, "Deleted lease");
        Ok(true)
    }

    pub fn set_payment_status(&mut self, id: &str, status: PaymentStatus) -> DashboardResult<bool> {
        Ok(self.leases.modify(&self.ctx, id, |l| l.payment_status = status)?)
    }

    pub fn search_leases(&self, query: &str) -> Vec<&Lease> {
        self.leases.search(query)
    }

    // -- Maintenance --

    pub fn edit_maintenance(&mut self, id: &str) -> bool {
        match self.maintenance.get(id) {
            Some(request) => {
                self.maintenance_form
                    .open_edit(id, MaintenanceDraft::from(request));
                true
            }
            None => false,
        }
    }

    pub fn submit_maintenance(&mut self) -> DashboardResult<Option<MaintenanceRequest>> {
        let submission = self.maintenance_form.submit()?;
        let result = self.commit_maintenance(submission.clone());
        if result.is_err() {
            self.maintenance_form.restore(submission);
        }
        result
    }

    pub fn commit_maintenance(
        &mut self,
        submission: Submission<MaintenanceDraft>,
    ) -> DashboardResult<Option<MaintenanceRequest>> {
        let draft = submission.draft();
        draft.validate()?;
        let property = require(&self.properties, "propertyId", draft.property_id.trim())?;
        let tenant = require(&self.tenants, "tenantId", draft.tenant_id.trim())?;

        match &submission {
            Submission::Create(draft) => {
                let request = MaintenanceRequest {
                    id: String::new(),
                    property_id: property.id.clone(),
                    property_address: property.address.clone(),
                    tenant_id: tenant.id.clone(),
                    tenant_name: tenant.name.clone(),
                    description: draft.description.trim().to_string(),
                    priority: draft.priority,
                    status: MaintenanceStatus::Pending,
                    created_at: Utc::now(),
                    completed_at: None,
                    cost: None,
                };
                let request = self.maintenance.create(&self.ctx, request)?;
                tracing::info!(id = %request.id, property = %request.property_id, "Created maintenance request");
                Ok(Some(request))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.maintenance.get(id) else {
                    return Ok(None);
                };
                let updated = MaintenanceRequest {
                    property_id: property.id.clone(),
                    property_address: property.address.clone(),
                    tenant_id: tenant.id.clone(),
                    tenant_name: tenant.name.clone(),
                    description: draft.description.trim().to_string(),
                    priority: draft.priority,
                    ..existing.clone()
                };
                self.maintenance.update(&self.ctx, id, updated.clone())?;
                Ok(Some(updated))
            }
        }
    }

    /// Move a request to `status`. Completing stamps `completedAt`.
    pub fn set_maintenance_status(
        &mut self,
        id: &str,
        status: MaintenanceStatus,
    ) -> DashboardResult<bool> {
        let now = Utc::now();
        Ok(self.maintenance.modify(&self.ctx, id, |request| {
            request.status = status;
            request.completed_at = (status == MaintenanceStatus::Completed).then_some(now);
        })?)
    }

    pub fn set_maintenance_cost(&mut self, id: &str, cost: f64) -> DashboardResult<bool> {
        Ok(self.maintenance.modify(&self.ctx, id, |r| r.cost = Some(cost))?)
    }

    pub fn delete_maintenance(&mut self, id: &str) -> DashboardResult<bool> {
        Ok(self.maintenance.delete(&self.ctx, id)?.is_some())
    }

    /// Pending and in-progress requests, most urgent first.
    pub fn open_maintenance(&self) -> Vec<&MaintenanceRequest> {
        let mut open = self.maintenance.filter(|r| r.status.is_open());
        open.sort_by(|a, b| b.priority.cmp(&a.priority));
        open
    }

    pub fn search_maintenance(&self, query: &str) -> Vec<&MaintenanceRequest> {
        self.maintenance.search(query)
    }

    // -- Dashboard --

    pub fn stats(&self) -> RealEstateStats {
        RealEstateStats {
            total_properties: self.properties.len(),
            available_properties: self
                .properties
                .count(|p| p.status == PropertyStatus::Available),
            rented_properties: self.properties.count(|p| p.status == PropertyStatus::Rented),
            active_tenants: self.tenants.count(|t| t.status == TenantStatus::Active),
            monthly_revenue: self
                .leases
                .list()
                .iter()
                .filter(|l| l.status == LeaseStatus::Active)
                .map(|l| l.monthly_rent)
                .sum(),
            open_maintenance: self.maintenance.count(|r| r.status.is_open()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::DashboardError;
    use crate::form::FormError;
    use crate::store::MemoryStore;

    fn setup_dashboard() -> RealEstateDashboard<MemoryStore> {
        RealEstateDashboard::open(MemoryStore::new(), &DashkitConfig::default()).unwrap()
    }

    fn lease_draft(property_id: &str, tenant_id: &str) -> LeaseDraft {
        LeaseDraft {
            property_id: property_id.into(),
            tenant_id: tenant_id.into(),
            start_date: "2024-02-01".into(),
            end_date: "2025-01-31".into(),
            monthly_rent: "800".into(),
            deposit: "1600".into(),
        }
    }

    #[test]
    fn test_seeded_stats() {
        let stats = setup_dashboard().stats();
        assert_eq!(stats.total_properties, 3);
        assert_eq!(stats.available_properties, 2);
        assert_eq!(stats.rented_properties, 1);
        assert_eq!(stats.active_tenants, 1);
        assert_eq!(stats.monthly_revenue, 500.0);
        assert_eq!(stats.open_maintenance, 2);
    }

    #[test]
    fn test_property_requires_positive_area() {
        let mut dashboard = setup_dashboard();
        dashboard.property_form.open_create();
        *dashboard.property_form.draft_mut() = PropertyDraft {
            address: "10 Rue Ben Boulaid, Batna".into(),
            owner_name: "Propriétaire 3".into(),
            area: "0".into(),
            ..PropertyDraft::default()
        };

        let result = dashboard.submit_property();
        assert!(matches!(
            result,
            Err(DashboardError::Form(FormError::NotPositive("area")))
        ));
        assert!(dashboard.property_form.is_open());

        dashboard.property_form.draft_mut().area = "85".into();
        let property = dashboard.submit_property().unwrap().unwrap();
        assert_eq!(property.status, PropertyStatus::Available);
        assert_eq!(property.bedrooms, None);
        assert_eq!(property.area, 85.0);
    }

    #[test]
    fn test_lease_create_cascade() {
        let mut dashboard = setup_dashboard();
        let lease = dashboard
            .commit_lease(Submission::Create(lease_draft("2", "2")))
            .unwrap()
            .unwrap();

        assert_eq!(lease.status, LeaseStatus::Active);
        assert_eq!(lease.payment_status, PaymentStatus::Pending);
        assert_eq!(lease.property_address, "456 Avenue Didouche Mourad, Oran");

        let property = dashboard.properties().get("2").unwrap();
        assert_eq!(property.status, PropertyStatus::Rented);
        assert_eq!(property.tenant_name.as_deref(), Some("Fatima Kadri"));

        let tenant = dashboard.tenants().get("2").unwrap();
        assert_eq!(tenant.status, TenantStatus::Active);
        assert_eq!(tenant.lease_id.as_deref(), Some(lease.id.as_str()));
        assert_eq!(tenant.monthly_rent, Some(800.0));

        let stats = dashboard.stats();
        assert_eq!(stats.monthly_revenue, 1300.0);
        assert_eq!(stats.active_tenants, 2);
    }

    #[test]
    fn test_lease_delete_cascade() {
        let mut dashboard = setup_dashboard();
        let untouched_property = dashboard.properties().get("3").unwrap().clone();
        let untouched_tenant = dashboard.tenants().get("2").unwrap().clone();

        assert!(dashboard.delete_lease("1").unwrap());

        let property = dashboard.properties().get("1").unwrap();
        assert_eq!(property.status, PropertyStatus::Available);
        assert!(property.tenant_id.is_none());
        assert!(property.tenant_name.is_none());

        let tenant = dashboard.tenants().get("1").unwrap();
        assert!(tenant.lease_id.is_none());
        assert!(tenant.property_id.is_none());
        assert!(tenant.monthly_rent.is_none());

        assert_eq!(dashboard.properties().get("3").unwrap(), &untouched_property);
        assert_eq!(dashboard.tenants().get("2").unwrap(), &untouched_tenant);
        assert!(!dashboard.delete_lease("1").unwrap());
    }

    #[test]
    fn test_tenant_delete_releases_property() {
        let mut dashboard = setup_dashboard();
        assert!(dashboard.delete_tenant("1").unwrap());

        let property = dashboard.properties().get("1").unwrap();
        assert_eq!(property.status, PropertyStatus::Available);
        assert!(property.tenant_id.is_none());
        assert_eq!(dashboard.tenants().len(), 1);
    }

    #[test]
    fn test_lease_unknown_tenant() {
        let mut dashboard = setup_dashboard();
        let result = dashboard.commit_lease(Submission::Create(lease_draft("2", "99")));
        assert!(matches!(
            result,
            Err(DashboardError::Form(FormError::UnknownReference { field: "tenantId", .. }))
        ));
        assert_eq!(dashboard.leases().len(), 1);
        assert_eq!(
            dashboard.properties().get("2").unwrap().status,
            PropertyStatus::Available
        );
    }

    #[test]
    fn test_lease_edit_syncs_rent() {
        let mut dashboard = setup_dashboard();
        assert!(dashboard.edit_lease("1"));
        dashboard.lease_form.draft_mut().monthly_rent = "650".into();
        let lease = dashboard.submit_lease().unwrap().unwrap();

        assert_eq!(lease.monthly_rent, 650.0);
        assert_eq!(lease.tenant_id, "1");
        assert_eq!(dashboard.tenants().get("1").unwrap().monthly_rent, Some(650.0));
    }

    #[test]
    fn test_complete_maintenance() {
        let mut dashboard = setup_dashboard();
        assert!(dashboard
            .set_maintenance_status("1", MaintenanceStatus::Completed)
            .unwrap());
        assert!(dashboard.maintenance().get("1").unwrap().completed_at.is_some());
        assert_eq!(dashboard.stats().open_maintenance, 1);

        dashboard
            .set_maintenance_status("1", MaintenanceStatus::InProgress)
            .unwrap();
        assert!(dashboard.maintenance().get("1").unwrap().completed_at.is_none());
    }

    #[test]
    fn test_open_maintenance_by_priority() {
        let mut dashboard = setup_dashboard();
        dashboard
            .commit_maintenance(Submission::Create(MaintenanceDraft {
                property_id: "1".into(),
                tenant_id: "1".into(),
                description: "Panne chauffe-eau".into(),
                priority: Priority::Urgent,
            }))
            .unwrap();

        let priorities: Vec<_> = dashboard.open_maintenance().iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![Priority::Urgent, Priority::High, Priority::Low]);
    }
}
