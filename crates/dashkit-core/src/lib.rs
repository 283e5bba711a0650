//! Dashkit Core Library
//!
//! Local-first business dashboards (clinic, real estate, factory,
//! physiotherapy, internal social network, toy store) over a string-keyed
//! key-value store.
//!
//! # Architecture
//!
//! ```text
//!   host UI (tabs, modals, search box)
//!          │
//!          ▼
//!   Dashboard ── ViewState<Tab> + FormEditor<Draft> per entity
//!          │  commit_* / delete_* / cascades
//!          ▼
//!   RecordStore<T> ── one JSON array per key ("clinic-patients", ...)
//!          │
//!          ▼
//!   StoreContext ── ids + write policy ──▶ KeyValueStore (SQLite | memory)
//! ```
//!
//! # Core Principle
//!
//! **Storage is always current.** Every mutation re-serializes the whole
//! collection and overwrites its key before returning.
//!
//! # Modules
//!
//! - [`store`]: Key-value backends, record stores, ids and write policies
//! - [`db`]: SQLite key-value backend
//! - [`models`]: Domain types, one module per dashboard
//! - [`dashboards`]: Dashboard contexts with forms, cascades and stats
//! - [`form`]: Modal editor state and lenient input parsing
//! - [`view`]: Tab and search state
//! - [`currency`]: Algerian dinar formatting
//! - [`config`] / [`logging`]: TOML configuration and tracing setup

pub mod config;
pub mod currency;
pub mod dashboards;
pub mod db;
pub mod form;
pub mod logging;
pub mod models;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use config::{load_config, DashkitConfig};
pub use dashboards::{
    ClinicDashboard, DashboardError, FactoryDashboard, PhysioDashboard, RealEstateDashboard,
    SocialDashboard, ToyStoreDashboard,
};
pub use db::Database;
pub use form::{Draft, FormEditor, FormError, Submission};
pub use store::{KeyValueStore, MemoryStore, Record, RecordStore, StoreContext, StoreError};
pub use view::{Tab, ViewState};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

use dashboards::clinic::{AppointmentDraft, PatientDraft};
use dashboards::realestate::LeaseDraft;
use models::clinic::{Appointment, Patient};
use models::realestate::{Lease, Property};
use models::toys::{Sale, Toy};

/// SQLite handle shared by every dashboard of a workspace.
pub type SharedDb = Arc<Mutex<Database>>;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DashkitError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for DashkitError {
    fn from(e: db::DbError) -> Self {
        DashkitError::StorageError(e.to_string())
    }
}

impl From<StoreError> for DashkitError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict { .. } => DashkitError::Conflict(e.to_string()),
            StoreError::Corrupt { .. } | StoreError::Serialize(_) => {
                DashkitError::SerializationError(e.to_string())
            }
            _ => DashkitError::StorageError(e.to_string()),
        }
    }
}

impl From<FormError> for DashkitError {
    fn from(e: FormError) -> Self {
        DashkitError::InvalidInput(e.to_string())
    }
}

impl From<DashboardError> for DashkitError {
    fn from(e: DashboardError) -> Self {
        match e {
            DashboardError::Store(e) => e.into(),
            DashboardError::Form(e) => e.into(),
            other => DashkitError::InvalidInput(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for DashkitError {
    fn from(e: config::ConfigError) -> Self {
        DashkitError::InvalidInput(e.to_string())
    }
}

impl From<logging::LoggingError> for DashkitError {
    fn from(e: logging::LoggingError) -> Self {
        DashkitError::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for DashkitError {
    fn from(e: serde_json::Error) -> Self {
        DashkitError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for DashkitError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DashkitError::StorageError(format!("Lock poisoned: {}", e))
    }
}

/// Counts cross the FFI as `u32`; anything larger saturates.
fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a workspace database at the given path.
#[uniffi::export]
pub fn open_workspace(path: String) -> Result<Arc<DashkitCore>, DashkitError> {
    let db = Database::open(&path)?;
    DashkitCore::with_database(db, &DashkitConfig::default())
}

/// Open a workspace from a TOML configuration file.
///
/// Also installs the `[logging]` subscriber. A host that already installed
/// one keeps it.
#[uniffi::export]
pub fn open_workspace_with_config(config_path: String) -> Result<Arc<DashkitCore>, DashkitError> {
    let config = load_config(&config_path)?;
    match logging::init_logging(&config.logging) {
        Ok(()) | Err(logging::LoggingError::Init(_)) => {}
        Err(e) => return Err(e.into()),
    }
    let db = config.storage.open()?;
    DashkitCore::with_database(db, &config)
}

/// Create an in-memory workspace (for testing).
#[uniffi::export]
pub fn open_workspace_in_memory() -> Result<Arc<DashkitCore>, DashkitError> {
    let db = Database::open_in_memory()?;
    DashkitCore::with_database(db, &DashkitConfig::default())
}

/// Format an amount in dinars, e.g. "1 234,5 د.ج".
#[uniffi::export]
pub fn format_amount(amount: f64) -> String {
    currency::format_currency(amount)
}

/// Compact amount for stat cards, e.g. "1.5M د.ج".
#[uniffi::export]
pub fn format_amount_short(amount: f64) -> String {
    currency::format_currency_short(amount)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe workspace wrapper for FFI.
#[derive(uniffi::Object)]
pub struct DashkitCore {
    db: SharedDb,
    clinic: Mutex<ClinicDashboard<SharedDb>>,
    real_estate: Mutex<RealEstateDashboard<SharedDb>>,
    toys: Mutex<ToyStoreDashboard<SharedDb>>,
}

impl DashkitCore {
    fn with_database(db: Database, config: &DashkitConfig) -> Result<Arc<Self>, DashkitError> {
        let db: SharedDb = Arc::new(Mutex::new(db));
        let clinic = ClinicDashboard::open(db.clone(), config)?;
        let real_estate = RealEstateDashboard::open(db.clone(), config)?;
        let toys = ToyStoreDashboard::open(db.clone(), config)?;
        tracing::info!("Opened dashkit workspace");
        Ok(Arc::new(Self {
            db,
            clinic: Mutex::new(clinic),
            real_estate: Mutex::new(real_estate),
            toys: Mutex::new(toys),
        }))
    }
}

#[uniffi::export]
impl DashkitCore {
    // =========================================================================
    // Workspace Operations
    // =========================================================================

    /// Re-read every collection, picking up writes from other handles.
    pub fn reload(&self) -> Result<(), DashkitError> {
        self.clinic.lock()?.reload()?;
        self.real_estate.lock()?.reload()?;
        self.toys.lock()?.reload()?;
        Ok(())
    }

    /// Raw JSON stored under `key`, for backup or debugging.
    pub fn export_collection(&self, key: String) -> Result<Option<String>, DashkitError> {
        Ok(self.db.get_item(&key)?)
    }

    /// All stored collection keys.
    pub fn collection_keys(&self) -> Result<Vec<String>, DashkitError> {
        Ok(self.db.keys()?)
    }

    // =========================================================================
    // Clinic Operations
    // =========================================================================

    /// Patients matching `query` (empty matches all).
    pub fn search_patients(&self, query: String) -> Result<Vec<FfiPatient>, DashkitError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.search_patients(&query).into_iter().map(FfiPatient::from).collect())
    }

    /// Register a new patient.
    pub fn create_patient(&self, input: FfiPatientInput) -> Result<FfiPatient, DashkitError> {
        let mut clinic = self.clinic.lock()?;
        let draft = PatientDraft {
            name: input.name,
            email: input.email,
            phone: input.phone,
            date_of_birth: input.date_of_birth,
            gender: parse_tag("gender", &input.gender)?,
            address: input.address,
            city: input.city,
        };
        let patient = clinic
            .commit_patient(Submission::Create(draft))?
            .ok_or_else(|| DashkitError::NotFound("patient".into()))?;
        Ok(FfiPatient::from(&patient))
    }

    pub fn delete_patient(&self, id: String) -> Result<bool, DashkitError> {
        Ok(self.clinic.lock()?.delete_patient(&id)?)
    }

    /// Book an appointment for an existing patient.
    pub fn book_appointment(
        &self,
        input: FfiAppointmentInput,
    ) -> Result<FfiAppointment, DashkitError> {
        let mut clinic = self.clinic.lock()?;
        let draft = AppointmentDraft {
            patient_id: input.patient_id,
            date: input.date,
            time: input.time,
            reason: input.reason,
            kind: parse_tag("type", &input.kind)?,
            doctor: input.doctor,
        };
        let appointment = clinic
            .commit_appointment(Submission::Create(draft))?
            .ok_or_else(|| DashkitError::NotFound("appointment".into()))?;
        Ok(FfiAppointment::from(&appointment))
    }

    /// Scheduled appointments for today.
    pub fn todays_appointments(&self) -> Result<Vec<FfiAppointment>, DashkitError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic
            .appointments_on(chrono::Utc::now())
            .into_iter()
            .map(FfiAppointment::from)
            .collect())
    }

    /// Set an appointment status ("scheduled", "completed", "no_show", ...).
    pub fn set_appointment_status(&self, id: String, status: String) -> Result<bool, DashkitError> {
        let status = parse_tag("status", &status)?;
        Ok(self.clinic.lock()?.set_appointment_status(&id, status)?)
    }

    pub fn clinic_stats(&self) -> Result<FfiClinicStats, DashkitError> {
        let stats = self.clinic.lock()?.stats();
        Ok(FfiClinicStats {
            patients: count(stats.patients),
            scheduled_appointments: count(stats.scheduled_appointments),
            today_appointments: count(stats.today_appointments),
            records: count(stats.records),
        })
    }

    // =========================================================================
    // Real Estate Operations
    // =========================================================================

    pub fn search_properties(&self, query: String) -> Result<Vec<FfiProperty>, DashkitError> {
        let real_estate = self.real_estate.lock()?;
        Ok(real_estate
            .search_properties(&query)
            .into_iter()
            .map(FfiProperty::from)
            .collect())
    }

    /// Sign a lease. The property becomes rented and the tenant active.
    pub fn create_lease(&self, input: FfiLeaseInput) -> Result<FfiLease, DashkitError> {
        let mut real_estate = self.real_estate.lock()?;
        let draft = LeaseDraft {
            property_id: input.property_id,
            tenant_id: input.tenant_id,
            start_date: input.start_date,
            end_date: input.end_date,
            monthly_rent: input.monthly_rent.to_string(),
            deposit: input.deposit.to_string(),
        };
        let lease = real_estate
            .commit_lease(Submission::Create(draft))?
            .ok_or_else(|| DashkitError::NotFound("lease".into()))?;
        Ok(FfiLease::from(&lease))
    }

    /// Delete a lease, releasing its property and tenant.
    pub fn delete_lease(&self, id: String) -> Result<bool, DashkitError> {
        Ok(self.real_estate.lock()?.delete_lease(&id)?)
    }

    pub fn real_estate_stats(&self) -> Result<FfiRealEstateStats, DashkitError> {
        let stats = self.real_estate.lock()?.stats();
        Ok(FfiRealEstateStats {
            total_properties: count(stats.total_properties),
            available_properties: count(stats.available_properties),
            rented_properties: count(stats.rented_properties),
            active_tenants: count(stats.active_tenants),
            monthly_revenue: stats.monthly_revenue,
            open_maintenance: count(stats.open_maintenance),
        })
    }

    // =========================================================================
    // Toy Store Operations
    // =========================================================================

    pub fn search_toys(&self, query: String) -> Result<Vec<FfiToy>, DashkitError> {
        let toys = self.toys.lock()?;
        Ok(toys.search_toys(&query).into_iter().map(FfiToy::from).collect())
    }

    /// Add to the register cart, merging with an existing line.
    pub fn cart_add(&self, toy_id: String, quantity: u32) -> Result<(), DashkitError> {
        let mut toys = self.toys.lock()?;
        if toys.toys().get(&toy_id).is_none() {
            return Err(DashkitError::NotFound(format!("toy {}", toy_id)));
        }
        toys.cart.add(&toy_id, quantity);
        Ok(())
    }

    pub fn cart_set_customer(&self, customer_id: Option<String>) -> Result<(), DashkitError> {
        self.toys.lock()?.cart.customer_id = customer_id;
        Ok(())
    }

    pub fn cart_set_payment_method(&self, method: String) -> Result<(), DashkitError> {
        let method = parse_tag("paymentMethod", &method)?;
        self.toys.lock()?.cart.payment_method = method;
        Ok(())
    }

    pub fn cart_clear(&self) -> Result<(), DashkitError> {
        self.toys.lock()?.cart.clear();
        Ok(())
    }

    pub fn cart_total(&self) -> Result<f64, DashkitError> {
        Ok(self.toys.lock()?.cart_total())
    }

    /// Ring up the cart.
    pub fn checkout(&self) -> Result<FfiSale, DashkitError> {
        let sale = self.toys.lock()?.checkout()?;
        Ok(FfiSale::from(&sale))
    }
}

/// Parse a snake_case enum tag the way stored JSON spells it.
fn parse_tag<T: DeserializeOwned>(field: &str, raw: &str) -> Result<T, DashkitError> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_string()))
        .map_err(|_| DashkitError::InvalidInput(format!("Unknown {}: {:?}", field, raw)))
}

/// The stored tag for an enum value.
fn tag<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

fn date(value: &chrono::DateTime<chrono::Utc>) -> String {
    store::format_date(value)
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: String,
    pub city: String,
    pub total_visits: u32,
}

impl From<&Patient> for FfiPatient {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id.clone(),
            name: patient.name.clone(),
            email: patient.email.clone(),
            phone: patient.phone.clone(),
            date_of_birth: date(&patient.date_of_birth),
            gender: tag(&patient.gender),
            city: patient.city.clone(),
            total_visits: patient.total_visits,
        }
    }
}

/// FFI-safe patient form input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// "YYYY-MM-DD"
    pub date_of_birth: String,
    pub gender: String,
    pub address: String,
    pub city: String,
}

/// FFI-safe appointment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub date: String,
    pub time: String,
    pub duration: u32,
    pub reason: String,
    pub kind: String,
    pub doctor: String,
    pub status: String,
}

impl From<&Appointment> for FfiAppointment {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id.clone(),
            patient_id: appointment.patient_id.clone(),
            patient_name: appointment.patient_name.clone(),
            date: date(&appointment.date),
            time: appointment.time.clone(),
            duration: appointment.duration,
            reason: appointment.reason.clone(),
            kind: tag(&appointment.kind),
            doctor: appointment.doctor.clone(),
            status: tag(&appointment.status),
        }
    }
}

/// FFI-safe appointment form input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointmentInput {
    pub patient_id: String,
    pub date: String,
    pub time: String,
    pub reason: String,
    pub kind: String,
    pub doctor: String,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinicStats {
    pub patients: u32,
    pub scheduled_appointments: u32,
    pub today_appointments: u32,
    pub records: u32,
}

/// FFI-safe property.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProperty {
    pub id: String,
    pub address: String,
    pub kind: String,
    pub area: f64,
    pub price: f64,
    pub status: String,
    pub tenant_name: Option<String>,
    pub owner_name: String,
}

impl From<&Property> for FfiProperty {
    fn from(property: &Property) -> Self {
        Self {
            id: property.id.clone(),
            address: property.address.clone(),
            kind: tag(&property.kind),
            area: property.area,
            price: property.price,
            status: tag(&property.status),
            tenant_name: property.tenant_name.clone(),
            owner_name: property.owner_name.clone(),
        }
    }
}

/// FFI-safe lease.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLease {
    pub id: String,
    pub property_id: String,
    pub property_address: String,
    pub tenant_id: String,
    pub tenant_name: String,
    pub start_date: String,
    pub end_date: String,
    pub monthly_rent: f64,
    pub deposit: f64,
    pub status: String,
    pub payment_status: String,
}

impl From<&Lease> for FfiLease {
    fn from(lease: &Lease) -> Self {
        Self {
            id: lease.id.clone(),
            property_id: lease.property_id.clone(),
            property_address: lease.property_address.clone(),
            tenant_id: lease.tenant_id.clone(),
            tenant_name: lease.tenant_name.clone(),
            start_date: date(&lease.start_date),
            end_date: date(&lease.end_date),
            monthly_rent: lease.monthly_rent,
            deposit: lease.deposit,
            status: tag(&lease.status),
            payment_status: tag(&lease.payment_status),
        }
    }
}

/// FFI-safe lease form input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLeaseInput {
    pub property_id: String,
    pub tenant_id: String,
    pub start_date: String,
    pub end_date: String,
    pub monthly_rent: f64,
    pub deposit: f64,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRealEstateStats {
    pub total_properties: u32,
    pub available_properties: u32,
    pub rented_properties: u32,
    pub active_tenants: u32,
    pub monthly_revenue: f64,
    pub open_maintenance: u32,
}

/// FFI-safe toy.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiToy {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub sku: String,
    pub price: f64,
    pub stock: u32,
    pub low_stock: bool,
}

impl From<&Toy> for FfiToy {
    fn from(toy: &Toy) -> Self {
        Self {
            id: toy.id.clone(),
            name: toy.name.clone(),
            brand: toy.brand.clone(),
            sku: toy.sku.clone(),
            price: toy.price,
            stock: toy.stock,
            low_stock: toy.is_low_stock(),
        }
    }
}

/// FFI-safe sale line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSaleItem {
    pub toy_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// FFI-safe sale.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSale {
    pub id: String,
    pub customer_name: Option<String>,
    pub items: Vec<FfiSaleItem>,
    pub total: f64,
    pub payment_method: String,
    pub points_earned: u32,
    pub date: String,
}

impl From<&Sale> for FfiSale {
    fn from(sale: &Sale) -> Self {
        Self {
            id: sale.id.clone(),
            customer_name: sale.customer_name.clone(),
            items: sale
                .items
                .iter()
                .map(|item| FfiSaleItem {
                    toy_id: item.toy_id.clone(),
                    name: item.name.clone(),
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
            total: sale.total,
            payment_method: tag(&sale.payment_method),
            points_earned: sale.points_earned,
            date: date(&sale.date),
        }
    }
}
