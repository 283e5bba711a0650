//! End-to-end dashboard scenarios.

use chrono::Utc;

use dashkit_core::config::DashkitConfig;
use dashkit_core::dashboards::clinic::{ClinicTab, PatientDraft};
use dashkit_core::dashboards::realestate::{LeaseDraft, TenantDraft};
use dashkit_core::models::clinic::Gender;
use dashkit_core::models::realestate::{LeaseStatus, PropertyStatus, TenantStatus};
use dashkit_core::models::toys::PaymentMethod;
use dashkit_core::{
    ClinicDashboard, Database, FactoryDashboard, MemoryStore, PhysioDashboard,
    RealEstateDashboard, SocialDashboard, Submission, Tab, ToyStoreDashboard,
};

fn empty_config() -> DashkitConfig {
    let mut config = DashkitConfig::default();
    config.records.seed_samples = false;
    config
}

#[test]
fn test_first_patient_on_empty_clinic() {
    let mut clinic = ClinicDashboard::open(MemoryStore::new(), &empty_config()).unwrap();
    assert!(clinic.patients().is_empty());

    clinic.view.select(ClinicTab::Patients);
    clinic.patient_form.open_create();
    *clinic.patient_form.draft_mut() = PatientDraft {
        name: "Ahmed Benali".into(),
        email: "ahmed@email.com".into(),
        phone: "+213 555 1234".into(),
        date_of_birth: "1985-05-15".into(),
        gender: Gender::Male,
        address: "12 rue Didouche Mourad".into(),
        city: "Alger".into(),
    };

    let before = Utc::now();
    let patient = clinic.submit_patient().unwrap().unwrap();
    let after = Utc::now();

    assert_eq!(clinic.patients().len(), 1);
    assert!(!patient.id.is_empty());
    assert_eq!(patient.total_visits, 0);
    assert!(patient.first_visit >= before && patient.first_visit <= after);
    assert!(!clinic.patient_form.is_open());
    assert_eq!(clinic.view.visible(clinic.patients()).len(), 1);
}

#[test]
fn test_lease_lifecycle_from_empty() {
    let mut estate = RealEstateDashboard::open(MemoryStore::new(), &DashkitConfig::default()).unwrap();

    let tenant = estate
        .commit_tenant(Submission::Create(TenantDraft {
            name: "Farid Meziane".into(),
            email: "farid@email.com".into(),
            phone: "+213 555 7001".into(),
        }))
        .unwrap()
        .unwrap();
    assert_eq!(tenant.status, TenantStatus::Pending);

    let lease = estate
        .commit_lease(Submission::Create(LeaseDraft {
            property_id: "2".into(),
            tenant_id: tenant.id.clone(),
            start_date: "2024-03-01".into(),
            end_date: "2025-02-28".into(),
            monthly_rent: "65000".into(),
            deposit: "130000".into(),
        }))
        .unwrap()
        .unwrap();
    assert_eq!(lease.status, LeaseStatus::Active);

    let property = estate.properties().get("2").unwrap();
    assert_eq!(property.status, PropertyStatus::Rented);
    assert_eq!(property.tenant_id.as_deref(), Some(tenant.id.as_str()));
    let stored_tenant = estate.tenants().get(&tenant.id).unwrap();
    assert_eq!(stored_tenant.lease_id.as_deref(), Some(lease.id.as_str()));
    assert_eq!(stored_tenant.status, TenantStatus::Active);

    assert!(estate.delete_lease(&lease.id).unwrap());
    assert_eq!(
        estate.properties().get("2").unwrap().status,
        PropertyStatus::Available
    );
    assert!(estate.tenants().get(&tenant.id).unwrap().lease_id.is_none());
    // The seeded lease is untouched.
    assert_eq!(estate.properties().get("1").unwrap().status, PropertyStatus::Rented);
}

#[test]
fn test_register_sale_persists_across_reopen() {
    let db = Database::open_in_memory().unwrap();
    let config = DashkitConfig::default();

    let sale_id = {
        let mut store = ToyStoreDashboard::open(&db, &config).unwrap();
        store.cart.add("3", 2);
        store.cart.customer_id = Some("1".into());
        store.cart.payment_method = PaymentMethod::Cash;
        store.checkout().unwrap().id
    };

    let store = ToyStoreDashboard::open(&db, &config).unwrap();
    assert!(store.sales().get(&sale_id).is_some());
    assert_eq!(store.toys().get("3").unwrap().stock, 38);
    let customer = store.customers().get("1").unwrap();
    assert_eq!(customer.loyalty_points, 67 + 30);
    assert_eq!(customer.total_spent, 6700.0 + 3000.0);
}

#[test]
fn test_every_dashboard_opens_empty() {
    let backend = MemoryStore::new();
    let config = empty_config();

    assert_eq!(ClinicDashboard::open(&backend, &config).unwrap().stats().patients, 0);
    assert_eq!(
        RealEstateDashboard::open(&backend, &config).unwrap().stats().total_properties,
        0
    );
    assert_eq!(FactoryDashboard::open(&backend, &config).unwrap().stats().products, 0);
    assert_eq!(PhysioDashboard::open(&backend, &config).unwrap().stats().patients, 0);
    assert_eq!(SocialDashboard::open(&backend, &config).unwrap().stats().members, 0);
    assert_eq!(ToyStoreDashboard::open(&backend, &config).unwrap().stats().toys, 0);
}

#[test]
fn test_tab_switch_clears_search() {
    let mut clinic = ClinicDashboard::open(MemoryStore::new(), &DashkitConfig::default()).unwrap();
    clinic.view.set_query("zzz-no-match");
    assert!(clinic.view.visible(clinic.patients()).is_empty());

    clinic.view.select(ClinicTab::Appointments);
    assert_eq!(clinic.view.query(), "");
    assert_eq!(ClinicTab::ALL.len(), 4);
}
