//! Clinic dashboard: patients, appointments and medical records.

use chrono::{DateTime, Utc};

use super::{open_store, require, DashboardResult};
use crate::config::DashkitConfig;
use crate::form::{parse_required_date, split_list, Draft, FormEditor, Submission};
use crate::models::clinic::{
    sample_appointments, sample_patients, sample_records, Appointment, AppointmentStatus,
    Gender, MedicalRecord, Patient, VisitType,
};
use crate::store::{format_date, KeyValueStore, RecordStore, StoreContext, StoreResult};
use crate::view::{Tab, ViewState};

pub const PATIENTS_KEY: &str = "clinic-patients";
pub const APPOINTMENTS_KEY: &str = "clinic-appointments";
pub const RECORDS_KEY: &str = "clinic-records";

/// Booking length when none is given.
pub const DEFAULT_APPOINTMENT_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClinicTab {
    #[default]
    Dashboard,
    Patients,
    Appointments,
    Records,
}

impl Tab for ClinicTab {
    const ALL: &'static [Self] = &[
        ClinicTab::Dashboard,
        ClinicTab::Patients,
        ClinicTab::Appointments,
        ClinicTab::Records,
    ];

    fn label(&self) -> &'static str {
        match self {
            ClinicTab::Dashboard => "Tableau de bord",
            ClinicTab::Patients => "Patients",
            ClinicTab::Appointments => "Rendez-vous",
            ClinicTab::Records => "Dossiers",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub address: String,
    pub city: String,
}

impl Draft for PatientDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("dateOfBirth", self.date_of_birth.as_str()),
            ("address", self.address.as_str()),
            ("city", self.city.as_str()),
        ]
    }
}

impl From<&Patient> for PatientDraft {
    fn from(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            email: patient.email.clone(),
            phone: patient.phone.clone(),
            date_of_birth: format_date(&patient.date_of_birth),
            gender: patient.gender,
            address: patient.address.clone(),
            city: patient.city.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentDraft {
    pub patient_id: String,
    pub date: String,
    pub time: String,
    pub reason: String,
    pub kind: VisitType,
    pub doctor: String,
}

impl Draft for AppointmentDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("patientId", self.patient_id.as_str()),
            ("date", self.date.as_str()),
            ("time", self.time.as_str()),
            ("reason", self.reason.as_str()),
            ("doctor", self.doctor.as_str()),
        ]
    }
}

impl From<&Appointment> for AppointmentDraft {
    fn from(appointment: &Appointment) -> Self {
        Self {
            patient_id: appointment.patient_id.clone(),
            date: format_date(&appointment.date),
            time: appointment.time.clone(),
            reason: appointment.reason.clone(),
            kind: appointment.kind,
            doctor: appointment.doctor.clone(),
        }
    }
}

/// Medical record form. List fields are comma-separated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordDraft {
    pub patient_id: String,
    pub date: String,
    pub chief_complaint: String,
    pub symptoms: String,
    pub diagnosis: String,
    pub treatment: String,
}

impl Draft for RecordDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("patientId", self.patient_id.as_str()),
            ("date", self.date.as_str()),
            ("chiefComplaint", self.chief_complaint.as_str()),
        ]
    }
}

impl From<&MedicalRecord> for RecordDraft {
    fn from(record: &MedicalRecord) -> Self {
        Self {
            patient_id: record.patient_id.clone(),
            date: format_date(&record.date),
            chief_complaint: record.chief_complaint.clone(),
            symptoms: record.symptoms.join(", "),
            diagnosis: record.diagnosis.join(", "),
            treatment: record.treatment.join(", "),
        }
    }
}

/// Figures for the dashboard tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClinicStats {
    pub patients: usize,
    pub scheduled_appointments: usize,
    pub today_appointments: usize,
    pub records: usize,
}

pub struct ClinicDashboard<S> {
    ctx: StoreContext<S>,
    patients: RecordStore<Patient>,
    appointments: RecordStore<Appointment>,
    records: RecordStore<MedicalRecord>,
    pub view: ViewState<ClinicTab>,
    pub patient_form: FormEditor<PatientDraft>,
    pub appointment_form: FormEditor<AppointmentDraft>,
    pub record_form: FormEditor<RecordDraft>,
}

impl<S: KeyValueStore> ClinicDashboard<S> {
    /// Open on `backend`, installing sample data on first use.
    pub fn open(backend: S, config: &DashkitConfig) -> DashboardResult<Self> {
        let ctx = StoreContext::from_config(backend, &config.records);
        let seed = config.records.seed_samples;
        let now = Utc::now();

        let patients = open_store(&ctx, PATIENTS_KEY, seed, sample_patients)?;
        let appointments = open_store(&ctx, APPOINTMENTS_KEY, seed, || sample_appointments(now))?;
        let records = open_store(&ctx, RECORDS_KEY, seed, sample_records)?;

        Ok(Self {
            ctx,
            patients,
            appointments,
            records,
            view: ViewState::new(),
            patient_form: FormEditor::new(),
            appointment_form: FormEditor::new(),
            record_form: FormEditor::new(),
        })
    }

    pub fn context(&self) -> &StoreContext<S> {
        &self.ctx
    }

    pub fn patients(&self) -> &RecordStore<Patient> {
        &self.patients
    }

    pub fn appointments(&self) -> &RecordStore<Appointment> {
        &self.appointments
    }

    pub fn records(&self) -> &RecordStore<MedicalRecord> {
        &self.records
    }

    /// Pick up writes made by another handle on the same storage.
    pub fn reload(&mut self) -> StoreResult<()> {
        self.patients.reload(&self.ctx)?;
        self.appointments.reload(&self.ctx)?;
        self.records.reload(&self.ctx)
    }

    // -- Patients --

    /// Open the patient form pre-filled from `id`. `false` if unknown.
    pub fn edit_patient(&mut self, id: &str) -> bool {
        match self.patients.get(id) {
            Some(patient) => {
                self.patient_form.open_edit(id, PatientDraft::from(patient));
                true
            }
            None => false,
        }
    }

    /// Submit the patient form. The form stays open if the commit fails.
    pub fn submit_patient(&mut self) -> DashboardResult<Option<Patient>> {
        let submission = self.patient_form.submit()?;
        let result = self.commit_patient(submission.clone());
        if result.is_err() {
            self.patient_form.restore(submission);
        }
        result
    }

    /// Create or update a patient. `None` when updating an id that no
    /// longer exists.
    pub fn commit_patient(
        &mut self,
        submission: Submission<PatientDraft>,
    ) -> DashboardResult<Option<Patient>> {
        let draft = submission.draft();
        draft.validate()?;
        let date_of_birth = parse_required_date("dateOfBirth", &draft.date_of_birth)?;

        match &submission {
            Submission::Create(draft) => {
                let patient = Patient {
                    id: String::new(),
                    name: draft.name.trim().to_string(),
                    email: draft.email.trim().to_string(),
                    phone: draft.phone.trim().to_string(),
                    date_of_birth,
                    gender: draft.gender,
                    address: draft.address.trim().to_string(),
                    city: draft.city.trim().to_string(),
                    postal_code: None,
                    blood_type: None,
                    allergies: Vec::new(),
                    chronic_conditions: Vec::new(),
                    medications: Vec::new(),
                    insurance_number: None,
                    insurance_provider: None,
                    emergency_contact: None,
                    emergency_phone: None,
                    occupation: None,
                    marital_status: None,
                    first_visit: Utc::now(),
                    last_visit: None,
                    total_visits: 0,
                    primary_doctor: None,
                    notes: None,
                };
                let patient = self.patients.create(&self.ctx, patient)?;
                tracing::info!(id = %patient.id, "Created patient");
                Ok(Some(patient))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.patients.get(id) else {
                    return Ok(None);
                };
                let updated = Patient {
                    name: draft.name.trim().to_string(),
                    email: draft.email.trim().to_string(),
                    phone: draft.phone.trim().to_string(),
                    date_of_birth,
                    gender: draft.gender,
                    address: draft.address.trim().to_string(),
                    city: draft.city.trim().to_string(),
                    ..existing.clone()
                };
                self.patients.update(&self.ctx, id, updated.clone())?;
                Ok(Some(updated))
            }
        }
    }

    pub fn delete_patient(&mut self, id: &str) -> DashboardResult<bool> {
        let removed = self.patients.delete(&self.ctx, id)?;
        if removed.is_some() {
            tracing::info!(id, "Deleted patient");
        }
        Ok(removed.is_some())
    }

    pub fn search_patients(&self, query: &str) -> Vec<&Patient> {
        self.patients.search(query)
    }

    // -- Appointments --

    pub fn edit_appointment(&mut self, id: &str) -> bool {
        match self.appointments.get(id) {
            Some(appointment) => {
                self.appointment_form
                    .open_edit(id, AppointmentDraft::from(appointment));
                true
            }
            None => false,
        }
    }

    pub fn submit_appointment(&mut self) -> DashboardResult<Option<Appointment>> {
        let submission = self.appointment_form.submit()?;
        let result = self.commit_appointment(submission.clone());
        if result.is_err() {
            self.appointment_form.restore(submission);
        }
        result
    }

    /// Create or update an appointment. Patient name and phone are copied
    /// from the referenced patient.
    pub fn commit_appointment(
        &mut self,
        submission: Submission<AppointmentDraft>,
    ) -> DashboardResult<Option<Appointment>> {
        let draft = submission.draft();
        draft.validate()?;
        let date = parse_required_date("date", &draft.date)?;
        let patient = require(&self.patients, "patientId", draft.patient_id.trim())?;
        let now = Utc::now();

        match &submission {
            Submission::Create(draft) => {
                let appointment = Appointment {
                    id: String::new(),
                    patient_id: patient.id.clone(),
                    patient_name: patient.name.clone(),
                    patient_phone: patient.phone.clone(),
                    date,
                    time: draft.time.trim().to_string(),
                    duration: DEFAULT_APPOINTMENT_MINUTES,
                    reason: draft.reason.trim().to_string(),
                    kind: draft.kind,
                    doctor: draft.doctor.trim().to_string(),
                    room: None,
                    status: AppointmentStatus::Scheduled,
                    notes: None,
                    reminder_sent: false,
                    created_at: now,
                    updated_at: None,
                };
                let appointment = self.appointments.create(&self.ctx, appointment)?;
                tracing::info!(id = %appointment.id, patient = %appointment.patient_id, "Booked appointment");
                Ok(Some(appointment))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.appointments.get(id) else {
                    return Ok(None);
                };
                let updated = Appointment {
                    patient_id: patient.id.clone(),
                    patient_name: patient.name.clone(),
                    patient_phone: patient.phone.clone(),
                    date,
                    time: draft.time.trim().to_string(),
                    reason: draft.reason.trim().to_string(),
                    kind: draft.kind,
                    doctor: draft.doctor.trim().to_string(),
                    updated_at: Some(now),
                    ..existing.clone()
                };
                self.appointments.update(&self.ctx, id, updated.clone())?;
                Ok(Some(updated))
            }
        }
    }

    /// Move an appointment to `status`, stamping `updatedAt`.
    pub fn set_appointment_status(
        &mut self,
        id: &str,
        status: AppointmentStatus,
    ) -> DashboardResult<bool> {
        let now = Utc::now();
        let changed = self.appointments.modify(&self.ctx, id, |appointment| {
            appointment.status = status;
            appointment.updated_at = Some(now);
        })?;
        Ok(changed)
    }

    pub fn delete_appointment(&mut self, id: &str) -> DashboardResult<bool> {
        Ok(self.appointments.delete(&self.ctx, id)?.is_some())
    }

    pub fn search_appointments(&self, query: &str) -> Vec<&Appointment> {
        self.appointments.search(query)
    }

    /// Scheduled appointments on the calendar day of `today`.
    pub fn appointments_on(&self, today: DateTime<Utc>) -> Vec<&Appointment> {
        self.appointments.filter(|a| a.is_scheduled_on(today))
    }

    /// All appointments of one patient.
    pub fn patient_appointments(&self, patient_id: &str) -> Vec<&Appointment> {
        self.appointments.filter(|a| a.patient_id == patient_id)
    }

    // -- Medical records --

    pub fn edit_record(&mut self, id: &str) -> bool {
        match self.records.get(id) {
            Some(record) => {
                self.record_form.open_edit(id, RecordDraft::from(record));
                true
            }
            None => false,
        }
    }

    pub fn submit_record(&mut self) -> DashboardResult<Option<MedicalRecord>> {
        let submission = self.record_form.submit()?;
        let result = self.commit_record(submission.clone());
        if result.is_err() {
            self.record_form.restore(submission);
        }
        result
    }

    pub fn commit_record(
        &mut self,
        submission: Submission<RecordDraft>,
    ) -> DashboardResult<Option<MedicalRecord>> {
        let draft = submission.draft();
        draft.validate()?;
        let date = parse_required_date("date", &draft.date)?;
        let patient = require(&self.patients, "patientId", draft.patient_id.trim())?;

        match &submission {
            Submission::Create(draft) => {
                let record = MedicalRecord {
                    id: String::new(),
                    patient_id: patient.id.clone(),
                    patient_name: patient.name.clone(),
                    date,
                    visit_type: VisitType::Consultation,
                    chief_complaint: draft.chief_complaint.trim().to_string(),
                    symptoms: split_list(&draft.symptoms),
                    diagnosis: split_list(&draft.diagnosis),
                    treatment: split_list(&draft.treatment),
                    medications: Vec::new(),
                    vital_signs: None,
                    lab_tests: Vec::new(),
                    doctor: String::new(),
                    notes: None,
                    follow_up_date: None,
                    attachments: Vec::new(),
                };
                let record = self.records.create(&self.ctx, record)?;
                tracing::info!(id = %record.id, patient = %record.patient_id, "Created medical record");
                Ok(Some(record))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.records.get(id) else {
                    return Ok(None);
                };
                let updated = MedicalRecord {
                    patient_id: patient.id.clone(),
                    patient_name: patient.name.clone(),
                    date,
                    chief_complaint: draft.chief_complaint.trim().to_string(),
                    symptoms: split_list(&draft.symptoms),
                    diagnosis: split_list(&draft.diagnosis),
                    treatment: split_list(&draft.treatment),
                    ..existing.clone()
                };
                self.records.update(&self.ctx, id, updated.clone())?;
                Ok(Some(updated))
            }
        }
    }

    pub fn delete_record(&mut self, id: &str) -> DashboardResult<bool> {
        Ok(self.records.delete(&self.ctx, id)?.is_some())
    }

    pub fn search_records(&self, query: &str) -> Vec<&MedicalRecord> {
        self.records.search(query)
    }

    pub fn patient_records(&self, patient_id: &str) -> Vec<&MedicalRecord> {
        self.records.filter(|r| r.patient_id == patient_id)
    }

    // -- Dashboard --

    pub fn stats(&self) -> ClinicStats {
        self.stats_on(Utc::now())
    }

    pub fn stats_on(&self, today: DateTime<Utc>) -> ClinicStats {
        ClinicStats {
            patients: self.patients.len(),
            scheduled_appointments: self.appointments.count(Appointment::is_scheduled),
            today_appointments: self.appointments.count(|a| a.is_scheduled_on(today)),
            records: self.records.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormError;
    use crate::store::{ymd, MemoryStore};
    use crate::dashboards::DashboardError;

    fn setup_dashboard() -> ClinicDashboard<MemoryStore> {
        ClinicDashboard::open(MemoryStore::new(), &DashkitConfig::default()).unwrap()
    }

    fn empty_dashboard() -> ClinicDashboard<MemoryStore> {
        let mut config = DashkitConfig::default();
        config.records.seed_samples = false;
        ClinicDashboard::open(MemoryStore::new(), &config).unwrap()
    }

    fn ahmed_draft() -> PatientDraft {
        PatientDraft {
            name: "Ahmed Benali".into(),
            email: "ahmed@email.com".into(),
            phone: "+213 555 1234".into(),
            date_of_birth: "1985-05-15".into(),
            gender: Gender::Male,
            address: "123 Rue Didouche Mourad".into(),
            city: "Alger".into(),
        }
    }

    #[test]
    fn test_seeded_stats() {
        let dashboard = setup_dashboard();
        let stats = dashboard.stats();
        assert_eq!(stats.patients, 4);
        assert_eq!(stats.scheduled_appointments, 3);
        assert_eq!(stats.today_appointments, 1);
        assert_eq!(stats.records, 3);
    }

    #[test]
    fn test_create_first_patient() {
        let mut dashboard = empty_dashboard();
        assert!(dashboard.patients().is_empty());

        let before = Utc::now();
        dashboard.patient_form.open_create();
        *dashboard.patient_form.draft_mut() = ahmed_draft();
        let patient = dashboard.submit_patient().unwrap().unwrap();
        let after = Utc::now();

        assert_eq!(dashboard.patients().len(), 1);
        assert!(!patient.id.is_empty());
        assert_eq!(patient.total_visits, 0);
        assert!(patient.first_visit >= before && patient.first_visit <= after);
        assert!(!dashboard.patient_form.is_open());
    }

    #[test]
    fn test_missing_field_keeps_form_open() {
        let mut dashboard = empty_dashboard();
        dashboard.patient_form.open_create();
        dashboard.patient_form.draft_mut().name = "Ahmed".into();

        let result = dashboard.submit_patient();
        assert!(matches!(
            result,
            Err(DashboardError::Form(FormError::MissingField("email")))
        ));
        assert!(dashboard.patient_form.is_open());
        assert!(dashboard.patients().is_empty());
    }

    #[test]
    fn test_edit_patient_keeps_history() {
        let mut dashboard = setup_dashboard();
        assert!(dashboard.edit_patient("3"));
        dashboard.patient_form.draft_mut().city = "Sétif".into();

        let updated = dashboard.submit_patient().unwrap().unwrap();
        assert_eq!(updated.city, "Sétif");
        assert_eq!(updated.total_visits, 12);
        assert_eq!(updated.blood_type.as_deref(), Some("B+"));
        assert_eq!(dashboard.patients().get("3").unwrap().city, "Sétif");
    }

    #[test]
    fn test_update_vanished_patient_is_noop() {
        let mut dashboard = setup_dashboard();
        let result = dashboard
            .commit_patient(Submission::Update {
                id: "999".into(),
                draft: ahmed_draft(),
            })
            .unwrap();
        assert!(result.is_none());
        assert_eq!(dashboard.patients().len(), 4);
    }

    #[test]
    fn test_book_appointment_copies_patient() {
        let mut dashboard = setup_dashboard();
        let appointment = dashboard
            .commit_appointment(Submission::Create(AppointmentDraft {
                patient_id: "2".into(),
                date: "2024-03-04".into(),
                time: "08:30".into(),
                reason: "Vaccin grippe".into(),
                kind: VisitType::Vaccination,
                doctor: "Dr. Sarah Benali".into(),
            }))
            .unwrap()
            .unwrap();

        assert_eq!(appointment.patient_name, "Fatima Kadri");
        assert_eq!(appointment.patient_phone, "+213 555 5678");
        assert_eq!(appointment.duration, DEFAULT_APPOINTMENT_MINUTES);
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(dashboard.patient_appointments("2").len(), 2);
    }

    #[test]
    fn test_book_appointment_unknown_patient() {
        let mut dashboard = setup_dashboard();
        let result = dashboard.commit_appointment(Submission::Create(AppointmentDraft {
            patient_id: "42".into(),
            date: "2024-03-04".into(),
            time: "08:30".into(),
            reason: "Contrôle".into(),
            kind: VisitType::Checkup,
            doctor: "Dr. Sarah Benali".into(),
        }));
        assert!(matches!(
            result,
            Err(DashboardError::Form(FormError::UnknownReference { .. }))
        ));
        assert_eq!(dashboard.appointments().len(), 4);
    }

    #[test]
    fn test_status_change_stamps_updated_at() {
        let mut dashboard = setup_dashboard();
        assert!(dashboard
            .set_appointment_status("1", AppointmentStatus::Completed)
            .unwrap());
        let appointment = dashboard.appointments().get("1").unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Completed);
        assert!(appointment.updated_at.is_some());
        assert_eq!(dashboard.stats().scheduled_appointments, 2);
        assert!(!dashboard
            .set_appointment_status("nope", AppointmentStatus::Cancelled)
            .unwrap());
    }

    #[test]
    fn test_record_splits_lists() {
        let mut dashboard = setup_dashboard();
        let record = dashboard
            .commit_record(Submission::Create(RecordDraft {
                patient_id: "4".into(),
                date: "2024-02-01".into(),
                chief_complaint: "Maux de tête".into(),
                symptoms: "Céphalée, Nausée, ".into(),
                diagnosis: "Migraine".into(),
                treatment: String::new(),
            }))
            .unwrap()
            .unwrap();

        assert_eq!(record.patient_name, "Leila Amrani");
        assert_eq!(record.visit_type, VisitType::Consultation);
        assert_eq!(record.symptoms, vec!["Céphalée", "Nausée"]);
        assert!(record.treatment.is_empty());
        assert_eq!(record.date, ymd(2024, 2, 1));
    }

    #[test]
    fn test_invalid_record_date() {
        let mut dashboard = setup_dashboard();
        let result = dashboard.commit_record(Submission::Create(RecordDraft {
            patient_id: "4".into(),
            date: "hier".into(),
            chief_complaint: "Toux".into(),
            ..RecordDraft::default()
        }));
        assert!(matches!(
            result,
            Err(DashboardError::Form(FormError::InvalidDate { field: "date", .. }))
        ));
    }

    #[test]
    fn test_search_and_tabs() {
        let mut dashboard = setup_dashboard();
        dashboard.view.select(ClinicTab::Patients);
        dashboard.view.set_query("ORAN");
        let visible = dashboard.view.visible(dashboard.patients());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Fatima Kadri");

        dashboard.view.select(ClinicTab::Records);
        assert_eq!(dashboard.view.query(), "");
        assert_eq!(dashboard.search_records("diabète").len(), 1);
        assert_eq!(ClinicTab::ALL.len(), 4);
    }

    #[test]
    fn test_delete_then_reopen() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let config = DashkitConfig::default();
        let mut dashboard = ClinicDashboard::open(store.clone(), &config).unwrap();
        for id in ["1", "2", "3"] {
            assert!(dashboard.delete_record(id).unwrap());
        }
        assert!(!dashboard.delete_record("1").unwrap());

        let reopened = ClinicDashboard::open(store, &config).unwrap();
        assert!(reopened.records().is_empty());
        assert_eq!(reopened.patients().len(), 4);
    }
}
