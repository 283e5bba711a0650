//! Physiotherapy dashboard: patients, therapy sessions and exercise programs.
//!
//! Completing a session counts it on the patient. Deleting a patient drops
//! their still-scheduled sessions and deactivates their programs; completed
//! sessions stay as history.

use chrono::{DateTime, Utc};

use super::{open_store, require, DashboardResult};
use crate::config::DashkitConfig;
use crate::form::{
    non_empty, parse_count, parse_optional_date, parse_required_date, Draft, FormEditor,
    FormError, Submission,
};
use crate::models::physio::{
    sample_patients, sample_programs, sample_sessions, Exercise, ExerciseProgram, PhysioPatient,
    SessionStatus, SessionType, TherapySession,
};
use crate::store::{format_date, KeyValueStore, RecordStore, StoreContext, StoreResult};
use crate::view::{Tab, ViewState};

pub const PATIENTS_KEY: &str = "physio-patients";
pub const SESSIONS_KEY: &str = "physio-sessions";
pub const PROGRAMS_KEY: &str = "physio-programs";

/// Used when the duration field is blank or zero.
pub const DEFAULT_SESSION_MINUTES: u32 = 45;

/// Upper bound of the pain scale.
pub const MAX_PAIN: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhysioTab {
    #[default]
    Dashboard,
    Patients,
    Sessions,
    Programs,
}

impl Tab for PhysioTab {
    const ALL: &'static [Self] = &[
        PhysioTab::Dashboard,
        PhysioTab::Patients,
        PhysioTab::Sessions,
        PhysioTab::Programs,
    ];

    fn label(&self) -> &'static str {
        match self {
            PhysioTab::Dashboard => "Tableau de bord",
            PhysioTab::Patients => "Patients",
            PhysioTab::Sessions => "Séances",
            PhysioTab::Programs => "Programmes",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub condition: String,
    pub referring_doctor: String,
    pub notes: String,
}

impl Draft for PatientDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("name", self.name.as_str()),
            ("phone", self.phone.as_str()),
            ("condition", self.condition.as_str()),
        ]
    }
}

impl From<&PhysioPatient> for PatientDraft {
    fn from(patient: &PhysioPatient) -> Self {
        Self {
            name: patient.name.clone(),
            phone: patient.phone.clone(),
            email: patient.email.clone().unwrap_or_default(),
            condition: patient.condition.clone(),
            referring_doctor: patient.referring_doctor.clone().unwrap_or_default(),
            notes: patient.notes.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionDraft {
    pub patient_id: String,
    pub date: String,
    pub time: String,
    pub duration: String,
    pub kind: SessionType,
    pub therapist: String,
    pub notes: String,
}

impl Draft for SessionDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("patientId", self.patient_id.as_str()),
            ("date", self.date.as_str()),
            ("time", self.time.as_str()),
            ("therapist", self.therapist.as_str()),
        ]
    }
}

impl From<&TherapySession> for SessionDraft {
    fn from(session: &TherapySession) -> Self {
        Self {
            patient_id: session.patient_id.clone(),
            date: format_date(&session.date),
            time: session.time.clone(),
            duration: session.duration.to_string(),
            kind: session.kind,
            therapist: session.therapist.clone(),
            notes: session.notes.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramDraft {
    pub patient_id: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
}

impl Draft for ProgramDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("patientId", self.patient_id.as_str()),
            ("title", self.title.as_str()),
            ("startDate", self.start_date.as_str()),
        ]
    }
}

impl From<&ExerciseProgram> for ProgramDraft {
    fn from(program: &ExerciseProgram) -> Self {
        Self {
            patient_id: program.patient_id.clone(),
            title: program.title.clone(),
            start_date: format_date(&program.start_date),
            end_date: program.end_date.as_ref().map(format_date).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysioStats {
    pub patients: usize,
    pub upcoming_sessions: usize,
    pub completed_sessions: usize,
    pub active_programs: usize,
    /// Mean pain drop over completed sessions with both scores recorded.
    pub average_pain_relief: Option<f64>,
}

pub struct PhysioDashboard<S> {
    ctx: StoreContext<S>,
    patients: RecordStore<PhysioPatient>,
    sessions: RecordStore<TherapySession>,
    programs: RecordStore<ExerciseProgram>,
    pub view: ViewState<PhysioTab>,
    pub patient_form: FormEditor<PatientDraft>,
    pub session_form: FormEditor<SessionDraft>,
    pub program_form: FormEditor<ProgramDraft>,
}

impl<S: KeyValueStore> PhysioDashboard<S> {
    pub fn open(backend: S, config: &DashkitConfig) -> DashboardResult<Self> {
        let ctx = StoreContext::from_config(backend, &config.records);
        let seed = config.records.seed_samples;
        let now = Utc::now();

        let patients = open_store(&ctx, PATIENTS_KEY, seed, sample_patients)?;
        let sessions = open_store(&ctx, SESSIONS_KEY, seed, || sample_sessions(now))?;
        let programs = open_store(&ctx, PROGRAMS_KEY, seed, sample_programs)?;

        Ok(Self {
            ctx,
            patients,
            sessions,
            programs,
            view: ViewState::new(),
            patient_form: FormEditor::new(),
            session_form: FormEditor::new(),
            program_form: FormEditor::new(),
        })
    }

    pub fn patients(&self) -> &RecordStore<PhysioPatient> {
        &self.patients
    }

    pub fn sessions(&self) -> &RecordStore<TherapySession> {
        &self.sessions
    }

    pub fn programs(&self) -> &RecordStore<ExerciseProgram> {
        &self.programs
    }

    pub fn reload(&mut self) -> StoreResult<()> {
        self.patients.reload(&self.ctx)?;
        self.sessions.reload(&self.ctx)?;
        self.programs.reload(&self.ctx)
    }

    // -- Patients --

    pub fn edit_patient(&mut self, id: &str) -> bool {
        match self.patients.get(id) {
            Some(patient) => {
                self.patient_form.open_edit(id, PatientDraft::from(patient));
                true
            }
            None => false,
        }
    }

    pub fn submit_patient(&mut self) -> DashboardResult<Option<PhysioPatient>> {
        let submission = self.patient_form.submit()?;
        let result = self.commit_patient(submission.clone());
        if result.is_err() {
            self.patient_form.restore(submission);
        }
        result
    }

    pub fn commit_patient(
        &mut self,
        submission: Submission<PatientDraft>,
    ) -> DashboardResult<Option<PhysioPatient>> {
        let draft = submission.draft();
        draft.validate()?;

        match &submission {
            Submission::Create(draft) => {
                let patient = PhysioPatient {
                    id: String::new(),
                    name: draft.name.trim().to_string(),
                    phone: draft.phone.trim().to_string(),
                    email: non_empty(&draft.email),
                    condition: draft.condition.trim().to_string(),
                    referring_doctor: non_empty(&draft.referring_doctor),
                    total_sessions: 0,
                    last_session: None,
                    notes: non_empty(&draft.notes),
                    created_at: Utc::now(),
                };
                let patient = self.patients.create(&self.ctx, patient)?;
                tracing::info!(id = %patient.id, "Created physio patient");
                Ok(Some(patient))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.patients.get(id) else {
                    return Ok(None);
                };
                let updated = PhysioPatient {
                    name: draft.name.trim().to_string(),
                    phone: draft.phone.trim().to_string(),
                    email: non_empty(&draft.email),
                    condition: draft.condition.trim().to_string(),
                    referring_doctor: non_empty(&draft.referring_doctor),
                    notes: non_empty(&draft.notes),
                    ..existing.clone()
                };
                self.patients.update(&self.ctx, id, updated.clone())?;

                // Keep denormalized names in step.
                self.sessions.modify_where(
                    &self.ctx,
                    |s| s.patient_id == updated.id,
                    |s| s.patient_name = updated.name.clone(),
                )?;
                self.programs.modify_where(
                    &self.ctx,
                    |p| p.patient_id == updated.id,
                    |p| p.patient_name = updated.name.clone(),
                )?;
                Ok(Some(updated))
            }
        }
    }

    pub fn delete_patient(&mut self, id: &str) -> DashboardResult<bool> {
        if self.patients.delete(&self.ctx, id)?.is_none() {
            return Ok(false);
        }

        let upcoming: Vec<String> = self
            .sessions
            .filter(|s| s.patient_id == id && s.status == SessionStatus::Scheduled)
            .into_iter()
            .map(|s| s.id.clone())
            .collect();
        for session_id in &upcoming {
            self.sessions.delete(&self.ctx, session_id)?;
        }
        let deactivated = self.programs.modify_where(
            &self.ctx,
            |p| p.patient_id == id && p.active,
            |p| p.active = false,
        )?;

        tracing::info!(id, dropped_sessions = upcoming.len(), deactivated, "Deleted physio patient");
        Ok(true)
    }

    pub fn search_patients(&self, query: &str) -> Vec<&PhysioPatient> {
        self.patients.search(query)
    }

    // -- Sessions --

    pub fn edit_session(&mut self, id: &str) -> bool {
        match self.sessions.get(id) {
            Some(session) => {
                self.session_form.open_edit(id, SessionDraft::from(session));
                true
            }
            None => false,
        }
    }

    pub fn submit_session(&mut self) -> DashboardResult<Option<TherapySession>> {
        let submission = self.session_form.submit()?;
        let result = self.commit_session(submission.clone());
        if result.is_err() {
            self.session_form.restore(submission);
        }
        result
    }

    /// Book or reschedule a session. New sessions start out scheduled.
    pub fn commit_session(
        &mut self,
        submission: Submission<SessionDraft>,
    ) -> DashboardResult<Option<TherapySession>> {
        let draft = submission.draft();
        draft.validate()?;
        let date = parse_required_date("date", &draft.date)?;
        let patient = require(&self.patients, "patientId", draft.patient_id.trim())?;
        let duration = match parse_count(&draft.duration) {
            0 => DEFAULT_SESSION_MINUTES,
            minutes => minutes,
        };

        match &submission {
            Submission::Create(draft) => {
                let session = TherapySession {
                    id: String::new(),
                    patient_id: patient.id.clone(),
                    patient_name: patient.name.clone(),
                    date,
                    time: draft.time.trim().to_string(),
                    duration,
                    kind: draft.kind,
                    therapist: draft.therapist.trim().to_string(),
                    status: SessionStatus::Scheduled,
                    pain_before: None,
                    pain_after: None,
                    notes: non_empty(&draft.notes),
                };
                let session = self.sessions.create(&self.ctx, session)?;
                tracing::info!(id = %session.id, patient = %session.patient_id, "Booked session");
                Ok(Some(session))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.sessions.get(id) else {
                    return Ok(None);
                };
                let updated = TherapySession {
                    patient_id: patient.id.clone(),
                    patient_name: patient.name.clone(),
                    date,
                    time: draft.time.trim().to_string(),
                    duration,
                    kind: draft.kind,
                    therapist: draft.therapist.trim().to_string(),
                    notes: non_empty(&draft.notes),
                    ..existing.clone()
                };
                self.sessions.update(&self.ctx, id, updated.clone())?;
                Ok(Some(updated))
            }
        }
    }

    /// Mark a session completed with its pain scores (clamped to 0..=10) and
    /// count it on the patient. Returns false when the session is unknown or
    /// already completed.
    pub fn complete_session(
        &mut self,
        id: &str,
        pain_before: Option<u8>,
        pain_after: Option<u8>,
    ) -> DashboardResult<bool> {
        let Some(session) = self.sessions.get(id) else {
            return Ok(false);
        };
        if session.status == SessionStatus::Completed {
            return Ok(false);
        }
        let patient_id = session.patient_id.clone();
        let session_date = session.date;

        self.sessions.modify(&self.ctx, id, |s| {
            s.status = SessionStatus::Completed;
            s.pain_before = pain_before.map(|p| p.min(MAX_PAIN));
            s.pain_after = pain_after.map(|p| p.min(MAX_PAIN));
        })?;
        self.patients.modify(&self.ctx, &patient_id, |p| {
            p.total_sessions += 1;
            if p.last_session.map_or(true, |last| last < session_date) {
                p.last_session = Some(session_date);
            }
        })?;

        tracing::info!(id, patient = %patient_id, "Completed session");
        Ok(true)
    }

    /// Cancel or mark a no-show. Completion goes through
    /// [`complete_session`](Self::complete_session).
    pub fn set_session_status(&mut self, id: &str, status: SessionStatus) -> DashboardResult<bool> {
        if status == SessionStatus::Completed {
            return self.complete_session(id, None, None);
        }
        Ok(self.sessions.modify(&self.ctx, id, |s| s.status = status)?)
    }

    pub fn delete_session(&mut self, id: &str) -> DashboardResult<bool> {
        Ok(self.sessions.delete(&self.ctx, id)?.is_some())
    }

    /// Scheduled sessions from `today` on, soonest first.
    pub fn upcoming_sessions(&self, today: DateTime<Utc>) -> Vec<&TherapySession> {
        let start = today.date_naive();
        let mut upcoming = self.sessions.filter(|s| {
            s.status == SessionStatus::Scheduled && s.date.date_naive() >= start
        });
        upcoming.sort_by(|a, b| (a.date, &a.time).cmp(&(b.date, &b.time)));
        upcoming
    }

    pub fn patient_sessions(&self, patient_id: &str) -> Vec<&TherapySession> {
        self.sessions.filter(|s| s.patient_id == patient_id)
    }

    pub fn search_sessions(&self, query: &str) -> Vec<&TherapySession> {
        self.sessions.search(query)
    }

    // -- Programs --

    pub fn edit_program(&mut self, id: &str) -> bool {
        match self.programs.get(id) {
            Some(program) => {
                self.program_form.open_edit(id, ProgramDraft::from(program));
                true
            }
            None => false,
        }
    }

    pub fn submit_program(&mut self) -> DashboardResult<Option<ExerciseProgram>> {
        let submission = self.program_form.submit()?;
        let result = self.commit_program(submission.clone());
        if result.is_err() {
            self.program_form.restore(submission);
        }
        result
    }

    /// Create or update a program. Exercises are managed separately with
    /// [`add_exercise`](Self::add_exercise) and survive edits.
    pub fn commit_program(
        &mut self,
        submission: Submission<ProgramDraft>,
    ) -> DashboardResult<Option<ExerciseProgram>> {
        let draft = submission.draft();
        draft.validate()?;
        let start_date = parse_required_date("startDate", &draft.start_date)?;
        let end_date = parse_optional_date("endDate", &draft.end_date)?;
        let patient = require(&self.patients, "patientId", draft.patient_id.trim())?;

        match &submission {
            Submission::Create(draft) => {
                let program = ExerciseProgram {
                    id: String::new(),
                    patient_id: patient.id.clone(),
                    patient_name: patient.name.clone(),
                    title: draft.title.trim().to_string(),
                    exercises: Vec::new(),
                    start_date,
                    end_date,
                    active: true,
                };
                let program = self.programs.create(&self.ctx, program)?;
                tracing::info!(id = %program.id, "Created exercise program");
                Ok(Some(program))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.programs.get(id) else {
                    return Ok(None);
                };
                let updated = ExerciseProgram {
                    patient_id: patient.id.clone(),
                    patient_name: patient.name.clone(),
                    title: draft.title.trim().to_string(),
                    start_date,
                    end_date,
                    ..existing.clone()
                };
                self.programs.update(&self.ctx, id, updated.clone())?;
                Ok(Some(updated))
            }
        }
    }

    pub fn add_exercise(&mut self, program_id: &str, exercise: Exercise) -> DashboardResult<bool> {
        if exercise.name.trim().is_empty() {
            return Err(FormError::MissingField("name").into());
        }
        Ok(self
            .programs
            .modify(&self.ctx, program_id, |p| p.exercises.push(exercise))?)
    }

    /// Remove the exercise at `index`. False when either is out of range.
    pub fn remove_exercise(&mut self, program_id: &str, index: usize) -> DashboardResult<bool> {
        match self.programs.get(program_id) {
            Some(program) if index < program.exercises.len() => {}
            _ => return Ok(false),
        }
        Ok(self.programs.modify(&self.ctx, program_id, |p| {
            p.exercises.remove(index);
        })?)
    }

    /// Flip a program between active and paused. Returns the new state.
    pub fn toggle_program(&mut self, id: &str) -> DashboardResult<Option<bool>> {
        let mut active = None;
        self.programs.modify(&self.ctx, id, |p| {
            p.active = !p.active;
            active = Some(p.active);
        })?;
        Ok(active)
    }

    pub fn delete_program(&mut self, id: &str) -> DashboardResult<bool> {
        Ok(self.programs.delete(&self.ctx, id)?.is_some())
    }

    pub fn search_programs(&self, query: &str) -> Vec<&ExerciseProgram> {
        self.programs.search(query)
    }

    // -- Dashboard --

    pub fn stats(&self) -> PhysioStats {
        let reliefs: Vec<f64> = self
            .sessions
            .list()
            .iter()
            .filter(|s| s.status == SessionStatus::Completed)
            .filter_map(TherapySession::pain_relief)
            .map(f64::from)
            .collect();
        let average_pain_relief =
            (!reliefs.is_empty()).then(|| reliefs.iter().sum::<f64>() / reliefs.len() as f64);

        PhysioStats {
            patients: self.patients.len(),
            upcoming_sessions: self
                .sessions
                .count(|s| s.status == SessionStatus::Scheduled),
            completed_sessions: self
                .sessions
                .count(|s| s.status == SessionStatus::Completed),
            active_programs: self.programs.count(|p| p.active),
            average_pain_relief,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::DashboardError;
    use crate::store::{ymd, MemoryStore};

    fn setup_dashboard() -> PhysioDashboard<MemoryStore> {
        PhysioDashboard::open(MemoryStore::new(), &DashkitConfig::default()).unwrap()
    }

    fn session_draft(patient_id: &str) -> SessionDraft {
        SessionDraft {
            patient_id: patient_id.into(),
            date: "2024-03-04".into(),
            time: "14:00".into(),
            therapist: "Amina Ferhat".into(),
            ..SessionDraft::default()
        }
    }

    #[test]
    fn test_book_session_defaults() {
        let mut dashboard = setup_dashboard();
        dashboard.session_form.open_create();
        *dashboard.session_form.draft_mut() = session_draft("2");

        let session = dashboard.submit_session().unwrap().unwrap();
        assert_eq!(session.duration, DEFAULT_SESSION_MINUTES);
        assert_eq!(session.patient_name, "Rachid Mansouri");
        assert_eq!(session.status, SessionStatus::Scheduled);
        assert_eq!(session.kind, SessionType::Treatment);
    }

    #[test]
    fn test_unknown_patient_keeps_form_open() {
        let mut dashboard = setup_dashboard();
        dashboard.session_form.open_create();
        *dashboard.session_form.draft_mut() = session_draft("42");

        assert!(matches!(
            dashboard.submit_session(),
            Err(DashboardError::Form(FormError::UnknownReference { .. }))
        ));
        assert!(dashboard.session_form.is_open());
        assert_eq!(dashboard.sessions().len(), 2);
    }

    #[test]
    fn test_complete_session_counts_once() {
        let mut dashboard = setup_dashboard();
        let date = dashboard.sessions().get("2").unwrap().date;

        assert!(dashboard.complete_session("2", Some(7), Some(12)).unwrap());
        let session = dashboard.sessions().get("2").unwrap();
        assert_eq!(session.pain_after, Some(MAX_PAIN));
        let patient = dashboard.patients().get("2").unwrap();
        assert_eq!(patient.total_sessions, 1);
        assert_eq!(patient.last_session, Some(date));

        assert!(!dashboard.complete_session("2", None, None).unwrap());
        assert_eq!(dashboard.patients().get("2").unwrap().total_sessions, 1);
    }

    #[test]
    fn test_average_pain_relief() {
        let mut dashboard = setup_dashboard();
        assert_eq!(dashboard.stats().average_pain_relief, Some(3.0));

        dashboard.complete_session("2", Some(8), Some(7)).unwrap();
        let stats = dashboard.stats();
        assert_eq!(stats.average_pain_relief, Some(2.0));
        assert_eq!(stats.completed_sessions, 2);
        assert_eq!(stats.upcoming_sessions, 0);
    }

    #[test]
    fn test_rename_patient_updates_sessions() {
        let mut dashboard = setup_dashboard();
        assert!(dashboard.edit_patient("1"));
        dashboard.patient_form.draft_mut().name = "Nadia Belkacem-Saïdi".into();
        dashboard.submit_patient().unwrap();

        assert_eq!(
            dashboard.sessions().get("1").unwrap().patient_name,
            "Nadia Belkacem-Saïdi"
        );
        assert_eq!(
            dashboard.programs().get("1").unwrap().patient_name,
            "Nadia Belkacem-Saïdi"
        );
    }

    #[test]
    fn test_delete_patient_drops_upcoming() {
        let mut dashboard = setup_dashboard();
        assert!(dashboard.delete_patient("2").unwrap());
        assert!(dashboard.sessions().get("2").is_none());

        assert!(dashboard.delete_patient("1").unwrap());
        assert!(dashboard.sessions().get("1").is_some());
        assert!(!dashboard.programs().get("1").unwrap().active);
    }

    #[test]
    fn test_program_exercises() {
        let mut dashboard = setup_dashboard();
        let added = dashboard
            .add_exercise(
                "1",
                Exercise {
                    name: "Proprioception".into(),
                    sets: 2,
                    reps: 10,
                    frequency: "1x/jour".into(),
                },
            )
            .unwrap();
        assert!(added);
        assert_eq!(dashboard.programs().get("1").unwrap().exercises.len(), 3);

        assert!(dashboard.remove_exercise("1", 0).unwrap());
        assert!(!dashboard.remove_exercise("1", 5).unwrap());

        dashboard.edit_program("1");
        dashboard.program_form.draft_mut().title = "Cheville phase 2".into();
        let program = dashboard.submit_program().unwrap().unwrap();
        assert_eq!(program.exercises.len(), 2);

        assert_eq!(dashboard.toggle_program("1").unwrap(), Some(false));
        assert_eq!(dashboard.toggle_program("9").unwrap(), None);
    }

    #[test]
    fn test_upcoming_sessions_sorted() {
        let mut dashboard = setup_dashboard();
        let mut draft = session_draft("1");
        draft.date = format_date(&(Utc::now() + chrono::Duration::days(10)));
        dashboard.commit_session(Submission::Create(draft)).unwrap();

        let upcoming = dashboard.upcoming_sessions(Utc::now());
        let ids: Vec<&str> = upcoming.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], "2");
        assert!(dashboard.upcoming_sessions(ymd(2099, 1, 1)).is_empty());
    }
}
