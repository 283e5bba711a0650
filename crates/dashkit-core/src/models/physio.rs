//! Physiotherapy models: patients, therapy sessions and exercise programs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{ymd, Record};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhysioPatient {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Condition being treated (e.g. "Entorse cheville")
    pub condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referring_doctor: Option<String>,
    /// Completed sessions
    pub total_sessions: u32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::store::option_date"
    )]
    pub last_session: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(with = "crate::store::date")]
    pub created_at: DateTime<Utc>,
}

impl Record for PhysioPatient {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.phone.as_str(),
            self.condition.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Assessment,
    #[default]
    Treatment,
    Followup,
    Rehabilitation,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TherapySession {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    #[serde(with = "crate::store::date")]
    pub date: DateTime<Utc>,
    pub time: String,
    /// Minutes
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: SessionType,
    pub therapist: String,
    pub status: SessionStatus,
    /// Pain score 0-10 reported before the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_before: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_after: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TherapySession {
    /// Pain reduction in points, when both scores were recorded.
    pub fn pain_relief(&self) -> Option<i16> {
        Some(i16::from(self.pain_before?) - i16::from(self.pain_after?))
    }
}

impl Record for TherapySession {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.patient_name.as_str(), self.therapist.as_str()]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    /// e.g. "2x/jour"
    pub frequency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseProgram {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub title: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(with = "crate::store::date")]
    pub start_date: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::store::option_date"
    )]
    pub end_date: Option<DateTime<Utc>>,
    pub active: bool,
}

impl Record for ExerciseProgram {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.patient_name.as_str()]
    }
}

pub fn sample_patients() -> Vec<PhysioPatient> {
    vec![
        PhysioPatient {
            id: "1".into(),
            name: "Nadia Belkacem".into(),
            phone: "+213 555 4101".into(),
            email: Some("nadia@email.com".into()),
            condition: "Entorse cheville droite".into(),
            referring_doctor: Some("Dr. Karim Ziani".into()),
            total_sessions: 4,
            last_session: Some(ymd(2024, 1, 16)),
            notes: None,
            created_at: ymd(2023, 12, 20),
        },
        PhysioPatient {
            id: "2".into(),
            name: "Rachid Mansouri".into(),
            phone: "+213 555 4102".into(),
            email: None,
            condition: "Lombalgie chronique".into(),
            referring_doctor: None,
            total_sessions: 0,
            last_session: None,
            notes: Some("Travail de bureau, posture à corriger".into()),
            created_at: ymd(2024, 1, 18),
        },
    ]
}

pub fn sample_sessions(now: DateTime<Utc>) -> Vec<TherapySession> {
    vec![
        TherapySession {
            id: "1".into(),
            patient_id: "1".into(),
            patient_name: "Nadia Belkacem".into(),
            date: ymd(2024, 1, 16),
            time: "11:00".into(),
            duration: 45,
            kind: SessionType::Rehabilitation,
            therapist: "Amina Ferhat".into(),
            status: SessionStatus::Completed,
            pain_before: Some(6),
            pain_after: Some(3),
            notes: Some("Bonne progression de la mobilité".into()),
        },
        TherapySession {
            id: "2".into(),
            patient_id: "2".into(),
            patient_name: "Rachid Mansouri".into(),
            date: now + chrono::Duration::days(1),
            time: "09:30".into(),
            duration: 60,
            kind: SessionType::Assessment,
            therapist: "Amina Ferhat".into(),
            status: SessionStatus::Scheduled,
            pain_before: None,
            pain_after: None,
            notes: None,
        },
    ]
}

pub fn sample_programs() -> Vec<ExerciseProgram> {
    vec![ExerciseProgram {
        id: "1".into(),
        patient_id: "1".into(),
        patient_name: "Nadia Belkacem".into(),
        title: "Renforcement cheville".into(),
        exercises: vec![
            Exercise {
                name: "Élévation sur pointes".into(),
                sets: 3,
                reps: 15,
                frequency: "2x/jour".into(),
            },
            Exercise {
                name: "Équilibre unipodal".into(),
                sets: 3,
                reps: 1,
                frequency: "1x/jour".into(),
            },
        ],
        start_date: ymd(2024, 1, 2),
        end_date: None,
        active: true,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pain_relief() {
        let sessions = sample_sessions(ymd(2024, 2, 1));
        assert_eq!(sessions[0].pain_relief(), Some(3));
        assert_eq!(sessions[1].pain_relief(), None);
    }

    #[test]
    fn test_session_type_wire_name() {
        let value = serde_json::to_value(&sample_sessions(ymd(2024, 2, 1))[0]).unwrap();
        assert_eq!(value["type"], "rehabilitation");
        assert_eq!(value["painBefore"], 6);
    }
}
