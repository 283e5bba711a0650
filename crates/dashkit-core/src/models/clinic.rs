//! Clinic models: patients, appointments and medical records.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{ymd, Record};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

/// Kind of visit, shared by appointments and medical records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VisitType {
    #[default]
    Consultation,
    Followup,
    Emergency,
    Vaccination,
    Checkup,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

/// A clinic patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(with = "crate::store::date")]
    pub date_of_birth: DateTime<Utc>,
    pub gender: Gender,
    pub address: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
    /// Current prescriptions, free text (e.g. "Lisinopril 10mg - 1x/jour")
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<MaritalStatus>,
    /// Registration date
    #[serde(with = "crate::store::date")]
    pub first_visit: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::store::option_date"
    )]
    pub last_visit: Option<DateTime<Utc>>,
    pub total_visits: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_doctor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Patient {
    /// Age as shown on the patient card: difference of calendar years.
    pub fn age_on(&self, today: DateTime<Utc>) -> i32 {
        today.year() - self.date_of_birth.year()
    }
}

impl Record for Patient {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.city.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    /// Copied from the patient at booking time
    pub patient_name: String,
    pub patient_phone: String,
    #[serde(with = "crate::store::date")]
    pub date: DateTime<Utc>,
    /// Wall-clock slot, "HH:MM"
    pub time: String,
    /// Minutes
    pub duration: u32,
    pub reason: String,
    #[serde(rename = "type")]
    pub kind: VisitType,
    pub doctor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub reminder_sent: bool,
    #[serde(with = "crate::store::date")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::store::option_date"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Appointment {
    pub fn is_scheduled(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }

    /// Scheduled for the same calendar day as `today`.
    pub fn is_scheduled_on(&self, today: DateTime<Utc>) -> bool {
        self.is_scheduled() && self.date.date_naive() == today.date_naive()
    }
}

impl Record for Appointment {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.patient_name.as_str(),
            self.reason.as_str(),
            self.doctor.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub duration: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,
    /// Celsius
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<u32>,
    /// Kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Centimetres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabTest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::store::option_date"
    )]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    #[serde(with = "crate::store::date")]
    pub date: DateTime<Utc>,
    pub visit_type: VisitType,
    pub chief_complaint: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub diagnosis: Vec<String>,
    #[serde(default)]
    pub treatment: Vec<String>,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vital_signs: Option<VitalSigns>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lab_tests: Vec<LabTest>,
    #[serde(default)]
    pub doctor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::store::option_date"
    )]
    pub follow_up_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

impl Record for MedicalRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.patient_name.as_str(),
            self.chief_complaint.as_str(),
            self.doctor.as_str(),
        ];
        fields.extend(self.diagnosis.iter().map(String::as_str));
        fields
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Sample patients installed on first open.
pub fn sample_patients() -> Vec<Patient> {
    vec![
        Patient {
            id: "1".into(),
            name: "Ahmed Benali".into(),
            email: "ahmed@email.com".into(),
            phone: "+213 555 1234".into(),
            date_of_birth: ymd(1985, 5, 15),
            gender: Gender::Male,
            address: "123 Rue Didouche Mourad".into(),
            city: "Alger".into(),
            postal_code: Some("16000".into()),
            blood_type: Some("O+".into()),
            allergies: strings(&["Penicilline", "Aspirine"]),
            chronic_conditions: strings(&["Hypertension"]),
            medications: strings(&["Lisinopril 10mg - 1x/jour"]),
            insurance_number: Some("ASN-123456789".into()),
            insurance_provider: Some("CNAS".into()),
            emergency_contact: Some("Fatima Benali".into()),
            emergency_phone: Some("+213 555 1235".into()),
            occupation: Some("Ingénieur".into()),
            marital_status: Some(MaritalStatus::Married),
            first_visit: ymd(2023, 1, 15),
            last_visit: Some(ymd(2024, 1, 10)),
            total_visits: 8,
            primary_doctor: Some("Dr. Mohamed Amrani".into()),
            notes: Some("Patient régulier, bon suivi des traitements".into()),
        },
        Patient {
            id: "2".into(),
            name: "Fatima Kadri".into(),
            email: "fatima@email.com".into(),
            phone: "+213 555 5678".into(),
            date_of_birth: ymd(1990, 3, 20),
            gender: Gender::Female,
            address: "45 Boulevard de la République".into(),
            city: "Oran".into(),
            postal_code: Some("31000".into()),
            blood_type: Some("A+".into()),
            allergies: Vec::new(),
            chronic_conditions: Vec::new(),
            medications: Vec::new(),
            insurance_number: Some("ASN-987654321".into()),
            insurance_provider: Some("CASNOS".into()),
            emergency_contact: Some("Mohamed Kadri".into()),
            emergency_phone: Some("+213 555 5679".into()),
            occupation: Some("Enseignante".into()),
            marital_status: Some(MaritalStatus::Married),
            first_visit: ymd(2023, 6, 10),
            last_visit: Some(ymd(2024, 1, 15)),
            total_visits: 5,
            primary_doctor: Some("Dr. Sarah Benali".into()),
            notes: None,
        },
        Patient {
            id: "3".into(),
            name: "Omar Cherif".into(),
            email: "omar@email.com".into(),
            phone: "+213 555 9876".into(),
            date_of_birth: ymd(1978, 11, 8),
            gender: Gender::Male,
            address: "78 Avenue de la Liberté".into(),
            city: "Constantine".into(),
            postal_code: Some("25000".into()),
            blood_type: Some("B+".into()),
            allergies: strings(&["Iode"]),
            chronic_conditions: strings(&["Diabète Type 2"]),
            medications: strings(&["Metformine 500mg - 2x/jour"]),
            insurance_number: Some("ASN-456789123".into()),
            insurance_provider: Some("CNAS".into()),
            emergency_contact: Some("Leila Cherif".into()),
            emergency_phone: Some("+213 555 9877".into()),
            occupation: Some("Commerçant".into()),
            marital_status: Some(MaritalStatus::Married),
            first_visit: ymd(2022, 3, 20),
            last_visit: Some(ymd(2024, 1, 8)),
            total_visits: 12,
            primary_doctor: Some("Dr. Mohamed Amrani".into()),
            notes: Some("Diabète bien contrôlé, suivi trimestriel".into()),
        },
        Patient {
            id: "4".into(),
            name: "Leila Amrani".into(),
            email: "leila@email.com".into(),
            phone: "+213 555 2468".into(),
            date_of_birth: ymd(1995, 7, 22),
            gender: Gender::Female,
            address: "12 Rue des Martyrs".into(),
            city: "Tizi Ouzou".into(),
            postal_code: Some("15000".into()),
            blood_type: Some("O-".into()),
            allergies: Vec::new(),
            chronic_conditions: Vec::new(),
            medications: Vec::new(),
            insurance_number: Some("ASN-789123456".into()),
            insurance_provider: Some("CASNOS".into()),
            emergency_contact: Some("Yacine Amrani".into()),
            emergency_phone: Some("+213 555 2469".into()),
            occupation: Some("Étudiante".into()),
            marital_status: Some(MaritalStatus::Single),
            first_visit: ymd(2024, 1, 5),
            last_visit: Some(ymd(2024, 1, 5)),
            total_visits: 1,
            primary_doctor: Some("Dr. Sarah Benali".into()),
            notes: None,
        },
    ]
}

/// Sample appointments; upcoming ones are placed relative to `now`.
pub fn sample_appointments(now: DateTime<Utc>) -> Vec<Appointment> {
    let booking = |id: &str, patient: (&str, &str, &str), date: DateTime<Utc>, time: &str| Appointment {
        id: id.into(),
        patient_id: patient.0.into(),
        patient_name: patient.1.into(),
        patient_phone: patient.2.into(),
        date,
        time: time.into(),
        duration: 30,
        reason: String::new(),
        kind: VisitType::Followup,
        doctor: "Dr. Mohamed Amrani".into(),
        room: Some("Cabinet 1".into()),
        status: AppointmentStatus::Scheduled,
        notes: None,
        reminder_sent: false,
        created_at: now,
        updated_at: None,
    };

    let ahmed = ("1", "Ahmed Benali", "+213 555 1234");
    let fatima = ("2", "Fatima Kadri", "+213 555 5678");
    let omar = ("3", "Omar Cherif", "+213 555 9876");

    vec![
        Appointment {
            reason: "Consultation générale - Suivi hypertension".into(),
            reminder_sent: true,
            created_at: ymd(2024, 1, 15),
            ..booking("1", ahmed, now, "10:00")
        },
        Appointment {
            duration: 20,
            reason: "Suivi médical - Bilan annuel".into(),
            kind: VisitType::Checkup,
            doctor: "Dr. Sarah Benali".into(),
            room: Some("Cabinet 2".into()),
            created_at: ymd(2024, 1, 18),
            ..booking("2", fatima, now + Duration::days(1), "14:30")
        },
        Appointment {
            reason: "Suivi diabète - Contrôle glycémique".into(),
            created_at: ymd(2024, 1, 19),
            ..booking("3", omar, now + Duration::days(2), "09:00")
        },
        Appointment {
            duration: 25,
            reason: "Consultation - Contrôle tension".into(),
            kind: VisitType::Consultation,
            status: AppointmentStatus::Completed,
            notes: Some("Tension artérielle stable. Renouvellement prescription Lisinopril.".into()),
            reminder_sent: true,
            created_at: ymd(2024, 1, 8),
            updated_at: Some(ymd(2024, 1, 10)),
            ..booking("4", ahmed, ymd(2024, 1, 10), "10:30")
        },
    ]
}

/// Sample medical records installed on first open.
pub fn sample_records() -> Vec<MedicalRecord> {
    let lab = |name: &str, result: &str, date: DateTime<Utc>| LabTest {
        name: name.into(),
        result: Some(result.into()),
        date: Some(date),
    };

    vec![
        MedicalRecord {
            id: "1".into(),
            patient_id: "1".into(),
            patient_name: "Ahmed Benali".into(),
            date: ymd(2024, 1, 10),
            visit_type: VisitType::Consultation,
            chief_complaint: "Contrôle tension artérielle".into(),
            symptoms: Vec::new(),
            diagnosis: strings(&["Hypertension contrôlée"]),
            treatment: strings(&["Continuer traitement actuel"]),
            medications: vec![Medication {
                name: "Lisinopril".into(),
                dosage: "10mg".into(),
                duration: "1 comprimé/jour".into(),
            }],
            vital_signs: Some(VitalSigns {
                blood_pressure: Some("130/85 mmHg".into()),
                temperature: Some(36.6),
                heart_rate: Some(72),
                weight: Some(78.0),
                height: Some(175.0),
            }),
            lab_tests: Vec::new(),
            doctor: "Dr. Mohamed Amrani".into(),
            notes: Some(
                "Tension artérielle stable. Patient suit bien son traitement. Continuer surveillance mensuelle."
                    .into(),
            ),
            follow_up_date: Some(ymd(2024, 2, 10)),
            attachments: Vec::new(),
        },
        MedicalRecord {
            id: "2".into(),
            patient_id: "2".into(),
            patient_name: "Fatima Kadri".into(),
            date: ymd(2024, 1, 15),
            visit_type: VisitType::Checkup,
            chief_complaint: "Bilan de santé annuel".into(),
            symptoms: Vec::new(),
            diagnosis: strings(&["État de santé général bon"]),
            treatment: strings(&["Aucun traitement nécessaire"]),
            medications: Vec::new(),
            vital_signs: Some(VitalSigns {
                blood_pressure: Some("115/75 mmHg".into()),
                temperature: Some(36.5),
                heart_rate: Some(68),
                weight: Some(62.0),
                height: Some(165.0),
            }),
            lab_tests: vec![
                lab("Numération formule sanguine", "Normale", ymd(2024, 1, 15)),
                lab("Glycémie à jeun", "4.8 mmol/L", ymd(2024, 1, 15)),
                lab("Cholestérol total", "5.2 mmol/L", ymd(2024, 1, 15)),
            ],
            doctor: "Dr. Sarah Benali".into(),
            notes: Some(
                "Bilan complet excellent. Recommandations: activité physique régulière, alimentation équilibrée."
                    .into(),
            ),
            follow_up_date: None,
            attachments: Vec::new(),
        },
        MedicalRecord {
            id: "3".into(),
            patient_id: "3".into(),
            patient_name: "Omar Cherif".into(),
            date: ymd(2024, 1, 8),
            visit_type: VisitType::Followup,
            chief_complaint: "Suivi diabète".into(),
            symptoms: Vec::new(),
            diagnosis: strings(&["Diabète Type 2 bien contrôlé"]),
            treatment: strings(&["Maintenir régime alimentaire et activité physique"]),
            medications: vec![Medication {
                name: "Metformine".into(),
                dosage: "500mg".into(),
                duration: "2 comprimés/jour".into(),
            }],
            vital_signs: Some(VitalSigns {
                blood_pressure: Some("125/80 mmHg".into()),
                temperature: Some(36.7),
                heart_rate: Some(75),
                weight: Some(85.0),
                height: Some(180.0),
            }),
            lab_tests: vec![
                lab("HbA1c", "6.8%", ymd(2024, 1, 8)),
                lab("Glycémie à jeun", "6.2 mmol/L", ymd(2024, 1, 8)),
            ],
            doctor: "Dr. Mohamed Amrani".into(),
            notes: Some(
                "Diabète bien contrôlé. HbA1c dans la cible. Continuer surveillance trimestrielle.".into(),
            ),
            follow_up_date: Some(ymd(2024, 4, 8)),
            attachments: Vec::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_reads_browser_json() {
        let json = r#"{
            "id": "1700000000000",
            "name": "Karim Saadi",
            "email": "karim@email.com",
            "phone": "+213 555 0000",
            "dateOfBirth": "1988-02-01T00:00:00.000Z",
            "gender": "male",
            "address": "1 Rue Larbi Ben M'hidi",
            "city": "Alger",
            "firstVisit": "2024-03-01T09:15:00.000Z",
            "totalVisits": 0
        }"#;

        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.name, "Karim Saadi");
        assert!(patient.allergies.is_empty());
        assert!(patient.last_visit.is_none());
        assert_eq!(patient.age_on(ymd(2024, 6, 1)), 36);
    }

    #[test]
    fn test_appointment_wire_names() {
        let appointment = &sample_appointments(ymd(2024, 2, 1))[3];
        let value = serde_json::to_value(appointment).unwrap();
        assert_eq!(value["type"], "consultation");
        assert_eq!(value["status"], "completed");
        assert_eq!(value["patientName"], "Ahmed Benali");
        assert!(value.get("updatedAt").is_some());
    }

    #[test]
    fn test_status_no_show_tag() {
        let status: AppointmentStatus = serde_json::from_str("\"no_show\"").unwrap();
        assert_eq!(status, AppointmentStatus::NoShow);
    }

    #[test]
    fn test_scheduled_today() {
        let now = ymd(2024, 2, 1);
        let appointments = sample_appointments(now);
        let today: Vec<_> = appointments
            .iter()
            .filter(|a| a.is_scheduled_on(now))
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(today, vec!["1"]);
    }

    #[test]
    fn test_record_search_includes_diagnosis() {
        let records = sample_records();
        assert!(records[2].matches("type 2"));
        assert!(!records[1].matches("diabète"));
    }
}
