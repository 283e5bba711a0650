//! Form/modal editor state.
//!
//! A draft holds raw form input (strings) mirroring an entity. Validation only
//! checks required fields; parsing into the real entity happens at commit time
//! in each dashboard.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::store::parse_date;

/// Form errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid date in {field}: {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("Unknown {field}: {id}")]
    UnknownReference { field: &'static str, id: String },

    #[error("No form is open")]
    NotOpen,
}

/// Raw form state for one entity type.
pub trait Draft: Default + Clone {
    /// `(field name, raw value)` for every required field.
    fn required_fields(&self) -> Vec<(&'static str, &str)>;

    /// First empty (or whitespace-only) required field, if any.
    fn validate(&self) -> Result<(), FormError> {
        match self
            .required_fields()
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            Some((field, _)) => Err(FormError::MissingField(field)),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Closed,
    Creating,
    Editing(String),
}

/// What a successful submit asks the dashboard to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<D> {
    Create(D),
    Update { id: String, draft: D },
}

impl<D> Submission<D> {
    pub fn draft(&self) -> &D {
        match self {
            Submission::Create(draft) => draft,
            Submission::Update { draft, .. } => draft,
        }
    }
}

/// Modal editor around a draft.
#[derive(Debug, Clone, Default)]
pub struct FormEditor<D> {
    mode: EditorMode,
    draft: D,
}

impl<D: Draft> FormEditor<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != EditorMode::Closed
    }

    /// Open with an empty template.
    pub fn open_create(&mut self) {
        self.mode = EditorMode::Creating;
        self.draft = D::default();
    }

    /// Open pre-filled from an existing entity.
    pub fn open_edit(&mut self, id: impl Into<String>, draft: D) {
        self.mode = EditorMode::Editing(id.into());
        self.draft = draft;
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn validate(&self) -> Result<(), FormError> {
        self.draft.validate()
    }

    /// Discard the draft and close.
    pub fn cancel(&mut self) {
        self.mode = EditorMode::Closed;
        self.draft = D::default();
    }

    /// Validate and hand the draft over. On failure the editor stays open
    /// with its draft intact; on success it closes and resets.
    pub fn submit(&mut self) -> Result<Submission<D>, FormError> {
        if !self.is_open() {
            return Err(FormError::NotOpen);
        }
        self.draft.validate()?;

        let draft = std::mem::take(&mut self.draft);
        let submission = match std::mem::take(&mut self.mode) {
            EditorMode::Editing(id) => Submission::Update { id, draft },
            _ => Submission::Create(draft),
        };
        Ok(submission)
    }

    /// Reopen with a submission the dashboard could not commit.
    pub fn restore(&mut self, submission: Submission<D>) {
        let (mode, draft) = match submission {
            Submission::Create(draft) => (EditorMode::Creating, draft),
            Submission::Update { id, draft } => (EditorMode::Editing(id), draft),
        };
        self.mode = mode;
        self.draft = draft;
    }
}

/// Lenient number parse: anything unparsable becomes 0.
pub fn parse_number(raw: &str) -> f64 {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Reject zero or negative values for fields that must be positive.
pub fn require_positive(field: &'static str, value: f64) -> Result<f64, FormError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(FormError::NotPositive(field))
    }
}

/// Lenient non-negative integer parse: anything unparsable becomes 0.
pub fn parse_count(raw: &str) -> u32 {
    raw.trim().parse::<u32>().unwrap_or(0)
}

/// Lenient optional number: empty input is `None`, garbage is `Some(0.0)`.
pub fn parse_optional_number(raw: &str) -> Option<f64> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(parse_number(raw))
    }
}

/// Comma-separated list, trimmed, empty entries dropped.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Trimmed value, `None` when blank.
pub fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn parse_required_date(field: &'static str, raw: &str) -> Result<DateTime<Utc>, FormError> {
    parse_date(raw).ok_or_else(|| FormError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

pub fn parse_optional_date(
    field: &'static str,
    raw: &str,
) -> Result<Option<DateTime<Utc>>, FormError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_required_date(field, raw).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct NoteDraft {
        title: String,
        tags: String,
    }

    impl Draft for NoteDraft {
        fn required_fields(&self) -> Vec<(&'static str, &str)> {
            vec![("title", self.title.as_str())]
        }
    }

    #[test]
    fn test_validate_required() {
        let mut draft = NoteDraft::default();
        assert_eq!(draft.validate(), Err(FormError::MissingField("title")));

        draft.title = "   ".into();
        assert_eq!(draft.validate(), Err(FormError::MissingField("title")));

        draft.title = "Hello".into();
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn test_submit_create() {
        let mut editor = FormEditor::<NoteDraft>::new();
        assert_eq!(editor.submit(), Err(FormError::NotOpen));

        editor.open_create();
        editor.draft_mut().title = "Hello".into();

        let submission = editor.submit().unwrap();
        assert_eq!(submission.draft().title, "Hello");
        assert!(matches!(submission, Submission::Create(_)));
        assert!(!editor.is_open());
        assert_eq!(editor.draft(), &NoteDraft::default());
    }

    #[test]
    fn test_submit_update() {
        let mut editor = FormEditor::new();
        editor.open_edit(
            "42",
            NoteDraft {
                title: "Existing".into(),
                tags: String::new(),
            },
        );

        match editor.submit().unwrap() {
            Submission::Update { id, draft } => {
                assert_eq!(id, "42");
                assert_eq!(draft.title, "Existing");
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_submit_keeps_draft() {
        let mut editor = FormEditor::<NoteDraft>::new();
        editor.open_create();
        editor.draft_mut().tags = "a, b".into();

        assert!(editor.submit().is_err());
        assert!(editor.is_open());
        assert_eq!(editor.draft().tags, "a, b");
    }

    #[test]
    fn test_restore_reopens_in_same_mode() {
        let mut editor = FormEditor::<NoteDraft>::new();
        editor.open_edit("7", NoteDraft { title: "T".into(), tags: String::new() });
        let submission = editor.submit().unwrap();
        assert!(!editor.is_open());

        editor.restore(submission);
        assert_eq!(editor.mode(), &EditorMode::Editing("7".into()));
        assert_eq!(editor.draft().title, "T");
    }

    #[test]
    fn test_cancel_resets() {
        let mut editor = FormEditor::<NoteDraft>::new();
        editor.open_create();
        editor.draft_mut().title = "Draft".into();
        editor.cancel();

        assert_eq!(editor.mode(), &EditorMode::Closed);
        assert_eq!(editor.draft(), &NoteDraft::default());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("12.5"), 12.5);
        assert_eq!(parse_number(" 7 "), 7.0);
        assert_eq!(parse_number("3,5"), 3.5);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("inf"), 0.0);
        assert_eq!(parse_count("-3"), 0);
        assert_eq!(parse_optional_number(""), None);
        assert_eq!(require_positive("area", 0.0), Err(FormError::NotPositive("area")));
        assert_eq!(require_positive("area", 12.0), Ok(12.0));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("Fièvre, Toux,, "), vec!["Fièvre", "Toux"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_parse_dates() {
        assert!(parse_required_date("date", "2024-02-01").is_ok());
        assert_eq!(
            parse_required_date("date", "demain"),
            Err(FormError::InvalidDate {
                field: "date",
                value: "demain".into()
            })
        );
        assert_eq!(parse_optional_date("followUp", " "), Ok(None));
    }
}
