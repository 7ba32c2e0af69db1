use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::UploaderError;

/// A closed set of options with a fixed wire string per variant.
pub trait Choice: Copy + Eq + Sized + 'static {
    /// Form field name the choice travels under.
    const FIELD: &'static str;
    /// Every option, in display order.
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl Choice for $name {
            const FIELD: &'static str = $field;
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UploaderError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UploaderError::InvalidChoiceError {
                        field: $field.to_string(),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

choice_enum!(
    /// Gender the scheme targets.
    Gender, "scheme_gender" {
        General => "General",
        Female => "Female",
    }
);

choice_enum!(
    /// Social category the scheme applies to.
    Category, "scheme_category" {
        ScheduledCaste => "Schedule Caste (SC)",
        ScheduledTribe => "Schedule Tribe (ST)",
        General => "General",
        OtherBackwardClasses => "Other Backward Classes (OBC)",
    }
);

choice_enum!(
    /// Body that runs the scheme.
    SchemeSource, "scheme_source" {
        State => "State",
        Central => "Central",
        Bank => "Bank",
    }
);

choice_enum!(
    SchemeType, "scheme_type" {
        Loan => "Loan",
        Insurance => "Insurance",
        Education => "Education",
        Savings => "Savings",
        Welfare => "Welfare",
        Pension => "Pension",
    }
);

impl Default for Gender {
    fn default() -> Self {
        Gender::General
    }
}

impl Default for SchemeSource {
    fn default() -> Self {
        SchemeSource::State
    }
}

/// Pushes `value` unless it is already selected, keeping selection order.
pub fn select<T: Choice>(selected: &mut Vec<T>, value: T) {
    if !selected.contains(&value) {
        selected.push(value);
    }
}

/// Metadata the user picked on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemeDetails {
    pub gender: Gender,
    pub category: Vec<Category>,
    pub source: SchemeSource,
    pub scheme_type: Vec<SchemeType>,
    pub description: String,
}

/// A document held in memory for the length of one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// What the browser posted. The file is optional here; a [`Submission`]
/// only exists once one is present.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub details: SchemeDetails,
    pub file: Option<UploadedFile>,
}

impl FormInput {
    pub fn into_submission(self) -> Option<Submission> {
        let file = self.file?;
        Some(Submission {
            details: self.details,
            file,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub details: SchemeDetails,
    pub file: UploadedFile,
}

/// Query string of the upload request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadParams {
    pub scheme_gender: Gender,
    pub scheme_source: SchemeSource,
    pub scheme_description: String,
}

/// Multipart text fields of the upload request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadData {
    pub scheme_type: Vec<SchemeType>,
    pub scheme_category: Vec<Category>,
}

impl From<&SchemeDetails> for UploadParams {
    fn from(details: &SchemeDetails) -> Self {
        Self {
            scheme_gender: details.gender,
            scheme_source: details.source,
            scheme_description: details.description.clone(),
        }
    }
}

impl From<&SchemeDetails> for UploadData {
    fn from(details: &SchemeDetails) -> Self {
        Self {
            scheme_type: details.scheme_type.clone(),
            scheme_category: details.category.clone(),
        }
    }
}

/// Echo of a successful upload, built from the exact values that were sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    pub filename: String,
    pub data: UploadData,
    pub params: UploadParams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// No file was attached; nothing was sent.
    Skipped,
    Uploaded(UploadSummary),
    /// The upload failed. Carries only the text the user may see.
    Failed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings_parse_back() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), *category);
        }
        for scheme_type in SchemeType::ALL {
            assert_eq!(scheme_type.to_string().parse::<SchemeType>().unwrap(), *scheme_type);
        }
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("Bank".parse::<SchemeSource>().unwrap(), SchemeSource::Bank);
    }

    #[test]
    fn test_unknown_choice_is_rejected() {
        let err = "Mortgage".parse::<SchemeType>().unwrap_err();
        match err {
            UploaderError::InvalidChoiceError { field, value } => {
                assert_eq!(field, "scheme_type");
                assert_eq!(value, "Mortgage");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!("female".parse::<Gender>().is_err());
    }

    #[test]
    fn test_option_counts() {
        assert_eq!(Gender::ALL.len(), 2);
        assert_eq!(Category::ALL.len(), 4);
        assert_eq!(SchemeSource::ALL.len(), 3);
        assert_eq!(SchemeType::ALL.len(), 6);
    }

    #[test]
    fn test_serializes_as_wire_string() {
        let data = UploadData {
            scheme_type: vec![SchemeType::Loan, SchemeType::Pension],
            scheme_category: vec![Category::ScheduledTribe],
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "scheme_type": ["Loan", "Pension"],
                "scheme_category": ["Schedule Tribe (ST)"]
            })
        );
    }

    #[test]
    fn test_select_drops_duplicates_and_keeps_order() {
        let mut selected = Vec::new();
        select(&mut selected, SchemeType::Welfare);
        select(&mut selected, SchemeType::Loan);
        select(&mut selected, SchemeType::Welfare);
        assert_eq!(selected, vec![SchemeType::Welfare, SchemeType::Loan]);
    }

    #[test]
    fn test_submission_requires_file() {
        let input = FormInput::default();
        assert!(input.into_submission().is_none());

        let input = FormInput {
            details: SchemeDetails::default(),
            file: Some(UploadedFile::new("a.pdf", b"%PDF".to_vec())),
        };
        let submission = input.into_submission().unwrap();
        assert_eq!(submission.file.filename, "a.pdf");
        assert_eq!(submission.details.gender, Gender::General);
        assert_eq!(submission.details.source, SchemeSource::State);
    }
}
