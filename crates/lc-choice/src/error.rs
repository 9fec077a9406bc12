use lc_core::PersonId;
use lc_utility::UtilityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChoiceError {
    #[error("{stage}: no input rows")]
    EmptyInput { stage: String },

    #[error("{label}: utility evaluation failed: {source}")]
    SpecEvaluation {
        label:  String,
        #[source]
        source: UtilityError,
    },

    #[error("{label}: {person} has no alternatives to choose from")]
    NoAlternatives { person: PersonId, label: String },
}

impl ChoiceError {
    pub(crate) fn spec(label: &str, source: UtilityError) -> Self {
        ChoiceError::SpecEvaluation { label: label.to_owned(), source }
    }
}

pub type ChoiceResult<T> = Result<T, ChoiceError>;
