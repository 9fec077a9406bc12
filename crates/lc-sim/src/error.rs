use lc_choice::ChoiceError;
use lc_core::LcError;
use lc_data::DataError;
use lc_shadow::ShadowPriceError;
use lc_utility::UtilityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("model configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] LcError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Utility(#[from] UtilityError),

    #[error(transparent)]
    Choice(#[from] ChoiceError),

    #[error(transparent)]
    ShadowPrice(#[from] ShadowPriceError),

    #[error("{path}: {source}")]
    Json {
        path:   String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
