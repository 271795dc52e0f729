use thiserror::Error;

/// Failures talking to the showcase backend
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Request never produced a response (connection refused, timeout, DNS)
    #[error("network error: {0}")]
    Network(String),

    /// Session is gone; the token has already been cleared
    #[error("session expired, redirecting to {redirect}")]
    Unauthorized { redirect: String },

    /// Backend answered with a non-2xx status
    #[error("request failed with status {status}: {error}")]
    Status { status: u16, error: String },

    /// Response body did not match any known shape
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Client-side form validation failure; never reaches the network
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("radius required with address search")]
    RadiusRequired,
    #[error("must specify address+radius OR cities/townships")]
    LocationRequired,
    #[error("select at least one property type")]
    PropertyTypeRequired,
    #[error("minimum {0} cannot exceed maximum {0}")]
    InvalidRange(&'static str),
    #[error("comment cannot be empty")]
    EmptyComment,
}

/// Precondition failures and wrapped backend failures for page actions
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShowcaseError {
    #[error("no collection selected")]
    NoCollectionSelected,
    #[error("property {0} is not loaded")]
    UnknownProperty(String),
    #[error("property {0} is not open")]
    DetailNotOpen(String),
    #[error("{0} already in progress")]
    AlreadyInFlight(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type Result<T, E = ShowcaseError> = std::result::Result<T, E>;

/// Message shown to the user in a toast for a failed action.
///
/// Known backend messages are rewritten; anything else is shown verbatim.
pub fn friendly_message(err: &ShowcaseError) -> String {
    match err {
        ShowcaseError::Api(ApiError::Network(_)) => {
            "Unable to connect. Please check your connection and try again.".to_string()
        }
        ShowcaseError::Api(ApiError::Unauthorized { .. }) => {
            "Your session has expired. Please log in again.".to_string()
        }
        ShowcaseError::Api(ApiError::Status { error, .. }) => {
            let lower = error.to_lowercase();
            if lower.contains("no properties match") {
                "No properties match these preferences yet. Try widening the price range or location."
                    .to_string()
            } else if lower.contains("subscription") {
                "This action requires an active subscription.".to_string()
            } else if error.trim().is_empty() {
                "Something went wrong. Please try again.".to_string()
            } else {
                error.clone()
            }
        }
        ShowcaseError::Api(ApiError::Decode(_)) => {
            "Received an unexpected response from the server.".to_string()
        }
        other => other.to_string(),
    }
}
