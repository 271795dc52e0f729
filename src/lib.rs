//! Client engine for OpenHousePal showcases: optimistic property
//! interactions, derived list views, toasts and showcase form validation
//! over the OpenHousePal REST backend.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod forms;
pub mod models;

pub use api::{HttpShowcaseApi, ShowcaseApi};
pub use config::ClientConfig;
pub use engine::ShowcasePage;
pub use error::{ApiError, ShowcaseError, ValidationError};
