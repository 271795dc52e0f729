pub mod client;
pub mod session;
pub mod traits;
pub mod types;

pub use client::HttpShowcaseApi;
pub use session::Session;
pub use traits::ShowcaseApi;
pub use types::{CollectionUpdate, InteractionKind, InteractionUpdate, NewComment};
