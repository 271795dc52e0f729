pub mod comments;
pub mod derived;
pub mod guard;
pub mod interaction;
pub mod notifications;
pub mod page;
pub mod view_state;

pub use derived::{derive_view, tab_counts, TabCounts};
pub use interaction::{InteractionController, InteractionTicket, Resolution};
pub use notifications::{Notification, NotificationKind, NotificationQueue};
pub use page::ShowcasePage;
pub use view_state::{PropertyDetail, SortKey, SortOrder, Tab, ViewState};
