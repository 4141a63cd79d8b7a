pub mod api;
pub mod cache;
pub mod confirm;
pub mod detail;
pub mod dispatch;
pub mod error;
pub mod expansion;
pub mod form;
pub mod list;
pub mod notice;
pub mod state;
#[cfg(test)]
mod test;

pub use api::BlogApi;
pub use cache::{CacheState, ChildKind};
pub use confirm::Confirm;
pub use detail::ArticleDetail;
pub use dispatch::{Action, DispatchOutcome};
pub use error::*;
pub use form::ArticleForm;
pub use list::{ArticleSummary, Reaction};
pub use notice::{Notice, NoticeScope};
pub use state::{BlogEvent, BlogState, Settings};
