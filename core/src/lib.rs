//! Runtime-agnostic state machine behind the spotlight palette: the data
//! model for search hits, the category grouper, the two-dimensional
//! navigation cursor, the debounced query pipeline, and the session
//! controller that ties them to a visible overlay.
//!
//! Nothing in this crate owns a timer or a terminal. Debounce intervals are
//! expressed as tokens the frontend arms and reports back, so every
//! transition is synchronous and directly testable.

mod config;
mod cursor;
mod grouper;
mod hit;
mod input;
mod provider;
mod query;
mod session;

pub use config::ConfigError;
pub use config::PaletteConfig;
pub use cursor::Cursor;
pub use cursor::MoveUp;
pub use cursor::move_down;
pub use cursor::move_up;
pub use cursor::selected;
pub use grouper::group_hits;
pub use hit::Group;
pub use hit::Hit;
pub use input::InputState;
pub use provider::SearchError;
pub use provider::SearchProvider;
pub use query::Commit;
pub use query::DebounceToken;
pub use query::QueryPhase;
pub use query::QueryPipeline;
pub use session::Focus;
pub use session::NavOutcome;
pub use session::PaletteSession;
