pub mod dashboard;
pub mod error;
pub mod event;
pub mod format;
pub mod series;
pub mod state;
pub mod view;

pub use dashboard::{dispatch, Dashboard};
pub use error::{McError, Result};
pub use event::Message;
pub use series::{RollingSeries, SeriesSnapshot};
pub use state::SystemSnapshot;
