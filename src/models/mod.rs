pub mod settings;
pub mod summary;

pub use settings::UserSettings;
pub use summary::{
    Excerpt, RequestParams, SummaryPayload, SummaryResponse, SummaryResult, SummaryStats,
};
