pub mod document_fetcher;
pub mod handoff_store;
pub mod resolver;
pub mod settings_store;
pub mod status_bus;
pub mod summarize_client;
pub mod surface_opener;

pub use document_fetcher::{DocumentFetcher, FetchedDocument, HttpDocumentFetcher};
pub use handoff_store::HandoffStore;
pub use settings_store::SettingsStore;
pub use status_bus::{StatusBus, StatusEvent, StatusKind};
pub use summarize_client::{SummarizeClient, SummaryBackend};
pub use surface_opener::{ChannelSurfaceOpener, SurfaceOpener};
