pub mod connection;
pub mod headless;

pub use connection::connect_and_find_document_page;
pub use headless::launch_headless_browser;
