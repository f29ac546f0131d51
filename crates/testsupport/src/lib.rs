pub mod fixtures;
pub mod helpers;
pub mod http_client;
pub mod workbook;

pub use fixtures::*;
pub use helpers::*;
pub use http_client::*;
pub use workbook::*;
