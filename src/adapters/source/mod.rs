//! Source database adapters

pub mod mysql;
pub mod traits;

pub use mysql::MySqlSource;
pub use traits::SourceReader;
