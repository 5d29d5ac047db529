pub mod reports;
pub mod scenario;
pub mod util;

pub use util::split_csv;
