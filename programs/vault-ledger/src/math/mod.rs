pub mod conversion;

pub use conversion::*;
