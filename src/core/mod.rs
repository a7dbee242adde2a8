pub mod error;
pub mod options;
pub mod params;

pub use error::{AppError, Result, TransportErrorKind};
pub use options::{ReportLevel, SignType};
pub use params::{ParamSet, ParamValue};
