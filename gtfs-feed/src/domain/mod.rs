//! Scalar domain types shared by the static and realtime pipelines.
//!
//! Every type here enforces its invariants at construction time, so code
//! that receives one can trust its validity. Constructors are pure and fail
//! with [`MalformedScalar`] naming the scalar and the offending input.

mod color;
mod coordinate;
mod date;
mod error;
mod language;
mod time;
mod timezone;

pub use color::Color;
pub use coordinate::Coordinate;
pub use date::ServiceDate;
pub use error::{MalformedScalar, ScalarKind};
pub use language::LanguageCode;
pub use time::ServiceTime;
pub use timezone::Timezone;
