//! Query request types (noun module)

mod request;

pub use request::{QueryRequest, DateRange};
