//! The filter compilation pipeline: normalize raw query parameters, compile
//! them into a predicate tree, resolve sorting and pagination.

pub mod pagination;
pub mod predicate;
pub mod search;
pub mod sort;
pub mod spec;

pub use pagination::PageSpec;
pub use predicate::{Field, Predicate, Value, compile};
pub use search::SearchField;
pub use sort::{Direction, SortSpec, SortTarget};
pub use spec::{FilterSpec, OneOrMany, RawParams, normalize};
