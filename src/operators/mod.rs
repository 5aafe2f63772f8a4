pub mod aggregate;
pub mod ranking;
pub mod render;
pub mod row;

pub use aggregate::Aggregator;
pub use ranking::finalize;
pub use render::{emit, render_ranking};
pub use row::Row;
