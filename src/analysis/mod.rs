pub mod grouping;
pub mod quantity;

pub use grouping::{build_classification_groups, build_type_groups, partition_rows};
pub use quantity::resolve_quantity;
