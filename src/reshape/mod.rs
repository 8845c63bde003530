//! Pure transformations from stored records into chart-ready shapes.

mod area;
mod income;
mod series;
mod timeline;

use serde::Serialize;

pub use area::{aggregate_by_area, build_area_tree, AreaTotal, TreeNode};
pub use income::{group_by_period, stack_components, StackedCell, COMPONENT_LABELS};
pub use series::{project, Field};
pub use timeline::{slice_by_period, Frame};

/// A labelled value, as used by pie, map and bar slices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: i64,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        NamedValue {
            name: name.into(),
            value,
        }
    }
}
