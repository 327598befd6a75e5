//! Service layer for business logic and orchestration.
//!
//! This module contains the cable-schedule engines that sit between the
//! repository layer and the API surface. The engines are pure, synchronous
//! functions over in-memory snapshots; `schedule_view` composes them with
//! repository fetches.

pub mod aggregate;
pub mod paging;
pub mod parallel;
pub mod schedule_view;
pub mod shops;
pub mod splitter;

pub use aggregate::aggregate;
pub use paging::{compute_window, visible_rows, PageWindow, Pager, RowWindow};
pub use parallel::resolve_parallel_groups;
pub use schedule_view::{get_schedule_page, get_schedule_totals, get_shop_groups};
pub use shops::{group_by_shop, DestinationKeyExtractor, ShopPatternExtractor};
pub use splitter::split_entry;

/// Caller-contract violations the engines cannot repair.
///
/// Everything else (inconsistent numbering, missing numeric fields, unmatched
/// shop patterns) is normalized deterministically and never surfaces as an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A split must produce at least two siblings.
    #[error("split count must be at least 2, got {count}")]
    SplitCount { count: i32 },

    /// A page size of zero can never yield a window.
    #[error("page size must be greater than zero")]
    PageSize,
}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::SplitCount { count: 1 };
        assert_eq!(err.to_string(), "split count must be at least 2, got 1");

        let err = ValidationError::PageSize;
        assert_eq!(err.to_string(), "page size must be greater than zero");
    }
}
