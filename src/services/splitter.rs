//! Splitting a single cable entry into a parallel set.
//!
//! Used when a run turns out to need multiple conductors pulled side by
//! side. The source entry is replaced by `count` siblings that share a new
//! parallel group; each sibling keeps the full measured values of the
//! original, because every conductor in the set physically spans the whole
//! route.

use crate::api::{CableEntry, EntryId, ParallelGroupId};
use crate::services::parallel::derived_base_tag;
use crate::services::ValidationError;

/// Split `source` into `count` parallel siblings.
///
/// Siblings get fresh entry ids, one shared freshly drawn group id, the
/// source's base tag (deriving it from the tag when no explicit base is
/// stored), numbering 1..=count and `parallel_total = count`. All other
/// fields, lengths and costs included, are copied as-is: split describes
/// how the run is pulled, not a division of quantities. Timestamps are
/// cleared so the persistence layer stamps the new rows itself.
///
/// # Arguments
/// * `source` - The entry being replaced by the set
/// * `count` - Number of parallel conductors, at least 2
///
/// # Returns
/// The sibling entries in cable-number order, or a validation error when
/// `count` is below 2.
pub fn split_entry(source: &CableEntry, count: i32) -> Result<Vec<CableEntry>, ValidationError> {
    if count < 2 {
        return Err(ValidationError::SplitCount { count });
    }

    let base_tag = derived_base_tag(source);
    let group_id = ParallelGroupId::generate();

    let siblings = (1..=count)
        .map(|number| {
            let mut sibling = source.clone();
            sibling.id = EntryId::generate();
            sibling.parallel_group_id = Some(group_id);
            sibling.base_cable_tag = Some(base_tag.clone());
            sibling.cable_tag = base_tag.clone();
            sibling.cable_number = number;
            sibling.parallel_total = Some(count);
            sibling.created_at = None;
            sibling.updated_at = None;
            sibling
        })
        .collect();

    Ok(siblings)
}
