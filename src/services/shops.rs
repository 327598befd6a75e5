//! Destination (shop) grouping.
//!
//! Construction schedules route most cables to numbered tenancies, with the
//! shop code buried in free-text `to_location` values like "Shop 45 - Cafe".
//! Grouping partitions a schedule into per-shop blocks for the grouped view,
//! keyed by the extracted code, with everything unmatched pooled into a
//! single ungrouped bucket.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::api::{CableEntry, CableGroup};

/// Display label for the bucket of entries with no recognizable shop code.
pub const UNGROUPED_LABEL: &str = "Ungrouped";

fn shop_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bshop\s+([a-z0-9]+)").expect("shop code regex is valid"))
}

/// Extracts a grouping key from a destination string.
///
/// Implementations return the lowercased key for destinations they
/// recognize and `None` otherwise. Swapping the extractor changes the
/// naming convention without touching the grouping algorithm.
pub trait DestinationKeyExtractor {
    fn shop_key(&self, to_location: &str) -> Option<String>;
}

/// Default extractor matching "Shop <alphanumeric>" case-insensitively,
/// so "Shop 45A - Other" yields the key `"45a"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShopPatternExtractor;

impl DestinationKeyExtractor for ShopPatternExtractor {
    fn shop_key(&self, to_location: &str) -> Option<String> {
        shop_code_regex()
            .captures(to_location)
            .map(|captures| captures[1].to_lowercase())
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Group entries by destination shop using the default extractor.
///
/// See [`group_by_shop_with`] for the grouping rules.
pub fn group_by_shop(
    entries: &[CableEntry],
    tenant_names: Option<&HashMap<String, String>>,
) -> Vec<CableGroup> {
    group_by_shop_with(&ShopPatternExtractor, entries, tenant_names)
}

/// Group entries by destination shop using a caller-supplied extractor.
///
/// Groups come out in first-appearance order of their key in the input,
/// not sorted. Entries the extractor does not recognize pool into one
/// bucket with an empty `shop_number`, positioned where its first member
/// appeared. Each entry lands in exactly one group.
///
/// When `tenant_names` maps a shop key to a tenant and that name is not
/// already part of the entry's `to_location` (case-insensitive), the copy
/// placed in the group gets `to_location` rewritten to
/// "Shop CODE - Tenant" and the group label carries the tenant too. The
/// caller's entries are never mutated; groups hold presentation copies.
pub fn group_by_shop_with(
    extractor: &dyn DestinationKeyExtractor,
    entries: &[CableEntry],
    tenant_names: Option<&HashMap<String, String>>,
) -> Vec<CableGroup> {
    let mut groups: Vec<CableGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let key = extractor.shop_key(&entry.to_location).unwrap_or_default();

        let group_idx = match index.get(&key) {
            Some(&idx) => idx,
            None => {
                let shop_name = if key.is_empty() {
                    UNGROUPED_LABEL.to_string()
                } else {
                    match tenant_names.and_then(|names| names.get(&key)) {
                        Some(tenant) => {
                            format!("Shop {} - {}", key.to_uppercase(), tenant)
                        }
                        None => format!("Shop {}", key.to_uppercase()),
                    }
                };
                index.insert(key.clone(), groups.len());
                groups.push(CableGroup {
                    shop_number: key.clone(),
                    shop_name,
                    entries: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let mut presented = entry.clone();
        if !key.is_empty() {
            if let Some(tenant) = tenant_names.and_then(|names| names.get(&key)) {
                if !contains_ignore_case(&presented.to_location, tenant) {
                    presented.to_location = format!("Shop {} - {}", key.to_uppercase(), tenant);
                }
            }
        }
        groups[group_idx].entries.push(presented);
    }

    groups
}
