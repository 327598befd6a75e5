use crate::api::CableGroup;
use serde::{Deserialize, Serialize};

/// Shop-grouped view of a schedule's entries.
///
/// `grouped` is false when every entry fell into the ungrouped bucket, in
/// which case the caller should render a flat table instead of group headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopGroupsView {
    pub grouped: bool,
    pub groups: Vec<CableGroup>,
}

pub const GET_SHOP_GROUPS: &str = "get_shop_groups";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_serializes() {
        let view = ShopGroupsView {
            grouped: true,
            groups: vec![CableGroup {
                shop_number: "45".to_string(),
                shop_name: "Shop 45".to_string(),
                entries: vec![],
            }],
        };
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"grouped\":true"));
        assert!(json.contains("\"shop_number\":\"45\""));
    }

    #[test]
    fn test_const_value() {
        assert_eq!(GET_SHOP_GROUPS, "get_shop_groups");
    }
}
