pub mod landing;
pub mod schedule_page;
pub mod shop_groups;
pub mod totals;
