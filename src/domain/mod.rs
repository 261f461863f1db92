pub mod error;
pub mod work_order;
