pub mod class_list;
pub mod fetch;
