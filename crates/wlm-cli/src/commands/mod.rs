pub mod catalog;
pub mod flatten;
pub mod group;
pub mod map;
pub mod shape_check;
