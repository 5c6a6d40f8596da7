pub mod binning;
pub mod kd_tree;
pub mod statistics;
