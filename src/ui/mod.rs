pub mod chart_panel;
pub mod filter_controls;
pub mod mapping_dialog;
pub mod shot_table;
