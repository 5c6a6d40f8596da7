pub mod chart_state;
pub mod events;
pub mod filter_state;
pub mod record;
pub mod theme;
