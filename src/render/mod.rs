pub mod brush;
pub mod court;
pub mod histogram;
pub mod reconcile;
pub mod tooltip;
pub mod transform;
