pub mod plan;
pub mod reach;
