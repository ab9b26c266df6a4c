pub mod items;
pub mod public;
pub mod purchases;
pub mod registries;
