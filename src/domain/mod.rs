// Domain layer - Pure data shared by every other layer
pub mod container;
pub mod dashboard;
