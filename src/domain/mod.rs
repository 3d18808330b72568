// Domain layer - Typed dashboard and preference models
pub mod dashboard;
pub mod preferences;
