pub mod analytics;
pub mod feedback;
