pub mod dashboard;
pub mod imports;
pub mod scoring;
