pub mod criteria;
pub mod exam;
pub mod record;
pub mod report;
pub mod segment;
pub mod stenosis;
pub mod template;
