// Screening service: upload → extraction → storage, re-analysis, rankings,
// dashboard statistics, and admin settings. Glue between the pure matching
// core and the store/extractor collaborators.

pub mod analysis;
pub mod dashboard;
pub mod handlers;
pub mod settings;
pub mod upload;
