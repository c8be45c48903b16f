pub mod batch_job;
pub mod realtime;
pub mod registry_cleanup;
pub mod submitter;
