mod metrics;
mod sessions;
mod students;
