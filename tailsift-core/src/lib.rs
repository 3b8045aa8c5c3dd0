pub mod broadcast;
pub mod conf;
pub mod enrichment;
pub mod import;
pub mod ingest;
pub mod logging;
pub mod metrics;
pub mod server;
pub mod store;
pub mod tail;

#[cfg(test)]
pub(crate) mod test_support;
