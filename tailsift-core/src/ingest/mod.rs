mod client_ip;
mod entry;
mod histogram;
mod parse;
mod pipeline;
mod privacy;
mod summary;

#[cfg(test)]
mod tests;

pub use client_ip::{CLIENT_IP_PRIORITY, IpSource, normalize_ip};
pub use entry::{ParsedEntry, RequestRecord};
pub use histogram::LatencyBucket;
pub use parse::{ParseError, parse_line};
pub use pipeline::{Enrichment, LiveOutputs, ProcessError, Processor};
pub use privacy::{PrivacyPolicy, anonymize_ip, hash_ip};
pub use summary::{Counted, SummaryAggregator, SummarySnapshot};
