//! mxcache infrastructure: record store, upstream forwarding, DNS server glue
pub mod dns;
