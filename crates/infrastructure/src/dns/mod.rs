pub mod cache;
pub mod forwarding;
pub mod server;
pub mod transport;

pub use cache::InMemoryRecordStore;
pub use forwarding::ForwardingUpstreamResolver;
pub use server::DnsServerHandler;
