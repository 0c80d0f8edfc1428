#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, MX};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use hickory_proto::serialize::binary::BinEncodable;
use std::collections::{HashMap, HashSet};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// What the mock does with every query it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    Answer,
    Rcode(ResponseCode),
    WrongId,
    Garbage,
    Silent,
    /// Drops queries of one type, answers the rest.
    SilentFor(RecordType),
    /// Replies with `rcode` to queries of one type, answers the rest.
    RcodeFor(RecordType, ResponseCode),
}

/// Canned answers keyed by (fqdn, type).
#[derive(Debug, Clone, Default)]
pub struct MockZone {
    records: HashMap<(String, RecordType), Vec<RData>>,
    nxdomain: HashSet<String>,
}

impl MockZone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_a(mut self, name: &str, ip: Ipv4Addr) -> Self {
        self.records
            .entry((fqdn(name), RecordType::A))
            .or_default()
            .push(RData::A(A(ip)));
        self
    }

    pub fn with_aaaa(mut self, name: &str, ip: Ipv6Addr) -> Self {
        self.records
            .entry((fqdn(name), RecordType::AAAA))
            .or_default()
            .push(RData::AAAA(AAAA(ip)));
        self
    }

    pub fn with_mx(mut self, name: &str, preference: u16, exchange: &str) -> Self {
        let exchange = Name::from_str(&fqdn(exchange)).unwrap();
        self.records
            .entry((fqdn(name), RecordType::MX))
            .or_default()
            .push(RData::MX(MX::new(preference, exchange)));
        self
    }

    pub fn with_nxdomain(mut self, name: &str) -> Self {
        self.nxdomain.insert(fqdn(name));
        self
    }
}

fn fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_lowercase()
    } else {
        format!("{}.", name.to_lowercase())
    }
}

pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(zone: MockZone) -> Result<Self, std::io::Error> {
        Self::start_with(zone, MockBehavior::Answer).await
    }

    pub async fn start_with(
        zone: MockZone,
        behavior: MockBehavior,
    ) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let queries = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&queries);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = build_response(&zone, behavior, &buf[..len]) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn build_response(zone: &MockZone, behavior: MockBehavior, query: &[u8]) -> Option<Vec<u8>> {
    let request = Message::from_vec(query).ok()?;
    let question = request.queries().first()?.clone();

    let id = match behavior {
        MockBehavior::Silent => return None,
        MockBehavior::SilentFor(dropped) if question.query_type() == dropped => return None,
        MockBehavior::Garbage => return Some(vec![0xde, 0xad]),
        MockBehavior::WrongId => request.id().wrapping_add(1),
        _ => request.id(),
    };

    let mut response = Message::new(id, MessageType::Response, OpCode::Query);
    response.set_recursion_desired(true);
    response.set_recursion_available(true);

    let name = question.name().to_utf8().to_lowercase();
    let rcode = match behavior {
        MockBehavior::Rcode(code) => code,
        MockBehavior::RcodeFor(kind, code) if question.query_type() == kind => code,
        _ if zone.nxdomain.contains(&name) => ResponseCode::NXDomain,
        _ => ResponseCode::NoError,
    };
    response.set_response_code(rcode);

    if rcode == ResponseCode::NoError {
        if let Some(rdatas) = zone.records.get(&(name, question.query_type())) {
            for rdata in rdatas {
                response.add_answer(Record::from_rdata(
                    question.name().clone(),
                    300,
                    rdata.clone(),
                ));
            }
        }
    }
    response.add_query(question);

    response.to_vec().ok()
}
