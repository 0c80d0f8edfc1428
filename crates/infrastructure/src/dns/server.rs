use crate::dns::forwarding::RecordTypeMapper;
use hickory_proto::op::{Header, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, MX};
use hickory_proto::rr::{Name, RData, Record};
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use mxcache_application::use_cases::HandleDnsQueryUseCase;
use mxcache_domain::{AnswerData, DnsAnswer, DnsRequest};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// hickory glue: decodes the first question, runs the query use case and
/// writes an authoritative NOERROR answer, empty when nothing matched.
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }
}

#[async_trait::async_trait]
impl RequestHandler for DnsServerHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        if request.header().op_code() != OpCode::Query {
            warn!(op_code = ?request.header().op_code(), "Unsupported opcode");
            return send_empty_response(request, &mut response_handle, ResponseCode::NotImp)
                .await;
        }

        let request_info = match request.request_info() {
            Ok(info) => info,
            Err(e) => {
                error!(error = %e, "Failed to parse request info");
                return send_empty_response(request, &mut response_handle, ResponseCode::FormErr)
                    .await;
            }
        };

        let query = &request_info.query;
        let question = query.name().to_utf8();
        let record_type = RecordTypeMapper::from_hickory(query.query_type());
        let client_ip = request.src().ip();

        debug!(domain = %question, record_type = %record_type, client = %client_ip, "DNS query received");

        let dns_request = DnsRequest::new(question.as_str(), record_type, client_ip);
        let answers = self.use_case.execute(&dns_request).await;

        let owner = Name::from_str(&question).unwrap_or_else(|_| Name::root());
        let records = answer_records(&owner, &answers);

        debug!(domain = %question, answers = records.len(), "Sending response");

        let builder = MessageResponseBuilder::from_message_request(request);
        let header = response_header(request.header(), ResponseCode::NoError);
        let response = builder.build(header, records.iter(), &[], &[], &[]);

        match response_handle.send_response(response).await {
            Ok(info) => info,
            Err(e) => {
                error!(error = %e, "Failed to send response");
                ResponseInfo::from(*request.header())
            }
        }
    }
}

/// Reply header for `request`: same id and opcode, QR and AA set.
pub fn response_header(request: &Header, code: ResponseCode) -> Header {
    let mut header = *request;
    header.set_message_type(MessageType::Response);
    header.set_authoritative(true);
    header.set_recursion_available(true);
    header.set_response_code(code);
    header
}

/// Converts answers into class IN records owned by the question name.
pub fn answer_records(owner: &Name, answers: &[DnsAnswer]) -> Vec<Record> {
    answers
        .iter()
        .filter_map(|answer| {
            let rdata = match &answer.data {
                AnswerData::A(ip) => RData::A(A(*ip)),
                AnswerData::AAAA(ip) => RData::AAAA(AAAA(*ip)),
                AnswerData::MX {
                    preference,
                    exchange,
                } => match Name::from_str(&exchange.to_fqdn()) {
                    Ok(exchange) => RData::MX(MX::new(*preference, exchange)),
                    Err(e) => {
                        debug!(exchange = %exchange, error = %e, "Dropping unencodable MX answer");
                        return None;
                    }
                },
            };
            Some(Record::from_rdata(owner.clone(), answer.ttl, rdata))
        })
        .collect()
}

async fn send_empty_response<R: ResponseHandler>(
    request: &Request,
    response_handle: &mut R,
    code: ResponseCode,
) -> ResponseInfo {
    debug!(code = ?code, "Sending empty response");
    let builder = MessageResponseBuilder::from_message_request(request);
    let header = response_header(request.header(), code);
    let response = builder.build(header, &[], &[], &[], &[]);

    match response_handle.send_response(response).await {
        Ok(info) => info,
        Err(e) => {
            error!(error = %e, "Failed to send response");
            ResponseInfo::from(*request.header())
        }
    }
}
