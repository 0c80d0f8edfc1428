//! Mapping between `mxcache_domain::RecordType` and `hickory_proto::rr::RecordType`.

use hickory_proto::rr::RecordType as HickoryRecordType;
use mxcache_domain::RecordType;

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    /// Domain → hickory, for building upstream queries.
    pub fn to_hickory(record_type: &RecordType) -> HickoryRecordType {
        match record_type {
            RecordType::A => HickoryRecordType::A,
            RecordType::AAAA => HickoryRecordType::AAAA,
            RecordType::MX => HickoryRecordType::MX,
            RecordType::NS => HickoryRecordType::NS,
            RecordType::CNAME => HickoryRecordType::CNAME,
            RecordType::SOA => HickoryRecordType::SOA,
            RecordType::PTR => HickoryRecordType::PTR,
            RecordType::TXT => HickoryRecordType::TXT,
            RecordType::SRV => HickoryRecordType::SRV,
            RecordType::Unknown(code) => HickoryRecordType::from(*code),
        }
    }

    /// Hickory → domain, for incoming questions. Total: anything we do not
    /// name is carried as `Unknown` so the handler can answer it empty.
    pub fn from_hickory(hickory_type: HickoryRecordType) -> RecordType {
        RecordType::from_u16(u16::from(hickory_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answered_types_map_both_ways() {
        for rt in [RecordType::A, RecordType::AAAA, RecordType::MX] {
            let hickory = RecordTypeMapper::to_hickory(&rt);
            assert_eq!(RecordTypeMapper::from_hickory(hickory), rt);
        }
    }

    #[test]
    fn test_txt_maps_to_named_type() {
        assert_eq!(
            RecordTypeMapper::from_hickory(HickoryRecordType::TXT),
            RecordType::TXT
        );
    }

    #[test]
    fn test_unnamed_type_is_unknown() {
        let rt = RecordTypeMapper::from_hickory(HickoryRecordType::CAA);
        assert_eq!(rt, RecordType::Unknown(257));
        assert!(!rt.is_answered());
        assert_eq!(RecordTypeMapper::to_hickory(&rt), HickoryRecordType::CAA);
    }
}
