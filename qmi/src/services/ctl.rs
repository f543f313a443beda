use crate::error::Result;
use crate::header::{Header, MessageKind, CONTROL_SERVICE};
use crate::message::Message;
use crate::tlv;
use octets::{CoreError, Writer};

pub const MSG_ALLOCATE_CLIENT_ID: u16 = 0x0022;
pub const MSG_RELEASE_CLIENT_ID: u16 = 0x0023;
const TLV_ALLOCATION_INFO: u8 = 0x01;

/// Standard QMI services, named by the small integer tag the wire format carries
/// (spec.md §3 "Service Identity"). Numeric values match the values the QMI control
/// service itself assigns to each service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceType {
    Ctl,
    Wds,
    Dms,
    Nas,
    Wms,
    Uim,
    Custom(u8),
}

impl ServiceType {
    pub fn from_u8(value: u8) -> ServiceType {
        match value {
            0x00 => ServiceType::Ctl,
            0x01 => ServiceType::Wds,
            0x02 => ServiceType::Dms,
            0x03 => ServiceType::Nas,
            0x05 => ServiceType::Wms,
            0x0b => ServiceType::Uim,
            other => ServiceType::Custom(other),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            ServiceType::Ctl => 0x00,
            ServiceType::Wds => 0x01,
            ServiceType::Dms => 0x02,
            ServiceType::Nas => 0x03,
            ServiceType::Wms => 0x05,
            ServiceType::Uim => 0x0b,
            ServiceType::Custom(value) => value,
        }
    }
}

/// Builds an `AllocateClientId` request on the control service (spec.md §8 scenario 3).
pub fn allocate_client_id_request(transaction: u16, service: ServiceType) -> Message {
    let header = Header {
        kind: MessageKind::Request,
        service: CONTROL_SERVICE,
        client: 0,
        transaction,
        message_id: MSG_ALLOCATE_CLIENT_ID,
    };
    let mut w = Writer::new();
    tlv::append(&mut w, TLV_ALLOCATION_INFO, &[service.as_u8()]);
    Message::assemble(header, w.into_vec())
}

/// Parses an `AllocateClientId` response, returning the echoed service and the
/// allocated client id.
pub fn parse_allocate_client_id_response(msg: &Message) -> Result<(ServiceType, u8)> {
    let value = tlv::get_exact(msg.tlv_bytes(), TLV_ALLOCATION_INFO, 2)?;
    Ok((ServiceType::from_u8(value[0]), value[1]))
}

pub fn release_client_id_request(transaction: u16, service: ServiceType, cid: u8) -> Message {
    let header = Header {
        kind: MessageKind::Request,
        service: CONTROL_SERVICE,
        client: 0,
        transaction,
        message_id: MSG_RELEASE_CLIENT_ID,
    };
    let mut w = Writer::new();
    tlv::append(&mut w, TLV_ALLOCATION_INFO, &[service.as_u8(), cid]);
    Message::assemble(header, w.into_vec())
}

pub fn parse_release_client_id_response(msg: &Message) -> Result<(ServiceType, u8)> {
    let value = tlv::get_exact(msg.tlv_bytes(), TLV_ALLOCATION_INFO, 2)?;
    Ok((ServiceType::from_u8(value[0]), value[1]))
}

/// Validates that a release/allocate reply echoes the service it was requested for
/// (spec.md §4.6, shared vocabulary with the MBIM dialect).
pub fn validate_echoed_service(requested: ServiceType, echoed: ServiceType) -> Result<()> {
    if requested != echoed {
        return Err(crate::error::Error::Core(CoreError::InvalidMessage(format!(
            "control exchange echoed {:?}, requested {:?}",
            echoed, requested
        ))));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_3_allocate_client_id_round_trip() {
        let request = allocate_client_id_request(1, ServiceType::Dms);
        assert_eq!(request.header().service, CONTROL_SERVICE);
        assert_eq!(request.header().client, 0);
        assert_eq!(request.header().transaction, 1);
        assert_eq!(request.header().message_id, MSG_ALLOCATE_CLIENT_ID);
        assert_eq!(request.tlv_bytes(), &[0x01, 0x01, 0x00, 0x02]);

        let reply_header = Header {
            kind: MessageKind::Response,
            service: CONTROL_SERVICE,
            client: 0,
            transaction: 1,
            message_id: MSG_ALLOCATE_CLIENT_ID,
        };
        let mut w = Writer::new();
        tlv::append(&mut w, TLV_ALLOCATION_INFO, &[0x02, 0x07]);
        let reply = Message::assemble(reply_header, w.into_vec());

        let (service, cid) = parse_allocate_client_id_response(&reply).unwrap();
        assert_eq!(service, ServiceType::Dms);
        assert_eq!(cid, 7);
        validate_echoed_service(ServiceType::Dms, service).unwrap();
    }
}
