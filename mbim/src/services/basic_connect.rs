use crate::builder::Builder;
use crate::error::Result;
use crate::info_reader::InfoReader;
use octets::Uuid;

/// CIDs within the Basic-Connect service (spec.md §GLOSSARY "CID").
pub const CID_SUBSCRIBER_READY_STATUS: u32 = 2;
pub const CID_CONNECT: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationCommand {
    Deactivate,
    Activate,
}

impl ActivationCommand {
    fn as_u32(self) -> u32 {
        match self {
            ActivationCommand::Deactivate => 0,
            ActivationCommand::Activate => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthProtocol {
    None,
    Pap,
    Chap,
    MsChapV2,
}

impl AuthProtocol {
    fn as_u32(self) -> u32 {
        match self {
            AuthProtocol::None => 0,
            AuthProtocol::Pap => 1,
            AuthProtocol::Chap => 2,
            AuthProtocol::MsChapV2 => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpType {
    Default,
    Ipv4,
    Ipv6,
    Ipv4v6,
    Ipv4AndIpv6,
}

impl IpType {
    fn as_u32(self) -> u32 {
        match self {
            IpType::Default => 0,
            IpType::Ipv4 => 1,
            IpType::Ipv6 => 2,
            IpType::Ipv4v6 => 3,
            IpType::Ipv4AndIpv6 => 4,
        }
    }
}

/// The `SET_CONNECT` command payload (spec.md §8 scenario 2).
#[derive(Debug, Clone)]
pub struct ConnectSet {
    pub session_id: u32,
    pub activation: ActivationCommand,
    pub access_string: String,
    pub username: String,
    pub password: String,
    pub compression: u32,
    pub auth: AuthProtocol,
    pub ip_type: IpType,
    pub context_type: Uuid,
}

impl ConnectSet {
    pub fn to_info_buffer(&self) -> Vec<u8> {
        let mut b = Builder::new();
        b.append_u32(self.session_id);
        b.append_u32(self.activation.as_u32());
        b.append_string(&self.access_string);
        b.append_string(&self.username);
        b.append_string(&self.password);
        b.append_u32(self.compression);
        b.append_u32(self.auth.as_u32());
        b.append_u32(self.ip_type.as_u32());
        b.append_uuid(&self.context_type);
        b.complete()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    NotInitialized,
    Initialized,
    SimNotInserted,
    BadSim,
}

impl ReadyState {
    fn from_u32(value: u32) -> ReadyState {
        match value {
            1 => ReadyState::Initialized,
            2 => ReadyState::SimNotInserted,
            3 => ReadyState::BadSim,
            _ => ReadyState::NotInitialized,
        }
    }
}

/// The parsed `SUBSCRIBER_READY_STATUS` indication/response payload (spec.md §8
/// scenario 6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberReadyStatus {
    pub ready_state: ReadyState,
    pub subscriber_id: String,
    pub sim_iccid: String,
    pub ready_info: u32,
    pub telephone_numbers: Vec<String>,
}

impl SubscriberReadyStatus {
    pub fn parse(info_buffer: &[u8]) -> Result<SubscriberReadyStatus> {
        let mut r = InfoReader::new(info_buffer);
        let ready_state = ReadyState::from_u32(r.read_u32()?);
        let subscriber_id = r.read_string()?;
        let sim_iccid = r.read_string()?;
        let ready_info = r.read_u32()?;
        let count = r.read_u32()? as usize;
        let mut telephone_numbers = Vec::with_capacity(count);
        for _ in 0..count {
            telephone_numbers.push(r.read_string()?);
        }

        Ok(SubscriberReadyStatus {
            ready_state,
            subscriber_id,
            sim_iccid,
            ready_info,
            telephone_numbers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{CommandType, COMMON_HEADER_SIZE, FRAGMENT_HEADER_SIZE};
    use crate::message::Message;
    use crate::service::Service;

    #[test]
    fn scenario_2_connect_set_matches_expected_length_and_layout() {
        let connect = ConnectSet {
            session_id: 1,
            activation: ActivationCommand::Activate,
            access_string: "internet".to_string(),
            username: String::new(),
            password: String::new(),
            compression: 0,
            auth: AuthProtocol::Pap,
            ip_type: IpType::Ipv4,
            context_type: "7e5e2a7e-4e6f-7272-736d-656e74212121".parse().unwrap(),
        };
        let info_buffer = connect.to_info_buffer();

        assert_eq!(u32::from_le_bytes([info_buffer[8], info_buffer[9], info_buffer[10], info_buffer[11]]), 0x3c);
        assert_eq!(u32::from_le_bytes([info_buffer[12], info_buffer[13], info_buffer[14], info_buffer[15]]), 0x10);

        let header = crate::header::Header::Command {
            transaction: 1,
            fragment_total: 1,
            fragment_current: 0,
            service: Service::BasicConnect,
            cid: CID_CONNECT,
            command_type: CommandType::Set,
            buffer_length: 0,
        };
        let msg = Message::assemble(header, info_buffer);
        let total_len = COMMON_HEADER_SIZE + FRAGMENT_HEADER_SIZE + 16 + 4 + 4 + 4 + msg.info_buffer().len();
        assert_eq!(msg.len(), total_len);
        assert_eq!(msg.len(), 0x7c);
    }

    #[test]
    fn scenario_6_subscriber_ready_status_parses_expected_fields() {
        let mut b = Builder::new();
        b.append_u32(1); // Initialized
        b.append_string("310410000110761");
        b.append_string("89010104054601100612");
        b.append_u32(0);
        b.append_u32(2);
        b.append_string("11111111111");
        b.append_string("00000000000");
        let info_buffer = b.complete();

        let status = SubscriberReadyStatus::parse(&info_buffer).unwrap();
        assert_eq!(status.ready_state, ReadyState::Initialized);
        assert_eq!(status.subscriber_id, "310410000110761");
        assert_eq!(status.sim_iccid, "89010104054601100612");
        assert_eq!(status.telephone_numbers, vec!["11111111111".to_string(), "00000000000".to_string()]);
    }
}
