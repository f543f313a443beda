use octets::Uuid;
use std::str::FromStr;

/// A standard MBIM service, or a custom one identified only by its UUID (spec.md §3
/// "Service Identity": "maps to a closed set of standard services plus a registry of
/// custom ones").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    BasicConnect,
    Sms,
    Ussd,
    Phonebook,
    Stk,
    Auth,
    Dss,
    Custom(Uuid),
}

macro_rules! standard_uuid {
    ($name:ident, $text:expr) => {
        pub fn $name() -> Uuid {
            Uuid::from_str($text).expect("well-formed constant uuid")
        }
    };
}

standard_uuid!(uuid_basic_connect, "a289cc33-bcbb-8b4f-b6b0-133ec2aae6df");
standard_uuid!(uuid_sms, "533fbeeb-14fe-4467-9f90-33a223e56c3f");
standard_uuid!(uuid_ussd, "e550a0c8-5e82-479e-82f7-10abf4c3351f");
standard_uuid!(uuid_phonebook, "4bf38476-1e6a-41db-b1d8-bed289c25bdb");
standard_uuid!(uuid_stk, "d8f20131-fcb5-4e17-8602-d6ed3816164c");
standard_uuid!(uuid_auth, "1d2b5ff7-0aa1-48b2-aa52-50f15767174e");
standard_uuid!(uuid_dss, "c08a26dd-7718-4382-8482-6e0d583c4d0e");

impl Service {
    pub fn uuid(self) -> Uuid {
        match self {
            Service::BasicConnect => uuid_basic_connect(),
            Service::Sms => uuid_sms(),
            Service::Ussd => uuid_ussd(),
            Service::Phonebook => uuid_phonebook(),
            Service::Stk => uuid_stk(),
            Service::Auth => uuid_auth(),
            Service::Dss => uuid_dss(),
            Service::Custom(uuid) => uuid,
        }
    }

    pub fn from_uuid(uuid: Uuid) -> Service {
        if uuid == uuid_basic_connect() {
            Service::BasicConnect
        } else if uuid == uuid_sms() {
            Service::Sms
        } else if uuid == uuid_ussd() {
            Service::Ussd
        } else if uuid == uuid_phonebook() {
            Service::Phonebook
        } else if uuid == uuid_stk() {
            Service::Stk
        } else if uuid == uuid_auth() {
            Service::Auth
        } else if uuid == uuid_dss() {
            Service::Dss
        } else {
            Service::Custom(uuid)
        }
    }

    /// Whether this is one of the fixed standard services (spec.md §4.7: "Standard,
    /// well-known services are never merged from downstream additions").
    pub fn is_standard(self) -> bool {
        !matches!(self, Service::Custom(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_standard_uuids() {
        for service in [
            Service::BasicConnect,
            Service::Sms,
            Service::Ussd,
            Service::Phonebook,
            Service::Stk,
            Service::Auth,
            Service::Dss,
        ] {
            assert_eq!(Service::from_uuid(service.uuid()), service);
            assert!(service.is_standard());
        }
    }

    #[test]
    fn unknown_uuid_is_custom() {
        let uuid = Uuid::from_str("00000000-0000-0000-0000-000000000001").unwrap();
        assert_eq!(Service::from_uuid(uuid), Service::Custom(uuid));
        assert!(!Service::Custom(uuid).is_standard());
    }
}
