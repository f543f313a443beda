//! MBIM (Mobile Broadband Interface Model) control-protocol codec and client engine:
//! wire-format framing, fragmentation, transaction matching, client multiplexing and
//! subscription merging (spec.md §1–§9, MBIM half).

pub mod builder;
pub mod client;
pub mod error;
pub mod fragment;
pub mod header;
pub mod info_reader;
pub mod message;
pub mod service;
pub mod services;
pub mod subscribe;
pub mod tlv_ext;
pub mod transaction;

pub use client::{ClientHandle, ClientRegistry};
pub use error::{Error, ProtocolError, Result, StatusError};
pub use fragment::{split, Reassembler};
pub use header::{CommandType, Header, MessageType};
pub use message::Message;
pub use service::Service;
pub use subscribe::{SubscriptionEntry, SubscriptionList};
pub use transaction::{Pending, TransactionManager};

/// A bidirectional byte-stream transport, matching the teacher's reliance on bare
/// `io::Read + io::Write` objects rather than a bespoke async I/O trait (spec.md §6).
pub trait Transport: std::io::Read + std::io::Write + Send {}
impl<T: std::io::Read + std::io::Write + Send> Transport for T {}
