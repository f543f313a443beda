//! QMI (Qualcomm MSM Interface) control-protocol codec and client engine: QMUX wire
//! framing, TLV codec, transaction matching and service/client multiplexing (spec.md
//! §1–§9, QMI half).

pub mod client;
pub mod error;
pub mod header;
pub mod message;
pub mod services;
pub mod tlv;
pub mod transaction;

pub use client::{ClientHandle, ClientRegistry};
pub use error::{Error, ProtocolError, Result, StatusError};
pub use header::{Header, MessageKind};
pub use message::Message;
pub use services::ctl::ServiceType;
pub use transaction::{Pending, TransactionManager};

/// A bidirectional byte-stream transport, matching the teacher's reliance on bare
/// `io::Read + io::Write` objects rather than a bespoke async I/O trait (spec.md §6).
pub trait Transport: std::io::Read + std::io::Write + Send {}
impl<T: std::io::Read + std::io::Write + Send> Transport for T {}
