use crate::error::{Error, ProtocolError, StatusError};
use crate::header::Header;
use crate::message::Message;
use crate::service::Service;
use octets::CoreError;
use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Identifies one in-flight request the way its reply will be matched (spec.md §4.5:
/// "a map `(service, client, txid) -> Pending`"). Open/Close are matched purely by
/// transaction id since they carry no service/client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Key {
    Control { transaction: u32 },
    Command { service: Service, cid: u32, transaction: u32 },
}

fn key_for(header: &Header) -> Option<Key> {
    match header {
        Header::Open { transaction, .. } | Header::Close { transaction, .. } => {
            Some(Key::Control { transaction: *transaction })
        }
        Header::Command {
            service,
            cid,
            transaction,
            ..
        } => Some(Key::Command {
            service: *service,
            cid: *cid,
            transaction: *transaction,
        }),
        _ => None,
    }
}

#[derive(Debug)]
struct Inner {
    table: Mutex<HashMap<Key, mpsc::Sender<Message>>>,
    counters: Mutex<HashMap<u32, u16>>,
}

/// Keyed transaction table plus per-client counter (spec.md §4.5). Owned by the
/// transport task; callers interact with it only through [`TransactionManager::send`]
/// and the handle it returns.
pub struct TransactionManager {
    inner: Arc<Inner>,
    log: octets::logging::Logger,
}

impl TransactionManager {
    pub fn new(log: octets::logging::Logger) -> TransactionManager {
        TransactionManager {
            inner: Arc::new(Inner {
                table: Mutex::new(HashMap::new()),
                counters: Mutex::new(HashMap::new()),
            }),
            log,
        }
    }

    /// Monotonic per-client transaction id; wraps to 1 after reaching `ceiling`, never
    /// returns 0 (spec.md §4.5 `next_tx`). MBIM has no control/non-control split, so
    /// `ceiling` is `u16::MAX` for every caller of this dialect.
    pub fn next_tx(&self, client: u32, ceiling: u16) -> u16 {
        let mut counters = self.inner.counters.lock().expect("transaction table lock poisoned");
        let next = match counters.get(&client) {
            Some(&last) if last >= ceiling => 1,
            Some(&last) => last + 1,
            None => 1,
        };
        counters.insert(client, next);
        next
    }

    /// Serialises `msg`, registers a `Pending` entry, and writes it to `transport`. A
    /// `Command` with `cid == 0` fails synchronously with `InvalidArgs` (spec.md §4.5:
    /// "A send that cannot find a client id ... fails synchronously").
    pub fn send<T: std::io::Write>(&self, msg: Message, transport: &mut T) -> Result<Pending, Error> {
        if let Header::Command { cid: 0, .. } = msg.header() {
            return Err(Error::Core(CoreError::InvalidArgs));
        }

        let key = key_for(msg.header()).ok_or(Error::Core(CoreError::InvalidArgs))?;
        let (tx, rx) = mpsc::channel();

        self.inner
            .table
            .lock()
            .expect("transaction table lock poisoned")
            .insert(key, tx);

        transport.write_all(msg.as_bytes()).map_err(|e| Error::Core(CoreError::InvalidMessage(e.to_string())))?;

        octets::logging::debug!(self.log, "sent message"; "transaction" => msg.header().transaction());

        Ok(Pending {
            inner: Arc::clone(&self.inner),
            key,
            rx,
        })
    }

    /// Dispatches an inbound message: indications and un-keyed error frames go to
    /// `on_indication`; replies matching a `Pending` entry complete and remove it
    /// (spec.md §4.5 `deliver`).
    pub fn deliver<F: FnOnce(Message)>(&self, msg: Message, on_indication: F) {
        if msg.header().is_indication() || matches!(msg.header(), Header::HostError { .. } | Header::FunctionError { .. }) {
            on_indication(msg);
            return;
        }

        let key = match key_for(msg.header()) {
            Some(key) => key,
            None => {
                on_indication(msg);
                return;
            }
        };

        let sender = self.inner.table.lock().expect("transaction table lock poisoned").remove(&key);
        if let Some(sender) = sender {
            let _ = sender.send(msg);
        } else {
            octets::logging::debug!(self.log, "dropping reply for unknown transaction");
        }
    }
}

/// A handle to one in-flight request's eventual reply (spec.md §4.5 `Future<Message>`,
/// resolved per AMBIENT 4.5 as a blocking `mpsc`-backed handle rather than introducing
/// an async runtime).
#[derive(Debug)]
pub struct Pending {
    inner: Arc<Inner>,
    key: Key,
    rx: mpsc::Receiver<Message>,
}

impl Pending {
    /// Blocks up to `timeout` for the reply, decoding the three-layer result per spec.md
    /// §4.8. On timeout the table entry is removed and `Timeout` is returned.
    pub fn wait(self, timeout: Duration) -> Result<Message, Error> {
        match self.rx.recv_timeout(timeout) {
            Ok(msg) => decode_result(msg),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                self.inner.table.lock().expect("transaction table lock poisoned").remove(&self.key);
                Err(Error::Core(CoreError::Timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(Error::Core(CoreError::Aborted)),
        }
    }

    /// Removes the table entry and flags the transaction aborted. A cancellation racing
    /// with a reply may still observe the reply, or `Aborted`; both are permitted
    /// (spec.md §5 "Cancellation").
    pub fn cancel(self) {
        self.inner.table.lock().expect("transaction table lock poisoned").remove(&self.key);
    }
}

/// Inspects frame kind first, per spec.md §4.8: Function/Host error yields Protocol;
/// a Done frame with non-zero status yields Status; otherwise the payload is returned.
fn decode_result(msg: Message) -> Result<Message, Error> {
    match msg.header() {
        Header::HostError { error_status_code, .. } | Header::FunctionError { error_status_code, .. } => {
            Err(Error::Protocol(ProtocolError::from_code(*error_status_code)))
        }
        Header::OpenDone { status_code, .. } | Header::CloseDone { status_code, .. } if *status_code != 0 => {
            Err(Error::Status(StatusError::from_code(*status_code)))
        }
        Header::CommandDone { status_code, .. } if *status_code != 0 => Err(Error::Status(StatusError::from_code(*status_code))),
        _ => Ok(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::CommandType;

    #[test]
    fn next_tx_wraps_and_never_returns_zero() {
        let mgr = TransactionManager::new(octets::logging::discard());
        assert_eq!(mgr.next_tx(1, 3), 1);
        assert_eq!(mgr.next_tx(1, 3), 2);
        assert_eq!(mgr.next_tx(1, 3), 3);
        assert_eq!(mgr.next_tx(1, 3), 1);
        assert_eq!(mgr.next_tx(2, 3), 1, "counters are independent per client");
    }

    #[test]
    fn send_then_deliver_completes_pending() {
        let mgr = TransactionManager::new(octets::logging::discard());
        let header = Header::Command {
            transaction: 5,
            fragment_total: 1,
            fragment_current: 0,
            service: Service::BasicConnect,
            cid: 1,
            command_type: CommandType::Set,
            buffer_length: 0,
        };
        let request = Message::assemble(header, vec![1, 2, 3]);
        let mut sink: Vec<u8> = Vec::new();
        let pending = mgr.send(request, &mut sink).unwrap();

        let reply_header = Header::CommandDone {
            transaction: 5,
            fragment_total: 1,
            fragment_current: 0,
            service: Service::BasicConnect,
            cid: 1,
            status_code: 0,
            buffer_length: 0,
        };
        let reply = Message::assemble(reply_header, vec![9]);
        mgr.deliver(reply.clone(), |_| panic!("should match the pending transaction"));

        let resolved = pending.wait(Duration::from_secs(1)).unwrap();
        assert_eq!(resolved, reply);
    }

    #[test]
    fn non_zero_status_surfaces_as_status_error() {
        let mgr = TransactionManager::new(octets::logging::discard());
        let header = Header::Command {
            transaction: 6,
            fragment_total: 1,
            fragment_current: 0,
            service: Service::BasicConnect,
            cid: 1,
            command_type: CommandType::Query,
            buffer_length: 0,
        };
        let mut sink = Vec::new();
        let pending = mgr.send(Message::assemble(header, Vec::new()), &mut sink).unwrap();

        let reply_header = Header::CommandDone {
            transaction: 6,
            fragment_total: 1,
            fragment_current: 0,
            service: Service::BasicConnect,
            cid: 1,
            status_code: 5, // PinRequired
            buffer_length: 0,
        };
        mgr.deliver(Message::assemble(reply_header, Vec::new()), |_| unreachable!());

        let err = pending.wait(Duration::from_secs(1)).unwrap_err();
        assert_eq!(err, Error::Status(StatusError::PinRequired));
    }

    #[test]
    fn command_with_zero_cid_fails_synchronously() {
        let mgr = TransactionManager::new(octets::logging::discard());
        let header = Header::Command {
            transaction: 1,
            fragment_total: 1,
            fragment_current: 0,
            service: Service::BasicConnect,
            cid: 0,
            command_type: CommandType::Set,
            buffer_length: 0,
        };
        let mut sink = Vec::new();
        let err = mgr.send(Message::assemble(header, Vec::new()), &mut sink).unwrap_err();
        assert_eq!(err, Error::Core(CoreError::InvalidArgs));
    }

    #[test]
    fn timeout_removes_the_table_entry() {
        let mgr = TransactionManager::new(octets::logging::discard());
        let header = Header::Close { transaction: 2 };
        let mut sink = Vec::new();
        let pending = mgr.send(Message::from_header(header), &mut sink).unwrap();

        let err = pending.wait(Duration::from_millis(10)).unwrap_err();
        assert_eq!(err, Error::Core(CoreError::Timeout));

        // a late reply for the same key finds nothing to deliver to
        mgr.deliver(Message::from_header(Header::CloseDone { transaction: 2, status_code: 0 }), |_| {
            unreachable!("no subscriber registered")
        });
    }
}
