use crate::error::Error;
use crate::header::{Header, MessageKind, CONTROL_SERVICE};
use crate::message::Message;
use crate::tlv;
use octets::CoreError;
use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Identifies one in-flight request the way its reply will be matched (spec.md §4.5,
/// shared design with the MBIM dialect): a map `(service, client, transaction) ->
/// Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Key {
    service: u8,
    client: u8,
    transaction: u16,
}

fn key_for(header: &Header) -> Key {
    Key {
        service: header.service,
        client: header.client,
        transaction: header.transaction,
    }
}

#[derive(Debug)]
struct Inner {
    table: Mutex<HashMap<Key, mpsc::Sender<Message>>>,
    counters: Mutex<HashMap<(u8, u8), u16>>,
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

    /// Monotonic per-(service, client) transaction id; wraps to 1 after reaching
    /// `ceiling`, never returns 0. The control service's transaction byte is 8 bits wide
    /// (ceiling `0xFF`); every other service is 16 bits wide (ceiling `0xFFFF`), per the
    /// sub-header widths in [`Header::header_len`].
    pub fn next_tx(&self, service: u8, client: u8, ceiling: u16) -> u16 {
        let mut counters = self.inner.counters.lock().expect("transaction table lock poisoned");
        let next = match counters.get(&(service, client)) {
            Some(&last) if last >= ceiling => 1,
            Some(&last) => last + 1,
            None => 1,
        };
        counters.insert((service, client), next);
        next
    }

    /// Serialises `msg`, registers a `Pending` entry, and writes it to `transport`. A
    /// non-control request with `client == 0` fails synchronously, mirroring the MBIM
    /// dialect's cid-0 rejection: no client has been allocated to receive the reply.
    pub fn send<T: std::io::Write>(&self, msg: Message, transport: &mut T) -> Result<Pending, Error> {
        let header = msg.header();
        if !header.is_control() && header.client == 0 {
            return Err(Error::Core(CoreError::InvalidArgs));
        }

        let key = key_for(header);
        let (tx, rx) = mpsc::channel();

        self.inner
            .table
            .lock()
            .expect("transaction table lock poisoned")
            .insert(key, tx);

        transport.write_all(msg.as_bytes()).map_err(|e| Error::Core(CoreError::InvalidMessage(e.to_string())))?;

        octets::logging::debug!(self.log, "sent message"; "transaction" => header.transaction);

        Ok(Pending {
            inner: Arc::clone(&self.inner),
            key,
            rx,
        })
    }

    /// Dispatches an inbound message: indications go to `on_indication`; replies
    /// matching a `Pending` entry complete and remove it (spec.md §4.5 `deliver`).
    pub fn deliver<F: FnOnce(Message)>(&self, msg: Message, on_indication: F) {
        if msg.header().kind == MessageKind::Indication {
            on_indication(msg);
            return;
        }

        let key = key_for(msg.header());
        let sender = self.inner.table.lock().expect("transaction table lock poisoned").remove(&key);
        if let Some(sender) = sender {
            let _ = sender.send(msg);
        } else {
            octets::logging::debug!(self.log, "dropping reply for unknown transaction");
        }
    }
}

/// A handle to one in-flight request's eventual reply (spec.md §4.5 `Future<Message>`,
/// resolved as a blocking `mpsc`-backed handle rather than introducing an async
/// runtime, matching the MBIM dialect).
#[derive(Debug)]
pub struct Pending {
    inner: Arc<Inner>,
    key: Key,
    rx: mpsc::Receiver<Message>,
}

impl Pending {
    /// Blocks up to `timeout` for the reply, decoding the universal result TLV if
    /// present (spec.md §4.2.2, §7). On timeout the table entry is removed.
    pub fn wait(self, timeout: Duration) -> Result<Message, Error> {
        match self.rx.recv_timeout(timeout) {
            Ok(msg) => {
                if let Err(err) = tlv::decode_result(msg.tlv_bytes()) {
                    if err != Error::Core(CoreError::TlvNotFound) {
                        return Err(err);
                    }
                }
                Ok(msg)
            }
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
