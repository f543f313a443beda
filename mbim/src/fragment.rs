use crate::error::{Error, ProtocolError};
use crate::header::{MessageType, COMMON_HEADER_SIZE, FRAGMENT_HEADER_SIZE};
use crate::message::Message;
use std::collections::HashMap;

const PREFIX_SIZE: usize = COMMON_HEADER_SIZE + FRAGMENT_HEADER_SIZE;

/// Reads the 20-byte common+fragment header that every wire fragment carries,
/// regardless of message kind: `type:u32, length:u32, transaction:u32,
/// fragment_total:u32, fragment_current:u32` (spec.md §4.4). Only these 20 bytes are
/// meaningful in isolation — the bytes that follow are an opaque slice of the logical
/// message's payload and are not independently parseable as a sub-header except on the
/// first fragment of a sequence.
fn parse_prefix(buf: &[u8]) -> Result<(u32, u32, u32, u32), Error> {
    let r = octets::Reader::new(buf);
    let message_type_raw = r.u32_le(0)?;
    let transaction = r.u32_le(8)?;
    let fragment_total = r.u32_le(COMMON_HEADER_SIZE)?;
    let fragment_current = r.u32_le(COMMON_HEADER_SIZE + 4)?;
    Ok((message_type_raw, transaction, fragment_total, fragment_current))
}

/// Splits `msg` into raw on-wire fragments no larger than `max_transfer` bytes each
/// (spec.md §4.4). Each fragment carries only the 20-byte common+fragment header
/// followed by its slice of `msg`'s payload — it is not a standalone `Message` and
/// must not be run through [`Message::parse`] except when `total == 1`. Messages
/// already within the limit are returned unchanged as a single-element vector.
pub fn split(msg: &Message, max_transfer: usize) -> Vec<Vec<u8>> {
    if msg.len() <= max_transfer || !msg.header().message_type().is_fragmentable() {
        return vec![msg.as_bytes().to_vec()];
    }

    let payload_per = max_transfer - PREFIX_SIZE;
    let payload = &msg.as_bytes()[PREFIX_SIZE..];
    let total = (payload.len() + payload_per - 1) / payload_per;
    let message_type = msg.header().message_type().as_u32();
    let transaction = msg.header().transaction();

    (0..total)
        .map(|i| {
            let start = i * payload_per;
            let end = (start + payload_per).min(payload.len());
            let slice = &payload[start..end];

            let mut w = octets::Writer::new();
            w.u32_le(message_type);
            w.u32_le((PREFIX_SIZE + slice.len()) as u32);
            w.u32_le(transaction);
            w.u32_le(total as u32);
            w.u32_le(i as u32);
            w.bytes(slice);
            w.into_vec()
        })
        .collect()
}

/// Keys a partial reassembly by the fields that must stay constant across all of one
/// logical message's fragments (spec.md §5: "Fragments of one transaction must arrive
/// contiguously").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ReassemblyKey {
    transaction: u32,
}

struct Partial {
    total: u32,
    next: u32,
    message_type_raw: u32,
    transaction: u32,
    payload: Vec<u8>,
}

/// Accumulates raw on-wire fragments belonging to one or more in-flight logical
/// messages and produces a reassembled [`Message`] once the final fragment of a
/// transaction arrives (spec.md §4.4 "Reassembly").
#[derive(Default)]
pub struct Reassembler {
    partials: HashMap<ReassemblyKey, Partial>,
}

impl Reassembler {
    pub fn new() -> Reassembler {
        Reassembler {
            partials: HashMap::new(),
        }
    }

    /// Feeds one raw wire fragment in. Returns `Ok(Some(message))` once the final
    /// fragment of its transaction has arrived, `Ok(None)` while reassembly is still
    /// pending, and `Err(FragmentOutOfSequence)` on an out-of-order or mismatched
    /// fragment — in which case the partial reassembly for that transaction is
    /// discarded (spec.md §8: "no partial message leaks").
    ///
    /// The first 28 bytes following a fragment 0's common+fragment header are the
    /// reconstructed service sub-header (service uuid, cid, command_type/status_code,
    /// buffer_length); this function never interprets them, it only accumulates raw
    /// bytes, leaving that interpretation to [`Message::parse`] once reassembly
    /// completes.
    pub fn feed(&mut self, fragment: &[u8]) -> Result<Option<Message>, Error> {
        let (message_type_raw, transaction, total, current) = parse_prefix(fragment)?;

        if total <= 1 {
            return Message::parse(fragment.to_vec()).map(Some);
        }

        let key = ReassemblyKey { transaction };

        if current == 0 {
            self.partials.insert(
                key,
                Partial {
                    total,
                    next: 1,
                    message_type_raw,
                    transaction,
                    payload: fragment[PREFIX_SIZE..].to_vec(),
                },
            );
            return self.complete_if_done(key);
        }

        let out_of_sequence = match self.partials.get(&key) {
            Some(partial) => partial.total != total || partial.next != current,
            None => true,
        };

        if out_of_sequence {
            self.partials.remove(&key);
            return Err(Error::Protocol(ProtocolError::FragmentOutOfSequence));
        }

        let partial = self.partials.get_mut(&key).expect("checked present above");
        partial.payload.extend_from_slice(&fragment[PREFIX_SIZE..]);
        partial.next += 1;

        self.complete_if_done(key)
    }

    fn complete_if_done(&mut self, key: ReassemblyKey) -> Result<Option<Message>, Error> {
        let done = match self.partials.get(&key) {
            Some(partial) => partial.next == partial.total,
            None => false,
        };

        if !done {
            return Ok(None);
        }

        let partial = self.partials.remove(&key).expect("checked present above");
        let total_len = PREFIX_SIZE + partial.payload.len();

        let mut w = octets::Writer::new();
        w.u32_le(partial.message_type_raw);
        w.u32_le(total_len as u32);
        w.u32_le(partial.transaction);
        w.u32_le(1); // fragment_total
        w.u32_le(0); // fragment_current
        w.bytes(&partial.payload);

        Message::parse(w.into_vec()).map(Some)
    }

    /// Discards every partial reassembly, for transport shutdown or a transaction
    /// timeout (spec.md §4.4: "Partial reassemblies must be reclaimed when the transport
    /// closes or when the owning transaction times out.").
    pub fn clear(&mut self) {
        self.partials.clear();
    }

    pub fn discard(&mut self, transaction: u32) {
        self.partials.remove(&ReassemblyKey { transaction });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{CommandType, Header};
    use crate::service::Service;

    /// A synthetic raw wire fragment for exercising the out-of-sequence rejection path,
    /// which never reaches `Message::parse` and so does not need a real service
    /// sub-header embedded in its tail.
    fn synthetic_fragment(transaction: u32, total: u32, current: u32, payload: &[u8]) -> Vec<u8> {
        let mut w = octets::Writer::new();
        w.u32_le(MessageType::CommandDone.as_u32());
        w.u32_le((PREFIX_SIZE + payload.len()) as u32);
        w.u32_le(transaction);
        w.u32_le(total);
        w.u32_le(current);
        w.bytes(payload);
        w.into_vec()
    }

    #[test]
    fn split_emits_fragments_that_reparse_to_the_declared_size_and_index() {
        let header = Header::Command {
            transaction: 1,
            fragment_total: 1,
            fragment_current: 0,
            service: Service::BasicConnect,
            cid: 1,
            command_type: CommandType::Set,
            buffer_length: 0,
        };
        let payload = vec![0xabu8; 100];
        let msg = Message::assemble(header, payload);

        let max_transfer = PREFIX_SIZE + 40;
        let fragments = split(&msg, max_transfer);
        let expected_total = fragments.len() as u32;
        assert!(expected_total > 1, "message must actually need fragmenting");

        for (i, frag) in fragments.iter().enumerate() {
            assert!(frag.len() <= max_transfer);
            let (message_type_raw, transaction, total, current) = parse_prefix(frag).unwrap();
            assert_eq!(message_type_raw, MessageType::Command.as_u32());
            assert_eq!(transaction, 1);
            assert_eq!(total, expected_total);
            assert_eq!(current, i as u32);
        }
    }

    #[test]
    fn split_then_reassemble_round_trips_payload() {
        let header = Header::Command {
            transaction: 1,
            fragment_total: 1,
            fragment_current: 0,
            service: Service::BasicConnect,
            cid: 1,
            command_type: CommandType::Set,
            buffer_length: 0,
        };
        let payload = vec![0xabu8; 100];
        let msg = Message::assemble(header, payload.clone());

        let fragments = split(&msg, PREFIX_SIZE + 40);
        assert!(fragments.len() > 1);

        let mut reassembler = Reassembler::new();
        let mut result = None;
        for frag in &fragments {
            result = reassembler.feed(frag).unwrap();
        }
        let reassembled = result.expect("final fragment completes the message");
        assert_eq!(reassembled.info_buffer(), &payload[..]);
        assert_eq!(reassembled.header().fragment(), Some((1, 0)));
    }

    #[test]
    fn scenario_5_reassembles_two_fragments_and_rewrites_header() {
        // spec.md §8 scenario 5: a Command-Done fragmented so the first fragment
        // carries payload "A…" and the second carries payload "B…"; the collector
        // must yield a Command-Done whose payload is the concatenation, with the
        // fragment header rewritten to total=1, current=0.
        let a = b"A fragment payload";
        let b = b"B fragment payload";
        let mut full_payload = a.to_vec();
        full_payload.extend_from_slice(b);

        let header = Header::CommandDone {
            transaction: 9,
            fragment_total: 1,
            fragment_current: 0,
            service: Service::BasicConnect,
            cid: 1,
            status_code: 0,
            buffer_length: 0,
        };
        let msg = Message::assemble(header, full_payload.clone());

        // size max_transfer so the real service sub-header plus `a` exactly fills the
        // first fragment, leaving `b` alone in the second.
        let service_header_len = msg.header().info_buffer_offset() - PREFIX_SIZE;
        let payload_per = service_header_len + a.len();
        let fragments = split(&msg, PREFIX_SIZE + payload_per);
        assert_eq!(fragments.len(), 2);

        let mut reassembler = Reassembler::new();
        assert!(reassembler.feed(&fragments[0]).unwrap().is_none());
        let reassembled = reassembler.feed(&fragments[1]).unwrap().unwrap();

        assert_eq!(reassembled.info_buffer(), &full_payload[..]);
        assert_eq!(reassembled.header().fragment(), Some((1, 0)));
        assert_eq!(reassembled.header().buffer_length(), full_payload.len());
        assert_eq!(reassembled, msg);
    }

    #[test]
    fn out_of_order_fragment_is_rejected_and_discarded() {
        let mut reassembler = Reassembler::new();
        reassembler.feed(&synthetic_fragment(1, 2, 0, b"first")).unwrap();

        let err = reassembler.feed(&synthetic_fragment(1, 2, 1 + 1, b"skip")).unwrap_err();
        assert_eq!(err, Error::Protocol(ProtocolError::FragmentOutOfSequence));

        // the partial must have been discarded, not left dangling
        assert!(reassembler.feed(&synthetic_fragment(1, 2, 1, b"late")).is_err());
    }

    #[test]
    fn unfragmented_message_passes_through_split_unchanged() {
        let header = Header::Close { transaction: 4 };
        let msg = Message::from_header(header);
        let fragments = split(&msg, 1);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0], msg.as_bytes());
    }
}
