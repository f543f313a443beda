use crate::error::{Error, Result};
use crate::service::Service;
use octets::CoreError;
use std::collections::HashMap;
use std::time::Duration;

/// One multiplexed user of a non-Basic-Connect service, identified by the `(service,
/// client-id)` pair the control exchange returned (spec.md §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientHandle {
    pub service: Service,
    pub cid: u32,
}

/// Maps `(service, client-id) -> Client` (spec.md §4.6). Bootstrapping and teardown are
/// two-step exchanges on the control channel; this registry only tracks the outcome.
pub struct ClientRegistry {
    clients: HashMap<ClientHandle, ()>,
    log: octets::logging::Logger,
}

impl ClientRegistry {
    pub fn new(log: octets::logging::Logger) -> ClientRegistry {
        ClientRegistry {
            clients: HashMap::new(),
            log,
        }
    }

    /// Records a successful `AllocateClientId` exchange. The reply's echoed service must
    /// match the request; a mismatch is a protocol-level bug, not a registry concern, so
    /// callers are expected to have already validated it before calling this.
    pub fn register(&mut self, handle: ClientHandle) {
        self.clients.insert(handle, ());
    }

    /// Records a `ReleaseClientId` exchange, successful or not — released ids are
    /// forgotten regardless (spec.md §4.6: "released ids are forgotten even if release
    /// fails").
    pub fn forget(&mut self, handle: ClientHandle) {
        if self.clients.remove(&handle).is_none() {
            octets::logging::debug!(self.log, "forget of unregistered handle"; "service" => ?handle.service, "cid" => handle.cid);
        }
    }

    pub fn is_registered(&self, handle: ClientHandle) -> bool {
        self.clients.contains_key(&handle)
    }

    /// Looks up an inbound message's destination. An unknown `(service, client-id)` is
    /// logged and dropped by the caller, not treated as an error here.
    pub fn lookup(&self, handle: ClientHandle) -> Option<()> {
        let found = self.clients.get(&handle).copied();
        if found.is_none() {
            octets::logging::debug!(self.log, "lookup of unregistered handle"; "service" => ?handle.service, "cid" => handle.cid);
        }
        found
    }

    pub fn handles(&self) -> impl Iterator<Item = &ClientHandle> {
        self.clients.keys()
    }

    /// Releases every outstanding client id, giving each release exchange up to
    /// `per_release_timeout` before moving on regardless of the outcome (spec.md §4.6:
    /// "attempts to release every outstanding client id with a bounded timeout").
    pub fn shutdown<F>(&mut self, per_release_timeout: Duration, mut release: F)
    where
        F: FnMut(ClientHandle, Duration) -> Result<()>,
    {
        let handles: Vec<ClientHandle> = self.clients.keys().copied().collect();
        for handle in handles {
            let _ = release(handle, per_release_timeout);
            self.clients.remove(&handle);
        }
    }
}

/// Validates that an `AllocateClientId` reply echoes the requested service (spec.md
/// §4.6: "must echo the requested service"); allocation failure is surfaced with the
/// protocol status preserved.
pub fn validate_allocation(requested: Service, echoed_service: Service, status_ok: bool) -> Result<()> {
    if !status_ok {
        return Err(Error::Core(CoreError::Failed));
    }
    if echoed_service != requested {
        return Err(Error::Core(CoreError::InvalidMessage(format!(
            "AllocateClientId echoed {:?}, requested {:?}",
            echoed_service, requested
        ))));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_then_lookup_then_forget() {
        let mut registry = ClientRegistry::new(octets::logging::discard());
        let handle = ClientHandle {
            service: Service::Sms,
            cid: 3,
        };
        assert!(!registry.is_registered(handle));

        registry.register(handle);
        assert!(registry.is_registered(handle));

        registry.forget(handle);
        assert!(!registry.is_registered(handle));
    }

    #[test]
    fn shutdown_releases_and_forgets_every_handle_even_on_failure() {
        let mut registry = ClientRegistry::new(octets::logging::discard());
        registry.register(ClientHandle { service: Service::Sms, cid: 1 });
        registry.register(ClientHandle { service: Service::Ussd, cid: 2 });

        let mut attempts = 0;
        registry.shutdown(Duration::from_millis(1), |_, _| {
            attempts += 1;
            Err(Error::Core(CoreError::Timeout))
        });

        assert_eq!(attempts, 2);
        assert_eq!(registry.handles().count(), 0);
    }

    #[test]
    fn validate_allocation_rejects_service_mismatch() {
        let err = validate_allocation(Service::Sms, Service::Ussd, true).unwrap_err();
        assert!(matches!(err, Error::Core(CoreError::InvalidMessage(_))));
    }

    #[test]
    fn validate_allocation_surfaces_failed_status() {
        let err = validate_allocation(Service::Sms, Service::Sms, false).unwrap_err();
        assert_eq!(err, Error::Core(CoreError::Failed));
    }
}
