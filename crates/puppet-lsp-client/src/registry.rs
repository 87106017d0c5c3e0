//! Bookkeeping for dynamic capability registrations.
//!
//! Every register or unregister request is tracked per method as an attempt.
//! Attempts move from pending to complete when the client answers, and are
//! dropped once the client confirms they were unregistered.

use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

/// Identity of a single registration, echoed back when unregistering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(String);

impl RegistrationId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RegistrationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RegistrationId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Progress of a registration or unregistration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    /// A request is in flight and the client has not answered yet.
    Pending,
    /// The client answered the last request for this attempt.
    Complete,
}

/// One attempt to register a capability with the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationAttempt {
    id: Option<RegistrationId>,
    registered: bool,
    state: RegistrationState,
}

impl RegistrationAttempt {
    fn pending(id: RegistrationId) -> Self {
        Self {
            id: Some(id),
            registered: false,
            state: RegistrationState::Pending,
        }
    }

    /// The record reported for a method that was never registered.
    #[must_use]
    pub const fn never_registered() -> Self {
        Self {
            id: None,
            registered: false,
            state: RegistrationState::Complete,
        }
    }

    /// Identifier of the attempt; `None` only for [`Self::never_registered`].
    #[must_use]
    pub fn id(&self) -> Option<&RegistrationId> {
        self.id.as_ref()
    }

    /// Whether the client confirmed the registration.
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        self.registered
    }

    /// Current request state.
    #[must_use]
    pub const fn state(&self) -> RegistrationState {
        self.state
    }

    /// Whether a request for this attempt is awaiting a response.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.state, RegistrationState::Pending)
    }

    /// A completed attempt the client never accepted has nothing to undo.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self.state, RegistrationState::Complete) && !self.registered
    }

    pub(crate) const fn mark_pending(&mut self) {
        self.state = RegistrationState::Pending;
    }

    fn has_id(&self, id: &str) -> bool {
        self.id.as_ref().is_some_and(|own| own.as_str() == id)
    }
}

/// Registration attempts keyed by capability method, oldest first.
///
/// The registry performs no locking; it belongs to a single client session
/// and is mutated by one message loop.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    attempts: HashMap<String, Vec<RegistrationAttempt>>,
}

impl CapabilityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pending attempt for `method`.
    pub fn record_attempt(&mut self, method: &str, id: RegistrationId) {
        self.attempts
            .entry(method.to_owned())
            .or_default()
            .push(RegistrationAttempt::pending(id));
    }

    /// Returns the attempts for `method` in the order they were made.
    ///
    /// A method without attempts reports a single
    /// [`RegistrationAttempt::never_registered`] record.
    #[must_use]
    pub fn attempts_for(&self, method: &str) -> Vec<RegistrationAttempt> {
        match self.attempts.get(method) {
            Some(attempts) if !attempts.is_empty() => attempts.clone(),
            _ => vec![RegistrationAttempt::never_registered()],
        }
    }

    /// Whether any attempt for `method` is awaiting a response.
    #[must_use]
    pub fn has_pending(&self, method: &str) -> bool {
        self.attempts
            .get(method)
            .is_some_and(|attempts| attempts.iter().any(RegistrationAttempt::is_pending))
    }

    /// Marks the attempt complete with the client's verdict.
    ///
    /// Unknown methods or identifiers are ignored.
    pub fn mark_complete(&mut self, method: &str, id: &str, succeeded: bool) {
        if let Some(attempt) = self.find_mut(method, id) {
            attempt.state = RegistrationState::Complete;
            attempt.registered = succeeded;
        }
    }

    /// Deletes the attempt with `id`.
    pub fn remove(&mut self, method: &str, id: &str) {
        if let Some(attempts) = self.attempts.get_mut(method) {
            attempts.retain(|attempt| !attempt.has_id(id));
        }
    }

    /// Settles an attempt whose unregistration the client refused.
    ///
    /// A registered attempt stays registered and becomes complete again; an
    /// attempt that was never registered is deleted.
    pub fn settle_failed_unregistration(&mut self, method: &str, id: &str) {
        let Some(attempts) = self.attempts.get_mut(method) else {
            return;
        };
        attempts.retain(|attempt| !(attempt.has_id(id) && !attempt.registered));
        if let Some(attempt) = attempts.iter_mut().find(|attempt| attempt.has_id(id)) {
            attempt.state = RegistrationState::Complete;
        }
    }

    /// Mutable access to the attempts for `method`, if any were recorded.
    pub(crate) fn attempts_mut(&mut self, method: &str) -> Option<&mut Vec<RegistrationAttempt>> {
        self.attempts.get_mut(method)
    }

    pub(crate) fn set_state(&mut self, method: &str, id: &str, state: RegistrationState) {
        if let Some(attempt) = self.find_mut(method, id) {
            attempt.state = state;
        }
    }

    fn find_mut(&mut self, method: &str, id: &str) -> Option<&mut RegistrationAttempt> {
        self.attempts
            .get_mut(method)
            .and_then(|attempts| attempts.iter_mut().find(|attempt| attempt.has_id(id)))
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    const METHOD: &str = "textDocument/onTypeFormatting";

    #[fixture]
    fn registry() -> CapabilityRegistry {
        CapabilityRegistry::new()
    }

    #[rstest]
    fn unknown_method_reports_never_registered(registry: CapabilityRegistry) {
        let attempts = registry.attempts_for(METHOD);
        assert_eq!(attempts, vec![RegistrationAttempt::never_registered()]);
        assert!(attempts.iter().all(|attempt| attempt.id().is_none()));
    }

    #[rstest]
    fn emptied_method_reports_never_registered(mut registry: CapabilityRegistry) {
        registry.record_attempt(METHOD, RegistrationId::from("one"));
        registry.remove(METHOD, "one");
        assert_eq!(
            registry.attempts_for(METHOD),
            vec![RegistrationAttempt::never_registered()]
        );
    }

    #[rstest]
    fn records_pending_attempts_in_order(mut registry: CapabilityRegistry) {
        registry.record_attempt(METHOD, RegistrationId::from("one"));
        registry.record_attempt(METHOD, RegistrationId::from("two"));

        let attempts = registry.attempts_for(METHOD);
        let ids: Vec<_> = attempts
            .iter()
            .filter_map(|attempt| attempt.id().map(RegistrationId::as_str))
            .collect();
        assert_eq!(ids, ["one", "two"]);
        assert!(attempts.iter().all(RegistrationAttempt::is_pending));
        assert!(attempts.iter().all(|attempt| !attempt.is_registered()));
        assert!(registry.has_pending(METHOD));
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn mark_complete_records_verdict(mut registry: CapabilityRegistry, #[case] succeeded: bool) {
        registry.record_attempt(METHOD, RegistrationId::from("one"));
        registry.mark_complete(METHOD, "one", succeeded);

        let attempts = registry.attempts_for(METHOD);
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].state(), RegistrationState::Complete);
        assert_eq!(attempts[0].is_registered(), succeeded);
        assert!(!registry.has_pending(METHOD));
    }

    #[rstest]
    fn mark_complete_ignores_unknown_ids(mut registry: CapabilityRegistry) {
        registry.record_attempt(METHOD, RegistrationId::from("one"));
        registry.mark_complete(METHOD, "missing", true);
        registry.mark_complete("workspace/didChangeConfiguration", "one", true);

        assert!(registry.attempts_for(METHOD)[0].is_pending());
    }

    #[rstest]
    fn remove_only_drops_matching_attempt(mut registry: CapabilityRegistry) {
        registry.record_attempt(METHOD, RegistrationId::from("one"));
        registry.record_attempt(METHOD, RegistrationId::from("two"));
        registry.remove(METHOD, "one");

        let attempts = registry.attempts_for(METHOD);
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].id().map(RegistrationId::as_str), Some("two"));
    }

    #[rstest]
    fn failed_unregistration_keeps_registered_attempts(mut registry: CapabilityRegistry) {
        registry.record_attempt(METHOD, RegistrationId::from("one"));
        registry.mark_complete(METHOD, "one", true);
        registry.set_state(METHOD, "one", RegistrationState::Pending);

        registry.settle_failed_unregistration(METHOD, "one");

        let attempts = registry.attempts_for(METHOD);
        assert_eq!(attempts.len(), 1);
        assert!(attempts[0].is_registered());
        assert_eq!(attempts[0].state(), RegistrationState::Complete);
    }

    #[rstest]
    fn failed_unregistration_drops_unregistered_attempts(mut registry: CapabilityRegistry) {
        registry.record_attempt(METHOD, RegistrationId::from("one"));

        registry.settle_failed_unregistration(METHOD, "one");

        assert_eq!(
            registry.attempts_for(METHOD),
            vec![RegistrationAttempt::never_registered()]
        );
    }

    #[rstest]
    fn generated_ids_are_unique() {
        assert_ne!(RegistrationId::generate(), RegistrationId::generate());
    }
}
