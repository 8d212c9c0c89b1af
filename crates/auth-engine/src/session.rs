//! Session bootstrap with FSM-tracked progress.
//!
//! The `SessionManager` resolves an identity exactly once: it tries the
//! supplied token first, falls back to an anonymous identity on any token
//! failure, and ends either signed in or permanently unauthenticated.
//! Consumers watch [`SessionState`] through a `tokio::sync::watch` channel.

use crate::bootstrap_fsm::{BootstrapInput, BootstrapMachine, BootstrapPhase};
use crate::{AuthBackend, AuthError, AuthResult, Identity, Role};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{watch, OnceCell};
use tracing::{debug, error, info, warn};

/// What consumers of the session observe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Flips to true once, after the first resolution.
    pub ready: bool,
    /// `None` before resolution and after a failed bootstrap.
    pub identity: Option<Identity>,
}

impl SessionState {
    /// A resolved state carrying `identity`.
    pub fn resolved(identity: Option<Identity>) -> Self {
        Self {
            ready: true,
            identity,
        }
    }
}

/// Owns the identity bootstrap and publishes its outcome.
pub struct SessionManager {
    backend: Arc<dyn AuthBackend>,
    fsm: Mutex<BootstrapMachine>,
    resolved: OnceCell<Option<Identity>>,
    state_tx: watch::Sender<SessionState>,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::default());
        Self {
            backend,
            fsm: Mutex::new(BootstrapMachine::new()),
            resolved: OnceCell::new(),
            state_tx,
        }
    }

    /// Receiver for session state changes. The current value is available
    /// immediately through `borrow()`.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.state_tx.borrow().ready
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state_tx.borrow().identity.clone()
    }

    /// Role of the current identity, `None` while unauthenticated.
    pub fn role(&self) -> Option<Role> {
        self.state_tx.borrow().identity.as_ref().map(Identity::role)
    }

    pub fn phase(&self) -> BootstrapPhase {
        BootstrapPhase::from(self.fsm.lock().state())
    }

    /// Resolve the session identity.
    ///
    /// Runs once per manager; later and concurrent calls wait for and return
    /// the first outcome. Token failures are logged and never surfaced.
    pub async fn bootstrap(&self, token: Option<&str>) -> Option<Identity> {
        self.resolved
            .get_or_init(|| self.run_bootstrap(token))
            .await
            .clone()
    }

    async fn run_bootstrap(&self, token: Option<&str>) -> Option<Identity> {
        let identity = match self.resolve(token).await {
            Ok(identity) => identity,
            Err(e) => {
                // Only reachable through an FSM bug; end unauthenticated.
                error!(error = %e, "Session bootstrap aborted");
                None
            }
        };

        match &identity {
            Some(identity) => info!(
                user_id = %identity.user_id,
                anonymous = identity.anonymous,
                role = ?identity.role(),
                "Session ready"
            ),
            None => warn!("Session ready without an identity"),
        }

        self.state_tx
            .send_replace(SessionState::resolved(identity.clone()));
        identity
    }

    async fn resolve(&self, token: Option<&str>) -> AuthResult<Option<Identity>> {
        let token = token.map(str::trim).filter(|t| !t.is_empty());

        if let Some(token) = token {
            self.transition(&BootstrapInput::TokenProvided)?;
            match self.backend.sign_in_with_token(token).await {
                Ok(identity) => {
                    self.transition(&BootstrapInput::TokenAccepted)?;
                    return Ok(Some(identity));
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        transient = e.is_transient(),
                        "Token sign-in failed, falling back to anonymous"
                    );
                    self.transition(&BootstrapInput::TokenRejected)?;
                }
            }
        } else {
            self.transition(&BootstrapInput::NoToken)?;
        }

        match self.backend.sign_in_anonymously().await {
            Ok(identity) => {
                self.transition(&BootstrapInput::AnonymousAccepted)?;
                Ok(Some(identity))
            }
            Err(e) => {
                error!(error = %e, "Anonymous sign-in failed");
                self.transition(&BootstrapInput::AnonymousRejected)?;
                Ok(None)
            }
        }
    }

    fn transition(&self, input: &BootstrapInput) -> AuthResult<BootstrapPhase> {
        let mut fsm = self.fsm.lock();
        let old_phase = BootstrapPhase::from(fsm.state());

        fsm.consume(input).map_err(|_| {
            AuthError::InvalidStateTransition(format!(
                "Cannot apply {:?} in state {:?}",
                input,
                fsm.state()
            ))
        })?;

        let new_phase = BootstrapPhase::from(fsm.state());
        debug!(old_phase = ?old_phase, new_phase = ?new_phase, "Bootstrap transition");
        Ok(new_phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeBackend {
        accept_token: bool,
        accept_anonymous: bool,
        token_calls: AtomicUsize,
        anonymous_calls: AtomicUsize,
    }

    #[async_trait]
    impl AuthBackend for FakeBackend {
        async fn sign_in_with_token(&self, token: &str) -> AuthResult<Identity> {
            self.token_calls.fetch_add(1, Ordering::SeqCst);
            if self.accept_token {
                Ok(Identity::new("user-from-token", Some(token.to_string()), false))
            } else {
                Err(AuthError::Rejected {
                    status: 401,
                    message: "bad token".to_string(),
                })
            }
        }

        async fn sign_in_anonymously(&self) -> AuthResult<Identity> {
            self.anonymous_calls.fetch_add(1, Ordering::SeqCst);
            if self.accept_anonymous {
                Ok(Identity::new("anon-1", Some("anon-token".to_string()), true))
            } else {
                Err(AuthError::Backend {
                    status: 500,
                    message: "down".to_string(),
                })
            }
        }
    }

    fn manager(backend: FakeBackend) -> (SessionManager, Arc<FakeBackend>) {
        let backend = Arc::new(backend);
        (SessionManager::new(backend.clone()), backend)
    }

    #[tokio::test]
    async fn token_sign_in_skips_anonymous() {
        let (session, backend) = manager(FakeBackend {
            accept_token: true,
            accept_anonymous: true,
            ..Default::default()
        });

        let identity = session.bootstrap(Some("tok")).await.unwrap();
        assert_eq!(identity.user_id.as_str(), "user-from-token");
        assert_eq!(backend.anonymous_calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.phase(), BootstrapPhase::SignedIn);
    }

    #[tokio::test]
    async fn rejected_token_falls_back_to_anonymous() {
        let (session, backend) = manager(FakeBackend {
            accept_token: false,
            accept_anonymous: true,
            ..Default::default()
        });

        let identity = session.bootstrap(Some("tok")).await.unwrap();
        assert!(identity.anonymous);
        assert_eq!(backend.token_calls.load(Ordering::SeqCst), 1);
        assert_eq!(backend.anonymous_calls.load(Ordering::SeqCst), 1);
        assert!(session.is_ready());
    }

    #[tokio::test]
    async fn blank_token_counts_as_no_token() {
        let (session, backend) = manager(FakeBackend {
            accept_token: true,
            accept_anonymous: true,
            ..Default::default()
        });

        session.bootstrap(Some("   ")).await.unwrap();
        assert_eq!(backend.token_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn total_failure_is_ready_without_identity() {
        let (session, backend) = manager(FakeBackend::default());

        assert!(session.bootstrap(Some("tok")).await.is_none());
        assert!(session.is_ready());
        assert!(session.identity().is_none());
        assert!(session.role().is_none());
        assert_eq!(session.phase(), BootstrapPhase::Unauthenticated);

        // No retry loop: a second call does not hit the backend again
        assert!(session.bootstrap(None).await.is_none());
        assert_eq!(backend.anonymous_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn ready_flips_exactly_once() {
        let (session, _) = manager(FakeBackend {
            accept_anonymous: true,
            ..Default::default()
        });
        let mut rx = session.subscribe();
        assert!(!rx.borrow().ready);

        let (first, second) = tokio::join!(session.bootstrap(None), session.bootstrap(None));
        assert_eq!(first, second);

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().ready);

        // Nothing else is published afterwards
        session.bootstrap(None).await;
        assert!(!rx.has_changed().unwrap());
    }
}
