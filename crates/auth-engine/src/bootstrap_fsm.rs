//! Identity bootstrap state machine using rust-fsm.
//!
//! ## State Diagram
//!
//! ```text
//!                 ┌──────────┐
//!                 │ Starting │ (initial)
//!                 └────┬─────┘
//!      TokenProvided   │   NoToken
//!          ┌───────────┴────────────┐
//!          ▼                        ▼
//! ┌────────────────────┐  TokenRejected  ┌───────────────────────┐
//! │ SigningInWithToken │ ──────────────► │ SigningInAnonymously  │
//! └─────────┬──────────┘                 └──────────┬────────────┘
//!           │ TokenAccepted     AnonymousAccepted   │   AnonymousRejected
//!           ▼                                       ▼          ▼
//!      ┌──────────┐ ◄───────────────────────────────┘  ┌─────────────────┐
//!      │ SignedIn │                                    │ Unauthenticated │
//!      └──────────┘                                    └─────────────────┘
//! ```
//!
//! `SignedIn` and `Unauthenticated` are terminal: there is no retry and no
//! sign-out.

use rust_fsm::*;
use serde::Serialize;

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub bootstrap_machine(Starting)

    Starting => {
        TokenProvided => SigningInWithToken,
        NoToken => SigningInAnonymously
    },
    SigningInWithToken => {
        TokenAccepted => SignedIn,
        // Any token failure falls through to the anonymous attempt
        TokenRejected => SigningInAnonymously
    },
    SigningInAnonymously => {
        AnonymousAccepted => SignedIn,
        AnonymousRejected => Unauthenticated
    }
}

pub use bootstrap_machine::Input as BootstrapInput;
pub use bootstrap_machine::State as BootstrapMachineState;
pub use bootstrap_machine::StateMachine as BootstrapMachine;

/// Externally visible bootstrap phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapPhase {
    Starting,
    SigningInWithToken,
    SigningInAnonymously,
    SignedIn,
    Unauthenticated,
}

impl BootstrapPhase {
    /// Returns true once the bootstrap has resolved, successfully or not.
    pub fn is_resolved(&self) -> bool {
        matches!(self, BootstrapPhase::SignedIn | BootstrapPhase::Unauthenticated)
    }
}

impl From<&BootstrapMachineState> for BootstrapPhase {
    fn from(state: &BootstrapMachineState) -> Self {
        match state {
            BootstrapMachineState::Starting => BootstrapPhase::Starting,
            BootstrapMachineState::SigningInWithToken => BootstrapPhase::SigningInWithToken,
            BootstrapMachineState::SigningInAnonymously => BootstrapPhase::SigningInAnonymously,
            BootstrapMachineState::SignedIn => BootstrapPhase::SignedIn,
            BootstrapMachineState::Unauthenticated => BootstrapPhase::Unauthenticated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_accepted_path() {
        let mut machine = BootstrapMachine::new();
        machine.consume(&BootstrapInput::TokenProvided).unwrap();
        machine.consume(&BootstrapInput::TokenAccepted).unwrap();
        assert_eq!(*machine.state(), BootstrapMachineState::SignedIn);
    }

    #[test]
    fn token_rejection_falls_back_to_anonymous() {
        let mut machine = BootstrapMachine::new();
        machine.consume(&BootstrapInput::TokenProvided).unwrap();
        machine.consume(&BootstrapInput::TokenRejected).unwrap();
        assert_eq!(
            *machine.state(),
            BootstrapMachineState::SigningInAnonymously
        );
        machine.consume(&BootstrapInput::AnonymousAccepted).unwrap();
        assert_eq!(*machine.state(), BootstrapMachineState::SignedIn);
    }

    #[test]
    fn anonymous_rejection_is_terminal() {
        let mut machine = BootstrapMachine::new();
        machine.consume(&BootstrapInput::NoToken).unwrap();
        machine.consume(&BootstrapInput::AnonymousRejected).unwrap();
        assert_eq!(*machine.state(), BootstrapMachineState::Unauthenticated);

        // No retry from the terminal state
        assert!(machine.consume(&BootstrapInput::NoToken).is_err());
        assert!(machine.consume(&BootstrapInput::AnonymousAccepted).is_err());
    }

    #[test]
    fn cannot_accept_token_without_providing_one() {
        let mut machine = BootstrapMachine::new();
        machine.consume(&BootstrapInput::NoToken).unwrap();
        assert!(machine.consume(&BootstrapInput::TokenAccepted).is_err());
    }

    #[test]
    fn phase_resolution() {
        assert!(!BootstrapPhase::Starting.is_resolved());
        assert!(!BootstrapPhase::SigningInAnonymously.is_resolved());
        assert!(BootstrapPhase::SignedIn.is_resolved());
        assert!(BootstrapPhase::Unauthenticated.is_resolved());
    }
}
