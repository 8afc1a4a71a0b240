//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

//! Governor contract error codes and error-message hygiene.
//!
//! Simulation and execution failures carry host diagnostics of the form
//! `HostError: Error(Contract, #201) ... Event log (newest first): ...`.
//! The numeric code maps to a governor error; the event log is stripped
//! before the message reaches a user.

use std::fmt::{Display, Formatter};

/// Marker that introduces the host's diagnostic event dump.
const EVENT_LOG_MARKER: &str = "Event log";
/// Cap applied to messages that carry no recognizable structure.
const MAX_MESSAGE_LENGTH: usize = 280;

/// The governor contract's error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GovernorContractError {
    InternalError = 1,
    AlreadyInitializedError = 3,
    UnauthorizedError = 4,
    NegativeAmountError = 8,
    AllowanceError = 9,
    BalanceError = 10,
    OverflowError = 12,
    InvalidSettingsError = 200,
    NonExistentProposalError = 201,
    ProposalClosedError = 202,
    InvalidProposalSupportError = 203,
    VotePeriodNotFinishedError = 204,
    ProposalNotExecutableError = 205,
    TimelockNotMetError = 206,
    ProposalVotePeriodStartedError = 207,
    InsufficientVotingUnitsError = 208,
    AlreadyVotedError = 209,
    InvalidProposalType = 210,
    ProposalAlreadyOpenError = 211,
    OutsideOfVotePeriodError = 212,
    ProposalActionInvalidError = 213,
}

impl GovernorContractError {
    pub fn from_code(code: u32) -> Option<Self> {
        let error = match code {
            1 => Self::InternalError,
            3 => Self::AlreadyInitializedError,
            4 => Self::UnauthorizedError,
            8 => Self::NegativeAmountError,
            9 => Self::AllowanceError,
            10 => Self::BalanceError,
            12 => Self::OverflowError,
            200 => Self::InvalidSettingsError,
            201 => Self::NonExistentProposalError,
            202 => Self::ProposalClosedError,
            203 => Self::InvalidProposalSupportError,
            204 => Self::VotePeriodNotFinishedError,
            205 => Self::ProposalNotExecutableError,
            206 => Self::TimelockNotMetError,
            207 => Self::ProposalVotePeriodStartedError,
            208 => Self::InsufficientVotingUnitsError,
            209 => Self::AlreadyVotedError,
            210 => Self::InvalidProposalType,
            211 => Self::ProposalAlreadyOpenError,
            212 => Self::OutsideOfVotePeriodError,
            213 => Self::ProposalActionInvalidError,
            _ => return None,
        };
        Some(error)
    }
}

impl Display for GovernorContractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Extracts the numeric code from an `Error(Contract, #N)` diagnostic.
pub fn extract_contract_error_code(message: &str) -> Option<u32> {
    let start = message.find("Error(Contract, #")? + "Error(Contract, #".len();
    let rest = &message[start..];
    let end = rest.find(')')?;
    rest[..end].parse().ok()
}

/// Truncates a diagnostic message at the event log marker and caps its
/// length for display.
pub fn clean_error_message(raw: &str) -> String {
    let cut = raw.find(EVENT_LOG_MARKER).map_or(raw, |at| &raw[..at]);
    let cut = cut.trim();
    if cut.chars().count() <= MAX_MESSAGE_LENGTH {
        return cut.to_string();
    }
    let mut out: String = cut.chars().take(MAX_MESSAGE_LENGTH).collect();
    out.push('…');
    out
}

/// Produces the user-facing message for a chain diagnostic: cleaned of the
/// event log, capped, and annotated with the governor error name when the
/// code is recognized.
pub fn describe_chain_error(raw: &str) -> String {
    let cleaned = clean_error_message(raw);
    match extract_contract_error_code(raw).and_then(GovernorContractError::from_code) {
        Some(error) => format!("{cleaned} ({error})"),
        None => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_extracts_contract_error_codes() {
        assert_eq!(
            extract_contract_error_code("HostError: Error(Contract, #201)"),
            Some(201)
        );
        assert_eq!(
            extract_contract_error_code("simulation failed: Error(Contract, #9) in frame 2"),
            Some(9)
        );
        assert_eq!(extract_contract_error_code("Error(Contract, #x)"), None);
        assert_eq!(extract_contract_error_code("no code here"), None);
    }

    #[test]
    fn it_maps_codes_to_governor_errors() {
        assert_eq!(
            GovernorContractError::from_code(209),
            Some(GovernorContractError::AlreadyVotedError)
        );
        assert_eq!(GovernorContractError::from_code(999), None);
    }

    #[test]
    fn it_strips_the_event_log_and_caps_length() {
        let raw = "HostError: Error(Contract, #202)\nEvent log (newest first):\n0: [Diagnostic Event] topics ...";
        assert_eq!(clean_error_message(raw), "HostError: Error(Contract, #202)");

        let verbose = "x".repeat(1_000);
        let cleaned = clean_error_message(&verbose);
        assert_eq!(cleaned.chars().count(), 281);
        assert!(cleaned.ends_with('…'));
    }

    #[test]
    fn it_annotates_recognized_codes() {
        let raw = "HostError: Error(Contract, #209)\nEvent log (newest first):\n...";
        assert_eq!(
            describe_chain_error(raw),
            "HostError: Error(Contract, #209) (AlreadyVotedError)"
        );
        assert_eq!(describe_chain_error("plain failure"), "plain failure");
    }
}
