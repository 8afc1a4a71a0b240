//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

//! Typed wrappers around the governor and votes contracts.
//!
//! Every method builds exactly one contract operation, picks the parse
//! function for that call's return shape and delegates to
//! [`OperationInvoker::invoke`]; the pipeline logic lives entirely in the
//! invoker.

use log::*;

use conclave_codec::{action::ProposalAction, value::LedgerValue, Address, CodecError};
use conclave_rpc_client::{ChainRpcClient, RestorePreamble};
use conclave_transaction::{Operation, ResourceEstimate, SorobanData};

use crate::{
    invoker::{OperationInvoker, TransportError},
    options::TxOptions,
    result::{ContractResult, ErrorKind},
    signer::EnvelopeSigner,
};

const LOG_TARGET: &str = "conclave::sdk::voting";

/// How a voter positions themselves on a proposal, with its on-chain
/// encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteSupport {
    Against,
    For,
    Abstain,
}

impl From<VoteSupport> for u32 {
    fn from(support: VoteSupport) -> Self {
        match support {
            VoteSupport::Against => 0,
            VoteSupport::For => 1,
            VoteSupport::Abstain => 2,
        }
    }
}

impl TryFrom<u32> for VoteSupport {
    type Error = CodecError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Against),
            1 => Ok(Self::For),
            2 => Ok(Self::Abstain),
            _ => Err(CodecError::UnexpectedShape {
                expected: "a vote support in 0..=2",
                got: "an out-of-range u32",
            }),
        }
    }
}

/// The contracts and network one client instance talks to.
///
/// Reconfiguring (e.g. a network switch) means constructing a new context
/// and a new client from it; nothing here is mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingContext {
    pub governor: Address,
    pub votes: Address,
    pub network_passphrase: String,
}

/// Typed governance calls, each a thin composition over the invoker.
pub struct VotingClient<'a, TClient, TSigner> {
    invoker: OperationInvoker<'a, TClient>,
    signer: &'a TSigner,
    context: VotingContext,
}

impl<'a, TClient, TSigner> VotingClient<'a, TClient, TSigner>
where
    TClient: ChainRpcClient,
    TSigner: EnvelopeSigner,
{
    pub fn new(client: &'a TClient, signer: &'a TSigner, context: VotingContext) -> Self {
        Self {
            invoker: OperationInvoker::new(client),
            signer,
            context,
        }
    }

    pub fn context(&self) -> &VotingContext {
        &self.context
    }

    /// Casts a vote on an open proposal.
    pub async fn vote(
        &self,
        voter: &Address,
        proposal_id: u32,
        support: VoteSupport,
        options: &TxOptions,
    ) -> Result<ContractResult<()>, TransportError> {
        let operation = self.governor_call("vote", vec![
            LedgerValue::Address(voter.clone()),
            LedgerValue::U32(proposal_id),
            LedgerValue::U32(support.into()),
        ]);
        self.invoker.invoke(voter, self.signer, options, parse_void, operation).await
    }

    /// Creates a proposal; resolves to the new proposal id.
    pub async fn propose(
        &self,
        proposer: &Address,
        title: &str,
        description: &str,
        action: &ProposalAction,
        options: &TxOptions,
    ) -> Result<ContractResult<u32>, TransportError> {
        debug!(target: LOG_TARGET, "Proposing '{}' with action {}", title, action);
        let action = match action.to_value() {
            Ok(value) => value,
            Err(e) => return Ok(invalid_arguments(e)),
        };
        let operation = self.governor_call("propose", vec![
            LedgerValue::Address(proposer.clone()),
            LedgerValue::Str(title.to_string()),
            LedgerValue::Str(description.to_string()),
            action,
        ]);
        self.invoker.invoke(proposer, self.signer, options, parse_u32, operation).await
    }

    /// Delegates the account's voting units to another account.
    pub async fn delegate(
        &self,
        account: &Address,
        delegatee: &Address,
        options: &TxOptions,
    ) -> Result<ContractResult<()>, TransportError> {
        let operation = self.votes_call("delegate", vec![
            LedgerValue::Address(account.clone()),
            LedgerValue::Address(delegatee.clone()),
        ]);
        self.invoker.invoke(account, self.signer, options, parse_void, operation).await
    }

    /// Deposits underlying tokens into the votes contract for voting units.
    pub async fn wrap_token(
        &self,
        account: &Address,
        amount: i128,
        options: &TxOptions,
    ) -> Result<ContractResult<()>, TransportError> {
        let operation = self.votes_call("deposit", vec![
            LedgerValue::Address(account.clone()),
            LedgerValue::I128(amount),
        ]);
        self.invoker.invoke(account, self.signer, options, parse_void, operation).await
    }

    /// Withdraws underlying tokens, burning voting units.
    pub async fn unwrap_token(
        &self,
        account: &Address,
        amount: i128,
        options: &TxOptions,
    ) -> Result<ContractResult<()>, TransportError> {
        let operation = self.votes_call("withdraw", vec![
            LedgerValue::Address(account.clone()),
            LedgerValue::I128(amount),
        ]);
        self.invoker.invoke(account, self.signer, options, parse_void, operation).await
    }

    /// Claims accrued emissions; resolves to the claimed amount.
    pub async fn claim_emissions(
        &self,
        account: &Address,
        options: &TxOptions,
    ) -> Result<ContractResult<i128>, TransportError> {
        let operation = self.votes_call("claim", vec![LedgerValue::Address(account.clone())]);
        self.invoker.invoke(account, self.signer, options, parse_i128, operation).await
    }

    /// Restores the expired ledger entries captured by a previous dry-run.
    ///
    /// Restoration is never itself a dry-run: `options.sim` is forced off.
    pub async fn restore(
        &self,
        source: &Address,
        restore: &RestorePreamble,
        options: &TxOptions,
    ) -> Result<ContractResult<()>, TransportError> {
        let data = match SorobanData::decode(&restore.transaction_data) {
            Ok(data) => data,
            Err(e) => return Ok(invalid_arguments(e)),
        };
        let operation = Operation::RestoreFootprint {
            footprint: data.footprint,
        };
        let options = TxOptions {
            sim: false,
            ..options.clone()
        };
        self.invoker.invoke(source, self.signer, &options, parse_void, operation).await
    }

    /// Reads the account's voting-unit balance. Dry-run only.
    pub async fn balance(&self, of: &Address) -> Result<ContractResult<i128>, TransportError> {
        let operation = self.votes_call("balance", vec![LedgerValue::Address(of.clone())]);
        self.invoker
            .invoke(of, self.signer, &self.read_options(), parse_i128, operation)
            .await
    }

    /// Reads the account's current voting power. Dry-run only.
    pub async fn voting_power(&self, of: &Address) -> Result<ContractResult<i128>, TransportError> {
        let operation = self.votes_call("get_votes", vec![LedgerValue::Address(of.clone())]);
        self.invoker
            .invoke(of, self.signer, &self.read_options(), parse_i128, operation)
            .await
    }

    /// Reads who the account currently delegates to. Dry-run only.
    pub async fn get_delegate(&self, of: &Address) -> Result<ContractResult<Address>, TransportError> {
        let operation = self.votes_call("get_delegate", vec![LedgerValue::Address(of.clone())]);
        self.invoker
            .invoke(of, self.signer, &self.read_options(), parse_address, operation)
            .await
    }

    fn governor_call(&self, function: &str, args: Vec<LedgerValue>) -> Operation {
        Operation::InvokeContract {
            contract: self.context.governor.clone(),
            function: function.to_string(),
            args,
            auths: vec![],
        }
    }

    fn votes_call(&self, function: &str, args: Vec<LedgerValue>) -> Operation {
        Operation::InvokeContract {
            contract: self.context.votes.clone(),
            function: function.to_string(),
            args,
            auths: vec![],
        }
    }

    fn read_options(&self) -> TxOptions {
        TxOptions::simulation(self.context.network_passphrase.clone())
    }
}

/// Arguments that fail to encode never build an envelope, so the failure
/// reports with an empty estimate.
fn invalid_arguments<T>(e: CodecError) -> ContractResult<T> {
    ContractResult::ContractErr {
        kind: ErrorKind::Simulation,
        message: e.to_string(),
        hash: None,
        resources: ResourceEstimate::empty(),
    }
}

fn parse_void(_value: Option<&LedgerValue>) -> Result<(), CodecError> {
    Ok(())
}

fn parse_u32(value: Option<&LedgerValue>) -> Result<u32, CodecError> {
    value.and_then(LedgerValue::as_u32).ok_or(CodecError::UnexpectedShape {
        expected: "a u32 return value",
        got: "missing or non-u32 payload",
    })
}

fn parse_i128(value: Option<&LedgerValue>) -> Result<i128, CodecError> {
    value.and_then(LedgerValue::as_i128).ok_or(CodecError::UnexpectedShape {
        expected: "an i128 return value",
        got: "missing or non-integer payload",
    })
}

fn parse_address(value: Option<&LedgerValue>) -> Result<Address, CodecError> {
    value
        .and_then(LedgerValue::as_address)
        .cloned()
        .ok_or(CodecError::UnexpectedShape {
            expected: "an address return value",
            got: "missing or non-address payload",
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use conclave_codec::typed::{Val, ValType};
    use conclave_rpc_client::{
        optional::IsNotFoundError,
        AccountRecord,
        GetTransactionResponse,
        SendStatus,
        SendTransactionResponse,
        SimulationOutcome,
        TransactionStatus,
    };
    use conclave_transaction::{LedgerFootprint, LedgerKey, SorobanData, TransactionEnvelope, TxHash};

    use super::*;
    use crate::signer::SignerRejected;

    const VOTER: &str = "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ";
    const GOVERNOR: &str = "CDVQVKOY2YSXS2IC7KN6MLLX4Q32W2QW2W2DLQWG75BF6YXNVQX6IONC";
    const VOTES: &str = "C454ML6LG4TJFCZ4KAEDCMPB5U4MOS7AF5R2FQUOSBEGZGSYEBANND6Y";

    #[derive(Debug, thiserror::Error)]
    #[error("stub failure")]
    struct StubError;

    impl IsNotFoundError for StubError {
        fn is_not_found_error(&self) -> bool {
            false
        }
    }

    /// Records every simulated envelope and immediately succeeds.
    struct RecordingClient {
        simulated: Mutex<Vec<TransactionEnvelope>>,
        return_value: Vec<u8>,
    }

    impl RecordingClient {
        fn returning(value: &LedgerValue) -> Self {
            Self {
                simulated: Mutex::new(vec![]),
                return_value: conclave_codec::encode(value).unwrap(),
            }
        }

        fn last_operation(&self) -> Operation {
            self.simulated.lock().unwrap().last().unwrap().operation().clone()
        }
    }

    #[async_trait]
    impl ChainRpcClient for RecordingClient {
        type Error = StubError;

        async fn get_account(&self, _address: &Address) -> Result<AccountRecord, Self::Error> {
            Ok(AccountRecord { sequence: 1 })
        }

        async fn simulate_transaction(
            &self,
            envelope: &TransactionEnvelope,
        ) -> Result<SimulationOutcome, Self::Error> {
            self.simulated.lock().unwrap().push(envelope.clone());
            Ok(SimulationOutcome::Success {
                return_value: Some(self.return_value.clone()),
                transaction_data: soroban_data().encode().unwrap(),
                min_resource_fee: 10_000,
                restore: None,
            })
        }

        async fn send_transaction(
            &self,
            _envelope: &TransactionEnvelope,
        ) -> Result<SendTransactionResponse, Self::Error> {
            Ok(SendTransactionResponse {
                status: SendStatus::Pending,
                hash: TxHash::from_array([9; 32]),
                error_message: None,
            })
        }

        async fn get_transaction(&self, _hash: &TxHash) -> Result<GetTransactionResponse, Self::Error> {
            Ok(GetTransactionResponse {
                status: TransactionStatus::Success,
                result_payload: Some(self.return_value.clone()),
                error_payload: None,
            })
        }
    }

    struct PassthroughSigner;

    #[async_trait]
    impl EnvelopeSigner for PassthroughSigner {
        async fn sign(
            &self,
            unsigned_envelope: &str,
            _identities: &[Address],
            _network_passphrase: &str,
        ) -> Result<String, SignerRejected> {
            let envelope = TransactionEnvelope::from_base64(unsigned_envelope).unwrap();
            Ok(envelope.with_signature("c3R1Yg==").to_base64().unwrap())
        }
    }

    fn soroban_data() -> SorobanData {
        SorobanData {
            footprint: LedgerFootprint {
                read_only: vec![LedgerKey::ContractCode { hash: vec![2; 32] }],
                read_write: vec![],
            },
            cpu_instructions: 100_000,
            bytes_read: 512,
            bytes_written: 64,
            resource_fee: 10_000,
            refundable_fee: 1_000,
        }
    }

    fn context() -> VotingContext {
        VotingContext {
            governor: GOVERNOR.parse().unwrap(),
            votes: VOTES.parse().unwrap(),
            network_passphrase: "testnet".to_string(),
        }
    }

    fn options() -> TxOptions {
        TxOptions::submission("testnet")
    }

    #[tokio::test]
    async fn it_builds_a_governor_vote_operation() {
        let client = RecordingClient::returning(&LedgerValue::Void);
        let signer = PassthroughSigner;
        let voting = VotingClient::new(&client, &signer, context());
        let result = voting
            .vote(&VOTER.parse().unwrap(), 7, VoteSupport::For, &options())
            .await
            .unwrap();
        assert!(result.is_ok());
        match client.last_operation() {
            Operation::InvokeContract {
                contract,
                function,
                args,
                auths,
            } => {
                assert_eq!(contract, GOVERNOR.parse().unwrap());
                assert_eq!(function, "vote");
                assert_eq!(args, vec![
                    LedgerValue::Address(VOTER.parse().unwrap()),
                    LedgerValue::U32(7),
                    LedgerValue::U32(1),
                ]);
                assert!(auths.is_empty());
            },
            other => panic!("expected InvokeContract, got {other}"),
        }
    }

    #[tokio::test]
    async fn it_proposes_with_an_encoded_action() {
        let client = RecordingClient::returning(&LedgerValue::U32(3));
        let signer = PassthroughSigner;
        let voting = VotingClient::new(&client, &signer, context());
        let action = ProposalAction::Calldata(conclave_codec::action::Calldata {
            contract_id: VOTES.parse().unwrap(),
            function: "transfer".to_string(),
            args: vec![Val::new("42", ValType::I128)],
            auths: vec![],
        });
        let result = voting
            .propose(&VOTER.parse().unwrap(), "Fund the grant", "Pay 42 to the grantee", &action, &options())
            .await
            .unwrap();
        assert_eq!(result.ok(), Some(3));
        match client.last_operation() {
            Operation::InvokeContract { function, args, .. } => {
                assert_eq!(function, "propose");
                assert_eq!(args.len(), 4);
                // the action re-decodes from its encoded argument form
                assert_eq!(ProposalAction::from_value(&args[3]).unwrap(), action);
            },
            other => panic!("expected InvokeContract, got {other}"),
        }
    }

    #[tokio::test]
    async fn it_reads_balances_as_dry_runs() {
        let client = RecordingClient::returning(&LedgerValue::I128(250_0000000));
        let signer = PassthroughSigner;
        let voting = VotingClient::new(&client, &signer, context());
        let result = voting.balance(&VOTER.parse().unwrap()).await.unwrap();
        assert_eq!(result.ok(), Some(250_0000000));
        match client.last_operation() {
            Operation::InvokeContract { contract, function, .. } => {
                assert_eq!(contract, VOTES.parse().unwrap());
                assert_eq!(function, "balance");
            },
            other => panic!("expected InvokeContract, got {other}"),
        }
    }

    #[tokio::test]
    async fn it_reads_the_delegate_address() {
        let client = RecordingClient::returning(&LedgerValue::Address(VOTER.parse().unwrap()));
        let signer = PassthroughSigner;
        let voting = VotingClient::new(&client, &signer, context());
        let result = voting.get_delegate(&VOTER.parse().unwrap()).await.unwrap();
        assert_eq!(result.ok(), Some(VOTER.parse().unwrap()));
    }

    #[tokio::test]
    async fn it_restores_from_a_captured_preamble() {
        let client = RecordingClient::returning(&LedgerValue::Void);
        let signer = PassthroughSigner;
        let voting = VotingClient::new(&client, &signer, context());
        let preamble = RestorePreamble {
            transaction_data: soroban_data().encode().unwrap(),
            min_resource_fee: 5_000,
        };
        // restoration must submit even when the caller passes dry-run options
        let sim_options = TxOptions::simulation("testnet");
        let result = voting
            .restore(&VOTER.parse().unwrap(), &preamble, &sim_options)
            .await
            .unwrap();
        assert!(result.is_ok());
        match client.last_operation() {
            Operation::RestoreFootprint { footprint } => {
                assert_eq!(footprint, soroban_data().footprint);
            },
            other => panic!("expected RestoreFootprint, got {other}"),
        }
    }

    #[tokio::test]
    async fn it_maps_vote_support_codes() {
        assert_eq!(u32::from(VoteSupport::Against), 0);
        assert_eq!(u32::from(VoteSupport::For), 1);
        assert_eq!(u32::from(VoteSupport::Abstain), 2);
        assert_eq!(VoteSupport::try_from(2).unwrap(), VoteSupport::Abstain);
        VoteSupport::try_from(3).unwrap_err();
    }
}
