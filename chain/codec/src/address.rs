//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

const ADDRESS_LENGTH: usize = 56;
const ACCOUNT_PREFIX: char = 'G';
const CONTRACT_PREFIX: char = 'C';

/// A chain identity: either an account (`G…`) or a contract (`C…`).
///
/// Addresses are 56-character strings over the base32 alphabet `A-Z2-7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_account(&self) -> bool {
        self.0.starts_with(ACCOUNT_PREFIX)
    }

    pub fn is_contract(&self) -> bool {
        self.0.starts_with(CONTRACT_PREFIX)
    }
}

impl FromStr for Address {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ADDRESS_LENGTH {
            return Err(CodecError::InvalidAddress {
                address: s.to_string(),
                reason: "address must be 56 characters",
            });
        }
        let mut chars = s.chars();
        if !matches!(chars.next(), Some(ACCOUNT_PREFIX | CONTRACT_PREFIX)) {
            return Err(CodecError::InvalidAddress {
                address: s.to_string(),
                reason: "address must start with 'G' or 'C'",
            });
        }
        if !chars.all(|c| matches!(c, 'A'..='Z' | '2'..='7')) {
            return Err(CodecError::InvalidAddress {
                address: s.to_string(),
                reason: "address contains characters outside the base32 alphabet",
            });
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Address {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT: &str = "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ";
    const CONTRACT: &str = "CDVQVKOY2YSXS2IC7KN6MLLX4Q32W2QW2W2DLQWG75BF6YXNVQX6IONC";

    #[test]
    fn it_parses_account_and_contract_addresses() {
        let account = ACCOUNT.parse::<Address>().unwrap();
        assert!(account.is_account());
        let contract = CONTRACT.parse::<Address>().unwrap();
        assert!(contract.is_contract());
    }

    #[test]
    fn it_rejects_malformed_addresses() {
        "".parse::<Address>().unwrap_err();
        "GABC".parse::<Address>().unwrap_err();
        // right length, wrong prefix
        "XA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ".parse::<Address>().unwrap_err();
        // '1' and '0' are not in the base32 alphabet
        "GA10YNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ".parse::<Address>().unwrap_err();
        // lowercase
        "ga7qynf7sowq3glr2bgmzehxavirza4kvwltjjfc7mgxua74p7ujvsgz".parse::<Address>().unwrap_err();
    }

    #[test]
    fn it_round_trips_through_serde_strings() {
        let address = ACCOUNT.parse::<Address>().unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{ACCOUNT}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(address, back);
    }
}
