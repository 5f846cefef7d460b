use super::Erc20Token;
use std::ops::Deref;

/// RPL, the protocol's collateral token. Only the ERC-20 surface is exposed.
pub struct RplToken {
    token: Erc20Token,
}

impl RplToken {
    pub(crate) fn new(token: Erc20Token) -> Self {
        Self { token }
    }
}

impl Deref for RplToken {
    type Target = Erc20Token;

    fn deref(&self) -> &Erc20Token {
        &self.token
    }
}
