//! ABI types for the Rocket Pool contracts, plus decoding of JSON-RPC receipt shapes.
//!
//! Interfaces are declared inline with `sol!`; call encoding and return decoding go through
//! the generated `*Call` types. Receipts arrive as JSON from `eth_getTransactionReceipt`.

use crate::error::{Error, Result};
use crate::transport::{Log, Receipt};
use alloy::primitives::{Address, Bytes, B256};
use alloy::sol;
use serde_json::Value;

/// Logical contract names as registered in RocketStorage.
pub mod names {
    pub const GROUP_API: &str = "rocketGroupAPI";
    pub const NODE_MANAGER: &str = "rocketNodeManager";
    /// Per-owner: one instance per registered node.
    pub const NODE_CONTRACT: &str = "rocketNodeContract";
    pub const MINIPOOL_MANAGER: &str = "rocketMinipoolManager";
    pub const MINIPOOL_QUEUE: &str = "rocketMinipoolQueue";
    pub const DEPOSIT_POOL: &str = "rocketDepositPool";
    pub const AUCTION_MANAGER: &str = "rocketAuctionManager";
    pub const NETWORK_BALANCES: &str = "rocketNetworkBalances";
    pub const NETWORK_FEES: &str = "rocketNetworkFees";
    pub const AUCTION_SETTINGS: &str = "rocketAuctionSettings";
    pub const DEPOSIT_SETTINGS: &str = "rocketDepositSettings";
    pub const MINIPOOL_SETTINGS: &str = "rocketMinipoolSettings";
    pub const NETWORK_SETTINGS: &str = "rocketNetworkSettings";
    pub const NODE_SETTINGS: &str = "rocketNodeSettings";
    pub const TOKEN_RETH: &str = "rocketETHToken";
    pub const TOKEN_RPL: &str = "rocketTokenRPL";
    pub const REWARDS_POOL: &str = "rocketRewardsPool";
    pub const CLAIM_NODE: &str = "rocketClaimNode";
}

sol! {
    interface RocketStorage {
        function getAddress(bytes32 key) external view returns (address);
    }

    interface RocketGroupAPI {
        event GroupAdd(address indexed group, string name, uint256 stakingFee, uint256 created);
        function add(string name, uint256 stakingFee) external payable returns (bool);
        function getGroupName(address group) external view returns (string);
    }

    interface RocketGroupContract {
        function getOwner() external view returns (address);
        function getFeePerc() external view returns (uint256);
        function getFeePercRocketPool() external view returns (uint256);
        function getFeeAddress() external view returns (address);
        function setFeePerc(uint256 stakingFee) external returns (bool);
        function setFeeAddress(address feeAddress) external returns (bool);
    }

    interface RocketNodeManager {
        event NodeAdd(address indexed owner, address indexed contractAddress, uint256 created);
        function add(string timezoneLocation) external returns (bool);
        function getNodeCount() external view returns (uint256);
        function getNodeAt(uint256 index) external view returns (address);
        function getNodeExists(address owner) external view returns (bool);
        function getNodeTrusted(address owner) external view returns (bool);
        function getTimezoneLocation(address owner) external view returns (string);
        function setTimezoneLocation(string timezoneLocation) external returns (bool);
    }

    interface RocketNodeContract {
        function getOwner() external view returns (address);
        function getRewardsAddress() external view returns (address);
        function setRewardsAddress(address rewardsAddress) external returns (bool);
        function getBalanceETH() external view returns (uint256);
        function getBalanceRPL() external view returns (uint256);
    }

    interface RocketMinipoolManager {
        function getMinipoolCount() external view returns (uint256);
        function getMinipoolAt(uint256 index) external view returns (address);
        function getNodeMinipoolCount(address owner) external view returns (uint256);
        function getMinipoolExists(address minipool) external view returns (bool);
    }

    interface RocketMinipoolQueue {
        function getTotalLength() external view returns (uint256);
    }

    interface RocketMinipool {
        function getStatus() external view returns (uint8);
        function getNodeAddress() external view returns (address);
        function getNodeFee() external view returns (uint256);
        function getNodeDepositBalance() external view returns (uint256);
    }

    interface RocketDepositPool {
        function getBalance() external view returns (uint256);
        function deposit() external payable;
        function assignDeposits() external;
    }

    interface RocketAuctionManager {
        function getTotalRPLBalance() external view returns (uint256);
        function getRemainingRPLBalance() external view returns (uint256);
        function getLotCount() external view returns (uint256);
        function getLotStartPrice(uint256 index) external view returns (uint256);
        function createLot() external;
        function placeBid(uint256 lotIndex) external payable;
        function claimBid(uint256 lotIndex) external;
    }

    interface RocketNetworkBalances {
        function getBalancesBlock() external view returns (uint256);
        function getTotalETHBalance() external view returns (uint256);
        function getTotalRETHSupply() external view returns (uint256);
        function getETHUtilizationRate() external view returns (uint256);
        function submitBalances(uint256 blockNumber, uint256 totalEth, uint256 stakingEth, uint256 rethSupply) external;
    }

    interface RocketNetworkFees {
        function getNodeDemand() external view returns (int256);
        function getNodeFee() external view returns (uint256);
    }

    interface RocketAuctionSettings {
        function getCreateLotEnabled() external view returns (bool);
        function getBidOnLotEnabled() external view returns (bool);
        function getLotMinimumEthValue() external view returns (uint256);
        function getLotMaximumEthValue() external view returns (uint256);
        function getLotDuration() external view returns (uint256);
        function getStartingPriceRatio() external view returns (uint256);
        function getReservePriceRatio() external view returns (uint256);
    }

    interface RocketDepositSettings {
        function getDepositEnabled() external view returns (bool);
        function getAssignDepositsEnabled() external view returns (bool);
        function getMinimumDeposit() external view returns (uint256);
        function getMaximumDepositAssignments() external view returns (uint256);
    }

    interface RocketMinipoolSettings {
        function getLaunchBalance() external view returns (uint256);
        function getSubmitWithdrawableEnabled() external view returns (bool);
        function getLaunchTimeout() external view returns (uint256);
    }

    interface RocketNetworkSettings {
        function getNodeConsensusThreshold() external view returns (uint256);
        function getSubmitBalancesEnabled() external view returns (bool);
        function getSubmitBalancesFrequency() external view returns (uint256);
        function getMinimumNodeFee() external view returns (uint256);
        function getTargetNodeFee() external view returns (uint256);
        function getMaximumNodeFee() external view returns (uint256);
        function getTargetRethCollateralRate() external view returns (uint256);
    }

    interface RocketNodeSettings {
        function getRegistrationEnabled() external view returns (bool);
        function getDepositEnabled() external view returns (bool);
    }

    interface ERC20 {
        event Transfer(address indexed from, address indexed to, uint256 value);
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }

    interface RocketTokenRETH {
        function getExchangeRate() external view returns (uint256);
        function getEthValue(uint256 rethAmount) external view returns (uint256);
        function getRethValue(uint256 ethAmount) external view returns (uint256);
        function burn(uint256 amount) external;
    }

    interface RocketRewardsPool {
        function getClaimIntervalTimeStart() external view returns (uint256);
        function getClaimIntervalTime() external view returns (uint256);
        function getClaimingContractPerc(string contractName) external view returns (uint256);
        function getRPLBalance() external view returns (uint256);
    }

    interface RocketClaimNode {
        function getClaimPossible(address owner) external view returns (bool);
        function getClaimRewardsPerc(address owner) external view returns (uint256);
        function claim() external;
    }
}

/// Decode an `eth_getTransactionReceipt` result. Confirmations start at zero; the transport
/// fills them in as blocks arrive.
pub fn decode_receipt(value: &Value) -> Result<Receipt> {
    let transaction_hash = parse_hex_bytes_32(field_str(value, "transactionHash")?)?;
    let block_number = parse_hex_u64(field_str(value, "blockNumber")?)?;
    let gas_used = parse_hex_u64(field_str(value, "gasUsed")?)?;
    // Pre-Byzantium nodes omit status; treat a mined receipt without it as success.
    let status = match value.get("status").and_then(|s| s.as_str()) {
        Some(s) => parse_hex_u64(s)? == 1,
        None => true,
    };
    let logs = value
        .get("logs")
        .and_then(|l| l.as_array())
        .ok_or_else(|| Error::Abi("receipt missing logs".into()))?
        .iter()
        .map(decode_log)
        .collect::<Result<Vec<_>>>()?;
    Ok(Receipt {
        transaction_hash,
        block_number,
        confirmations: 0,
        status,
        gas_used,
        logs,
    })
}

fn decode_log(value: &Value) -> Result<Log> {
    let address = parse_address(field_str(value, "address")?)?;
    let topics = value
        .get("topics")
        .and_then(|t| t.as_array())
        .ok_or_else(|| Error::Abi("log missing topics".into()))?
        .iter()
        .map(|t| {
            t.as_str()
                .ok_or_else(|| Error::Abi("topic not str".into()))
                .and_then(parse_hex_bytes_32)
        })
        .collect::<Result<Vec<_>>>()?;
    let data = parse_hex_bytes(field_str(value, "data")?)?;
    Ok(Log {
        address,
        topics,
        data: Bytes::from(data),
    })
}

fn field_str<'a>(value: &'a Value, name: &str) -> Result<&'a str> {
    value
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::Abi(format!("missing {name}")))
}

pub(crate) fn parse_hex_u64(s: &str) -> Result<u64> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(s, 16).map_err(|e| Error::Abi(format!("parse hex u64: {e}")))
}

pub(crate) fn parse_hex_bytes(s: &str) -> Result<Vec<u8>> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(|e| Error::Abi(format!("parse hex bytes: {e}")))
}

pub(crate) fn parse_hex_bytes_32(s: &str) -> Result<B256> {
    let bytes = parse_hex_bytes(s)?;
    if bytes.len() != 32 {
        return Err(Error::Abi(format!("expected 32 bytes, got {}", bytes.len())));
    }
    Ok(B256::from_slice(&bytes))
}

fn parse_address(s: &str) -> Result<Address> {
    let bytes = parse_hex_bytes(s)?;
    if bytes.len() != 20 {
        return Err(Error::Abi(format!("expected 20 bytes for address, got {}", bytes.len())));
    }
    Ok(Address::from_slice(&bytes))
}
