//! Contract bindings and call encoding.

use alloy::primitives::{Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::pipeline::types::ContractCall;

sol! {
    /// Factory deploying new NFT collections.
    interface ICollectionFactory {
        function createCollection(
            string name,
            string symbol,
            uint256 userLimit,
            uint256 maxSupply,
            uint256 price,
            string baseUri
        ) external returns (address);

        /// Emitted after the new collection is deployed and handed over.
        #[derive(Debug)]
        event CollectionCreated(address indexed owner, address collectionAddress);
    }

    /// Single NFT minter.
    interface INftMinter {
        function mint(string tokenUri) external returns (uint256);
    }

    /// Owner-mintable fungible token.
    interface IMintableToken {
        function mintTo(address to, uint256 amount) external;
    }

    /// OpenZeppelin `Ownable` ownership change.
    #[derive(Debug)]
    event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);

    /// ERC-721 transfer (mints come from the zero address).
    #[derive(Debug)]
    event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
}

/// ABI-encode the calldata for `call`.
pub fn encode_call(call: &ContractCall) -> Bytes {
    let data = match call {
        ContractCall::CreateCollection(params) => ICollectionFactory::createCollectionCall {
            name: params.name.clone(),
            symbol: params.symbol.clone(),
            userLimit: U256::from(params.user_limit),
            maxSupply: U256::from(params.max_supply),
            price: params.unit_price,
            baseUri: params.base_uri.clone(),
        }
        .abi_encode(),
        ContractCall::Mint { token_uri } => INftMinter::mintCall {
            tokenUri: token_uri.clone(),
        }
        .abi_encode(),
        ContractCall::MintTo { recipient, amount } => IMintableToken::mintToCall {
            to: *recipient,
            amount: *amount,
        }
        .abi_encode(),
    };
    Bytes::from(data)
}
