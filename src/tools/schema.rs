//! # Tool Schema Registry
//!
//! Static descriptors for the Ankr Advanced API tools offered to the model,
//! serialized in the chat endpoint's function-calling convention:
//! `{type:"function", function:{name, description, parameters}}`.
//!
//! The registry is built once at first use and shared read-only; there are
//! no mutation operations.
//!
//! ## Query API
//! - `ankr_getBlockchainStats` - chain statistics
//! - `ankr_getBlocks` - block data for a range
//! - `ankr_getLogs` - historical log data
//! - `ankr_getTransactionsByHash` - transaction details
//! - `ankr_getTransactionsByAddress` - transactions for an address
//! - `ankr_getInteractions` - chains a wallet has touched
//!
//! ## NFT API
//! - `ankr_getNFTsByOwner` - NFTs held by a wallet
//! - `ankr_getNFTMetadata` - metadata for one NFT
//! - `ankr_getNFTHolders` - holders of a collection
//! - `ankr_getNftTransfers` - NFT transfer history
//!
//! ## Token API
//! - `ankr_getAccountBalance` - native and token balances
//! - `ankr_getCurrencies` - currencies on a chain
//! - `ankr_getTokenPrice` - USD price of a token
//! - `ankr_getTokenHolders` - holders of a token contract
//! - `ankr_getTokenHoldersCount` - holder count
//! - `ankr_getTokenTransfers` - token transfer history

use lazy_static::lazy_static;
use serde_json::{json, Map, Value};

/// Blockchains accepted by the Ankr Advanced API `blockchain` parameter.
pub const BLOCKCHAINS: [&str; 27] = [
    "arbitrum",
    "avalanche",
    "base",
    "bsc",
    "eth",
    "fantom",
    "flare",
    "gnosis",
    "linea",
    "optimism",
    "polygon",
    "polygon_zkevm",
    "rollux",
    "scroll",
    "stellar",
    "story_mainnet",
    "syscoin",
    "telos",
    "xai",
    "xlayer",
    "avalanche_fuji",
    "base_sepolia",
    "eth_holesky",
    "eth_sepolia",
    "optimism_testnet",
    "polygon_amoy",
    "story_aeneid_testnet",
];

lazy_static! {
    static ref ANKR_TOOLS: Vec<Value> = build_tools();
}

/// The immutable ordered tool list, ready to attach to a chat request.
pub fn tool_schema() -> &'static [Value] {
    &ANKR_TOOLS
}

fn blockchain_prop(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description,
        "enum": BLOCKCHAINS,
    })
}

fn as_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("tool properties are always JSON objects"),
    }
}

// Optional pagination parameters shared by the list-shaped queries.
fn with_pagination(props: &mut Map<String, Value>) {
    props.insert(
        "pageSize".into(),
        json!({"type": "integer", "description": "Optional. Number of results per page."}),
    );
    props.insert(
        "pageToken".into(),
        json!({"type": "string", "description": "Optional. Page token for pagination."}),
    );
}

// Optional block/time range parameters shared by the history queries.
fn with_range(props: &mut Map<String, Value>) {
    props.insert(
        "fromBlock".into(),
        json!({"type": "integer", "description": "Optional. Start block number."}),
    );
    props.insert(
        "toBlock".into(),
        json!({"type": "integer", "description": "Optional. End block number."}),
    );
    props.insert(
        "fromTimestamp".into(),
        json!({"type": "integer", "description": "Optional. Start Unix timestamp."}),
    );
    props.insert(
        "toTimestamp".into(),
        json!({"type": "integer", "description": "Optional. End Unix timestamp."}),
    );
}

fn tool(name: &str, description: &str, properties: Map<String, Value>, required: &[&str]) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": name,
            "description": description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        }
    })
}

fn build_tools() -> Vec<Value> {
    let mut tools = Vec::new();

    // --- Query API Methods ---

    tools.push(tool(
        "ankr_getBlockchainStats",
        "Retrieves statistics for one or more specified blockchains. If no blockchain is specified, stats for all available chains are returned.",
        as_map(json!({
            "blockchain": blockchain_prop("Optional. The blockchain identifier (e.g., 'eth', 'bsc'). Leave empty for all chains."),
        })),
        &[],
    ));

    tools.push(tool(
        "ankr_getBlocks",
        "Retrieves detailed block data for a specified range on a given blockchain.",
        as_map(json!({
            "blockchain": blockchain_prop("The blockchain identifier (e.g., 'eth')."),
            "fromBlock": {"type": "integer", "description": "The first block number of the range (decimal)."},
            "toBlock": {"type": "integer", "description": "The last block number of the range (decimal)."},
            "decodeLogs": {"type": "boolean", "description": "Optional. Set to true to decode logs. Defaults to false."},
            "decodeTxData": {"type": "boolean", "description": "Optional. Set to true to decode transaction data. Defaults to false."},
            "descOrder": {"type": "boolean", "description": "Optional. Set to true for descending order. Defaults to false (ascending)."},
            "includeLogs": {"type": "boolean", "description": "Optional. Set to true to include logs (requires includeTxs=true). Defaults to false."},
            "includeTxs": {"type": "boolean", "description": "Optional. Set to true to include transactions. Defaults to false."},
        })),
        &["blockchain", "fromBlock", "toBlock"],
    ));

    let mut props = as_map(json!({
        "blockchain": blockchain_prop("The blockchain identifier (e.g., 'eth'). Can also be a comma-separated list for multiple chains."),
        "address": {"type": "array", "items": {"type": "string"}, "description": "Optional. A contract address or a list of addresses (hex format) from which the logs originate."},
        "topics": {"type": "array", "items": {"type": "array", "items": {"type": "string"}}, "description": "Optional. Array of arrays of topics to filter by (e.g., [[\"topic0_0\"], [\"topic1_0\", \"topic1_1\"]])."},
        "decodeLogs": {"type": "boolean", "description": "Optional. Set to true to decode logs. Defaults to false."},
        "descOrder": {"type": "boolean", "description": "Optional. Set to true for descending order. Defaults to false (ascending)."},
    }));
    with_range(&mut props);
    with_pagination(&mut props);
    tools.push(tool(
        "ankr_getLogs",
        "Retrieves historical log data for a specified range of blocks, optionally filtered by address and topics.",
        props,
        &["blockchain"],
    ));

    tools.push(tool(
        "ankr_getTransactionsByHash",
        "Retrieves the details of a transaction specified by its hash, optionally on a given blockchain.",
        as_map(json!({
            "transactionHash": {"type": "string", "description": "The transaction hash."},
            "blockchain": blockchain_prop("Optional. The blockchain identifier (e.g., 'eth'). If omitted, the search may span chains."),
            "decodeLogs": {"type": "boolean", "description": "Optional. Set to true to decode logs. Defaults to false."},
            "decodeTxData": {"type": "boolean", "description": "Optional. Set to true to decode transaction data. Defaults to false."},
            "includeLogs": {"type": "boolean", "description": "Optional. Set to true to include logs. Defaults to false."},
        })),
        &["transactionHash"],
    ));

    let mut props = as_map(json!({
        "address": {"type": "string", "description": "The address (wallet or contract) to query transactions for."},
        "blockchain": blockchain_prop("Optional. The blockchain identifier (e.g., 'eth'). Can also be a comma-separated list."),
        "includeLogs": {"type": "boolean", "description": "Optional. Set to true to include logs. Defaults to false."},
        "descOrder": {"type": "boolean", "description": "Optional. Set to true for descending order. Defaults to false (ascending)."},
    }));
    with_range(&mut props);
    with_pagination(&mut props);
    tools.push(tool(
        "ankr_getTransactionsByAddress",
        "Retrieves transactions involving a specific address, optionally on a given blockchain and with filters.",
        props,
        &["address"],
    ));

    tools.push(tool(
        "ankr_getInteractions",
        "Retrieves a list of blockchains with which a particular wallet address has interacted.",
        as_map(json!({
            "address": {"type": "string", "description": "The wallet address."},
        })),
        &["address"],
    ));

    // --- NFT API Methods ---

    let mut props = as_map(json!({
        "walletAddress": {"type": "string", "description": "The account address (or ENS name) to query for NFTs."},
        "blockchain": blockchain_prop("Optional. Blockchain(s) to query (e.g., 'eth', 'polygon,bsc'). Leave empty for all."),
        "filter": {
            "type": "array",
            "description": "Optional. Filter by contract address(es) and optionally token ID(s). E.g., [{'0xcontract1': []}, {'0xcontract2': ['tokenId1']}]",
            "items": {"type": "object", "additionalProperties": {"type": "array", "items": {"type": "string"}}}
        },
    }));
    with_pagination(&mut props);
    tools.push(tool(
        "ankr_getNFTsByOwner",
        "Retrieves NFTs (ERC721/ERC1155/ENS/POAP) belonging to a specific wallet address, optionally filtered by blockchain or contract.",
        props,
        &["walletAddress"],
    ));

    tools.push(tool(
        "ankr_getNFTMetadata",
        "Retrieves metadata for a specific NFT (ERC721/ERC1155/ENS/POAP).",
        as_map(json!({
            "contractAddress": {"type": "string", "description": "The NFT contract address (or ENS name)."},
            "tokenId": {"type": "string", "description": "The token ID of the NFT."},
            "blockchain": blockchain_prop("The blockchain identifier."),
            "forceFetch": {"type": "boolean", "description": "Optional. True to fetch from contract, false from database. Default false."},
            "skipSyncCheck": {"type": "boolean", "description": "Optional. True to return info regardless of indexer health. Default false."},
        })),
        &["contractAddress", "tokenId", "blockchain"],
    ));

    let mut props = as_map(json!({
        "contractAddress": {"type": "string", "description": "The NFT collection's contract address (or ENS name)."},
        "blockchain": blockchain_prop("The blockchain identifier."),
    }));
    with_pagination(&mut props);
    tools.push(tool(
        "ankr_getNFTHolders",
        "Retrieves a list of wallet addresses holding a specific NFT collection.",
        props,
        &["contractAddress", "blockchain"],
    ));

    let mut props = as_map(json!({
        "address": {"type": "array", "items": {"type": "string"}, "description": "An address or list of addresses to search for NFT transfers."},
        "blockchain": blockchain_prop("Optional. Blockchain(s) to query (e.g., 'eth', 'bsc,polygon'). Leave empty for all."),
        "descOrder": {"type": "boolean", "description": "Optional. True for descending order. Default false."},
    }));
    with_range(&mut props);
    with_pagination(&mut props);
    tools.push(tool(
        "ankr_getNftTransfers",
        "Retrieves NFT transfer history for a specific address or list of addresses.",
        props,
        &["address"],
    ));

    // --- Token API Methods ---

    let mut props = as_map(json!({
        "walletAddress": {"type": "string", "description": "The account address (or ENS name) to query for balance."},
        "blockchain": blockchain_prop("Optional. Blockchain(s) to query (e.g., 'eth', 'polygon,bsc'). Leave empty for all."),
        "nativeFirst": {"type": "boolean", "description": "Optional. Sort native token first. Default unspecified."},
        "onlyWhitelisted": {"type": "boolean", "description": "Optional. True to show only CoinGecko listed tokens. Default true."},
    }));
    with_pagination(&mut props);
    tools.push(tool(
        "ankr_getAccountBalance",
        "Retrieves the native and token balances for a specific wallet address.",
        props,
        &["walletAddress"],
    ));

    tools.push(tool(
        "ankr_getCurrencies",
        "Retrieves a list of currencies available on a specific blockchain.",
        as_map(json!({
            "blockchain": blockchain_prop("The blockchain identifier."),
        })),
        &["blockchain"],
    ));

    tools.push(tool(
        "ankr_getTokenPrice",
        "Retrieves the USD price of a specific token or the native coin of a blockchain.",
        as_map(json!({
            "blockchain": blockchain_prop("The blockchain identifier."),
            "contractAddress": {"type": "string", "description": "Optional. The token contract address (or ENS name). If omitted, returns native coin price."},
        })),
        &["blockchain"],
    ));

    let mut props = as_map(json!({
        "contractAddress": {"type": "string", "description": "The token contract address (or ENS name)."},
        "blockchain": blockchain_prop("The blockchain identifier."),
    }));
    with_pagination(&mut props);
    tools.push(tool(
        "ankr_getTokenHolders",
        "Retrieves a list of holders for a specific fungible token contract.",
        props,
        &["contractAddress", "blockchain"],
    ));

    let mut props = as_map(json!({
        "contractAddress": {"type": "string", "description": "The token contract address (or ENS name)."},
        "blockchain": blockchain_prop("The blockchain identifier."),
    }));
    with_pagination(&mut props);
    tools.push(tool(
        "ankr_getTokenHoldersCount",
        "Retrieves the number of holders for a specific fungible token contract.",
        props,
        &["contractAddress", "blockchain"],
    ));

    let mut props = as_map(json!({
        "address": {"type": "array", "items": {"type": "string"}, "description": "An address or list of addresses to search for token transfers."},
        "blockchain": blockchain_prop("Optional. Blockchain(s) to query (e.g., 'eth', 'bsc,polygon'). Leave empty for all."),
        "descOrder": {"type": "boolean", "description": "Optional. True for descending order. Default false."},
    }));
    with_range(&mut props);
    with_pagination(&mut props);
    tools.push(tool(
        "ankr_getTokenTransfers",
        "Retrieves token transfer history for a specific address or list of addresses.",
        props,
        &["address"],
    ));

    tools
}
