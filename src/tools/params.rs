//! Argument normalization for Ankr tool calls.
//!
//! The model supplies arguments as loosely-typed JSON: booleans and numbers
//! arrive as strings, multi-chain fields arrive as comma-separated lists,
//! address fields arrive as a scalar where the API wants an array. This
//! module coerces each declared parameter into the shape the Ankr API
//! requires and drops everything that fails to coerce, because the API is
//! strict about unknown or null fields: an absent optional parameter must
//! be omitted entirely, never sent as null.

use serde_json::{Map, Value};

/// A normalized argument, tagged with the shape the remote field expects.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Num(f64),
    Bool(bool),
    StrList(Vec<String>),
    /// Passed through untouched (nested structures like log topics).
    Raw(Value),
}

impl ParamValue {
    /// Serializes into the JSON the remote API expects. Fractionless
    /// numbers become integers since every numeric Ankr field is integral
    /// (block numbers, timestamps, page sizes).
    pub fn into_json(self) -> Value {
        match self {
            ParamValue::Str(s) => Value::String(s),
            ParamValue::Num(n) => {
                if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
                    Value::from(n as i64)
                } else {
                    Value::from(n)
                }
            }
            ParamValue::Bool(b) => Value::Bool(b),
            ParamValue::StrList(items) => Value::Array(items.into_iter().map(Value::String).collect()),
            ParamValue::Raw(v) => v,
        }
    }
}

/// Accepts a boolean or a case-insensitive "true"/"false" string.
/// Anything else yields `None` so the parameter is omitted rather than
/// sent with a default the remote API did not ask for.
pub fn to_boolean(value: &Value) -> Option<ParamValue> {
    match value {
        Value::Bool(b) => Some(ParamValue::Bool(*b)),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" => Some(ParamValue::Bool(true)),
            "false" => Some(ParamValue::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

/// Accepts a number or a numeric string; anything else yields `None`.
pub fn to_number(value: &Value) -> Option<ParamValue> {
    match value {
        Value::Number(n) => n.as_f64().map(ParamValue::Num),
        Value::String(s) => s.trim().parse::<f64>().ok().map(ParamValue::Num),
        _ => None,
    }
}

/// Fields the API accepts as a single chain or a list of chains.
/// A comma-separated string splits into a trimmed list; a plain string
/// stays a scalar; an empty or blank value means "all chains" and is
/// omitted entirely.
pub fn string_or_list(value: &Value) -> Option<ParamValue> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed.contains(',') {
                let items: Vec<String> = trimmed
                    .split(',')
                    .map(|item| item.trim().to_string())
                    .filter(|item| !item.is_empty())
                    .collect();
                if items.is_empty() {
                    return None;
                }
                Some(ParamValue::StrList(items))
            } else {
                Some(ParamValue::Str(trimmed.to_string()))
            }
        }
        Value::Array(items) => {
            let items: Vec<String> = items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::to_string)
                .collect();
            if items.is_empty() {
                None
            } else {
                Some(ParamValue::StrList(items))
            }
        }
        _ => None,
    }
}

/// Fields the API requires to be an array of strings. A scalar is wrapped
/// into a one-element list; a comma-separated string is split.
pub fn string_list(value: &Value) -> Option<ParamValue> {
    match string_or_list(value)? {
        ParamValue::Str(s) => Some(ParamValue::StrList(vec![s])),
        list => Some(list),
    }
}

/// A plain non-empty string parameter.
fn string(value: &Value) -> Option<ParamValue> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(ParamValue::Str(s.trim().to_string())),
        _ => None,
    }
}

fn raw(value: &Value) -> Option<ParamValue> {
    Some(ParamValue::Raw(value.clone()))
}

// Inserts only coerced values; a `None` is omitted, keeping the guarantee
// that the emitted object never carries null placeholders.
fn set(params: &mut Map<String, Value>, key: &str, value: Option<ParamValue>) {
    if let Some(v) = value {
        params.insert(key.to_string(), v.into_json());
    }
}

fn arg<'a>(args: &'a Value, key: &str) -> Option<&'a Value> {
    args.get(key).filter(|v| !v.is_null())
}

fn set_range(params: &mut Map<String, Value>, args: &Value) {
    set(params, "fromBlock", arg(args, "fromBlock").and_then(to_number));
    set(params, "toBlock", arg(args, "toBlock").and_then(to_number));
    set(
        params,
        "fromTimestamp",
        arg(args, "fromTimestamp").and_then(to_number),
    );
    set(
        params,
        "toTimestamp",
        arg(args, "toTimestamp").and_then(to_number),
    );
}

fn set_pagination(params: &mut Map<String, Value>, args: &Value) {
    set(params, "pageSize", arg(args, "pageSize").and_then(to_number));
    set(params, "pageToken", arg(args, "pageToken").and_then(string));
}

/// Builds the normalized `params` object for one Ankr method from the
/// loose argument map the model supplied. Returns `None` for a method
/// the registry does not know, so the invoker can refuse it without a
/// network call.
pub fn build_params(method: &str, args: &Value) -> Option<Map<String, Value>> {
    let mut p = Map::new();

    match method {
        // --- Query API Methods ---
        "ankr_getBlockchainStats" => {
            set(&mut p, "blockchain", arg(args, "blockchain").and_then(string));
        }
        "ankr_getBlocks" => {
            set(&mut p, "blockchain", arg(args, "blockchain").and_then(string));
            set(&mut p, "fromBlock", arg(args, "fromBlock").and_then(to_number));
            set(&mut p, "toBlock", arg(args, "toBlock").and_then(to_number));
            for key in ["decodeLogs", "decodeTxData", "descOrder", "includeLogs", "includeTxs"] {
                set(&mut p, key, arg(args, key).and_then(to_boolean));
            }
        }
        "ankr_getLogs" => {
            set(&mut p, "blockchain", arg(args, "blockchain").and_then(string_or_list));
            set(&mut p, "address", arg(args, "address").and_then(string_list));
            set_range(&mut p, args);
            set(&mut p, "topics", arg(args, "topics").and_then(raw));
            set(&mut p, "decodeLogs", arg(args, "decodeLogs").and_then(to_boolean));
            set(&mut p, "descOrder", arg(args, "descOrder").and_then(to_boolean));
            set_pagination(&mut p, args);
        }
        "ankr_getTransactionsByHash" => {
            set(&mut p, "transactionHash", arg(args, "transactionHash").and_then(string));
            set(&mut p, "blockchain", arg(args, "blockchain").and_then(string_or_list));
            for key in ["decodeLogs", "decodeTxData", "includeLogs"] {
                set(&mut p, key, arg(args, key).and_then(to_boolean));
            }
        }
        "ankr_getTransactionsByAddress" => {
            // The API takes a single address string here.
            set(&mut p, "address", arg(args, "address").and_then(string));
            set(&mut p, "blockchain", arg(args, "blockchain").and_then(string_or_list));
            set_range(&mut p, args);
            set(&mut p, "includeLogs", arg(args, "includeLogs").and_then(to_boolean));
            set(&mut p, "descOrder", arg(args, "descOrder").and_then(to_boolean));
            set_pagination(&mut p, args);
        }
        "ankr_getInteractions" => {
            set(&mut p, "address", arg(args, "address").and_then(string));
        }

        // --- NFT API Methods ---
        "ankr_getNFTsByOwner" => {
            set(&mut p, "walletAddress", arg(args, "walletAddress").and_then(string));
            set(&mut p, "blockchain", arg(args, "blockchain").and_then(string_or_list));
            set_pagination(&mut p, args);
            if let Some(filter) = arg(args, "filter") {
                if filter.as_array().is_some_and(|f| !f.is_empty()) {
                    set(&mut p, "filter", raw(filter));
                }
            }
        }
        "ankr_getNFTMetadata" => {
            set(&mut p, "contractAddress", arg(args, "contractAddress").and_then(string));
            set(&mut p, "tokenId", arg(args, "tokenId").and_then(string));
            set(&mut p, "blockchain", arg(args, "blockchain").and_then(string));
            set(&mut p, "forceFetch", arg(args, "forceFetch").and_then(to_boolean));
            set(&mut p, "skipSyncCheck", arg(args, "skipSyncCheck").and_then(to_boolean));
        }
        "ankr_getNFTHolders" => {
            set(&mut p, "contractAddress", arg(args, "contractAddress").and_then(string));
            set(&mut p, "blockchain", arg(args, "blockchain").and_then(string));
            set_pagination(&mut p, args);
        }
        "ankr_getNftTransfers" => {
            // The API requires an array of addresses.
            set(&mut p, "address", arg(args, "address").and_then(string_list));
            set(&mut p, "blockchain", arg(args, "blockchain").and_then(string_or_list));
            set_range(&mut p, args);
            set(&mut p, "descOrder", arg(args, "descOrder").and_then(to_boolean));
            set_pagination(&mut p, args);
        }

        // --- Token API Methods ---
        "ankr_getAccountBalance" => {
            set(&mut p, "walletAddress", arg(args, "walletAddress").and_then(string));
            set(&mut p, "blockchain", arg(args, "blockchain").and_then(string_or_list));
            set(&mut p, "nativeFirst", arg(args, "nativeFirst").and_then(to_boolean));
            set(&mut p, "onlyWhitelisted", arg(args, "onlyWhitelisted").and_then(to_boolean));
            set_pagination(&mut p, args);
        }
        "ankr_getCurrencies" => {
            set(&mut p, "blockchain", arg(args, "blockchain").and_then(string));
        }
        "ankr_getTokenPrice" => {
            set(&mut p, "blockchain", arg(args, "blockchain").and_then(string));
            set(&mut p, "contractAddress", arg(args, "contractAddress").and_then(string));
        }
        "ankr_getTokenHolders" | "ankr_getTokenHoldersCount" => {
            set(&mut p, "contractAddress", arg(args, "contractAddress").and_then(string));
            set(&mut p, "blockchain", arg(args, "blockchain").and_then(string));
            set_pagination(&mut p, args);
        }
        "ankr_getTokenTransfers" => {
            set(&mut p, "address", arg(args, "address").and_then(string_list));
            set(&mut p, "blockchain", arg(args, "blockchain").and_then(string_or_list));
            set_range(&mut p, args);
            set(&mut p, "descOrder", arg(args, "descOrder").and_then(to_boolean));
            set_pagination(&mut p, args);
        }

        _ => return None,
    }

    Some(p)
}
