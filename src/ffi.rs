//! FFI Layer for the transaction core
//!
//! All C-ABI exports are defined here. Every function follows the same
//! pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `txcore_free_string`)
//!
//! Error handling: all functions return JSON with a `success` field.
//! On error, `success: false` and the `error` object is populated.
//!
//! Chain selection: requests carry either a full `chain` config object or a
//! `chain_id` naming one of the presets.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use ethers_core::types::U256;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::address::{self, derive_address, has_valid_checksum};
use crate::config::ChainConfig;
use crate::error::{CoreError, CoreResult, ErrorCode};
use crate::fees::{fee_tiers_with, FormattedFeeTiers, GasIntent};
use crate::tx::{SigningHash, TransactionBuilder, TransferRequest, UnsignedTransaction};
use crate::types::ApiResponse;
use crate::utils::logging::{disable_debug, enable_debug};

// =============================================================================
// Memory Management
// =============================================================================

/// Free a string returned by any txcore_* function
///
/// # Safety
/// The pointer must have been returned by a txcore_* function and not freed
/// before
#[unsafe(no_mangle)]
pub extern "C" fn txcore_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    unsafe {
        drop(CString::from_raw(s));
    }
}

/// Turn debug-level log output on or off
#[unsafe(no_mangle)]
pub extern "C" fn txcore_set_debug_logging(enabled: bool) {
    if enabled {
        enable_debug();
    } else {
        disable_debug();
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

const CONVERSION_FAILED: &CStr =
    c"{\"success\":false,\"error\":{\"code\":\"internal\",\"message\":\"String conversion failed\"}}";

/// Convert C string to Rust string, returning error JSON if invalid
fn parse_input(input: *const c_char) -> Result<String, *mut c_char> {
    if input.is_null() {
        return Err(error_response(CoreError::invalid_input("Null input pointer")));
    }

    let c_str = unsafe { CStr::from_ptr(input) };
    match c_str.to_str() {
        Ok(s) => Ok(s.to_owned()),
        Err(_) => Err(error_response(CoreError::invalid_input("Invalid UTF-8 string"))),
    }
}

/// Parse the input pointer as a JSON request
fn parse_request<T: DeserializeOwned>(input: *const c_char) -> Result<T, *mut c_char> {
    let json_str = parse_input(input)?;
    serde_json::from_str(&json_str)
        .map_err(|e| error_response(CoreError::parse_error(format!("Invalid JSON: {}", e))))
}

/// Create a success response JSON string
fn success_response<T: Serialize>(data: T) -> *mut c_char {
    let response = ApiResponse::ok(data);
    string_to_ptr(response.to_json())
}

/// Create an error response JSON string
fn error_response(error: CoreError) -> *mut c_char {
    let response: ApiResponse<()> = ApiResponse::err(error);
    string_to_ptr(response.to_json())
}

fn respond<T: Serialize>(result: CoreResult<T>) -> *mut c_char {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_response(e),
    }
}

/// Convert Rust string to C string pointer
fn string_to_ptr(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        // Interior NUL; report a fixed error instead
        Err(_) => CONVERSION_FAILED.to_owned().into_raw(),
    }
}

fn decode_hex(field: &str, value: &str) -> CoreResult<Vec<u8>> {
    let body = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(body).map_err(|e| CoreError::from(e).with_details(field.to_string()))
}

/// Chain given inline or by preset id
#[derive(Debug, Deserialize)]
struct ChainSelector {
    #[serde(default)]
    chain: Option<ChainConfig>,
    #[serde(default)]
    chain_id: Option<u64>,
}

impl ChainSelector {
    fn resolve(self) -> CoreResult<ChainConfig> {
        match (self.chain, self.chain_id) {
            (Some(config), _) => {
                config.validate()?;
                Ok(config)
            }
            (None, Some(chain_id)) => ChainConfig::preset(chain_id).ok_or_else(|| {
                CoreError::new(ErrorCode::ConfigError, format!("No preset for chain id {}", chain_id))
            }),
            (None, None) => Err(CoreError::invalid_input("Either chain or chain_id is required")),
        }
    }
}

fn builder_for(selector: ChainSelector, public_key: &str) -> CoreResult<TransactionBuilder> {
    let config = selector.resolve()?;
    let public_key = decode_hex("public_key", public_key)?;
    Ok(TransactionBuilder::new(config, &public_key)?)
}

// =============================================================================
// Address Operations
// =============================================================================

#[derive(Debug, Serialize)]
struct AddressResponse {
    address: String,
    checksum_address: String,
}

/// Derive the account address for a public key
///
/// # Input
/// ```json
/// { "public_key": "04..." }
/// ```
///
/// # Output
/// ```json
/// { "success": true, "data": { "address": "0x...", "checksum_address": "0x..." } }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn txcore_derive_address(input: *const c_char) -> *mut c_char {
    #[derive(Deserialize)]
    struct DeriveRequest {
        public_key: String,
    }

    let request: DeriveRequest = match parse_request(input) {
        Ok(r) => r,
        Err(ptr) => return ptr,
    };

    respond(derive(&request.public_key))
}

fn derive(public_key: &str) -> CoreResult<AddressResponse> {
    let public_key = decode_hex("public_key", public_key)?;
    let address = derive_address(&public_key)?;
    Ok(AddressResponse {
        address: address.to_string(),
        checksum_address: address.to_checksum(),
    })
}

#[derive(Debug, Serialize)]
struct ValidationResponse {
    valid: bool,
    checksum_valid: bool,
}

/// Check an address string
///
/// `valid` is the syntactic check; `checksum_valid` additionally requires
/// mixed-case input to match its EIP-55 checksum.
///
/// # Input
/// ```json
/// { "address": "0x..." }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn txcore_validate_address(input: *const c_char) -> *mut c_char {
    #[derive(Deserialize)]
    struct ValidateRequest {
        address: String,
    }

    let request: ValidateRequest = match parse_request(input) {
        Ok(r) => r,
        Err(ptr) => return ptr,
    };

    let valid = address::validate(&request.address);
    success_response(ValidationResponse {
        valid,
        checksum_valid: valid && has_valid_checksum(&request.address),
    })
}

// =============================================================================
// Transaction Operations
// =============================================================================

#[derive(Debug, Deserialize)]
struct BuildForSignRequest {
    #[serde(flatten)]
    chain: ChainSelector,
    public_key: String,
    #[serde(flatten)]
    transfer: TransferRequest,
}

#[derive(Debug, Serialize)]
struct BuildForSignResponse {
    sender: String,
    #[serde(with = "crate::serde_hex::hex32")]
    signing_hash: SigningHash,
    transaction: UnsignedTransaction,
}

/// Build an unsigned transaction and the hash to sign
///
/// # Input
/// ```json
/// {
///   "chain_id": 1,
///   "public_key": "04...",
///   "amount": { "value": "0.1", "asset": { "type": "coin" } },
///   "fee": { "value": "0.00021" },
///   "destination": "0x...",
///   "nonce": 0
/// }
/// ```
///
/// # Output
/// `sender`, `signing_hash` and the unsigned `transaction`, which is passed
/// back unchanged to `txcore_build_for_send`.
#[unsafe(no_mangle)]
pub extern "C" fn txcore_build_for_sign(input: *const c_char) -> *mut c_char {
    let request: BuildForSignRequest = match parse_request(input) {
        Ok(r) => r,
        Err(ptr) => return ptr,
    };

    respond(build_for_sign(request))
}

fn build_for_sign(request: BuildForSignRequest) -> CoreResult<BuildForSignResponse> {
    let builder = builder_for(request.chain, &request.public_key)?;
    let (signing_hash, transaction) = builder.build_request_for_sign(&request.transfer)?;
    Ok(BuildForSignResponse {
        sender: builder.address().to_string(),
        signing_hash,
        transaction,
    })
}

#[derive(Debug, Deserialize)]
struct BuildForSendRequest {
    public_key: String,
    transaction: UnsignedTransaction,
    #[serde(with = "crate::serde_hex::hex32")]
    signing_hash: SigningHash,
    signature: String,
}

#[derive(Debug, Serialize)]
struct BuildForSendResponse {
    raw_transaction: String,
    tx_hash: String,
    v: String,
}

/// Attach a 64-byte signature and return broadcast bytes
///
/// # Input
/// ```json
/// {
///   "public_key": "04...",
///   "transaction": { ... },
///   "signing_hash": "0x...",
///   "signature": "r || s hex"
/// }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn txcore_build_for_send(input: *const c_char) -> *mut c_char {
    let request: BuildForSendRequest = match parse_request(input) {
        Ok(r) => r,
        Err(ptr) => return ptr,
    };

    respond(build_for_send(request))
}

fn build_for_send(request: BuildForSendRequest) -> CoreResult<BuildForSendResponse> {
    // Only the chain id matters here and the transaction carries it
    let chain_id = request.transaction.chain_id;
    let selector = ChainSelector {
        chain: Some(
            ChainConfig::preset(chain_id)
                .unwrap_or_else(|| ChainConfig::new("custom", chain_id, "ETH")),
        ),
        chain_id: None,
    };
    let builder = builder_for(selector, &request.public_key)?;
    let signature = decode_hex("signature", &request.signature)?;

    let signed = builder.apply_signature(&request.transaction, &request.signing_hash, &signature)?;
    Ok(BuildForSendResponse {
        raw_transaction: format!("0x{}", hex::encode(signed.encode())),
        tx_hash: format!("0x{}", hex::encode(signed.tx_hash())),
        v: signed.v().to_string(),
    })
}

// =============================================================================
// Fee Operations
// =============================================================================

#[derive(Debug, Deserialize)]
struct FeeTiersRequest {
    #[serde(flatten)]
    chain: ChainSelector,
    /// Base gas price in wei, decimal
    base_gas_price: String,
    #[serde(default = "default_intent")]
    intent: GasIntent,
}

fn default_intent() -> GasIntent {
    GasIntent::Coin
}

#[derive(Debug, Serialize)]
struct FeeTiersResponse {
    #[serde(flatten)]
    formatted: FormattedFeeTiers,
    gas_prices: [String; 3],
}

/// Three-tier fee estimate for an intent
///
/// # Input
/// ```json
/// { "chain_id": 1, "base_gas_price": "20000000000", "intent": { "kind": "coin" } }
/// ```
///
/// # Output
/// `gas_limit`, the `low`/`normal`/`high` totals in the native coin and the
/// per-tier gas prices in wei.
#[unsafe(no_mangle)]
pub extern "C" fn txcore_fee_tiers(input: *const c_char) -> *mut c_char {
    let request: FeeTiersRequest = match parse_request(input) {
        Ok(r) => r,
        Err(ptr) => return ptr,
    };

    respond(estimate(request))
}

fn estimate(request: FeeTiersRequest) -> CoreResult<FeeTiersResponse> {
    let config = request.chain.resolve()?;
    let base_gas_price = U256::from_dec_str(&request.base_gas_price).map_err(|e| {
        CoreError::new(ErrorCode::InvalidAmount, "Invalid base gas price").with_details(e.to_string())
    })?;

    let gas_limit = config.fee_policy.gas_limits.gas_limit(&request.intent);
    let tiers = fee_tiers_with(base_gas_price, gas_limit, &config.fee_policy.tier_multipliers);

    Ok(FeeTiersResponse {
        formatted: tiers.format(config.coin_decimals)?,
        gas_prices: [
            tiers.low.gas_price.to_string(),
            tiers.normal.gas_price.to_string(),
            tiers.high.gas_price.to_string(),
        ],
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn call(f: extern "C" fn(*const c_char) -> *mut c_char, input: &str) -> Value {
        let input = CString::new(input).unwrap();
        let ptr = f(input.as_ptr());
        assert!(!ptr.is_null());
        let json = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_owned();
        txcore_free_string(ptr);
        serde_json::from_str(&json).unwrap()
    }

    const PUBLIC_KEY: &str = "04EB30400CE9D1DEED12B84D4161A1FA922EF4185A155EF3EC208078B3807B126FA22C335081AAEBF161095C11C7D8BD550EF8882A3125B0EE9AE96DDDE1AE743F";

    #[test]
    fn test_null_input() {
        let ptr = txcore_derive_address(std::ptr::null());
        let json = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_owned();
        txcore_free_string(ptr);
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "invalid_input");
    }

    #[test]
    fn test_free_null_is_noop() {
        txcore_free_string(std::ptr::null_mut());
    }

    #[test]
    fn test_debug_switch() {
        txcore_set_debug_logging(true);
        assert!(crate::utils::logging::is_debug_enabled());
        txcore_set_debug_logging(false);
        assert!(!crate::utils::logging::is_debug_enabled());
    }

    #[test]
    fn test_derive_address() {
        let value = call(txcore_derive_address, &format!(r#"{{"public_key":"0x{}"}}"#, PUBLIC_KEY));
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["address"], "0xb1123eff798183b7cb32f62607d3d39e950d9cc3");

        let value = call(txcore_derive_address, r#"{"public_key":"04abcd"}"#);
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "invalid_public_key");
    }

    #[test]
    fn test_validate_address() {
        let value = call(
            txcore_validate_address,
            r#"{"address":"0xc63763572D45171e4C25cA0818b44E5Dd7F5c15B"}"#,
        );
        assert_eq!(value["data"]["valid"], true);
        assert_eq!(value["data"]["checksum_valid"], true);

        let value = call(txcore_validate_address, r#"{"address":"0x1234"}"#);
        assert_eq!(value["data"]["valid"], false);
        assert_eq!(value["data"]["checksum_valid"], false);

        let value = call(txcore_validate_address, "not json");
        assert_eq!(value["error"]["code"], "parse_error");
    }

    #[test]
    fn test_sign_then_send() {
        let request = format!(
            r#"{{
                "chain_id": 1,
                "public_key": "{}",
                "amount": {{ "value": "0.1", "asset": {{ "type": "coin" }} }},
                "fee": {{ "value": "0.00999999999999" }},
                "destination": "0x7655b9b19ffab8b897f836857dae22a1e7f8d735",
                "nonce": 15
            }}"#,
            PUBLIC_KEY
        );
        let built = call(txcore_build_for_sign, &request);
        assert_eq!(built["success"], true, "{}", built);
        let data = &built["data"];
        assert_eq!(
            data["signing_hash"],
            "0xbdbecf64b443f82d1f9fda3f2d6ba69af6d82029b8271339b7e775613ae57761"
        );
        assert_eq!(data["transaction"]["fee"]["gas_price"], "476190476190");

        let send = serde_json::json!({
            "public_key": PUBLIC_KEY,
            "transaction": data["transaction"],
            "signing_hash": data["signing_hash"],
            "signature": "B945398FB90158761F6D61789B594D042F0F490F9656FBFFAE8F18B49D5F30054F43EE43CCAB2703F0E2E4E61D99CF3D4A875CD759569787CF0AED02415434C6",
        });
        let sent = call(txcore_build_for_send, &send.to_string());
        assert_eq!(sent["success"], true, "{}", sent);
        assert_eq!(sent["data"]["v"], "37");
        assert!(sent["data"]["raw_transaction"]
            .as_str()
            .unwrap()
            .starts_with("0xf86c0f856edf2a079e825208"));
    }

    #[test]
    fn test_build_errors() {
        let value = call(
            txcore_build_for_sign,
            &format!(
                r#"{{"chain_id":1,"public_key":"{}","amount":{{"value":"1","asset":{{"type":"coin"}}}},"fee":null,"destination":"0x7655b9b19ffab8b897f836857dae22a1e7f8d735","nonce":0}}"#,
                PUBLIC_KEY
            ),
        );
        assert_eq!(value["error"]["code"], "missing_fee");

        let value = call(
            txcore_build_for_sign,
            &format!(
                r#"{{"chain_id":424242,"public_key":"{}","amount":{{"value":"1","asset":{{"type":"coin"}}}},"fee":{{"value":"1"}},"destination":"0x7655b9b19ffab8b897f836857dae22a1e7f8d735","nonce":0}}"#,
                PUBLIC_KEY
            ),
        );
        assert_eq!(value["error"]["code"], "config_error");
    }

    #[test]
    fn test_fee_tiers() {
        let value = call(
            txcore_fee_tiers,
            r#"{"chain_id":1,"base_gas_price":"20000000000","intent":{"kind":"coin"}}"#,
        );
        assert_eq!(value["success"], true, "{}", value);
        assert_eq!(value["data"]["gas_limit"], 21000);
        assert_eq!(value["data"]["low"], "0.00042");
        assert_eq!(value["data"]["high"], "0.00063");
        assert_eq!(value["data"]["gas_prices"][1], "24000000000");

        let value = call(
            txcore_fee_tiers,
            r#"{"chain_id":1,"base_gas_price":"1","intent":{"kind":"token","symbol":"DGX"}}"#,
        );
        assert_eq!(value["data"]["gas_limit"], 300000);

        let value = call(txcore_fee_tiers, r#"{"chain_id":1,"base_gas_price":"-1"}"#);
        assert_eq!(value["error"]["code"], "invalid_amount");
    }
}
