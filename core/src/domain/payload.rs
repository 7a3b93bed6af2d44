//! Transaction payload domain models.
//!
//! Payloads are colon-delimited strings with a literal prefix:
//!
//! ```text
//! transfer:<recipientAccount>:<recipientName>:<amount>[:<reference>]
//! deposit:<recipientAccount>:<bankCode>:<amount>[:<reference>]
//! ```
//!
//! Colons inside fields are not escaped, so anything past the fifth field is
//! dropped. Field contents are passed through as-is: amounts are not checked
//! for being numeric and account numbers carry no checksum.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Prefix of a transfer payload.
pub const TRANSFER_PREFIX: &str = "transfer:";

/// Prefix of a deposit payload.
pub const DEPOSIT_PREFIX: &str = "deposit:";

const FIELD_SEPARATOR: char = ':';

/// Minimum number of separated parts, prefix included.
const MIN_PARTS: usize = 4;

// ============================================================================
// ParsedTransferRequest
// ============================================================================

/// A transfer to another account, decoded from a `transfer:` payload.
///
/// Serializes with `"kind": "transfer"` ahead of its fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransferRequest {
    /// Account that receives the money.
    pub recipient_account: String,
    /// Display name of the recipient.
    pub recipient_name: String,
    /// Amount as written in the payload.
    pub amount: String,
    /// Free-text memo, empty when absent.
    #[serde(default)]
    pub reference: String,
}

impl ParsedTransferRequest {
    /// Kind tag used when serialized.
    pub const KIND: &'static str = "transfer";
}

impl Serialize for ParsedTransferRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ParsedTransferRequest", 5)?;
        state.serialize_field("kind", Self::KIND)?;
        state.serialize_field("recipientAccount", &self.recipient_account)?;
        state.serialize_field("recipientName", &self.recipient_name)?;
        state.serialize_field("amount", &self.amount)?;
        state.serialize_field("reference", &self.reference)?;
        state.end()
    }
}

// ============================================================================
// ParsedDepositRequest
// ============================================================================

/// A deposit into an account at a given bank, decoded from a `deposit:` payload.
///
/// Serializes with `"kind": "deposit"` ahead of its fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDepositRequest {
    /// Account that receives the deposit.
    pub recipient_account: String,
    /// Code of the bank holding the account.
    pub bank_code: String,
    /// Amount as written in the payload.
    pub amount: String,
    /// Free-text memo, empty when absent.
    #[serde(default)]
    pub reference: String,
}

impl ParsedDepositRequest {
    /// Kind tag used when serialized.
    pub const KIND: &'static str = "deposit";
}

impl Serialize for ParsedDepositRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ParsedDepositRequest", 5)?;
        state.serialize_field("kind", Self::KIND)?;
        state.serialize_field("recipientAccount", &self.recipient_account)?;
        state.serialize_field("bankCode", &self.bank_code)?;
        state.serialize_field("amount", &self.amount)?;
        state.serialize_field("reference", &self.reference)?;
        state.end()
    }
}

// ============================================================================
// TransactionRequest
// ============================================================================

/// Any request a transaction payload can carry.
///
/// Serializes as the inner request, which carries the `kind` tag, e.g.
/// `{"kind":"transfer","recipientAccount":"ACC123",...}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TransactionRequest {
    /// Transfer to another account.
    Transfer(ParsedTransferRequest),
    /// Deposit into an account.
    Deposit(ParsedDepositRequest),
}

impl Serialize for TransactionRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TransactionRequest::Transfer(t) => t.serialize(serializer),
            TransactionRequest::Deposit(d) => d.serialize(serializer),
        }
    }
}

impl TransactionRequest {
    /// Parse a payload of either kind.
    pub fn parse(text: &str) -> Option<Self> {
        if text.starts_with(TRANSFER_PREFIX) {
            parse_transfer_request(text).map(TransactionRequest::Transfer)
        } else if text.starts_with(DEPOSIT_PREFIX) {
            parse_deposit_request(text).map(TransactionRequest::Deposit)
        } else {
            None
        }
    }

    /// The kind tag (`"transfer"` or `"deposit"`).
    pub fn kind(&self) -> &'static str {
        match self {
            TransactionRequest::Transfer(_) => ParsedTransferRequest::KIND,
            TransactionRequest::Deposit(_) => ParsedDepositRequest::KIND,
        }
    }

    /// Account receiving the money.
    pub fn recipient_account(&self) -> &str {
        match self {
            TransactionRequest::Transfer(t) => &t.recipient_account,
            TransactionRequest::Deposit(d) => &d.recipient_account,
        }
    }

    /// Amount as written in the payload.
    pub fn amount(&self) -> &str {
        match self {
            TransactionRequest::Transfer(t) => &t.amount,
            TransactionRequest::Deposit(d) => &d.amount,
        }
    }

    /// Memo, empty when absent.
    pub fn reference(&self) -> &str {
        match self {
            TransactionRequest::Transfer(t) => &t.reference,
            TransactionRequest::Deposit(d) => &d.reference,
        }
    }
}

impl std::fmt::Display for TransactionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionRequest::Transfer(t) => write!(
                f,
                "Transfer {} to {} ({})",
                t.amount, t.recipient_name, t.recipient_account
            )?,
            TransactionRequest::Deposit(d) => write!(
                f,
                "Deposit {} to {} at bank {}",
                d.amount, d.recipient_account, d.bank_code
            )?,
        }
        if !self.reference().is_empty() {
            write!(f, " ref {}", self.reference())?;
        }
        Ok(())
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Returns true if `text` carries one of the known payload prefixes.
///
/// Cheap pre-filter; a recognized payload can still fail to parse.
pub fn is_recognized_transaction_payload(text: &str) -> bool {
    text.starts_with(TRANSFER_PREFIX) || text.starts_with(DEPOSIT_PREFIX)
}

/// Parse `transfer:<account>:<name>:<amount>[:<reference>]`.
pub fn parse_transfer_request(text: &str) -> Option<ParsedTransferRequest> {
    let [account, name, amount, reference] = split_fields(text, TRANSFER_PREFIX)?;
    Some(ParsedTransferRequest {
        recipient_account: account.to_string(),
        recipient_name: name.to_string(),
        amount: amount.to_string(),
        reference: reference.to_string(),
    })
}

/// Parse `deposit:<account>:<bankCode>:<amount>[:<reference>]`.
pub fn parse_deposit_request(text: &str) -> Option<ParsedDepositRequest> {
    let [account, bank_code, amount, reference] = split_fields(text, DEPOSIT_PREFIX)?;
    Some(ParsedDepositRequest {
        recipient_account: account.to_string(),
        bank_code: bank_code.to_string(),
        amount: amount.to_string(),
        reference: reference.to_string(),
    })
}

/// Split a prefixed payload into its three required fields and the reference.
fn split_fields<'a>(text: &'a str, prefix: &str) -> Option<[&'a str; 4]> {
    if !text.starts_with(prefix) {
        return None;
    }

    let parts: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
    if parts.len() < MIN_PARTS {
        return None;
    }

    let reference = parts.get(4).copied().unwrap_or_default();
    Some([parts[1], parts[2], parts[3], reference])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transfer_without_reference() {
        let req = parse_transfer_request("transfer:ACC123:Jane Doe:500").unwrap();
        assert_eq!(req.recipient_account, "ACC123");
        assert_eq!(req.recipient_name, "Jane Doe");
        assert_eq!(req.amount, "500");
        assert_eq!(req.reference, "");
    }

    #[test]
    fn test_parse_transfer_with_reference() {
        let req = parse_transfer_request("transfer:ACC123:Jane Doe:500:INV-9").unwrap();
        assert_eq!(req.reference, "INV-9");
        assert_eq!(req.amount, "500");
    }

    #[test]
    fn test_parse_transfer_too_few_fields() {
        assert!(parse_transfer_request("transfer:ACC123").is_none());
        assert!(parse_transfer_request("transfer:ACC123:Jane Doe").is_none());
    }

    #[test]
    fn test_parse_deposit() {
        let req = parse_deposit_request("deposit:ACC1:BNK01:1000:ref1").unwrap();
        assert_eq!(
            req,
            ParsedDepositRequest {
                recipient_account: "ACC1".to_string(),
                bank_code: "BNK01".to_string(),
                amount: "1000".to_string(),
                reference: "ref1".to_string(),
            }
        );
    }

    #[test]
    fn test_unrecognized_payloads() {
        for text in ["", "hello", "Transfer:A:B:1", " transfer:A:B:1", "https://example.com"] {
            assert!(!is_recognized_transaction_payload(text), "{text}");
            assert!(parse_transfer_request(text).is_none(), "{text}");
            assert!(parse_deposit_request(text).is_none(), "{text}");
            assert!(TransactionRequest::parse(text).is_none(), "{text}");
        }
    }

    #[test]
    fn test_prefix_must_match_parser() {
        assert!(parse_transfer_request("deposit:ACC1:BNK01:1000").is_none());
        assert!(parse_deposit_request("transfer:ACC123:Jane Doe:500").is_none());
    }

    #[test]
    fn test_recognized_but_malformed() {
        assert!(is_recognized_transaction_payload("deposit:"));
        assert!(parse_deposit_request("deposit:").is_none());
    }

    #[test]
    fn test_empty_and_missing_reference_are_equal() {
        let omitted = parse_transfer_request("transfer:A:B:1").unwrap();
        let empty = parse_transfer_request("transfer:A:B:1:").unwrap();
        assert_eq!(omitted, empty);
    }

    #[test]
    fn test_fields_are_not_validated() {
        let req = parse_transfer_request("transfer:::abc").unwrap();
        assert_eq!(req.recipient_account, "");
        assert_eq!(req.recipient_name, "");
        assert_eq!(req.amount, "abc");
    }

    #[test]
    fn test_extra_fields_are_dropped() {
        let req = parse_transfer_request("transfer:A:B:1:memo:with:colons").unwrap();
        assert_eq!(req.reference, "memo");
    }

    #[test]
    fn test_transaction_request_dispatch() {
        let transfer = TransactionRequest::parse("transfer:ACC123:Jane Doe:500").unwrap();
        assert_eq!(transfer.kind(), "transfer");
        assert_eq!(transfer.recipient_account(), "ACC123");

        let deposit = TransactionRequest::parse("deposit:ACC1:BNK01:1000:ref1").unwrap();
        assert_eq!(deposit.kind(), "deposit");
        assert_eq!(deposit.amount(), "1000");
        assert_eq!(deposit.reference(), "ref1");
    }

    #[test]
    fn test_serialized_shape() {
        let req = TransactionRequest::parse("transfer:ACC123:Jane Doe:500").unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "transfer",
                "recipientAccount": "ACC123",
                "recipientName": "Jane Doe",
                "amount": "500",
                "reference": ""
            })
        );

        let back: TransactionRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn test_standalone_requests_carry_kind() {
        let transfer = parse_transfer_request("transfer:ACC123:Jane Doe:500:INV-9").unwrap();
        let json = serde_json::to_value(&transfer).unwrap();
        assert_eq!(json["kind"], "transfer");
        assert_eq!(json["recipientName"], "Jane Doe");

        let deposit = parse_deposit_request("deposit:ACC1:BNK01:1000").unwrap();
        let text = serde_json::to_string(&deposit).unwrap();
        assert_eq!(
            text,
            r#"{"kind":"deposit","recipientAccount":"ACC1","bankCode":"BNK01","amount":"1000","reference":""}"#
        );

        // Same bytes whether wrapped or not
        let wrapped = TransactionRequest::Deposit(deposit.clone());
        assert_eq!(serde_json::to_string(&wrapped).unwrap(), text);

        let back: ParsedDepositRequest = serde_json::from_str(&text).unwrap();
        assert_eq!(back, deposit);
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let json = serde_json::json!({
            "kind": "refund",
            "recipientAccount": "ACC1",
            "amount": "1"
        });
        assert!(serde_json::from_value::<TransactionRequest>(json).is_err());
    }

    #[test]
    fn test_display() {
        let req = TransactionRequest::parse("deposit:ACC1:BNK01:1000:ref1").unwrap();
        assert_eq!(req.to_string(), "Deposit 1000 to ACC1 at bank BNK01 ref ref1");

        let req = TransactionRequest::parse("transfer:ACC123:Jane Doe:500").unwrap();
        assert_eq!(req.to_string(), "Transfer 500 to Jane Doe (ACC123)");
    }
}
