//! Parse and check commands - inspect a single payload.

use anyhow::{bail, Result};
use txqr_core::{is_recognized_transaction_payload, TransactionRequest};

pub fn run(payload: &str, json: bool) -> Result<()> {
    let Some(request) = TransactionRequest::parse(payload) else {
        bail!("Not a valid transaction payload: {}", payload);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    for (label, value) in describe(&request) {
        println!("{:<11} {}", format!("{}:", label), value);
    }
    Ok(())
}

pub fn check(payload: &str, json: bool) -> Result<()> {
    let recognized = is_recognized_transaction_payload(payload);

    if json {
        println!("{}", serde_json::json!({ "recognized": recognized }));
    } else if recognized {
        println!("Recognized transaction payload.");
    } else {
        println!("Not a transaction payload.");
    }
    Ok(())
}

/// Label/value rows for a request, in display order.
pub fn describe(request: &TransactionRequest) -> Vec<(&'static str, String)> {
    let mut rows = vec![("Kind", request.kind().to_string())];
    match request {
        TransactionRequest::Transfer(t) => {
            rows.push(("Account", t.recipient_account.clone()));
            rows.push(("Name", t.recipient_name.clone()));
        }
        TransactionRequest::Deposit(d) => {
            rows.push(("Account", d.recipient_account.clone()));
            rows.push(("Bank code", d.bank_code.clone()));
        }
    }
    rows.push(("Amount", request.amount().to_string()));
    rows.push(("Reference", or_dash(request.reference())));
    rows
}

fn or_dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}
