//! Typed records
//!
//! Concrete record types adapted to the `Record` capability. Field names are
//! exposed in camelCase to match rule documents.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validation::{FieldAccessError, FieldValue, Record};

/// An outgoing wire transfer request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTransferRequest {
    pub beneficiary_name: Option<String>,
    pub beneficiary_account_number: Option<String>,
    pub routing_number: Option<String>,
    #[serde(default, with = "decimal_serde")]
    pub amount: Option<BigDecimal>,
    pub currency: Option<String>,
    pub transfer_date: Option<NaiveDate>,
    pub memo: Option<String>,
}

impl WireTransferRequest {
    /// Declared type name, the default rule-document key
    pub const TYPE_NAME: &'static str = "WireTransferRequest";
}

fn text(value: &Option<String>) -> Option<FieldValue> {
    value.clone().map(FieldValue::from)
}

impl Record for WireTransferRequest {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn field(&self, name: &str) -> Result<Option<FieldValue>, FieldAccessError> {
        let value = match name {
            "beneficiaryName" => text(&self.beneficiary_name),
            "beneficiaryAccountNumber" => text(&self.beneficiary_account_number),
            "routingNumber" => text(&self.routing_number),
            "amount" => self.amount.clone().map(FieldValue::from),
            "currency" => text(&self.currency),
            "transferDate" => self.transfer_date.map(FieldValue::from),
            "memo" => text(&self.memo),
            other => return Err(FieldAccessError::UnknownField(other.to_string())),
        };
        Ok(value)
    }
}

/// Custom serde for decimal amounts: written as text, read from a JSON
/// number or numeric text without rounding
mod decimal_serde {
    use bigdecimal::BigDecimal;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use crate::rules::parse_decimal;

    pub fn serialize<S>(value: &Option<BigDecimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&value.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(D::Error::custom(format!("expected a decimal, got {}", other)))
            }
        };
        parse_decimal(&text)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid decimal: {}", text)))
    }
}
