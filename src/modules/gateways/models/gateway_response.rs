use crate::core::ParamSet;

/// Value of `return_code` / `result_code` on success
pub const SUCCESS: &str = "SUCCESS";

/// Outcome of checking a response signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    Valid,
    Invalid,
    Missing,
}

impl SignatureCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, SignatureCheck::Valid)
    }
}

/// Decoded gateway response.
///
/// `signature` is only set when the top-level status is success; failed
/// responses are returned as the gateway sent them.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub params: ParamSet,
    pub signature: Option<SignatureCheck>,
}

impl GatewayResponse {
    pub fn unchecked(params: ParamSet) -> Self {
        Self {
            params,
            signature: None,
        }
    }

    /// Top-level status
    pub fn return_code(&self) -> Option<&str> {
        self.params.text("return_code")
    }

    pub fn return_msg(&self) -> Option<&str> {
        self.params.text("return_msg")
    }

    /// Business status
    pub fn result_code(&self) -> Option<&str> {
        self.params.text("result_code")
    }

    pub fn is_return_success(&self) -> bool {
        self.return_code() == Some(SUCCESS)
    }

    /// Both top-level and business status report success
    pub fn is_business_success(&self) -> bool {
        self.is_return_success() && self.result_code() == Some(SUCCESS)
    }

    /// The response carried a valid signature
    pub fn is_trusted(&self) -> bool {
        self.signature.is_some_and(|s| s.is_valid())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.params.value(key)
    }
}

/// Order lookup key accepted by the order-query endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderQuery {
    /// Gateway-assigned transaction id
    TransactionId(String),
    /// Merchant's own order number
    OutTradeNo(String),
}

impl OrderQuery {
    pub fn field(&self) -> &'static str {
        match self {
            OrderQuery::TransactionId(_) => "transaction_id",
            OrderQuery::OutTradeNo(_) => "out_trade_no",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            OrderQuery::TransactionId(id) | OrderQuery::OutTradeNo(id) => id,
        }
    }
}
