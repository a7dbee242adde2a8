use crate::config::MerchantConfig;
use crate::core::Result;
use crate::modules::gateways::models::{GatewayResponse, SignatureCheck};
use crate::modules::gateways::services::signer::{self, SignType, SIGN_FIELD};
use crate::modules::gateways::services::wire;

/// Decode a gateway payload and, when its top-level status is success,
/// attach the outcome of checking its signature.
pub fn parse_response(raw: &[u8], config: &MerchantConfig) -> Result<GatewayResponse> {
    let params = wire::from_xml(raw)?;
    let mut response = GatewayResponse::unchecked(params);

    if !response.is_return_success() {
        return Ok(response);
    }

    let check = if !response.params.has(SIGN_FIELD) {
        SignatureCheck::Missing
    } else {
        let sign_type = SignType::declared_in(&response.params, config.sign_type);
        if signer::verify_with(&response.params, &config.api_key, sign_type) {
            SignatureCheck::Valid
        } else {
            SignatureCheck::Invalid
        }
    };

    response.signature = Some(check);
    Ok(response)
}
