use crate::server::response::ApiError;

const MAX_CODE_LEN: usize = 2048;
const MAX_ORDER_ID_LEN: usize = 64;

pub fn validate_code(code: &str) -> Result<(), ApiError> {
    if code.trim().is_empty() {
        return Err(ApiError::bad_request("No authorization code provided"));
    }
    if code.len() > MAX_CODE_LEN {
        return Err(ApiError::bad_request(format!(
            "Authorization code cannot exceed {MAX_CODE_LEN} characters"
        )));
    }
    Ok(())
}

/// PayPal order ids are short alphanumeric strings.
pub fn validate_order_id(order_id: &str) -> Result<(), ApiError> {
    if order_id.is_empty() {
        return Err(ApiError::bad_request("No order id provided"));
    }
    if order_id.len() > MAX_ORDER_ID_LEN {
        return Err(ApiError::bad_request(format!(
            "Order id cannot exceed {MAX_ORDER_ID_LEN} characters"
        )));
    }
    if !order_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ApiError::bad_request(
            "Order id can only contain alphanumeric characters, hyphens, and underscores",
        ));
    }
    Ok(())
}
