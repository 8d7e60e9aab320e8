//! Bindings for the identity provider SDK exposed as the `auth0` page global.
//! Every call suspends until the SDK resolves it; there are no timeouts or
//! retries at this layer.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    /// Handle to an SDK client instance.
    pub type Auth0Client;

    #[wasm_bindgen(catch, js_namespace = auth0, js_name = createAuth0Client)]
    async fn create_auth0_client(options: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, method, js_name = isAuthenticated)]
    pub async fn is_authenticated(this: &Auth0Client) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, method, js_name = getUser)]
    pub async fn get_user(this: &Auth0Client) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, method, js_name = loginWithRedirect)]
    pub async fn login_with_redirect(
        this: &Auth0Client,
        options: &JsValue,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, method)]
    pub async fn logout(this: &Auth0Client, options: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, method, js_name = handleRedirectCallback)]
    pub async fn handle_redirect_callback(this: &Auth0Client) -> Result<JsValue, JsValue>;
}

/// Constructs the SDK client from an options object.
pub async fn create_client(options: &JsValue) -> Result<Auth0Client, JsValue> {
    let value = create_auth0_client(options).await?;
    Ok(value.unchecked_into())
}

/// Human-readable description of a JS error value for logs.
pub fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
