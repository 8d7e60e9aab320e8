//! Identity client seam. The trait keeps the gate testable; the wasm
//! implementation wraps the provider SDK already loaded on the page. The SDK
//! owns the whole protocol (token exchange, PKCE, JWT validation) and this
//! code never sees token material.

use crate::app_lib::GateError;
use crate::features::auth::gate::{LoginOptions, LogoutOptions};
use serde_json::Value;

/// Operations the gate needs from the identity provider's client library.
///
/// The redirect flows navigate away from the page, and
/// `handle_redirect_callback` is only valid when invoked on the page the
/// provider redirected back to.
pub trait IdentityClient {
    async fn is_authenticated(&self) -> Result<bool, GateError>;
    async fn get_user(&self) -> Result<Value, GateError>;
    async fn login_with_redirect(&self, options: &LoginOptions) -> Result<(), GateError>;
    async fn logout(&self, options: &LogoutOptions) -> Result<(), GateError>;
    async fn handle_redirect_callback(&self) -> Result<(), GateError>;
}

#[cfg(target_arch = "wasm32")]
pub use wasm::SdkIdentityClient;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use super::IdentityClient;
    use crate::app_lib::GateError;
    use crate::features::auth::gate::{ClientOptions, LoginOptions, LogoutOptions};
    use crate::features::auth::sdk;
    use serde::Serialize;
    use serde_json::Value;
    use wasm_bindgen::JsValue;

    /// Identity client backed by the provider SDK global on the page.
    pub struct SdkIdentityClient {
        inner: sdk::Auth0Client,
    }

    impl SdkIdentityClient {
        /// Constructs the SDK client. Must resolve before any other gate
        /// operation runs; failure propagates to the startup caller.
        pub async fn connect(domain: &str, client_id: &str) -> Result<Self, GateError> {
            let options = ClientOptions {
                domain: domain.to_string(),
                client_id: client_id.to_string(),
            };
            let payload = to_js(&options).map_err(GateError::ClientInit)?;
            let inner = sdk::create_client(&payload)
                .await
                .map_err(|err| GateError::ClientInit(sdk::describe(&err)))?;

            Ok(Self { inner })
        }
    }

    impl IdentityClient for SdkIdentityClient {
        async fn is_authenticated(&self) -> Result<bool, GateError> {
            let value = self
                .inner
                .is_authenticated()
                .await
                .map_err(|err| GateError::Session(sdk::describe(&err)))?;

            Ok(value.as_bool().unwrap_or(false))
        }

        async fn get_user(&self) -> Result<Value, GateError> {
            let value = self
                .inner
                .get_user()
                .await
                .map_err(|err| GateError::Session(sdk::describe(&err)))?;

            if value.is_undefined() || value.is_null() {
                return Ok(Value::Null);
            }

            let raw: String = js_sys::JSON::stringify(&value)
                .map_err(|err| GateError::Session(sdk::describe(&err)))?
                .into();
            serde_json::from_str(&raw)
                .map_err(|err| GateError::Session(format!("failed to decode profile: {err}")))
        }

        async fn login_with_redirect(&self, options: &LoginOptions) -> Result<(), GateError> {
            let payload = to_js(options).map_err(GateError::Login)?;
            self.inner
                .login_with_redirect(&payload)
                .await
                .map_err(|err| GateError::Login(sdk::describe(&err)))?;

            Ok(())
        }

        async fn logout(&self, options: &LogoutOptions) -> Result<(), GateError> {
            let payload = to_js(options).map_err(GateError::Logout)?;
            self.inner
                .logout(&payload)
                .await
                .map_err(|err| GateError::Logout(sdk::describe(&err)))?;

            Ok(())
        }

        async fn handle_redirect_callback(&self) -> Result<(), GateError> {
            self.inner
                .handle_redirect_callback()
                .await
                .map_err(|err| GateError::Callback(sdk::describe(&err)))?;

            Ok(())
        }
    }

    fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
        let raw = serde_json::to_string(value)
            .map_err(|err| format!("failed to encode options: {err}"))?;
        js_sys::JSON::parse(&raw)
            .map_err(|err| format!("failed to build options object: {}", sdk::describe(&err)))
    }
}
