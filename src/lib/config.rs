//! Build-time configuration for the identity provider and the external hub,
//! with an optional runtime override. The runtime config is read from
//! `window.PORTAL_CONFIG` (if present) so static deployments can repoint the
//! provider tenant or hub without rebuilding. Configuration values are
//! public; do not store secrets here.

/// Page configuration derived from build-time environment variables.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub domain: String,
    pub client_id: String,
    pub hub_url: String,
}

impl AppConfig {
    /// Loads config from build-time environment variables and applies runtime overrides.
    pub fn load() -> Self {
        let domain =
            option_env!("PORTAL_AUTH_DOMAIN").unwrap_or("dev-ceq8afbg7kbv2sgi.us.auth0.com");
        let client_id =
            option_env!("PORTAL_CLIENT_ID").unwrap_or("icJMaJ6OkAmybzgUt3KwnBRIv0RpIVAI");
        let hub_url =
            option_env!("PORTAL_HUB_URL").unwrap_or("https://dev-3dn3cbtsrcxpdz.userhub.app");

        let mut config = Self {
            domain: domain.to_string(),
            client_id: client_id.to_string(),
            hub_url: hub_url.to_string(),
        };

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config
    }
}

#[derive(Default)]
struct RuntimeConfig {
    domain: Option<String>,
    client_id: Option<String>,
    hub_url: Option<String>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.domain {
        config.domain = value;
    }
    if let Some(value) = runtime.client_id {
        config.client_id = value;
    }
    if let Some(value) = runtime.hub_url {
        config.hub_url = value;
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("PORTAL_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        domain: read_runtime_value(&object, "domain"),
        client_id: read_runtime_value(&object, "client_id"),
        hub_url: read_runtime_value(&object, "hub_url"),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

#[cfg(target_arch = "wasm32")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key))
        .ok()?
        .as_string()?;
    normalize_runtime_value(&value)
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
