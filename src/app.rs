//! Page bootstrap: loads configuration, constructs the identity client,
//! wires the button event table, and runs the gate startup sequence.

#[cfg(target_arch = "wasm32")]
pub use wasm::run;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use crate::app_lib::config::AppConfig;
    use crate::app_lib::GateError;
    use crate::features::auth::client::SdkIdentityClient;
    use crate::features::auth::dom::{self, DomAuthView};
    use crate::features::auth::gate::SessionGate;
    use crate::features::auth::sdk;
    use std::rc::Rc;

    pub async fn run() -> Result<(), GateError> {
        let config = AppConfig::load();

        if config.domain.is_empty() || config.client_id.is_empty() {
            return Err(GateError::Config(
                "identity provider domain and client id are required".to_string(),
            ));
        }

        let window =
            web_sys::window().ok_or_else(|| GateError::Dom("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| GateError::Dom("no document".to_string()))?;

        let location = window.location();
        let origin = location
            .origin()
            .map_err(|err| GateError::Dom(sdk::describe(&err)))?;
        let query = location
            .search()
            .map_err(|err| GateError::Dom(sdk::describe(&err)))?;

        // The client must be ready before anything else runs.
        let client = SdkIdentityClient::connect(&config.domain, &config.client_id).await?;

        let view = DomAuthView::new(document.clone());
        let gate = Rc::new(SessionGate::new(client, view, origin));

        dom::bind_events(&document, &gate, &config)?;

        gate.start(&query).await
    }
}
