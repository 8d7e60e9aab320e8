//! DOM side of the gate: visibility toggling over the two class groups, the
//! button event table, and the external hub opener.

use crate::app_lib::config::AppConfig;
use crate::app_lib::GateError;
use crate::features::auth::client::SdkIdentityClient;
use crate::features::auth::gate::{AuthView, SessionGate};
use crate::features::auth::sdk;
use log::warn;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element};

/// Selector for elements shown only to signed-out visitors.
const AUTH_INVISIBLE: &str = ".auth-invisible";
/// Selector for elements shown only to signed-in visitors.
const AUTH_VISIBLE: &str = ".auth-visible";
/// Marker class that hides an element.
const HIDDEN: &str = "hidden";

pub type PageGate = SessionGate<SdkIdentityClient, DomAuthView>;

/// Renders session state by toggling the `hidden` marker across the two
/// visibility groups.
pub struct DomAuthView {
    document: Document,
}

impl DomAuthView {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn each_element(&self, selector: &str, apply: impl Fn(&Element)) -> Result<(), GateError> {
        let nodes = self
            .document
            .query_selector_all(selector)
            .map_err(|err| GateError::Dom(sdk::describe(&err)))?;

        for index in 0..nodes.length() {
            if let Some(node) = nodes.item(index) {
                if let Some(element) = node.dyn_ref::<Element>() {
                    apply(element);
                }
            }
        }

        Ok(())
    }
}

impl AuthView for DomAuthView {
    fn render(&self, authenticated: bool) -> Result<(), GateError> {
        let (hide, show) = if authenticated {
            (AUTH_INVISIBLE, AUTH_VISIBLE)
        } else {
            (AUTH_VISIBLE, AUTH_INVISIBLE)
        };

        self.each_element(hide, |element| {
            let _ = element.class_list().add_1(HIDDEN);
        })?;
        self.each_element(show, |element| {
            let _ = element.class_list().remove_1(HIDDEN);
        })
    }
}

#[derive(Clone, Copy)]
enum ButtonAction {
    Login,
    Logout,
    OpenHub,
}

/// Button identifier → action. Built once; listeners are attached at startup
/// and never rebound.
const BINDINGS: [(&str, ButtonAction); 4] = [
    ("login", ButtonAction::Login),
    ("logout", ButtonAction::Logout),
    ("upgrade", ButtonAction::OpenHub),
    ("manage", ButtonAction::OpenHub),
];

/// Attaches a click handler for every entry in the binding table. A missing
/// button is logged and skipped so partial pages still work.
pub fn bind_events(
    document: &Document,
    gate: &Rc<PageGate>,
    config: &AppConfig,
) -> Result<(), GateError> {
    for (id, action) in BINDINGS {
        let Some(element) = document.get_element_by_id(id) else {
            warn!("button #{id} missing from page");
            continue;
        };

        let handler = make_handler(gate, action, config.hub_url.clone());
        element
            .add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
            .map_err(|err| GateError::Dom(sdk::describe(&err)))?;
        handler.forget();
    }

    Ok(())
}

fn make_handler(
    gate: &Rc<PageGate>,
    action: ButtonAction,
    hub_url: String,
) -> Closure<dyn FnMut()> {
    let gate = Rc::clone(gate);

    Closure::new(move || match action {
        ButtonAction::Login => {
            let gate = Rc::clone(&gate);
            spawn_local(async move {
                if let Err(err) = gate.login(None).await {
                    warn!("{err}");
                }
            });
        }
        ButtonAction::Logout => {
            let gate = Rc::clone(&gate);
            spawn_local(async move {
                if let Err(err) = gate.logout().await {
                    warn!("{err}");
                }
            });
        }
        ButtonAction::OpenHub => {
            if let Err(err) = open_hub(&hub_url) {
                warn!("{err}");
            }
        }
    })
}

/// Opens the external hub in a new browsing context. No parameters are
/// passed and there is no return channel.
fn open_hub(url: &str) -> Result<(), GateError> {
    let window = web_sys::window().ok_or_else(|| GateError::Dom("no window".to_string()))?;
    window
        .open_with_url_and_target(url, "_blank")
        .map_err(|err| GateError::Dom(sdk::describe(&err)))?;

    Ok(())
}
