//! Session gate for the portal page. Authentication is delegated to the
//! identity provider's client library; this module decides, once per page
//! load, whether to resume a redirect callback and how session state maps to
//! page visibility. It must not log token material.
//!
//! Flow overview: on load the gate queries session state once. Authenticated
//! visitors get the signed-in rendering immediately. Otherwise, when the
//! query string carries a redirect marker the provider SDK consumes it, and
//! the page renders whichever state resulted. Login and logout are
//! redirect-based flows that navigate away from the page.

pub(crate) mod client;
#[cfg(target_arch = "wasm32")]
pub(crate) mod dom;
pub(crate) mod gate;
#[cfg(target_arch = "wasm32")]
pub(crate) mod sdk;
