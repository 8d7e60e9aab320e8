mod app;
#[path = "lib/mod.rs"]
mod app_lib;
mod features;

#[cfg(target_arch = "wasm32")]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!(
        "hub-portal {} ({})",
        env!("CARGO_PKG_VERSION"),
        app_lib::GIT_COMMIT_HASH
    );

    wasm_bindgen_futures::spawn_local(async {
        if let Err(err) = app::run().await {
            log::error!("portal startup failed: {err}");
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
