//! Credential verification.

use novel_diver::{BackendRegistry, Credentials, NovelDiverConfig};

/// Probe every configured backend and print the outcome.
///
/// Returns false when nothing is configured or any probe fails.
pub async fn check_backends(config: &NovelDiverConfig, credentials: Credentials) -> bool {
    let mut registry = BackendRegistry::new(config.backend_settings(), credentials);
    if registry.available().is_empty() {
        println!("No backends configured. Set GEMINI_API_KEY, HUGGINGFACE_TOKEN or DEMO_MODE=true.");
        return false;
    }

    let mut all_ok = true;
    for (id, outcome) in registry.verify_all().await {
        match outcome {
            Ok(()) => println!("{:<12} ok", id.as_ref()),
            Err(e) => {
                all_ok = false;
                println!("{:<12} FAILED: {}", id.as_ref(), e.kind);
                println!("{:<12} {}", "", e.kind.user_hint());
            }
        }
    }
    all_ok
}
