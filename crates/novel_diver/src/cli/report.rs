//! Player-facing error messages.

use novel_diver::{NovelDiverError, NovelDiverErrorKind};

/// Print an error the way a player should read it.
pub fn report(err: &NovelDiverError) {
    match err.kind() {
        NovelDiverErrorKind::Generation(e) => {
            eprintln!("\n{}", e.kind);
            eprintln!("{}", e.kind.user_hint());
        }
        NovelDiverErrorKind::Validation(e) => {
            eprintln!("\nPlease fix the following:");
            for issue in &e.issues {
                eprintln!("  - {}", issue);
            }
        }
        NovelDiverErrorKind::Session(e) => eprintln!("\n{}", e.kind),
        _ => eprintln!("\n{}", err),
    }
}
