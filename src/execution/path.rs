//! Executable path resolution.

use std::path::Path;

/// Resolve a command name against a `:`-separated search path. A name that
/// already stats is used verbatim; otherwise the first `dir/name` that stats
/// wins. Pure and infallible: an unresolvable name comes back unchanged and
/// the exec attempt reports the failure.
pub fn resolve(name: &str, path_env: &str) -> String {
    if Path::new(name).exists() {
        return name.to_string();
    }
    for dir in path_env.split(':') {
        let candidate = format!("{dir}/{name}");
        if Path::new(&candidate).exists() {
            return candidate;
        }
    }
    name.to_string()
}
