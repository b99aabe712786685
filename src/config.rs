//! Configuration utilities (port, signed-in user, seed data).

use std::{env, net::{Ipv4Addr, SocketAddr}};
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::leaderboard::{ScoreEntry, wire};

/// Socket address to bind the server to.
///
/// Reads the `PORT` env var or defaults to 8080, binds to 0.0.0.0.
pub fn server_addr() -> SocketAddr {
    let port = env::var("PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(8080);
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
}

/// Name of the signed-in player, from `FLAPBOARD_USER`.
pub fn user_name() -> Option<String> {
    env::var("FLAPBOARD_USER").ok().map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

/// Path of a `listUsers` JSON document to preload, from `FLAPBOARD_SEED`.
pub fn seed_path() -> Option<PathBuf> {
    env::var("FLAPBOARD_SEED").ok().filter(|p| !p.is_empty()).map(PathBuf::from)
}

/// Read and validate the seed document at `path`.
pub fn load_seed(path: &Path) -> anyhow::Result<Vec<ScoreEntry>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading seed file {}", path.display()))?;
    let entries = wire::decode_list(&raw)
        .with_context(|| format!("decoding seed file {}", path.display()))?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("flapboard-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_valid_seed() {
        let path = temp_file("good.json", r#"{"data":{"listUsers":{"items":[{"id":"1","userName":"bob","value":5}]}}}"#);
        let entries = load_seed(&path).unwrap();
        assert_eq!(entries, vec![ScoreEntry::new("1", "bob", 5)]);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn rejects_invalid_seed() {
        let path = temp_file("bad.json", r#"{"data":{"listUsers":{"items":[{"id":"1","value":5}]}}}"#);
        let err = load_seed(&path).unwrap_err();
        assert!(err.to_string().contains("decoding seed file"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_seed_file_is_an_error() {
        assert!(load_seed(Path::new("/nonexistent/flapboard-seed.json")).is_err());
    }
}
