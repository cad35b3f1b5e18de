// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use std::path::PathBuf;

/// Mesh loaded when no path is given on the command line.
pub const DEFAULT_MESH_PATH: &str = "Meshes/stanford-bunny.obj";

/// Mesh name used when `--name` is not given.
pub const DEFAULT_MESH_NAME: &str = "Test Mesh";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of worker threads for parallel processing.
    pub worker_threads: usize,
    /// Mesh path used when none is given.
    pub default_path: PathBuf,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            worker_threads: var("MANIFOLD_LITE_WORKER_THREADS")
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or_else(num_cpus::get),
            default_path: var("MANIFOLD_LITE_DEFAULT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MESH_PATH)),
            log_format: match var("MANIFOLD_LITE_LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.worker_threads, num_cpus::get());
        assert_eq!(config.default_path, PathBuf::from(DEFAULT_MESH_PATH));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup(&[
            ("MANIFOLD_LITE_WORKER_THREADS", "3"),
            ("MANIFOLD_LITE_DEFAULT_PATH", "meshes/cube.obj"),
            ("MANIFOLD_LITE_LOG_FORMAT", "json"),
        ]));
        assert_eq!(config.worker_threads, 3);
        assert_eq!(config.default_path, PathBuf::from("meshes/cube.obj"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_thread_count_falls_back() {
        for bad in ["0", "many", ""] {
            let config = Config::from_lookup(lookup(&[("MANIFOLD_LITE_WORKER_THREADS", bad)]));
            assert_eq!(config.worker_threads, num_cpus::get());
        }
    }
}
