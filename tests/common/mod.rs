//! Common test utilities for kdeploy integration tests.
//!
//! This module provides:
//! - `TestEnv`: isolated project/home directories plus a CLI runner
//! - `write_tree`: manifest tree builder
//! - `FakeKubectl`: a scripted kubectl that logs every invocation (unix)

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

pub const NAMESPACE_YAML: &str = "kind: Namespace\nmetadata:\n  name: shop\n";
pub const WEB_DEPLOYMENT: &str = "kind: Deployment\nmetadata:\n  name: web\n";
pub const APP_CONFIG: &str = "kind: ConfigMap\nmetadata:\n  name: app\n";
pub const WEB_SERVICE: &str = "kind: Service\nmetadata:\n  name: web\n";

/// Write `files` (relative path, content) under `root`.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, content) in files {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

/// Namespace `shop` with an ordered deployment, a config map and a service
pub fn standard_tree(root: &Path) {
    write_tree(
        root,
        &[
            ("namespace.yaml", NAMESPACE_YAML),
            ("configmaps/app.yaml", APP_CONFIG),
            ("services/web.yaml", WEB_SERVICE),
            ("deployments/.depend.start", "- web.yaml\n"),
            ("deployments/web.yaml", WEB_DEPLOYMENT),
        ],
    );
}

/// Result of running the kdeploy binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Isolated test environment with temp directories.
pub struct TestEnv {
    /// Working directory; also holds the manifest tree under `k8-generated/`
    pub project_root: TempDir,
    /// HOME and XDG config root, so no user config leaks in
    pub home_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: TempDir::new().unwrap(),
            home_dir: TempDir::new().unwrap(),
        }
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// Empty kubeconfig file; only its existence is checked
    pub fn kubeconfig(&self) -> PathBuf {
        let path = self.project_path("kubeconfig");
        fs::write(&path, "").unwrap();
        path
    }

    pub fn run(&self, args: &[&str], env_vars: &[(&str, &Path)]) -> TestResult {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_kdeploy"));
        cmd.current_dir(self.project_root.path())
            .args(args)
            .env("HOME", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute kdeploy");
        TestResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// A kubectl stand-in: answers a fixed script and appends each argument
/// vector to a log file.
#[cfg(unix)]
pub struct FakeKubectl {
    pub binary: PathBuf,
    pub log: PathBuf,
}

#[cfg(unix)]
impl FakeKubectl {
    /// `extra_cases` are shell `case` arms matched against the arguments
    /// after `--kubeconfig` and `--namespace` are stripped.
    pub fn install(dir: &Path, extra_cases: &str) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let binary = dir.join("fake-kubectl");
        let log = dir.join("kubectl.log");
        let script = format!(
            r#"#!/bin/sh
echo "$*" >> '{log}'
while [ $# -gt 0 ]; do
  case "$1" in
    --kubeconfig) shift 2 ;;
    --namespace=*) shift ;;
    *) break ;;
  esac
done
case "$*" in
{extra_cases}
  "version -o json") echo '{{"clientVersion":{{"gitVersion":"v1.29.2"}},"serverVersion":{{"gitVersion":"v1.29.2"}}}}' ;;
  "describe deployment web") echo "Replicas:  1 desired | 1 updated | 1 total | 1 available | 0 unavailable" ;;
  "get pvc") echo "NAME   STATUS   VOLUME" ;;
  apply*) echo "applied $3" ;;
  delete*) echo "deleted $2 $3" ;;
  *) ;;
esac
"#,
            log = log.display(),
            extra_cases = extra_cases,
        );
        fs::write(&binary, script).unwrap();
        fs::set_permissions(&binary, fs::Permissions::from_mode(0o755)).unwrap();
        Self { binary, log }
    }

    /// Logged invocations with the `--kubeconfig`/`--namespace` prefix intact
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Logged invocations reduced to the kubectl verb and its arguments
    pub fn commands(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|line| match line.find("--namespace=") {
                Some(start) => line[start..]
                    .split_once(' ')
                    .map(|(_, rest)| rest.to_string())
                    .unwrap_or_default(),
                None => line.clone(),
            })
            .collect()
    }
}
