//! Shared JSON fixtures for pivot tests and benches.
//!
//! `fixtures/manifest.json` maps fixture names to files. Figure entries may
//! carry the validation codes the figure is expected to produce.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    figures: HashMap<String, FigureEntry>,
    projects: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FigureEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        expect: Vec<String>,
    },
}

impl FigureEntry {
    fn as_path(&self) -> &str {
        match self {
            FigureEntry::Path(path) => path,
            FigureEntry::Detailed { path, .. } => path,
        }
    }

    fn expected(&self) -> &[String] {
        match self {
            FigureEntry::Path(_) => &[],
            FigureEntry::Detailed { expect, .. } => expect,
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod figures {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.figures.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.figures, "figure", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.figures, "figure", name)?;
        super::load_json(entry.as_path())
    }

    /// Validation codes the fixture should produce, in order. Empty for
    /// figures that are expected to validate cleanly.
    pub fn expected_codes(name: &str) -> Result<Vec<String>> {
        let entry = lookup(&MANIFEST.figures, "figure", name)?;
        Ok(entry.expected().to_vec())
    }
}

pub mod projects {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.projects.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.projects, "project", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.projects, "project", name)?;
        super::load_json(rel)
    }
}
