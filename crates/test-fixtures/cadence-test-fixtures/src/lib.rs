//! Stored timelines, rotations and tracker configs shared by the workspace
//! tests. Everything is looked up by name through `fixtures/manifest.json`.

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
    timelines: HashMap<String, Fixture>,
    rotations: HashMap<String, Fixture>,
    sections: HashMap<String, Fixture>,
}

/// One manifest entry: a path under `fixtures/` and, for sequencer documents,
/// the scene it is written for.
#[derive(Debug, Deserialize)]
struct Fixture {
    path: String,
    #[serde(default)]
    scene: Option<String>,
}

#[derive(Clone, Copy)]
enum Kind {
    Timeline,
    Rotation,
    Sections,
}

impl Kind {
    fn shelf(self) -> &'static HashMap<String, Fixture> {
        match self {
            Kind::Timeline => &MANIFEST.timelines,
            Kind::Rotation => &MANIFEST.rotations,
            Kind::Sections => &MANIFEST.sections,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Kind::Timeline => "timeline",
            Kind::Rotation => "rotation",
            Kind::Sections => "section tracker",
        }
    }

    fn names(self) -> Vec<String> {
        let mut names: Vec<String> = self.shelf().keys().cloned().collect();
        names.sort();
        names
    }

    fn find(self, name: &str) -> Result<&'static Fixture> {
        self.shelf()
            .get(name)
            .ok_or_else(|| anyhow!("no {} fixture named '{name}'", self.label()))
    }

    fn file(self, name: &str) -> Result<PathBuf> {
        let fixture = self.find(name)?;
        Ok(Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(&fixture.path))
    }

    fn text(self, name: &str) -> Result<String> {
        let file = self.file(name)?;
        fs::read_to_string(&file)
            .with_context(|| format!("reading {} fixture {}", self.label(), file.display()))
    }

    fn parse<T: DeserializeOwned>(self, name: &str) -> Result<T> {
        let text = self.text(name)?;
        serde_json::from_str(&text)
            .with_context(|| format!("decoding {} fixture '{name}'", self.label()))
    }

    fn scene(self, name: &str) -> Result<&'static str> {
        self.find(name)?
            .scene
            .as_deref()
            .ok_or_else(|| anyhow!("{} fixture '{name}' names no scene", self.label()))
    }
}

pub mod timelines {
    use super::*;

    pub fn keys() -> Vec<String> {
        Kind::Timeline.names()
    }

    /// Scene name the fixture is written for (`caption`, `chat_draft`, ...).
    pub fn scene(name: &str) -> Result<&'static str> {
        Kind::Timeline.scene(name)
    }

    pub fn json(name: &str) -> Result<String> {
        Kind::Timeline.text(name)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Kind::Timeline.file(name)
    }
}

pub mod rotations {
    use super::*;

    pub fn keys() -> Vec<String> {
        Kind::Rotation.names()
    }

    pub fn scene(name: &str) -> Result<&'static str> {
        Kind::Rotation.scene(name)
    }

    pub fn json(name: &str) -> Result<String> {
        Kind::Rotation.text(name)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Kind::Rotation.file(name)
    }
}

pub mod sections {
    use super::*;

    pub fn keys() -> Vec<String> {
        Kind::Sections.names()
    }

    pub fn json(name: &str) -> Result<String> {
        Kind::Sections.text(name)
    }

    /// Decode a tracker config (or any other shape) straight from the file.
    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        Kind::Sections.parse(name)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Kind::Sections.file(name)
    }
}
