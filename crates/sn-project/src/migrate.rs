//! Schema migration framework.

use crate::ProjectError;
use crate::schema::{NetworkDef, PreprocessConfig};

pub const LATEST_VERSION: u32 = 1;

/// Documents carrying a format version.
pub trait Versioned {
    fn version(&self) -> u32;
    fn set_version(&mut self, version: u32);
}

impl Versioned for NetworkDef {
    fn version(&self) -> u32 {
        self.version
    }

    fn set_version(&mut self, version: u32) {
        self.version = version;
    }
}

impl Versioned for PreprocessConfig {
    fn version(&self) -> u32 {
        self.version
    }

    fn set_version(&mut self, version: u32) {
        self.version = version;
    }
}

pub fn migrate_to_latest<T: Versioned>(mut doc: T) -> Result<T, ProjectError> {
    while doc.version() < LATEST_VERSION {
        doc = migrate_one_version(doc)?;
    }
    Ok(doc)
}

fn migrate_one_version<T: Versioned>(doc: T) -> Result<T, ProjectError> {
    match doc.version() {
        0 => migrate_v0_to_v1(doc),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

// Version 0 files predate the version field; the layout is unchanged.
fn migrate_v0_to_v1<T: Versioned>(mut doc: T) -> Result<T, ProjectError> {
    doc.set_version(1);
    Ok(doc)
}
