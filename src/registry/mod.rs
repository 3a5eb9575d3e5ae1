//! Target registry: parsing and holding the list of endpoints to probe.
//!
//! The requests file carries one target per line, whitespace-delimited:
//!
//! ```text
//! METHOD DOMAIN_KEY PATH [CONTENT_TYPE [BODY...]]
//! ```
//!
//! Lines with fewer than three fields are skipped. A body is only honored for
//! `POST` and is rebuilt by rejoining the remaining fields with single spaces,
//! so bodies containing runs of whitespace are not round-trip safe.

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

/// Registry error types.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("can't read requests file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One configured endpoint to probe.
///
/// Immutable after load. `index` is the position in the requests file and
/// fixes the display order on the status page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub index: usize,
    pub method: String,
    pub domain_key: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Option<String>,
}

impl Target {
    /// Identity string used as the result store key.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Display label for the status page.
    pub fn label(&self) -> String {
        format!("{} {}", self.domain_key, self.path)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.method,
            self.domain_key,
            self.path,
            self.content_type.as_deref().unwrap_or(""),
            self.body.as_deref().map_or(0, str::len)
        )
    }
}

/// Load the target list from the requests file.
///
/// An unreadable file fails the whole load; malformed lines are skipped
/// silently. Indices are assigned in file order starting at zero.
pub fn load_targets<P: AsRef<Path>>(path: P) -> Result<Vec<Target>, RegistryError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| RegistryError::Read {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut list = Vec::new();
    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            continue;
        }

        let method = fields[0].to_string();

        let body = if method == "POST" && fields.len() >= 5 {
            Some(fields[4..].join(" "))
        } else {
            None
        };

        let content_type = fields.get(3).map(|s| s.to_string());

        list.push(Target {
            index: list.len(),
            method,
            domain_key: fields[1].to_string(),
            path: fields[2].to_string(),
            content_type,
            body,
        });
    }

    Ok(list)
}
