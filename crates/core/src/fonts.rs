//! Candidate font pairs and host probing.

use crate::{Error, Result};
use std::path::PathBuf;

/// A (regular, bold) font file pair tried during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePair {
    pub regular: PathBuf,
    pub bold: PathBuf,
}

impl CandidatePair {
    /// Create a candidate pair.
    pub fn new(regular: impl Into<PathBuf>, bold: impl Into<PathBuf>) -> Self {
        Self {
            regular: regular.into(),
            bold: bold.into(),
        }
    }

    /// Whether both files of the pair exist.
    pub fn exists(&self) -> bool {
        self.regular.exists() && self.bold.exists()
    }
}

/// Built-in candidates, in priority order.
///
/// Every pair covers Cyrillic as well as Latin text.
pub fn default_candidates() -> Vec<CandidatePair> {
    vec![
        CandidatePair::new(r"C:\Windows\Fonts\arial.ttf", r"C:\Windows\Fonts\arialbd.ttf"),
        CandidatePair::new(r"C:\Windows\Fonts\calibri.ttf", r"C:\Windows\Fonts\calibrib.ttf"),
        CandidatePair::new(r"C:\Windows\Fonts\tahoma.ttf", r"C:\Windows\Fonts\tahomabd.ttf"),
        CandidatePair::new(
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        ),
        CandidatePair::new(
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        ),
        CandidatePair::new(
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        ),
        CandidatePair::new(
            "/Library/Fonts/Arial.ttf",
            "/Library/Fonts/Arial Bold.ttf",
        ),
        CandidatePair::new(
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        ),
    ]
}

/// First candidate whose regular and bold files both exist.
pub fn find_candidate(candidates: &[CandidatePair]) -> Result<&CandidatePair> {
    candidates
        .iter()
        .find(|pair| pair.exists())
        .ok_or_else(|| Error::FontUnavailable(describe(candidates)))
}

fn describe(candidates: &[CandidatePair]) -> String {
    if candidates.is_empty() {
        return "no candidates configured".to_string();
    }
    candidates
        .iter()
        .map(|pair| format!("{} + {}", pair.regular.display(), pair.bold.display()))
        .collect::<Vec<_>>()
        .join(", ")
}
