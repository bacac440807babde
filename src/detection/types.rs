use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Per-library count of netlist lines containing that library's naming pattern.
///
/// Always holds an entry for every registered library, in canonical order,
/// even when the count is zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchCounts {
    entries: Vec<(String, usize)>,
}

impl MatchCounts {
    pub(crate) fn zeroed<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            entries: names.into_iter().map(|n| (n.to_string(), 0)).collect(),
        }
    }

    pub(crate) fn increment_at(&mut self, index: usize) {
        self.entries[index].1 += 1;
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over all libraries; a line matching two libraries counts twice
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Names with a non-zero count, in canonical order
    pub fn detected(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, c)| *c > 0)
            .map(|(n, _)| n.clone())
            .collect()
    }
}

impl Serialize for MatchCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in &self.entries {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

/// Outcome of scanning one netlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    pub counts: MatchCounts,
    pub detected: Vec<String>,
    pub lines_scanned: usize,
    pub lines_excluded: usize,
}

impl DetectionResult {
    pub fn has_detections(&self) -> bool {
        !self.detected.is_empty()
    }
}
