//! Interactive session state.
//!
//! `AppState` owns the named-wave registry and the session's analysis
//! tools. The registry is an explicit value threaded through command
//! handlers; the engine crate never sees it, and nothing here is global.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use rand::rngs::StdRng;

use sonalyze_core::{
    EndpointDetector, Result, SampleBuffer, SonalyzeError, SpectrumAnalyzer, WindowFunction,
};

pub struct AppState {
    /// Loaded and generated waves, keyed by name. A BTreeMap keeps `list`
    /// output stable.
    buffers: BTreeMap<String, SampleBuffer>,
    /// Endpoint pipeline configured from the session settings.
    pub detector: EndpointDetector,
    /// Spectrum analyzer, kept across commands so FFT plans are reused.
    pub analyzer: SpectrumAnalyzer,
    /// Random source for `gen`; seedable from the command line.
    pub rng: StdRng,
}

impl AppState {
    pub fn new(detector: EndpointDetector, rng: StdRng) -> Self {
        Self {
            buffers: BTreeMap::new(),
            detector,
            analyzer: SpectrumAnalyzer::new(),
            rng,
        }
    }

    /// Insert `buffer` under its name; returns false (keeping the existing
    /// wave) when the name is taken.
    pub fn insert(&mut self, buffer: SampleBuffer) -> bool {
        match self.buffers.entry(buffer.name.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(buffer);
                true
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.buffers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&SampleBuffer> {
        self.buffers
            .get(name)
            .ok_or_else(|| SonalyzeError::BufferNotFound {
                name: name.to_string(),
            })
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut SampleBuffer> {
        self.buffers
            .get_mut(name)
            .ok_or_else(|| SonalyzeError::BufferNotFound {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.buffers.keys().map(String::as_str)
    }

    /// Names containing `filter` (case-insensitive); every name when the
    /// filter is empty.
    pub fn names_like(&self, filter: &str) -> Vec<&str> {
        let needle = filter.to_ascii_lowercase();
        self.names()
            .filter(|name| name.to_ascii_lowercase().contains(&needle))
            .collect()
    }

    /// Spectrum of a registered wave. Split-borrows the analyzer and the
    /// registry, so the FFT planner cache survives across commands.
    pub fn spectrum(
        &mut self,
        name: &str,
        window_ms: f64,
        window: WindowFunction,
    ) -> Result<Vec<f32>> {
        let buffer = self
            .buffers
            .get(name)
            .ok_or_else(|| SonalyzeError::BufferNotFound {
                name: name.to_string(),
            })?;
        self.analyzer.analyze(buffer, window_ms, window)
    }

    /// Resolve `names` against the registry. Missing names are returned
    /// separately so the caller can report each one and still operate on
    /// the waves that do exist. Empty input resolves to every wave.
    pub fn resolve(&self, names: &[&str]) -> (Vec<&SampleBuffer>, Vec<String>) {
        if names.is_empty() {
            return (self.buffers.values().collect(), Vec::new());
        }
        let mut found = Vec::new();
        let mut missing = Vec::new();
        for &name in names {
            match self.buffers.get(name) {
                Some(buffer) => found.push(buffer),
                None => missing.push(name.to_string()),
            }
        }
        (found, missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use sonalyze_core::EndpointDetector;

    fn state() -> AppState {
        AppState::new(EndpointDetector::default(), StdRng::seed_from_u64(0))
    }

    fn wave(name: &str) -> SampleBuffer {
        SampleBuffer::new(name, 8000, vec![0.0; 16])
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut st = state();
        assert!(st.insert(wave("a")));
        assert!(!st.insert(wave("a")));
        assert_eq!(st.names().count(), 1);
    }

    #[test]
    fn resolve_reports_missing_without_dropping_the_valid_ones() {
        let mut st = state();
        st.insert(wave("alpha"));
        st.insert(wave("beta"));

        let (found, missing) = st.resolve(&["alpha", "ghost", "beta"]);
        assert_eq!(found.len(), 2);
        assert_eq!(missing, vec!["ghost".to_string()]);
    }

    #[test]
    fn empty_selection_resolves_to_every_wave() {
        let mut st = state();
        st.insert(wave("a"));
        st.insert(wave("b"));
        let (found, missing) = st.resolve(&[]);
        assert_eq!(found.len(), 2);
        assert!(missing.is_empty());
    }

    #[test]
    fn lookup_of_unknown_name_is_buffer_not_found() {
        let st = state();
        let err = st.get("nope").unwrap_err();
        assert!(matches!(err, SonalyzeError::BufferNotFound { name } if name == "nope"));
    }

    #[test]
    fn names_like_filters_case_insensitively() {
        let mut st = state();
        st.insert(wave("Speech-A"));
        st.insert(wave("speech-b"));
        st.insert(wave("tone"));

        assert_eq!(st.names_like("SPEECH").len(), 2);
        assert_eq!(st.names_like("").len(), 3);
        assert!(st.names_like("drum").is_empty());
    }
}
