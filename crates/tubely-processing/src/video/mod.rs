//! Video probing: aspect classification via an external prober.

pub mod probe;

pub use probe::{
    classify_dimensions, parse_probe_output, AspectClassifier, FfprobeClassifier, ProbeError,
};
