//! Version details embedded by the build script.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));
