// Rule-based extraction of degrees and years of experience from free text.
// Pure functions over static patterns; no capability calls.

pub mod degree;
pub mod experience;
pub mod patterns;
