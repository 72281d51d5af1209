//! Signal processing — the band-stop filter chain that gives synthesized
//! speech its robotic timbre.

pub mod notch;

pub use notch::{BandStopFilter, FilterSpec, NotchChain};
