//! Piecewise-uniform mixture induction over a single real-valued variable,
//! plus a small tree-shaped probabilistic-circuit layer to compose the
//! fitted distributions.

pub mod circuit;
pub mod error;
pub mod interval;
pub mod nyga;
pub mod quality;
pub mod variable;

pub use error::{NygaError, NygaResult};
pub use interval::Interval;
pub use nyga::leaves::{Dirac, Leaf, Uniform};
pub use nyga::{Component, Mixture, Nyga};
pub use variable::Variable;
