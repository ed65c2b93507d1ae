use crate::options::{Constraint, Margins};
use crate::size_cache::Size;

/// The measurement collaborator: fits a renderable into a constraint.
///
/// Must be a pure function of its inputs — the size cache assumes that measuring the same
/// renderable under the same constraint and margins always yields the same size.
pub trait Measure<R> {
    fn measure(&self, renderable: &R, constraint: Constraint, margins: Margins) -> Size;
}

impl<R, F> Measure<R> for F
where
    F: Fn(&R, Constraint, Margins) -> Size,
{
    fn measure(&self, renderable: &R, constraint: Constraint, margins: Margins) -> Size {
        self(renderable, constraint, margins)
    }
}
