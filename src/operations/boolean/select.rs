use super::classify::FragmentClass;

/// The type of boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Intersection,
    Difference,
    Xor,
}

/// Which side of the other polygon a kept fragment lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Inside,
    Outside,
}

/// Op descriptor driving the shared sweep.
///
/// Both rings are normalized counter-clockwise; `reverse_q` then flips Q so
/// that subtraction is encoded by its winding sign.
///
/// | op           | reverse Q | keep P fragments | keep Q fragments |
/// |--------------|-----------|------------------|------------------|
/// | union        | no        | outside Q        | outside P        |
/// | intersection | no        | inside Q         | inside P         |
/// | difference   | yes       | outside Q        | inside P         |
///
/// Fragments of P running along Q's boundary are kept once when both rings
/// travel the same way there and dropped when they travel opposite ways.
/// Q's boundary fragments are never kept, so shared edges appear once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SweepPolicy {
    pub reverse_q: bool,
    pub keep_p: Side,
    pub keep_q: Side,
}

impl SweepPolicy {
    pub(crate) const UNION: Self = Self {
        reverse_q: false,
        keep_p: Side::Outside,
        keep_q: Side::Outside,
    };
    pub(crate) const INTERSECTION: Self = Self {
        reverse_q: false,
        keep_p: Side::Inside,
        keep_q: Side::Inside,
    };
    pub(crate) const DIFFERENCE: Self = Self {
        reverse_q: true,
        keep_p: Side::Outside,
        keep_q: Side::Inside,
    };

    /// Descriptor of a single sweep. XOR is composed of two differences and
    /// has none.
    #[must_use]
    pub(crate) fn of(op: BooleanOp) -> Option<Self> {
        match op {
            BooleanOp::Union => Some(Self::UNION),
            BooleanOp::Intersection => Some(Self::INTERSECTION),
            BooleanOp::Difference => Some(Self::DIFFERENCE),
            BooleanOp::Xor => None,
        }
    }

    /// Winding delta of the P contacts where a kept fragment begins: walks
    /// start where P enters Q when inside fragments are kept and where it
    /// leaves Q otherwise.
    #[must_use]
    pub(crate) fn start_delta(&self) -> i32 {
        match self.keep_p {
            Side::Inside => 1,
            Side::Outside => -1,
        }
    }

    #[must_use]
    pub(crate) fn keeps_p(&self, class: FragmentClass) -> bool {
        match class {
            FragmentClass::Inside => self.keep_p == Side::Inside,
            FragmentClass::Outside => self.keep_p == Side::Outside,
            FragmentClass::SameBoundary => true,
            FragmentClass::OppositeBoundary => false,
        }
    }

    #[must_use]
    pub(crate) fn keeps_q(&self, class: FragmentClass) -> bool {
        match class {
            FragmentClass::Inside => self.keep_q == Side::Inside,
            FragmentClass::Outside => self.keep_q == Side::Outside,
            FragmentClass::SameBoundary | FragmentClass::OppositeBoundary => false,
        }
    }
}
