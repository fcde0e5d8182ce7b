//! Half-open segment arithmetic for deletions

/// Where a span `[st, ed)` sits relative to a deleted span `[ds, de)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// Entirely before the deletion
    Before,
    /// Entirely after the deletion
    After,
    /// Fully inside the deletion
    Inside,
    /// Strictly contains the deletion
    Contains,
    /// Crosses the deletion start only
    LeftEdge,
    /// Crosses the deletion end only
    RightEdge,
}

pub fn classify(st: usize, ed: usize, ds: usize, de: usize) -> Overlap {
    if ed <= ds {
        Overlap::Before
    } else if st >= de {
        Overlap::After
    } else if ds <= st && ed <= de {
        Overlap::Inside
    } else if st < ds && ed > de {
        Overlap::Contains
    } else if st < ds {
        Overlap::LeftEdge
    } else {
        Overlap::RightEdge
    }
}

/// Excise `[ds, de)` from `[st, ed)` and close the gap
///
/// Returns the remaining span in post-deletion coordinates. It is empty
/// exactly when the span was inside the deletion.
pub fn subtract_segment(st: usize, ed: usize, ds: usize, de: usize) -> (usize, usize) {
    let len = de - ds;
    let map = |p: usize| {
        if p <= ds {
            p
        } else if p <= de {
            ds
        } else {
            p - len
        }
    };
    (map(st), map(ed))
}

/// Part of `[st, ed)` that falls inside `[ds, de)`, relative to `ds`
pub fn removed_part(st: usize, ed: usize, ds: usize, de: usize) -> (usize, usize) {
    (st.max(ds) - ds, ed.min(de) - ds)
}
