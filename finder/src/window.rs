use time::OffsetDateTime;

/// Optional `[lower, upper]` filter on the first-measurement timestamp.
/// A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub lower: Option<OffsetDateTime>,
    pub upper: Option<OffsetDateTime>,
}

impl TimeWindow {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn between(lower: OffsetDateTime, upper: OffsetDateTime) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    pub fn starting_at(lower: OffsetDateTime) -> Self {
        Self {
            lower: Some(lower),
            upper: None,
        }
    }

    pub fn ending_at(upper: OffsetDateTime) -> Self {
        Self {
            lower: None,
            upper: Some(upper),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.lower.is_some() || self.upper.is_some()
    }

    pub fn lower_only(&self) -> Self {
        Self {
            lower: self.lower,
            upper: None,
        }
    }

    pub fn upper_only(&self) -> Self {
        Self {
            lower: None,
            upper: self.upper,
        }
    }
}
