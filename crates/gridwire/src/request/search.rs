///
/// SearchSpec
///
/// A search box state: free-text value plus the widget's regex flag. The
/// flag is carried for wire fidelity but filtering always uses containment,
/// so it is never evaluated.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SearchSpec {
    pub value: String,
    pub regex: bool,
}

impl SearchSpec {
    #[must_use]
    pub const fn new(value: String, regex: bool) -> Self {
        Self { value, regex }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}
