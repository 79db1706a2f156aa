//! Filter selection and shallow filter patches.

/// Active filters. `None` means "all".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    /// Inclusive ceiling on cook time, in minutes.
    pub max_time: Option<u32>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.cuisine.is_none() && self.diet.is_none() && self.max_time.is_none()
    }

    /// Overlays every field the patch provides.
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(cuisine) = patch.cuisine {
            self.cuisine = cuisine;
        }
        if let Some(diet) = patch.diet {
            self.diet = diet;
        }
        if let Some(max_time) = patch.max_time {
            self.max_time = max_time;
        }
    }
}

/// Fields to overlay onto a [`FilterSelection`].
///
/// The outer `Option` says whether the field was provided, the inner one
/// whether it sets a value or clears it back to "all".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterPatch {
    pub cuisine: Option<Option<String>>,
    pub diet: Option<Option<String>>,
    pub max_time: Option<Option<u32>>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cuisine; `""` or `"all"` clears it.
    pub fn cuisine(mut self, value: &str) -> Self {
        self.cuisine = Some(selection_value(value));
        self
    }

    /// Sets the diet; `""` or `"all"` clears it.
    pub fn diet(mut self, value: &str) -> Self {
        self.diet = Some(selection_value(value));
        self
    }

    pub fn max_time(mut self, minutes: Option<u32>) -> Self {
        self.max_time = Some(minutes);
        self
    }

    /// Parses a cook-time ceiling; `""` or `"all"` clears it.
    pub fn max_time_str(self, value: &str) -> Result<Self, std::num::ParseIntError> {
        let minutes = match selection_value(value) {
            Some(raw) => Some(raw.parse::<u32>()?),
            None => None,
        };
        Ok(self.max_time(minutes))
    }

    pub fn is_empty(&self) -> bool {
        self.cuisine.is_none() && self.diet.is_none() && self.max_time.is_none()
    }
}

fn selection_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(trimmed.to_string())
    }
}
