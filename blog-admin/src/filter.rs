/// Sentinel selecting every category.
pub const ALL_CATEGORIES: &str = "all";

/// Selected category, reported to the owner as a query value: the empty
/// string for [`ALL_CATEGORIES`], the category itself otherwise.
pub struct CategoryFilter<F>
where
    F: FnMut(&str),
{
    selected: String,
    on_change: F,
}

impl<F> CategoryFilter<F>
where
    F: FnMut(&str),
{
    pub fn new(on_change: F) -> Self {
        Self {
            selected: ALL_CATEGORIES.to_string(),
            on_change,
        }
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn select(&mut self, value: &str) {
        value.clone_into(&mut self.selected);
        (self.on_change)(query_value(value));
    }
}

/// Maps a selection to the value sent upstream.
pub fn query_value(selection: &str) -> &str {
    if selection == ALL_CATEGORIES {
        ""
    } else {
        selection
    }
}
