//! src/model/category.rs
//! Fixed feed categories and the quick topic shortcuts.

use std::fmt;

/// Feed category used when no free-text search is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    Trending,
    New,
}

impl Category {
    /// Selector options, in display order. The first one is the default.
    pub const ALL: [Self; 2] = [Self::Trending, Self::New];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Trending => "Trending",
            Self::New => "New",
        }
    }

    /// Query term sent to the search endpoint.
    pub const fn query(self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::New => "new",
        }
    }

    /// Ordering modifier sent alongside the query.
    pub const fn order_by(self) -> &'static str {
        match self {
            Self::Trending => "relevant",
            Self::New => "latest",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Header shortcuts, bound to keys `1`..=`6`. Picking one types it into the
/// search box.
pub const QUICK_TOPICS: [&str; 6] = [
    "Nature",
    "Architecture",
    "Travel",
    "Food",
    "Animals",
    "Technology",
];

/// Quick topic for a digit key, if any.
pub fn quick_topic(key: char) -> Option<&'static str> {
    let n = key.to_digit(10)? as usize;
    n.checked_sub(1).and_then(|i| QUICK_TOPICS.get(i)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_option_is_default() {
        assert_eq!(Category::default(), Category::ALL[0]);
        assert_eq!(Category::default().label(), "Trending");
    }

    #[test]
    fn options_map_to_distinct_tokens() {
        assert_ne!(Category::Trending.query(), Category::New.query());
        assert_ne!(Category::Trending.order_by(), Category::New.order_by());
    }

    #[test]
    fn index_round_trips_and_clamps() {
        for c in Category::ALL {
            assert_eq!(Category::from_index(c.index()), c);
        }
        assert_eq!(Category::from_index(9), Category::Trending);
    }

    #[test]
    fn digit_keys_pick_topics() {
        assert_eq!(quick_topic('1'), Some("Nature"));
        assert_eq!(quick_topic('6'), Some("Technology"));
        assert_eq!(quick_topic('0'), None);
        assert_eq!(quick_topic('7'), None);
        assert_eq!(quick_topic('x'), None);
    }
}
