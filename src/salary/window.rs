/// Which side of an offset a window reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Before,
    After,
}

/// Up to `remaining` whitespace-delimited words on one side of an offset.
///
/// Built fresh for every anchor; the cursor is a byte index into `text`.
#[derive(Debug, Clone)]
pub struct ContextWindow<'t> {
    text: &'t str,
    cursor: usize,
    direction: Direction,
    remaining: usize,
}

impl<'t> ContextWindow<'t> {
    pub fn new(text: &'t str, offset: usize, direction: Direction, max_words: usize) -> Self {
        Self {
            text,
            cursor: offset.min(text.len()),
            direction,
            remaining: max_words,
        }
    }

    /// Words starting right at `offset`; a suffix glued to a figure (`/hour`) is the first word.
    pub fn after(text: &'t str, offset: usize, max_words: usize) -> Self {
        Self::new(text, offset, Direction::After, max_words)
    }

    /// Words ending at `offset`, nearest first.
    pub fn before(text: &'t str, offset: usize, max_words: usize) -> Self {
        Self::new(text, offset, Direction::Before, max_words)
    }

    fn next_after(&mut self) -> Option<&'t str> {
        let rest = &self.text[self.cursor..];
        let trimmed = rest.trim_start();
        if trimmed.is_empty() {
            return None;
        }
        let start = self.cursor + (rest.len() - trimmed.len());
        let len = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        self.cursor = start + len;
        Some(&self.text[start..start + len])
    }

    fn next_before(&mut self) -> Option<&'t str> {
        let head = self.text[..self.cursor].trim_end();
        if head.is_empty() {
            return None;
        }
        let start = head
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(i, c)| i + c.len_utf8());
        self.cursor = start;
        Some(&head[start..])
    }
}

impl<'t> Iterator for ContextWindow<'t> {
    type Item = &'t str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let word = match self.direction {
            Direction::After => self.next_after(),
            Direction::Before => self.next_before(),
        }?;
        self.remaining -= 1;
        Some(word)
    }
}

/// A purely alphabetic word that may sit between a figure and its keyword.
pub fn is_filler(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}

/// Case-insensitive frequency keywords.
#[derive(Debug, Clone, Copy)]
pub struct KeywordSet {
    /// Units accepted after a `p`, `p.`, `p/` or `p\` abbreviation (`ph`, `p/hr`, `pw`).
    pub per_units: &'static [&'static str],
    /// Whole words.
    pub exact: &'static [&'static str],
    /// Word prefixes.
    pub prefixes: &'static [&'static str],
}

pub const HOURLY_KEYWORDS: KeywordSet = KeywordSet {
    per_units: &["h", "hr"],
    exact: &["hr"],
    prefixes: &["hour"],
};

pub const DAILY_KEYWORDS: KeywordSet = KeywordSet {
    per_units: &["d", "da", "dy", "day"],
    exact: &[],
    prefixes: &["day", "daily", "night", "shift"],
};

pub const WEEKLY_KEYWORDS: KeywordSet = KeywordSet {
    per_units: &["w"],
    exact: &[],
    prefixes: &["week", "workweek"],
};

pub const SALARY_KEYWORDS: KeywordSet = KeywordSet {
    per_units: &[],
    exact: &[],
    prefixes: &["salar"],
};

impl KeywordSet {
    pub fn matches(&self, word: &str) -> bool {
        let word = word
            .trim_start_matches(['/', '\\'])
            .trim_end_matches(|c: char| !c.is_alphanumeric())
            .to_ascii_lowercase();
        if word.is_empty() {
            return false;
        }
        self.exact.contains(&word.as_str())
            || self.prefixes.iter().any(|p| word.starts_with(p))
            || self.is_per_unit(&word)
    }

    fn is_per_unit(&self, word: &str) -> bool {
        let Some(rest) = word.strip_prefix('p') else {
            return false;
        };
        let rest = rest.strip_prefix(['.', '/', '\\']).unwrap_or(rest);
        self.per_units.contains(&rest)
    }

    /// True when a keyword shows up before the first non-filler word.
    pub fn found_in<'t>(&self, words: impl IntoIterator<Item = &'t str>) -> bool {
        for word in words {
            if self.matches(word) {
                return true;
            }
            if !is_filler(word) {
                return false;
            }
        }
        false
    }

    /// Looks for a keyword within `gap` filler words on one side of `offset`.
    pub fn near(&self, text: &str, offset: usize, direction: Direction, gap: usize) -> bool {
        self.found_in(ContextWindow::new(text, offset, direction, gap + 1))
    }

    /// Byte offset just past a keyword within `gap` filler words after `offset`.
    pub fn end_after(&self, text: &str, offset: usize, gap: usize) -> Option<usize> {
        let mut window = ContextWindow::after(text, offset, gap + 1);
        while let Some(word) = window.next() {
            if self.matches(word) {
                return Some(window.cursor);
            }
            if !is_filler(word) {
                return None;
            }
        }
        None
    }
}
