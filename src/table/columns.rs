/// Responsive priority hint: decides whether a column survives into the
/// compact (narrow-viewport) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Maps a row attribute to a display column.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub key: String,
    pub header: String,
    pub priority: Option<Priority>,
    /// Fixed width in terminal columns; fitted from content when unset.
    pub width: Option<u16>,
}

impl ColumnSpec {
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            priority: None,
            width: None,
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }
}

/// Viewport class, computed once per resize event and passed down
/// explicitly. Render code never measures the terminal itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewport {
    #[default]
    Wide,
    Narrow,
}

impl Viewport {
    pub fn classify(width: u16, narrow_threshold: u16) -> Self {
        if width < narrow_threshold {
            Viewport::Narrow
        } else {
            Viewport::Wide
        }
    }

    pub fn is_narrow(&self) -> bool {
        matches!(self, Viewport::Narrow)
    }
}

/// Column indices visible in the compact form: declared-high columns plus
/// the first three undeclared ones, which count as implicitly high.
pub fn compact_columns(columns: &[ColumnSpec]) -> Vec<usize> {
    let mut undeclared_seen = 0;
    columns
        .iter()
        .enumerate()
        .filter(|(_, col)| match col.priority {
            Some(Priority::High) => true,
            Some(_) => false,
            None => {
                undeclared_seen += 1;
                undeclared_seen <= 3
            }
        })
        .map(|(i, _)| i)
        .collect()
}

/// Column indices to render for a viewport class. Selection is purely
/// presentational: searchable keys and pagination are unaffected.
pub fn visible_columns(columns: &[ColumnSpec], viewport: Viewport) -> Vec<usize> {
    match viewport {
        Viewport::Wide => (0..columns.len()).collect(),
        Viewport::Narrow => compact_columns(columns),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("a", "A"),
            ColumnSpec::new("b", "B").priority(Priority::Low),
            ColumnSpec::new("c", "C"),
            ColumnSpec::new("d", "D").priority(Priority::High),
            ColumnSpec::new("e", "E"),
            ColumnSpec::new("f", "F"),
            ColumnSpec::new("g", "G").priority(Priority::Medium),
        ]
    }

    #[test]
    fn test_wide_shows_everything() {
        assert_eq!(visible_columns(&cols(), Viewport::Wide).len(), 7);
    }

    #[test]
    fn test_narrow_keeps_high_and_first_three_undeclared() {
        // a, c, e are the first three undeclared; d is declared high.
        assert_eq!(visible_columns(&cols(), Viewport::Narrow), vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_classify_uses_threshold() {
        assert_eq!(Viewport::classify(79, 80), Viewport::Narrow);
        assert_eq!(Viewport::classify(80, 80), Viewport::Wide);
    }
}
