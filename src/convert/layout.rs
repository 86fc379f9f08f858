/// Column order rules for the exported workbook.
#[derive(Debug, Clone, Copy)]
pub struct ColumnLayout {
    /// Moved to the front, in this order.
    pub leading: &'static [&'static str],
    /// Never written.
    pub dropped: &'static [&'static str],
    /// Moved to the end, in this order.
    pub trailing: &'static [&'static str],
}

/// Minute first, audience totals and the key-event text last.
pub const LIVE_LAYOUT: ColumnLayout = ColumnLayout {
    leading: &["timeMinute"],
    dropped: &["groupPlay"],
    trailing: &["watchUcnt", "pcuTotal", "keyEvent"],
};

impl ColumnLayout {
    /// Reorder `columns`. Columns not named by the layout keep their relative order.
    pub fn arrange(&self, columns: &[String]) -> Vec<String> {
        let present = |name: &&&str| columns.iter().any(|c| c == **name);
        let pinned = |col: &str| {
            listed(self.leading, col) || listed(self.dropped, col) || listed(self.trailing, col)
        };

        let mut arranged = Vec::with_capacity(columns.len());
        arranged.extend(self.leading.iter().filter(present).map(|s| s.to_string()));
        arranged.extend(columns.iter().filter(|c| !pinned(c.as_str())).cloned());
        arranged.extend(self.trailing.iter().filter(present).map(|s| s.to_string()));
        arranged
    }
}

fn listed(list: &[&str], name: &str) -> bool {
    list.iter().any(|n| *n == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_live_layout() {
        let arranged = LIVE_LAYOUT.arrange(&cols(&[
            "keyEvent", "pcuTotal", "likeCnt", "groupPlay", "watchUcnt", "timeMinute", "c",
        ]));
        assert_eq!(
            arranged,
            cols(&["timeMinute", "likeCnt", "c", "watchUcnt", "pcuTotal", "keyEvent"])
        );
    }

    #[test]
    fn test_absent_pinned_columns_are_not_invented() {
        let arranged = LIVE_LAYOUT.arrange(&cols(&["timeMinute", "watchUcnt"]));
        assert_eq!(arranged, cols(&["timeMinute", "watchUcnt"]));
        assert!(LIVE_LAYOUT.arrange(&[]).is_empty());
    }
}
