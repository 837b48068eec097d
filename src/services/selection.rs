use std::collections::HashSet;

/// Bulk selection over the rendered conversation list.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    selected: HashSet<String>,
    anchor: Option<String>,
}

impl Selection {
    /// Flip `uuid`, or with `range` select everything between the last toggled
    /// row and `uuid` in the order given by `visible`.
    pub fn toggle(&mut self, uuid: &str, range: bool, visible: &[&str]) {
        let anchor = self.anchor.as_deref().filter(|a| *a != uuid);

        match (range, anchor) {
            (true, Some(anchor)) => {
                let from = visible.iter().position(|u| *u == anchor);
                let to = visible.iter().position(|u| *u == uuid);
                if let (Some(from), Some(to)) = (from, to) {
                    let (start, end) = (from.min(to), from.max(to));
                    self.selected
                        .extend(visible[start..=end].iter().map(|u| u.to_string()));
                }
            }
            _ => {
                if !self.selected.remove(uuid) {
                    self.selected.insert(uuid.to_string());
                }
            }
        }

        self.anchor = Some(uuid.to_string());
    }

    pub fn select_all(&mut self, visible: &[&str]) {
        self.selected = visible.iter().map(|u| u.to_string()).collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    pub fn is_selected(&self, uuid: &str) -> bool {
        self.selected.contains(uuid)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn all_selected(&self, visible_len: usize) -> bool {
        visible_len > 0 && self.selected.len() == visible_len
    }

    pub fn selected(&self) -> Vec<String> {
        let mut uuids: Vec<String> = self.selected.iter().cloned().collect();
        uuids.sort();
        uuids
    }
}
