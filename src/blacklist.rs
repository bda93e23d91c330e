use crate::normalizer::InteractionRecord;

/// Substring filter over command and module names.
#[derive(Debug, Clone, Copy)]
pub struct Blacklist<'a> {
    entries: &'a [String],
}

impl<'a> Blacklist<'a> {
    pub fn new(entries: &'a [String]) -> Self {
        Blacklist { entries }
    }

    /// True when any entry occurs in the record's name or in its module name.
    /// A record without a module can only be excluded through its own name.
    pub fn excludes_command(&self, record: &InteractionRecord) -> bool {
        self.entries.iter().any(|entry| {
            record.name.contains(entry.as_str())
                || record
                    .module
                    .as_deref()
                    .map_or(false, |module| module.contains(entry.as_str()))
        })
    }

    /// Module-level check used when listing categories. Records without a
    /// module are never excluded here, even if their own name matches.
    pub fn excludes_module(&self, record: &InteractionRecord) -> bool {
        record.module.is_some() && self.excludes_command(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::InteractionKind;

    fn record(name: &str, module: Option<&str>) -> InteractionRecord {
        InteractionRecord {
            name: name.to_string(),
            description: None,
            kind: InteractionKind::SlashCommand { options: Vec::new() },
            module: module.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_blacklist_excludes_nothing() {
        let blacklist = Blacklist::new(&[]);
        assert!(!blacklist.excludes_command(&record("admin", Some("admin"))));
        assert!(!blacklist.excludes_module(&record("admin", Some("admin"))));
    }

    #[test]
    fn test_matches_name_or_module() {
        let entries = vec!["admin".to_string()];
        let blacklist = Blacklist::new(&entries);

        assert!(blacklist.excludes_command(&record("admin_role", None)));
        assert!(blacklist.excludes_command(&record("settings", Some("admin_tools"))));
        assert!(!blacklist.excludes_command(&record("ping", Some("utility"))));
    }

    #[test]
    fn test_moduleless_records_never_excluded_as_module() {
        let entries = vec!["admin".to_string()];
        let blacklist = Blacklist::new(&entries);

        let orphan = record("admin_role", None);
        assert!(blacklist.excludes_command(&orphan));
        assert!(!blacklist.excludes_module(&orphan));

        assert!(blacklist.excludes_module(&record("admin_role", Some("utility"))));
    }
}
