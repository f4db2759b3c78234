//! Path exclusion

use regex::Regex;

/// Marker of CVS bookkeeping directories
const VCS_METADATA_DIR: &str = "CVS/";

/// Decides which entry paths take no part in a comparison
#[derive(Debug, Clone, Copy)]
pub struct PathFilter<'a> {
    ignore_vcs: bool,
    pattern: Option<&'a Regex>,
}

impl<'a> PathFilter<'a> {
    pub fn new(ignore_vcs: bool, pattern: Option<&'a Regex>) -> Self {
        Self { ignore_vcs, pattern }
    }

    /// Whether `entry_name`, found under `containing_path`, is excluded
    ///
    /// An empty name is never excluded. The pattern must match the whole
    /// name; a match on part of it does not count.
    pub fn should_ignore(&self, containing_path: &str, entry_name: &str) -> bool {
        if entry_name.is_empty() {
            return false;
        }

        if self.ignore_vcs
            && (containing_path.contains(VCS_METADATA_DIR) || entry_name.contains(VCS_METADATA_DIR))
        {
            return true;
        }

        self.pattern.is_some_and(|re| {
            let excluded = re.is_match(entry_name);
            if excluded {
                tracing::trace!(entry = entry_name, "matched exclusion pattern");
            }
            excluded
        })
    }
}
