use crate::models::section::{Section, View};

/// Holds the active top-level section.
///
/// Switching is a plain assignment. Each switch to a different section
/// bumps the mount key: the panel for the new section starts from scratch
/// and anything the old panel still had in flight must be dropped.
#[derive(Debug, Clone, Default)]
pub struct SectionRouter {
    active: Section,
    mount_key: u64,
}

impl SectionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to `section`. Returns `true` if the panel must be remounted.
    pub fn navigate(&mut self, section: Section) -> bool {
        if section == self.active {
            return false;
        }
        tracing::debug!(from = %self.active, to = %section, "navigating");
        self.active = section;
        self.mount_key += 1;
        true
    }

    /// Back to the default section (used on logout).
    pub fn reset(&mut self) {
        self.navigate(Section::default());
    }

    #[must_use]
    pub fn active(&self) -> Section {
        self.active
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.active.view()
    }

    /// Identity of the currently mounted panel instance.
    #[must_use]
    pub fn mount_key(&self) -> u64 {
        self.mount_key
    }
}
