//! Invalidation bus keyed by resource.
//!
//! Mutations call [`RefreshBus::invalidate`]; every panel that lists the
//! resource holds its own [`RefreshCursor`] and consumes the signal with
//! [`RefreshCursor::take`]. Several invalidations between two polls collapse
//! into one re-fetch, and one subscriber consuming a signal never hides it
//! from another.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Projects,
    Feedback,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Feedback => "feedback",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RefreshBus {
    projects: u64,
    feedback: u64,
}

impl RefreshBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self, resource: Resource) {
        let generation = match resource {
            Resource::Projects => &mut self.projects,
            Resource::Feedback => &mut self.feedback,
        };
        *generation += 1;
        tracing::debug!(resource = resource.as_str(), generation = *generation, "invalidated");
    }

    pub fn generation(&self, resource: Resource) -> u64 {
        match resource {
            Resource::Projects => self.projects,
            Resource::Feedback => self.feedback,
        }
    }

    /// A cursor that is up to date with everything published so far.
    pub fn subscribe(&self, resource: Resource) -> RefreshCursor {
        RefreshCursor {
            resource,
            seen: self.generation(resource),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshCursor {
    resource: Resource,
    seen: u64,
}

impl RefreshCursor {
    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn is_stale(&self, bus: &RefreshBus) -> bool {
        bus.generation(self.resource) != self.seen
    }

    /// Returns `true` once per pending invalidation and marks it observed.
    pub fn take(&mut self, bus: &RefreshBus) -> bool {
        let current = bus.generation(self.resource);
        if current == self.seen {
            return false;
        }
        self.seen = current;
        true
    }
}
