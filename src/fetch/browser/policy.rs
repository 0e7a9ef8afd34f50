//! Request filtering for rendered pages
//!
//! The policy is a pure function of the resource kind. The browser driver
//! asks it once per intercepted request and either lets the request through
//! or fails it as blocked by the client.

/// Kind of resource a page is requesting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Document,
    Stylesheet,
    Image,
    Media,
    Font,
    Script,
    Xhr,
    Fetch,
    Other,
}

/// What to do with an intercepted request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Abort,
}

/// Set of resource kinds that are never loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFilter {
    blocked: Vec<ResourceKind>,
}

/// Kinds that only affect presentation and are skipped by default
pub const PRESENTATION_KINDS: &[ResourceKind] = &[
    ResourceKind::Image,
    ResourceKind::Font,
    ResourceKind::Stylesheet,
    ResourceKind::Media,
];

impl Default for RequestFilter {
    fn default() -> Self {
        Self::blocking(PRESENTATION_KINDS)
    }
}

impl RequestFilter {
    /// Filter that aborts exactly the given kinds
    pub fn blocking(kinds: &[ResourceKind]) -> Self {
        Self {
            blocked: kinds.to_vec(),
        }
    }

    /// Filter that lets everything through
    pub fn allow_all() -> Self {
        Self::blocking(&[])
    }

    pub fn decide(&self, kind: ResourceKind) -> Verdict {
        if self.blocked.contains(&kind) {
            Verdict::Abort
        } else {
            Verdict::Allow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_blocks_presentation() {
        let filter = RequestFilter::default();
        for kind in PRESENTATION_KINDS {
            assert_eq!(filter.decide(*kind), Verdict::Abort);
        }
    }

    #[test]
    fn test_default_allows_content() {
        let filter = RequestFilter::default();
        for kind in [
            ResourceKind::Document,
            ResourceKind::Script,
            ResourceKind::Xhr,
            ResourceKind::Fetch,
            ResourceKind::Other,
        ] {
            assert_eq!(filter.decide(kind), Verdict::Allow);
        }
    }

    #[test]
    fn test_allow_all() {
        assert_eq!(RequestFilter::allow_all().decide(ResourceKind::Image), Verdict::Allow);
    }
}
