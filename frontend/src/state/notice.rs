//! Transient notices (success, warning and error banners).

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeKind::Success => "notice notice-success",
            NoticeKind::Warning => "notice notice-warning",
            NoticeKind::Error => "notice notice-error",
        }
    }
}

/// A message that dismisses itself after `ttl_ms`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub ttl_ms: u32,
}

impl Notice {
    pub fn success(text: impl Into<String>, ttl_ms: u32) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
            ttl_ms,
        }
    }

    pub fn warning(text: impl Into<String>, ttl_ms: u32) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
            ttl_ms,
        }
    }

    pub fn error(text: impl Into<String>, ttl_ms: u32) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
            ttl_ms,
        }
    }
}

/// The single visible notice. Every `show` gets a fresh id, and an expiry
/// timer only removes the notice it was started for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeSlot {
    current: Option<(u64, Notice)>,
    next_id: u64,
}

impl NoticeSlot {
    pub fn show(&mut self, notice: Notice) -> u64 {
        self.next_id += 1;
        self.current = Some((self.next_id, notice));
        self.next_id
    }

    /// Remove the notice `id` if it is still the one shown.
    pub fn expire(&mut self, id: u64) -> bool {
        match &self.current {
            Some((current, _)) if *current == id => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref().map(|(_, notice)| notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expire_only_clears_matching_notice() {
        let mut slot = NoticeSlot::default();
        let first = slot.show(Notice::error("first", 8_000));
        let second = slot.show(Notice::success("second", 5_000));

        assert!(!slot.expire(first));
        assert_eq!(slot.current().map(|n| n.text.as_str()), Some("second"));

        assert!(slot.expire(second));
        assert_eq!(slot.current(), None);
    }

    #[test]
    fn test_dismiss() {
        let mut slot = NoticeSlot::default();
        let id = slot.show(Notice::warning("careful", 5_000));
        slot.dismiss();
        assert!(slot.current().is_none());
        assert!(!slot.expire(id));
    }
}
