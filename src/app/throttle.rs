//! Trailing-edge throttle for search terms.
//!
//! The first term after an idle period opens a window. Terms arriving while
//! the window is open replace the pending one; nothing queues. When the window
//! closes only the latest term is released, and the next term opens a fresh
//! window. The timer itself lives in the engine loop; this type only tracks
//! which term survives.

/// Throttle window bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Throttle {
    pending: Option<String>,
    window_open: bool,
}

impl Throttle {
    /// Records `term` as the latest candidate.
    ///
    /// Returns `true` when this term opened a new window, meaning the caller
    /// must arm a timer.
    ///
    /// # Example
    ///
    /// ```rust
    /// use storesearch::app::Throttle;
    ///
    /// let mut throttle = Throttle::default();
    /// assert!(throttle.offer("c".to_string()));
    /// assert!(!throttle.offer("ca".to_string()));
    /// assert_eq!(throttle.close_window().as_deref(), Some("ca"));
    /// ```
    pub fn offer(&mut self, term: String) -> bool {
        self.pending = Some(term);
        if self.window_open {
            false
        } else {
            self.window_open = true;
            true
        }
    }

    /// Closes the window and releases the surviving term, if any.
    pub fn close_window(&mut self) -> Option<String> {
        self.window_open = false;
        self.pending.take()
    }

    #[must_use]
    pub const fn is_window_open(&self) -> bool {
        self.window_open
    }

    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }
}
