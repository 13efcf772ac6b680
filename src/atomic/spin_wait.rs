/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Spin Wait
//!
//! Backoff state shared by every retry loop of the crate.
//!
//! # Author
//!
//! Haixing Hu

use crossbeam_utils::Backoff;

/// Progressive backoff for one retry loop.
///
/// Lost CAS races call [`spin`](SpinWait::spin), which only spins with an
/// exponentially growing count. Waiting for a condition that another thread
/// must establish calls [`snooze`](SpinWait::snooze), which spins first and
/// then yields the time slice to the OS scheduler.
///
/// With the `tracing` feature, the first escalation to yielding is
/// reported once per wait as a `trace` event.
pub(crate) struct SpinWait {
    backoff: Backoff,
    #[cfg(feature = "tracing")]
    site: &'static str,
    #[cfg(feature = "tracing")]
    escalated: bool,
}

impl SpinWait {
    /// Creates the backoff state for the retry loop named `site`.
    #[inline]
    pub(crate) fn new(site: &'static str) -> Self {
        #[cfg(not(feature = "tracing"))]
        let _ = site;
        Self {
            backoff: Backoff::new(),
            #[cfg(feature = "tracing")]
            site,
            #[cfg(feature = "tracing")]
            escalated: false,
        }
    }

    /// Backs off after losing a CAS race.
    #[inline]
    pub(crate) fn spin(&self) {
        self.backoff.spin();
    }

    /// Backs off while waiting for another thread to make progress.
    #[inline]
    pub(crate) fn snooze(&mut self) {
        #[cfg(feature = "tracing")]
        if !self.escalated && self.backoff.is_completed() {
            self.escalated = true;
            tracing::trace!(site = self.site, "spin wait escalated to yielding");
        }
        self.backoff.snooze();
    }
}
