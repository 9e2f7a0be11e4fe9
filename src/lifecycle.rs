//! Mount generations: async mounts started before an `unmount()` must not be
//! stored once they resolve.

use std::cell::Cell;

#[derive(Default)]
pub struct MountGeneration {
    current: Cell<u64>,
}

/// Snapshot of the generation an async mount was started in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MountTicket(u64);

impl MountGeneration {
    pub fn ticket(&self) -> MountTicket {
        MountTicket(self.current.get())
    }

    /// Invalidates every ticket handed out so far.
    pub fn advance(&self) {
        self.current.set(self.current.get().wrapping_add(1));
    }

    pub fn is_current(&self, ticket: MountTicket) -> bool {
        self.current.get() == ticket.0
    }

    /// Passes `component` through if `ticket` is still current, otherwise drops it.
    pub fn admit<T>(&self, ticket: MountTicket, component: T) -> Option<T> {
        self.is_current(ticket).then_some(component)
    }
}
