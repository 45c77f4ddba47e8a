//! Cross-call mailbox
//!
//! Bookkeeping for running one function on a group of CPUs. Each broadcast
//! carries a generation number and every CPU records the last generation it
//! finished, so an acknowledgement only ever counts for the broadcast it
//! was made for.
//!
//! The mailbox never touches the hardware: callers pass CPU numbers in and
//! do their own waking and waiting. [`crate::smp`] wires it to WFE/SEV.

use core::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use spin::Mutex;

/// A function to run on every CPU, with its argument
#[derive(Debug, Clone, Copy)]
pub struct CrossCall {
    /// Function to run
    pub func: fn(usize),
    /// Passed to `func` unchanged
    pub arg: usize,
}

impl CrossCall {
    /// Run the call on the current CPU
    #[inline]
    pub fn run(self) {
        (self.func)(self.arg);
    }
}

/// What the posting CPU has to wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u32,
    waiting: u64,
}

impl Ticket {
    /// Generation of the posted call
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Shared state for broadcasting calls to up to `N` CPUs (`N <= 64`)
pub struct Mailbox<const N: usize> {
    /// Current call, tagged with its generation
    slot: Mutex<Option<(u32, CrossCall)>>,
    generation: AtomicU32,
    /// CPUs a new broadcast has to wait for
    members: AtomicU64,
    /// Last generation each CPU finished
    done: [AtomicU32; N],
}

impl<const N: usize> Mailbox<N> {
    const CPUS_FIT: () = assert!(N <= u64::BITS as usize);

    /// An empty mailbox whose initial members are the bits of `members`
    #[must_use]
    pub const fn new(members: u64) -> Self {
        let () = Self::CPUS_FIT;
        Self {
            slot: Mutex::new(None),
            generation: AtomicU32::new(0),
            members: AtomicU64::new(members),
            done: [const { AtomicU32::new(0) }; N],
        }
    }

    /// Add `cpu` to the CPUs later broadcasts wait for.
    ///
    /// Anything posted before the CPU joined counts as handled by it, so a
    /// broadcast either waits for the CPU or the CPU skips it, never both.
    pub fn join(&self, cpu: usize) {
        let Some(done) = self.done.get(cpu) else {
            return;
        };
        let _slot = self.slot.lock();
        done.store(self.generation.load(Ordering::Relaxed), Ordering::Release);
        self.members.fetch_or(1 << cpu, Ordering::AcqRel);
    }

    /// Publish `call` from `cpu`. The caller runs the call itself and is
    /// not waited for.
    ///
    /// Posts must not overlap: the caller serialises them and waits for
    /// each ticket to complete before posting again.
    pub fn post(&self, cpu: usize, call: CrossCall) -> Ticket {
        let mut slot = self.slot.lock();
        let generation = self.generation.load(Ordering::Relaxed).wrapping_add(1);
        *slot = Some((generation, call));
        self.generation.store(generation, Ordering::Release);

        let mut waiting = self.members.load(Ordering::Acquire);
        if let Some(done) = self.done.get(cpu) {
            done.store(generation, Ordering::Release);
            waiting &= !(1 << cpu);
        }
        Ticket {
            generation,
            waiting,
        }
    }

    /// Claim the pending call for `cpu`, if it has not run it yet.
    ///
    /// Report completion with [`Mailbox::complete`] once it has run.
    pub fn take(&self, cpu: usize) -> Option<(u32, CrossCall)> {
        let done = self.done.get(cpu)?;
        if done.load(Ordering::Acquire) == self.generation.load(Ordering::Acquire) {
            return None;
        }

        let pending = *self.slot.lock();
        pending.filter(|(generation, _)| done.load(Ordering::Acquire) != *generation)
    }

    /// Record that `cpu` finished the call of `generation`
    pub fn complete(&self, cpu: usize, generation: u32) {
        if let Some(done) = self.done.get(cpu) {
            done.store(generation, Ordering::Release);
        }
    }

    /// Check whether every CPU the ticket waits for has finished its call.
    ///
    /// CPUs for which `present` is false are no longer waited for.
    pub fn is_complete(&self, ticket: &Ticket, present: impl Fn(usize) -> bool) -> bool {
        self.done.iter().enumerate().all(|(cpu, done)| {
            ticket.waiting & (1 << cpu) == 0
                || !present(cpu)
                || done.load(Ordering::Acquire) == ticket.generation
        })
    }
}
