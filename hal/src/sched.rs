//! Cooperative scheduling hook
//!
//! Blocking waits in this crate never spin on their own; each poll that
//! comes back empty hands the processor to a [`Yield`] implementation
//! supplied by the caller (a cooperative kernel's idle step, a test tick,
//! or [`SpinYield`] when there is nothing else to run).

/// Relinquish the processor for one scheduling cycle
pub trait Yield {
    fn yield_now(&mut self);
}

impl<F: FnMut()> Yield for F {
    fn yield_now(&mut self) {
        self()
    }
}

/// Yield that only issues a spin-loop hint
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinYield;

impl Yield for SpinYield {
    fn yield_now(&mut self) {
        core::hint::spin_loop();
    }
}
