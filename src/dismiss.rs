//! Timed dismissal of notifications.
//!
//! A dismissal has two stages: the element stays visible for `visible_ms`,
//! then fades for `fade_ms`, then is removed. Each stage is one page timer.
//! The pending timer is kept next to its element so a manual close can
//! disarm it instead of letting it fire against a detached node.

#[cfg(test)]
#[path = "dismiss_test.rs"]
mod dismiss_test;

use crate::page::{Page, TimerId};

/// Stage durations for a dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub visible_ms: u32,
    pub fade_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Waiting to start the fade.
    Visible,
    /// Fade applied; waiting to remove.
    Fading,
}

#[derive(Debug, Clone)]
struct Pending<N> {
    timer: TimerId,
    node: N,
    stage: Stage,
}

/// Registry of in-flight dismissals.
#[derive(Debug, Clone)]
pub struct Dismissals<N> {
    pending: Vec<Pending<N>>,
    next_timer: u32,
}

impl<N> Default for Dismissals<N> {
    fn default() -> Self {
        Self { pending: Vec::new(), next_timer: 1 }
    }
}

impl<N: Clone + PartialEq> Dismissals<N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the visible stage for `node`.
    ///
    /// A node that already has a dismissal in flight keeps it.
    pub fn schedule<P>(&mut self, page: &mut P, node: N, timing: Timing)
    where
        P: Page<Node = N>,
    {
        if self.stage_of(&node).is_some() {
            return;
        }
        let timer = self.arm(page, timing.visible_ms);
        self.pending.push(Pending { timer, node, stage: Stage::Visible });
    }

    /// Advance the dismissal owning `timer`. Returns `false` for unknown timers.
    pub fn on_timer<P>(&mut self, page: &mut P, timer: TimerId, timing: Timing) -> bool
    where
        P: Page<Node = N>,
    {
        let Some(index) = self.pending.iter().position(|p| p.timer == timer) else {
            return false;
        };
        match self.pending[index].stage {
            Stage::Visible => {
                let node = self.pending[index].node.clone();
                if !page.is_attached(&node) {
                    self.pending.remove(index);
                    return true;
                }
                page.set_style(&node, "transition", &format!("opacity {}s ease", seconds(timing.fade_ms)));
                page.set_style(&node, "opacity", "0");
                let next = self.arm(page, timing.fade_ms);
                let entry = &mut self.pending[index];
                entry.timer = next;
                entry.stage = Stage::Fading;
            }
            Stage::Fading => {
                let entry = self.pending.remove(index);
                page.remove(&entry.node);
            }
        }
        true
    }

    /// Disarm the dismissal for `node` without touching the element.
    pub fn cancel<P>(&mut self, page: &mut P, node: &N) -> bool
    where
        P: Page<Node = N>,
    {
        let Some(index) = self.pending.iter().position(|p| &p.node == node) else {
            return false;
        };
        let entry = self.pending.remove(index);
        page.clear_timeout(entry.timer);
        true
    }

    /// Remove `node` right away, disarming any pending stage.
    pub fn dismiss_now<P>(&mut self, page: &mut P, node: &N)
    where
        P: Page<Node = N>,
    {
        self.cancel(page, node);
        page.remove(node);
    }

    #[must_use]
    pub fn stage_of(&self, node: &N) -> Option<Stage> {
        self.pending.iter().find(|p| &p.node == node).map(|p| p.stage)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn arm<P>(&mut self, page: &mut P, delay_ms: u32) -> TimerId
    where
        P: Page<Node = N>,
    {
        let timer = TimerId(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1).max(1);
        page.set_timeout(timer, delay_ms);
        timer
    }
}

/// Milliseconds as a CSS seconds value (`500` -> `"0.5"`).
fn seconds(ms: u32) -> String {
    let whole = ms / 1000;
    let frac = ms % 1000;
    if frac == 0 {
        whole.to_string()
    } else {
        format!("{whole}.{}", format!("{frac:03}").trim_end_matches('0'))
    }
}
