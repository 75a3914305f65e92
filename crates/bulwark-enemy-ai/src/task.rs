//! Resumable per-tick tasks.
//!
//! Each task advances exactly once per tick and can be dropped at any yield
//! point without side effects. A [`TaskSlot`] holds at most one in-flight task
//! of a kind; starting another cancels the previous one.

use glam::{Quat, Vec3};

use bulwark_core::constants::DT;

/// Result of stepping a task once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step<T> {
    /// Still running; apply the value and resume next tick.
    Yield(T),
    /// Finished with a final value.
    Done(T),
}

impl<T> Step<T> {
    pub fn value(self) -> T {
        match self {
            Step::Yield(v) | Step::Done(v) => v,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done(_))
    }
}

pub trait Task {
    type Output;

    fn step(&mut self) -> Step<Self::Output>;
}

/// Linear position interpolation over a fixed number of ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: Vec3,
    to: Vec3,
    ticks: u32,
    elapsed: u32,
}

impl Tween {
    pub fn new(from: Vec3, to: Vec3, ticks: u32) -> Self {
        Self {
            from,
            to,
            ticks: ticks.max(1),
            elapsed: 0,
        }
    }
}

impl Task for Tween {
    type Output = Vec3;

    fn step(&mut self) -> Step<Vec3> {
        self.elapsed = (self.elapsed + 1).min(self.ticks);
        if self.elapsed == self.ticks {
            Step::Done(self.to)
        } else {
            let t = self.elapsed as f32 / self.ticks as f32;
            Step::Yield(self.from.lerp(self.to, t))
        }
    }
}

/// Spherical rotation interpolation over a fixed number of ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Reorient {
    from: Quat,
    to: Quat,
    ticks: u32,
    elapsed: u32,
}

impl Reorient {
    pub fn new(from: Quat, to: Quat, ticks: u32) -> Self {
        Self {
            from,
            to,
            ticks: ticks.max(1),
            elapsed: 0,
        }
    }
}

impl Task for Reorient {
    type Output = Quat;

    fn step(&mut self) -> Step<Quat> {
        self.elapsed = (self.elapsed + 1).min(self.ticks);
        if self.elapsed == self.ticks {
            Step::Done(self.to)
        } else {
            let t = self.elapsed as f32 / self.ticks as f32;
            Step::Yield(self.from.slerp(self.to, t))
        }
    }
}

/// Descends by a fixed step per tick until `depth` has been covered.
/// Yields the distance to move down this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Sink {
    remaining: f32,
    step: f32,
}

impl Sink {
    pub fn new(depth: f32, step: f32) -> Self {
        Self {
            remaining: depth.max(0.0),
            step,
        }
    }
}

impl Task for Sink {
    type Output = f32;

    fn step(&mut self) -> Step<f32> {
        let drop = self.step.min(self.remaining);
        self.remaining -= drop;
        if self.remaining <= 0.0 {
            Step::Done(drop)
        } else {
            Step::Yield(drop)
        }
    }
}

/// Waits a whole number of ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Delay {
    remaining_ticks: u32,
}

impl Delay {
    pub fn ticks(ticks: u32) -> Self {
        Self {
            remaining_ticks: ticks,
        }
    }

    /// Delay rounded up to whole ticks.
    pub fn secs(secs: f32) -> Self {
        Self::ticks((secs.max(0.0) / DT - 1e-3).ceil().max(0.0) as u32)
    }
}

impl Task for Delay {
    type Output = ();

    fn step(&mut self) -> Step<()> {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        if self.remaining_ticks == 0 {
            Step::Done(())
        } else {
            Step::Yield(())
        }
    }
}

/// Holder for at most one in-flight task of a kind.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSlot<T> {
    task: Option<T>,
}

impl<T> Default for TaskSlot<T> {
    fn default() -> Self {
        Self { task: None }
    }
}

impl<T> TaskSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `task`, cancelling any previous one. Returns true if one was replaced.
    pub fn start(&mut self, task: T) -> bool {
        self.task.replace(task).is_some()
    }

    /// Drop the in-flight task. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        self.task.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }
}

impl<T: Task> TaskSlot<T> {
    /// Step the in-flight task, clearing the slot when it finishes.
    pub fn step(&mut self) -> Option<Step<T::Output>> {
        let step = self.task.as_mut()?.step();
        if step.is_done() {
            self.task = None;
        }
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_reaches_target_on_last_tick() {
        let mut slot = TaskSlot::new();
        slot.start(Tween::new(Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0), 60));
        let mut last = None;
        for i in 1..=60 {
            let step = slot.step().unwrap();
            if i < 60 {
                assert!(matches!(step, Step::Yield(_)));
            }
            last = Some(step);
        }
        assert_eq!(last, Some(Step::Done(Vec3::new(6.0, 0.0, 0.0))));
        assert!(!slot.is_active());
        assert!(slot.step().is_none());
    }

    #[test]
    fn test_reorient_is_monotonic() {
        let to = Quat::from_rotation_y(1.0);
        let mut task = Reorient::new(Quat::IDENTITY, to, 10);
        let mut prev = Quat::IDENTITY.angle_between(to);
        loop {
            let step = task.step();
            let angle = step.value().angle_between(to);
            assert!(angle <= prev + 1e-5);
            prev = angle;
            if step.is_done() {
                break;
            }
        }
        assert!(prev < 1e-5);
    }

    #[test]
    fn test_sink_covers_exact_depth() {
        let mut task = Sink::new(1.0, 0.3);
        let mut total = 0.0;
        let mut steps = 0;
        loop {
            let step = task.step();
            total += step.value();
            steps += 1;
            if step.is_done() {
                break;
            }
        }
        assert_eq!(steps, 4);
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_delay_counts_ticks() {
        let mut slot = TaskSlot::new();
        slot.start(Delay::secs(0.5));
        let mut ticks = 0;
        while let Some(step) = slot.step() {
            ticks += 1;
            if step.is_done() {
                break;
            }
        }
        assert_eq!(ticks, 30);
    }

    #[test]
    fn test_start_replaces_and_cancel_is_idempotent() {
        let mut slot = TaskSlot::new();
        assert!(!slot.start(Delay::ticks(5)));
        assert!(slot.start(Delay::ticks(2)), "second start replaces the first");
        assert!(!slot.step().unwrap().is_done());
        assert!(slot.cancel());
        assert!(!slot.cancel());
        assert!(slot.step().is_none());
    }
}
