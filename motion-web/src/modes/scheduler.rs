//! Cancellable deferred tasks on a mode-local clock
//!
//! Replaces fire-and-forget timers: each mode owns one scheduler, advances
//! it with the tick delta, and clears it on deactivation so no staged effect
//! or respawn can run against torn-down entities.

/// Handle to a scheduled task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

struct ScheduledTask<T> {
    handle: TaskHandle,
    due: f64,
    task: T,
}

pub struct Scheduler<T> {
    /// Mode clock in seconds (sum of tick deltas)
    clock: f64,
    next_handle: u64,
    tasks: Vec<ScheduledTask<T>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            clock: 0.0,
            next_handle: 0,
            tasks: Vec::new(),
        }
    }

    pub fn now(&self) -> f64 {
        self.clock
    }

    /// Run `task` once `delay` seconds have elapsed on this clock
    pub fn schedule(&mut self, delay: f64, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.tasks.push(ScheduledTask {
            handle,
            due: self.clock + delay.max(0.0),
            task,
        });
        handle
    }

    /// Advance the clock and return tasks that became due, earliest first
    ///
    /// Tasks with equal due time come out in scheduling order.
    pub fn advance(&mut self, dt: f64) -> Vec<T> {
        self.clock += dt.max(0.0);
        let clock = self.clock;

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.tasks.len() {
            if self.tasks[i].due <= clock {
                due.push(self.tasks.remove(i));
            } else {
                i += 1;
            }
        }

        // Stable sort keeps scheduling order for ties
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|t| t.task).collect()
    }

    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != before
    }

    /// Drop every pending task, returning how many were cancelled
    pub fn cancel_all(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        count
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
