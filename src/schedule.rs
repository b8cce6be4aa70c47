use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

/// Ticks a task may catch up on in one poll before it resynchronises.
const MAX_CATCH_UP: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TaskId(u64);

struct TaskEntry {
    id: TaskId,
    period: Duration,
    next_due: Instant,
}

#[derive(Default)]
struct TaskTable {
    next_id: u64,
    entries: Vec<TaskEntry>,
}

/// Registry of repeating tasks driven by explicit `Instant`s instead of a wall-clock timer.
///
/// The event loop sleeps until [`Scheduler::next_deadline`]; each owner polls its
/// [`TaskGuard`] for the number of periods that elapsed.
#[derive(Default)]
pub struct Scheduler {
    tasks: Rc<RefCell<TaskTable>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a task first due one `period` after `now`.
    pub fn repeat_every(&self, period: Duration, now: Instant) -> TaskGuard {
        let mut table = self.tasks.borrow_mut();
        let id = TaskId(table.next_id);
        table.next_id += 1;
        table.entries.push(TaskEntry {
            id,
            period,
            next_due: now + period,
        });
        TaskGuard {
            id,
            tasks: Rc::downgrade(&self.tasks),
        }
    }

    /// Earliest instant at which any task becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks
            .borrow()
            .entries
            .iter()
            .map(|entry| entry.next_due)
            .min()
    }

    #[cfg(test)]
    pub fn active_tasks(&self) -> usize {
        self.tasks.borrow().entries.len()
    }
}

/// Handle to a repeating task; the task is cancelled when this is dropped.
pub struct TaskGuard {
    id: TaskId,
    tasks: Weak<RefCell<TaskTable>>,
}

impl TaskGuard {
    /// Number of periods that elapsed up to `now`, consuming them.
    ///
    /// Returns 0 if the scheduler is gone, so owners simply stop advancing.
    pub fn take_due(&self, now: Instant) -> u32 {
        let Some(tasks) = self.tasks.upgrade() else {
            return 0;
        };
        let mut table = tasks.borrow_mut();
        let Some(entry) = table.entries.iter_mut().find(|entry| entry.id == self.id) else {
            return 0;
        };

        let mut due = 0;
        while entry.next_due <= now {
            due += 1;
            entry.next_due += entry.period;
            if due == MAX_CATCH_UP {
                if entry.next_due <= now {
                    log::debug!("Task fell behind; skipping missed periods");
                    entry.next_due = now + entry.period;
                }
                break;
            }
        }
        due
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if let Some(tasks) = self.tasks.upgrade() {
            tasks
                .borrow_mut()
                .entries
                .retain(|entry| entry.id != self.id);
        }
    }
}
