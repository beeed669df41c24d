//! # Queue Ordering Engine
//!
//! Recomputes the walk-in queue numbering from scratch on every mutation.
//! The full recompute guarantees the invariant by construction: Waiting
//! entries carry a dense 1..N sequence ordered High-priority-first then by
//! arrival, and everything else carries 0.

use uuid::Uuid;

use crate::models::queue::{QueueEntry, QueuePriority, QueueStatus};

/// A queue-number write produced by [`reorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueAssignment {
    pub id: Uuid,
    pub queue_number: i32,
}

fn priority_rank(priority: QueuePriority) -> u8 {
    match priority {
        QueuePriority::High => 0,
        QueuePriority::Normal => 1,
    }
}

/// Computes the queue numbers for the whole queue and returns only the
/// entries whose number must change. Idempotent: applying the assignments
/// and running again yields nothing.
pub fn reorder(entries: &[QueueEntry]) -> Vec<QueueAssignment> {
    let mut waiting: Vec<&QueueEntry> = entries
        .iter()
        .filter(|e| e.status == QueueStatus::Waiting)
        .collect();
    waiting.sort_by(|a, b| {
        priority_rank(a.priority)
            .cmp(&priority_rank(b.priority))
            .then(a.arrival_time.cmp(&b.arrival_time))
    });

    let mut changes = Vec::new();
    for (index, entry) in waiting.iter().enumerate() {
        let queue_number = (index + 1) as i32;
        if entry.queue_number != queue_number {
            changes.push(QueueAssignment {
                id: entry.id,
                queue_number,
            });
        }
    }

    // Entries that left the waiting sequence keep a stale number until reset.
    for entry in entries
        .iter()
        .filter(|e| e.status != QueueStatus::Waiting && e.queue_number != 0)
    {
        changes.push(QueueAssignment {
            id: entry.id,
            queue_number: 0,
        });
    }

    changes
}
