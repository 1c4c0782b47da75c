//! Apply-then-confirm updates with rollback.
//!
//! A [`Slot`] is any cell of client state that can be read and replaced.
//! [`OptimisticUpdate`] captures the slot's value, applies the local change
//! immediately, and later either commits the server's authoritative value or
//! restores the captured one. Overlapping updates on the same slot each hold
//! their own snapshot; whichever finishes last decides the final value.

use std::future::Future;

use tokio::sync::watch;

pub trait Slot {
    type Value: Clone;

    fn snapshot(&self) -> Self::Value;
    fn replace(&self, value: Self::Value);
    fn modify(&self, mutate: impl FnOnce(&mut Self::Value));
}

impl<S: Slot + ?Sized> Slot for &S {
    type Value = S::Value;

    fn snapshot(&self) -> Self::Value {
        (**self).snapshot()
    }

    fn replace(&self, value: Self::Value) {
        (**self).replace(value)
    }

    fn modify(&self, mutate: impl FnOnce(&mut Self::Value)) {
        (**self).modify(mutate)
    }
}

/// View-local state held in its own watch channel.
impl<T: Clone> Slot for watch::Sender<T> {
    type Value = T;

    fn snapshot(&self) -> T {
        self.borrow().clone()
    }

    fn replace(&self, value: T) {
        self.send_replace(value);
    }

    fn modify(&self, mutate: impl FnOnce(&mut T)) {
        self.send_modify(mutate);
    }
}

#[must_use = "an optimistic update must be committed or rolled back"]
pub struct OptimisticUpdate<S: Slot> {
    slot: S,
    snapshot: S::Value,
}

impl<S: Slot> OptimisticUpdate<S> {
    pub fn capture(slot: S) -> Self {
        let snapshot = slot.snapshot();
        Self { slot, snapshot }
    }

    pub fn apply(&self, mutate: impl FnOnce(&mut S::Value)) {
        self.slot.modify(mutate);
    }

    pub fn snapshot(&self) -> &S::Value {
        &self.snapshot
    }

    pub fn commit(self, authoritative: S::Value) {
        self.slot.replace(authoritative);
    }

    /// Keep whatever the local change produced.
    pub fn keep(self) {}

    pub fn rollback(self) {
        self.slot.replace(self.snapshot);
    }
}

/// Capture, apply `mutate`, await `request`, then commit its value or roll back.
///
/// `request` is only polled after the local change is visible.
pub async fn run<S, F, E>(
    slot: S,
    mutate: impl FnOnce(&mut S::Value),
    request: F,
) -> Result<S::Value, E>
where
    S: Slot,
    F: Future<Output = Result<S::Value, E>>,
{
    let update = OptimisticUpdate::capture(slot);
    update.apply(mutate);
    match request.await {
        Ok(value) => {
            update.commit(value.clone());
            Ok(value)
        }
        Err(error) => {
            update.rollback();
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commit_replaces_with_server_value() {
        let (tx, _rx) = watch::channel(vec![1, 2]);

        let result: Result<_, ()> = run(&tx, |v| v.push(3), async { Ok(vec![1, 2, 3, 4]) }).await;

        assert_eq!(result, Ok(vec![1, 2, 3, 4]));
        assert_eq!(*tx.borrow(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn failure_restores_snapshot() {
        let (tx, _rx) = watch::channel(vec![1, 2]);

        let result = run(&tx, |v| v.clear(), async { Err::<Vec<i32>, _>("offline") }).await;

        assert_eq!(result, Err("offline"));
        assert_eq!(*tx.borrow(), vec![1, 2]);
    }

    #[tokio::test]
    async fn local_change_is_visible_before_request_runs() {
        let (tx, rx) = watch::channel(0_u32);

        let seen = run(&tx, |v| *v = 7, async {
            let during = *rx.borrow();
            Ok::<_, ()>(during)
        })
        .await;

        assert_eq!(seen, Ok(7));
    }

    #[test]
    fn manual_rollback_after_partial_apply() {
        let (tx, _rx) = watch::channel(String::from("draft"));
        let update = OptimisticUpdate::capture(&tx);
        update.apply(|s| s.push_str(" edited"));
        assert_eq!(*tx.borrow(), "draft edited");
        assert_eq!(update.snapshot(), "draft");

        update.rollback();
        assert_eq!(*tx.borrow(), "draft");
    }

    #[test]
    fn overlapping_updates_last_writer_wins() {
        let (tx, _rx) = watch::channel(vec!["a"]);
        let first = OptimisticUpdate::capture(&tx);
        first.apply(|v| v.push("b"));
        let second = OptimisticUpdate::capture(&tx);
        second.apply(|v| v.push("c"));

        second.commit(vec!["a", "b", "c"]);
        first.rollback();

        assert_eq!(*tx.borrow(), vec!["a"]);
    }
}
