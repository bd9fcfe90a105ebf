use std::sync::Arc;

use tokio::sync::watch;

/// Terminal outcome of a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Settlement {
	Resolved,
	Rejected,
}

impl Settlement {
	pub const fn is_resolved(self) -> bool {
		matches!(self, Self::Resolved)
	}
}

/// Clonable handle that settles exactly once.
///
/// Every clone observes the same settlement; any number of tasks may wait on
/// it. Settling an already settled handle is a no-op.
#[derive(Debug, Clone)]
pub struct Completion {
	tx: Arc<watch::Sender<Option<Settlement>>>,
}

impl Default for Completion {
	fn default() -> Self {
		Self::new()
	}
}

impl Completion {
	/// Creates an unsettled handle.
	pub fn new() -> Self {
		let (tx, _rx) = watch::channel(None);
		Self { tx: Arc::new(tx) }
	}

	/// Settles the handle. Returns `false` if it was already settled.
	pub fn settle(&self, settlement: Settlement) -> bool {
		self.tx.send_if_modified(|slot| {
			if slot.is_some() {
				return false;
			}
			*slot = Some(settlement);
			true
		})
	}

	pub fn resolve(&self) -> bool {
		self.settle(Settlement::Resolved)
	}

	pub fn reject(&self) -> bool {
		self.settle(Settlement::Rejected)
	}

	/// Current settlement without waiting.
	pub fn peek(&self) -> Option<Settlement> {
		*self.tx.borrow()
	}

	/// Waits until the handle settles.
	pub async fn wait(&self) -> Settlement {
		let mut rx = self.tx.subscribe();
		match rx.wait_for(Option::is_some).await {
			Ok(settled) => (*settled).unwrap_or(Settlement::Rejected),
			// The sender lives in `self`, so the channel cannot close while we wait.
			Err(_) => Settlement::Rejected,
		}
	}

	/// Whether two handles belong to the same request.
	pub fn same_handle(&self, other: &Completion) -> bool {
		Arc::ptr_eq(&self.tx, &other.tx)
	}
}

/// Waits for every handle and returns the settlements in input order.
///
/// Every handle settles before this returns, rejected or not. The handles
/// are owned so the future can be moved into a spawned task.
pub async fn settle_all(handles: Vec<Completion>) -> Vec<Settlement> {
	let mut settlements = Vec::with_capacity(handles.len());
	for handle in &handles {
		settlements.push(handle.wait().await);
	}
	settlements
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;

	#[test]
	fn settles_once() {
		let completion = Completion::new();
		assert_eq!(completion.peek(), None);
		assert!(completion.resolve());
		assert!(!completion.reject());
		assert_eq!(completion.peek(), Some(Settlement::Resolved));
	}

	#[tokio::test]
	async fn clones_share_settlement() {
		let completion = Completion::new();
		let waiter = completion.clone();
		let task = tokio::spawn(async move { waiter.wait().await });
		tokio::time::sleep(Duration::from_millis(5)).await;
		completion.reject();
		assert_eq!(task.await.ok(), Some(Settlement::Rejected));
	}

	#[tokio::test]
	async fn settle_all_runs_on_spawned_tasks() {
		let dependency = Completion::new();
		let handles = vec![dependency.clone()];
		let task = tokio::spawn(async move { settle_all(handles).await });
		dependency.resolve();
		assert_eq!(task.await.ok(), Some(vec![Settlement::Resolved]));
	}

	#[tokio::test]
	async fn wait_returns_immediately_when_settled() {
		let completion = Completion::new();
		completion.resolve();
		assert_eq!(completion.wait().await, Settlement::Resolved);
	}

	#[tokio::test]
	async fn settle_all_preserves_order() {
		let a = Completion::new();
		let b = Completion::new();
		b.reject();
		let a2 = a.clone();
		tokio::spawn(async move {
			tokio::time::sleep(Duration::from_millis(5)).await;
			a2.resolve();
		});
		assert_eq!(settle_all(vec![a.clone(), b.clone()]).await, vec![Settlement::Resolved, Settlement::Rejected]);
		assert!(a.same_handle(&a.clone()));
		assert!(!a.same_handle(&b));
	}
}
