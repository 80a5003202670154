//! Worker pool. Password hashing and RSA signing are CPU-bound and would
//! stall the async runtime if run inline; this hands them off to a small
//! pool of dedicated OS threads with three priority lanes so a login
//! storm can't starve token refreshes (and vice versa).

use std::sync::Arc;
use std::thread;

use flume::{Receiver, Sender};
use tokio::sync::oneshot;

#[derive(Clone, Copy, Debug)]
pub enum Priority {
	High,
	Medium,
	Low,
}

type Job = Box<dyn FnOnce() + Send>;

#[derive(Debug)]
pub struct WorkerPool {
	tx_high: Sender<Job>,
	tx_med: Sender<Job>,
	tx_low: Sender<Job>,
}

impl WorkerPool {
	/// `n1` threads drain only the high lane, `n2` drain high+medium,
	/// `n3` drain all three. A deployment with no low-priority work can
	/// pass `n3 = 0` and keep every thread dedicated to hot paths.
	#[must_use]
	pub fn new(n1: usize, n2: usize, n3: usize) -> Self {
		let (tx_high, rx_high) = flume::unbounded();
		let (tx_med, rx_med) = flume::unbounded();
		let (tx_low, rx_low) = flume::unbounded();

		let rx_high = Arc::new(rx_high);
		let rx_med = Arc::new(rx_med);
		let rx_low = Arc::new(rx_low);

		for _ in 0..n1 {
			let rx_high = Arc::clone(&rx_high);
			thread::spawn(move || worker_loop(vec![rx_high]));
		}

		for _ in 0..n2 {
			let rx_high = Arc::clone(&rx_high);
			let rx_med = Arc::clone(&rx_med);
			thread::spawn(move || worker_loop(vec![rx_high, rx_med]));
		}

		for _ in 0..n3 {
			let rx_high = Arc::clone(&rx_high);
			let rx_med = Arc::clone(&rx_med);
			let rx_low = Arc::clone(&rx_low);
			thread::spawn(move || worker_loop(vec![rx_high, rx_med, rx_low]));
		}

		Self { tx_high, tx_med, tx_low }
	}

	/// Offload `f` to the given priority lane and await its result.
	pub fn spawn<F, T>(&self, priority: Priority, f: F) -> impl std::future::Future<Output = Option<T>>
	where
		F: FnOnce() -> T + Send + 'static,
		T: Send + 'static,
	{
		let (res_tx, res_rx) = oneshot::channel();
		let job: Job = Box::new(move || {
			let result = f();
			let _ = res_tx.send(result);
		});

		let tx = match priority {
			Priority::High => &self.tx_high,
			Priority::Medium => &self.tx_med,
			Priority::Low => &self.tx_low,
		};
		if tx.send(job).is_err() {
			tracing::error!("worker pool queue closed, dropping job");
		}

		async move {
			match res_rx.await {
				Ok(result) => Some(result),
				Err(_) => {
					tracing::error!("worker dropped result channel without sending");
					None
				}
			}
		}
	}
}

fn worker_loop(queues: Vec<Arc<Receiver<Job>>>) {
	loop {
		let mut job = None;
		for rx in &queues {
			if let Ok(j) = rx.try_recv() {
				job = Some(j);
				break;
			}
		}

		if let Some(job) = job {
			job();
			continue;
		}

		let mut selector = flume::Selector::new();
		for rx in &queues {
			selector = selector.recv(rx, |res| res);
		}

		if let Ok(job) = selector.wait() {
			job();
		}
	}
}

// vim: ts=4
