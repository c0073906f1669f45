use crossbeam::channel;
use std::thread;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A fixed set of worker threads fed from one shared channel.
///
/// Connections are handed over as boxed jobs; whichever worker is idle
/// picks the next one up. Dropping the pool closes the channel, which
/// lets every worker drain what it has and exit, and then joins them.
pub struct WorkerPool {
    handles: Vec<thread::JoinHandle<()>>,
    sender: Option<channel::Sender<Job>>,
}

impl WorkerPool {
    pub fn new(size: usize) -> WorkerPool {
        let (sender, receiver) = channel::unbounded::<Job>();

        let handles = (0..size)
            .map(|_| {
                let receiver = receiver.clone();
                thread::spawn(move || {
                    while let Ok(job) = receiver.recv() {
                        job();
                    }
                })
            })
            .collect();

        WorkerPool {
            handles,
            sender: Some(sender),
        }
    }

    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender.as_ref().unwrap().send(Box::new(job)).unwrap();
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.sender.take();

        for handle in self.handles.drain(..) {
            let _ = handle.join(); // a panicked job should not poison shutdown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn pool_runs_queued_jobs() {
        let pool = WorkerPool::new(4);
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();

        for _ in 0..20 {
            let counter = Arc::clone(&counter);
            let tx = tx.clone();
            pool.execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                tx.send(()).unwrap();
            });
        }

        for _ in 0..20 {
            rx.recv_timeout(Duration::from_secs(1)).unwrap();
        }

        assert_eq!(counter.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn pool_runs_jobs_concurrently() {
        let pool = WorkerPool::new(4);
        let barrier = Arc::new(std::sync::Barrier::new(4));
        let (tx, rx) = mpsc::channel();

        // each job blocks until all four are running, so this only
        // finishes if the workers really run in parallel
        for i in 0..4 {
            let barrier = Arc::clone(&barrier);
            let tx = tx.clone();
            pool.execute(move || {
                barrier.wait();
                tx.send(i).unwrap();
            });
        }

        for _ in 0..4 {
            rx.recv_timeout(Duration::from_secs(1)).unwrap();
        }
    }

    #[test]
    fn pool_finishes_work_before_shutdown() {
        let counter = Arc::new(AtomicUsize::new(0));

        {
            let pool = WorkerPool::new(2);
            for _ in 0..8 {
                let counter = Arc::clone(&counter);
                pool.execute(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
        } // drop joins the workers

        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn pool_survives_a_panicking_job() {
        let pool = WorkerPool::new(2);
        let (tx, rx) = mpsc::channel();

        pool.execute(|| panic!("job blew up"));
        pool.execute(move || {
            tx.send(42).unwrap();
        });

        let result = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(result, 42);
    }
}
