use std::collections::VecDeque;
use std::sync::{
    Condvar,
    Mutex,
};

/// Unbounded blocking FIFO: a mutex-guarded deque with a condition
/// variable signaled on every push. FIFO order holds per producer.
pub struct MessageQueue<T> {
    queue: Mutex<VecDeque<T>>,
    signal: Condvar,
}

impl<T> Default for MessageQueue<T> {
    fn default() -> Self { Self::new() }
}

impl<T> MessageQueue<T> {
    pub fn new() -> Self {
        return MessageQueue {
            queue: Mutex::new(VecDeque::new()),
            signal: Condvar::new(),
        };
    }

    pub fn push(&self, item: T) {
        let mut queue = self.queue.lock().unwrap();
        queue.push_back(item);
        self.signal.notify_one();
    }

    /// Block until an item is available.
    pub fn wait_and_pop(&self) -> T {
        let mut queue = self.queue.lock().unwrap();
        loop {
            match queue.pop_front() {
                Some(item) => { return item; },
                None => { queue = self.signal.wait(queue).unwrap(); },
            }
        }
    }

    pub fn try_pop(&self) -> Option<T> {
        return self.queue.lock().unwrap().pop_front();
    }

    /// Instantaneous snapshot; the answer can be stale by the time the
    /// caller acts on it.
    pub fn is_empty(&self) -> bool {
        return self.queue.lock().unwrap().is_empty();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use super::*;

    #[test]
    fn fifo_order_within_one_producer() {
        let q: MessageQueue<u32> = MessageQueue::new();
        q.push(1);
        q.push(2);
        q.push(3);
        assert_eq!(q.wait_and_pop(), 1);
        assert_eq!(q.try_pop(), Some(2));
        assert_eq!(q.wait_and_pop(), 3);
        assert_eq!(q.try_pop(), None);
    }

    #[test]
    fn empty_snapshot() {
        let q: MessageQueue<u32> = MessageQueue::new();
        assert!(q.is_empty());
        q.push(1);
        assert!(!q.is_empty());
        q.try_pop();
        assert!(q.is_empty());
    }

    #[test]
    fn wait_and_pop_blocks_until_a_push_arrives() {
        let q: Arc<MessageQueue<String>> = Arc::new(MessageQueue::new());
        let consumer = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.wait_and_pop())
        };
        thread::sleep(std::time::Duration::from_millis(50));
        q.push("ping".to_string());
        assert_eq!(consumer.join().unwrap(), "ping");
    }

    #[test]
    fn order_survives_a_thread_boundary() {
        let q: Arc<MessageQueue<u32>> = Arc::new(MessageQueue::new());
        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                for k in 0..100 {
                    q.push(k);
                }
            })
        };
        let received: Vec<u32> = (0..100).map(|_| q.wait_and_pop()).collect();
        producer.join().unwrap();
        assert_eq!(received, (0..100).collect::<Vec<u32>>());
    }
}
